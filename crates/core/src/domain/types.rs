use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Schema version carried by every record type that is persisted in the cache.
///
/// Bump a type's version whenever its serialized shape changes. Entries
/// written under an older version are discarded on read instead of being
/// misread as the new shape.
pub trait Versioned {
    const SCHEMA_VERSION: u32;
}

impl<T: Versioned> Versioned for Vec<T> {
    const SCHEMA_VERSION: u32 = T::SCHEMA_VERSION;
}

impl<T: Versioned> Versioned for [T] {
    const SCHEMA_VERSION: u32 = T::SCHEMA_VERSION;
}

impl Versioned for String {
    const SCHEMA_VERSION: u32 = 1;
}

impl Versioned for serde_json::Value {
    const SCHEMA_VERSION: u32 = 1;
}

/// The signed-in fan's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Club the fan follows most closely, if any.
    #[serde(default)]
    pub favorite_club_id: Option<String>,
}

impl User {
    /// Creates a new user with the given id and username.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            display_name: None,
            avatar_url: None,
            favorite_club_id: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_favorite_club(mut self, club_id: impl Into<String>) -> Self {
        self.favorite_club_id = Some(club_id.into());
        self
    }

    /// Name to show in the UI, falling back to the username.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

impl Versioned for User {
    const SCHEMA_VERSION: u32 = 1;
}

/// A fan club as returned by the club list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    /// Unique within a club list.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub member_count: u32,
}

impl Club {
    /// Creates a new club with the given id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sport: None,
            description: None,
            member_count: 0,
        }
    }

    pub fn with_sport(mut self, sport: impl Into<String>) -> Self {
        self.sport = Some(sport.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_member_count(mut self, member_count: u32) -> Self {
        self.member_count = member_count;
        self
    }
}

impl Versioned for Club {
    const SCHEMA_VERSION: u32 = 1;
}

/// A chat message posted in a club room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub room_id: String,
    pub sender_id: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Creates a new message stamped with a fresh id and the current time.
    pub fn new(
        room_id: impl Into<String>,
        sender_id: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            room_id: room_id.into(),
            sender_id: sender_id.into(),
            body: body.into(),
            sent_at: Utc::now(),
        }
    }

    /// Sets a specific ID for this message (useful for testing).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl Versioned for ChatMessage {
    const SCHEMA_VERSION: u32 = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_label_falls_back_to_username() {
        let user = User::new("u1", "ultra_fan");
        assert_eq!(user.label(), "ultra_fan");

        let user = user.with_display_name("Ultra Fan");
        assert_eq!(user.label(), "Ultra Fan");
    }

    #[test]
    fn test_club_builder() {
        let club = Club::new("1", "Rovers")
            .with_sport("football")
            .with_member_count(42);

        assert_eq!(club.id, "1");
        assert_eq!(club.sport, Some("football".to_string()));
        assert_eq!(club.member_count, 42);
        assert!(club.description.is_none());
    }

    #[test]
    fn test_club_deserializes_with_missing_optional_fields() {
        let club: Club = serde_json::from_str(r#"{"id":"9","name":"Z"}"#).unwrap();
        assert_eq!(club, Club::new("9", "Z"));
    }

    #[test]
    fn test_chat_message_gets_unique_ids() {
        let a = ChatMessage::new("room", "u1", "hello");
        let b = ChatMessage::new("room", "u1", "hello");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_collection_version_follows_item_version() {
        assert_eq!(<Vec<Club>>::SCHEMA_VERSION, Club::SCHEMA_VERSION);
        assert_eq!(<Vec<ChatMessage>>::SCHEMA_VERSION, ChatMessage::SCHEMA_VERSION);
    }
}
