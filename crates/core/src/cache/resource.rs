//! Logical resource keys understood by the cache-aside layer.

use std::fmt;

const USER_PROFILE: &str = "user-profile";
const CLUB_LIST: &str = "club-list";
const CHAT_HISTORY_PREFIX: &str = "chat-history:";

/// A resource a consumer can request through the query layer.
///
/// The first three map onto a domain cache. Anything else is passed straight
/// through to the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    UserProfile,
    ClubList,
    ChatHistory(String),
    Other(String),
}

impl ResourceKey {
    /// Parses a query key string.
    ///
    /// # Examples
    ///
    /// ```
    /// use fanclub_core::cache::ResourceKey;
    ///
    /// assert_eq!(ResourceKey::parse("club-list"), ResourceKey::ClubList);
    /// assert_eq!(
    ///     ResourceKey::parse("chat-history:7"),
    ///     ResourceKey::ChatHistory("7".to_string())
    /// );
    /// assert_eq!(
    ///     ResourceKey::parse("/api/fixtures"),
    ///     ResourceKey::Other("/api/fixtures".to_string())
    /// );
    /// ```
    pub fn parse(key: &str) -> Self {
        match key {
            USER_PROFILE => Self::UserProfile,
            CLUB_LIST => Self::ClubList,
            _ => match key.strip_prefix(CHAT_HISTORY_PREFIX) {
                Some(room_id) if !room_id.is_empty() => Self::ChatHistory(room_id.to_string()),
                _ => Self::Other(key.to_string()),
            },
        }
    }

    /// Convenience constructor for a room's chat history.
    pub fn chat_history(room_id: impl Into<String>) -> Self {
        Self::ChatHistory(room_id.into())
    }

    /// Returns the key used by the query layer to track this resource.
    pub fn query_key(&self) -> String {
        self.to_string()
    }

    /// Returns the API path the resource is fetched from.
    pub fn resource_path(&self) -> String {
        match self {
            Self::UserProfile => "/api/users/me".to_string(),
            Self::ClubList => "/api/clubs".to_string(),
            Self::ChatHistory(room_id) => format!("/api/chat/{}/messages", room_id),
            Self::Other(path) => path.clone(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserProfile => f.write_str(USER_PROFILE),
            Self::ClubList => f.write_str(CLUB_LIST),
            Self::ChatHistory(room_id) => write!(f, "{}{}", CHAT_HISTORY_PREFIX, room_id),
            Self::Other(path) => f.write_str(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_keys() {
        assert_eq!(ResourceKey::parse("user-profile"), ResourceKey::UserProfile);
        assert_eq!(ResourceKey::parse("club-list"), ResourceKey::ClubList);
        assert_eq!(
            ResourceKey::parse("chat-history:north"),
            ResourceKey::chat_history("north")
        );
    }

    #[test]
    fn test_parse_empty_room_is_passthrough() {
        assert_eq!(
            ResourceKey::parse("chat-history:"),
            ResourceKey::Other("chat-history:".to_string())
        );
    }

    #[test]
    fn test_query_key_roundtrip() {
        for key in [
            ResourceKey::UserProfile,
            ResourceKey::ClubList,
            ResourceKey::chat_history("12"),
            ResourceKey::Other("/api/fixtures".to_string()),
        ] {
            assert_eq!(ResourceKey::parse(&key.query_key()), key);
        }
    }

    #[test]
    fn test_resource_paths() {
        assert_eq!(ResourceKey::UserProfile.resource_path(), "/api/users/me");
        assert_eq!(ResourceKey::ClubList.resource_path(), "/api/clubs");
        assert_eq!(
            ResourceKey::chat_history("3").resource_path(),
            "/api/chat/3/messages"
        );
        assert_eq!(
            ResourceKey::Other("/api/fixtures".to_string()).resource_path(),
            "/api/fixtures"
        );
    }
}
