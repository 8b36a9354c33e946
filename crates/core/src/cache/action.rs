//! Domain actions that require cache writes or invalidations.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::{ChatMessage, Club};

use super::ActionError;

/// An application event the cache coordinator knows how to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheAction {
    ClubCreated(Club),
    ClubUpdated(Club),
    ClubDeleted { club_id: String },
    MessageSent { room_id: String, message: ChatMessage },
    Logout,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClubDeletedPayload {
    club_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageSentPayload {
    room_id: String,
    message: ChatMessage,
}

impl CacheAction {
    pub const CLUB_CREATED: &'static str = "club_created";
    pub const CLUB_UPDATED: &'static str = "club_updated";
    pub const CLUB_DELETED: &'static str = "club_deleted";
    pub const MESSAGE_SENT: &'static str = "message_sent";
    pub const LOGOUT: &'static str = "logout";

    /// Builds an action from its wire name and JSON payload.
    ///
    /// Payload shapes:
    /// - `club_created` / `club_updated`: the club record
    /// - `club_deleted`: `{"clubId": "..."}`
    /// - `message_sent`: `{"roomId": "...", "message": {...}}`
    /// - `logout`: ignored
    ///
    /// # Examples
    ///
    /// ```
    /// use fanclub_core::cache::CacheAction;
    /// use serde_json::json;
    ///
    /// let action = CacheAction::parse("club_deleted", json!({"clubId": "1"})).unwrap();
    /// assert_eq!(action, CacheAction::ClubDeleted { club_id: "1".to_string() });
    /// ```
    pub fn parse(name: &str, payload: serde_json::Value) -> Result<Self, ActionError> {
        match name {
            Self::CLUB_CREATED => Ok(Self::ClubCreated(decode(Self::CLUB_CREATED, payload)?)),
            Self::CLUB_UPDATED => Ok(Self::ClubUpdated(decode(Self::CLUB_UPDATED, payload)?)),
            Self::CLUB_DELETED => {
                let ClubDeletedPayload { club_id } = decode(Self::CLUB_DELETED, payload)?;
                Ok(Self::ClubDeleted { club_id })
            }
            Self::MESSAGE_SENT => {
                let MessageSentPayload { room_id, message } = decode(Self::MESSAGE_SENT, payload)?;
                Ok(Self::MessageSent { room_id, message })
            }
            Self::LOGOUT => Ok(Self::Logout),
            other => Err(ActionError::Unknown(other.to_string())),
        }
    }

    /// Returns the wire name of this action.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClubCreated(_) => Self::CLUB_CREATED,
            Self::ClubUpdated(_) => Self::CLUB_UPDATED,
            Self::ClubDeleted { .. } => Self::CLUB_DELETED,
            Self::MessageSent { .. } => Self::MESSAGE_SENT,
            Self::Logout => Self::LOGOUT,
        }
    }
}

fn decode<T: DeserializeOwned>(
    action: &'static str,
    payload: serde_json::Value,
) -> Result<T, ActionError> {
    serde_json::from_value(payload).map_err(|e| ActionError::InvalidPayload {
        action,
        reason: e.to_string(),
    })
}
