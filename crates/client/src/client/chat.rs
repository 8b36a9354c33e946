//! Chat API operations.
//!
//! Live delivery happens over a socket the cache does not see; these calls
//! read and post through the REST endpoints only.

use serde::Serialize;

use super::FanclubClient;
use crate::error::Result;
use fanclub_core::domain::ChatMessage;

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    body: &'a str,
}

impl FanclubClient {
    /// Post a message to a room.
    pub async fn send_message(&self, room_id: &str, body: &str) -> Result<ChatMessage> {
        let path = format!("/api/chat/{}/messages", room_id);
        let response = self
            .client
            .post(self.url(&path))
            .json(&SendMessageRequest { body })
            .send()
            .await?;
        self.handle_response(&path, response).await
    }
}
