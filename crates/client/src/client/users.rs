//! User API operations.

use super::FanclubClient;
use crate::error::Result;
use fanclub_core::domain::User;

impl FanclubClient {
    /// Get the signed-in user's profile.
    pub async fn get_current_user(&self) -> Result<User> {
        let path = "/api/users/me";
        let response = self.client.get(self.url(path)).send().await?;
        self.handle_response(path, response).await
    }
}
