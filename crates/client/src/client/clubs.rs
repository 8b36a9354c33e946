//! Club API operations.

use serde::Serialize;

use super::FanclubClient;
use crate::error::Result;
use fanclub_core::domain::Club;

/// Request body for creating a club.
#[derive(Debug, Clone, Serialize)]
pub struct CreateClubRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body for updating a club. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateClubRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FanclubClient {
    /// Get club by ID.
    pub async fn get_club(&self, id: &str) -> Result<Club> {
        let path = format!("/api/clubs/{}", id);
        let response = self.client.get(self.url(&path)).send().await?;
        self.handle_response(&path, response).await
    }

    /// Create a new club.
    pub async fn create_club(&self, request: &CreateClubRequest) -> Result<Club> {
        let path = "/api/clubs";
        let response = self
            .client
            .post(self.url(path))
            .json(request)
            .send()
            .await?;
        self.handle_response(path, response).await
    }

    /// Update a club.
    pub async fn update_club(&self, id: &str, request: &UpdateClubRequest) -> Result<Club> {
        let path = format!("/api/clubs/{}", id);
        let response = self
            .client
            .put(self.url(&path))
            .json(request)
            .send()
            .await?;
        self.handle_response(&path, response).await
    }

    /// Delete club by ID.
    pub async fn delete_club(&self, id: &str) -> Result<()> {
        let path = format!("/api/clubs/{}", id);
        let response = self.client.delete(self.url(&path)).send().await?;
        self.handle_delete_response(&path, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_omits_unset_fields() {
        let request = UpdateClubRequest {
            name: Some("Renamed".to_string()),
            ..UpdateClubRequest::default()
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"name": "Renamed"})
        );
    }
}
