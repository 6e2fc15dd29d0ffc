use std::time::Duration;

use reqwest::Client;

use super::error::DirectoryError;
use super::models::{NewUser, UserRecord};

/// Public demo collection used when no endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";

/// HTTP client for the remote user directory collection.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: Client,
    endpoint: String,
}

impl DirectoryClient {
    /// Build a client against the given collection URL.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .user_agent(format!("udir/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DirectoryError::Transport)?;

        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Ok(Self { client, endpoint })
    }

    fn record_url(&self, id: i64) -> String {
        format!("{}/{}", self.endpoint, id)
    }

    /// Fetch the full collection.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>, DirectoryError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(DirectoryError::Transport)?;
        let response = check_status(response).await?;

        response
            .json::<Vec<UserRecord>>()
            .await
            .map_err(DirectoryError::Decode)
    }

    /// Create a record; the server echoes it back with an assigned id.
    pub async fn create_user(&self, user: &NewUser) -> Result<UserRecord, DirectoryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(user)
            .send()
            .await
            .map_err(DirectoryError::Transport)?;
        let response = check_status(response).await?;

        response
            .json::<UserRecord>()
            .await
            .map_err(DirectoryError::Decode)
    }

    /// Delete a record by server id. The response body is discarded.
    pub async fn delete_user(&self, id: i64) -> Result<(), DirectoryError> {
        let response = self
            .client
            .delete(self.record_url(id))
            .send()
            .await
            .map_err(DirectoryError::Transport)?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DirectoryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(DirectoryError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalized() {
        let client = DirectoryClient::new("http://localhost:1234/users/").unwrap();
        assert_eq!(client.record_url(7), "http://localhost:1234/users/7");
    }
}
