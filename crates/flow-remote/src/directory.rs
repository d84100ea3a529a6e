//! # User Directory Client
//!
//! Read-only accessor for the user directory. Wire contract:
//! `GET {base}/users/{id}` returning `{id, name|username, email}`.

use async_trait::async_trait;
use flow_core::{FlowError, FlowResult, UserLookup, UserProfile};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};
use uuid::Uuid;

/// HTTP client for the user directory service
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    base_url: String,
    client: Client,
}

impl DirectoryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

#[async_trait]
impl UserLookup for DirectoryClient {
    #[instrument(skip(self))]
    async fn user(&self, user_id: Uuid) -> FlowResult<Option<UserProfile>> {
        let url = format!("{}/users/{}", self.base_url, user_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FlowError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("User {} not in directory", user_id);
            return Ok(None);
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FlowError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(FlowError::Upstream {
                service: "users".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let dto: UserResponse = serde_json::from_str(&body).map_err(|e| {
            FlowError::Serialization(format!("Failed to parse directory response: {}", e))
        })?;

        // Some directory deployments expose `username` instead of `name`
        let name = dto.name.or(dto.username).unwrap_or_default();

        Ok(Some(UserProfile {
            id: dto.id,
            name,
            email: dto.email,
        }))
    }
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: Uuid,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    username: Option<String>,
    email: String,
}
