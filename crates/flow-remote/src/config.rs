//! # Remote Configuration
//!
//! Configuration for the outbound collaborators. Secrets come from
//! environment variables; base URLs are overridable for tests.

use flow_core::FlowError;
use std::env;

/// Payment gateway API configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Secret API key (gw_test_... or gw_live_...)
    pub api_key: String,

    /// HMAC secret used to sign request bodies (gws_...)
    pub signing_secret: String,

    /// API base URL (overridable for testing/mocking)
    pub base_url: String,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `GATEWAY_API_KEY`
    /// - `GATEWAY_SIGNING_SECRET`
    ///
    /// Optional:
    /// - `GATEWAY_BASE_URL` (defaults to the production endpoint)
    pub fn from_env() -> Result<Self, FlowError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("GATEWAY_API_KEY")
            .map_err(|_| FlowError::Configuration("GATEWAY_API_KEY not set".to_string()))?;

        let signing_secret = env::var("GATEWAY_SIGNING_SECRET")
            .map_err(|_| FlowError::Configuration("GATEWAY_SIGNING_SECRET not set".to_string()))?;

        if !api_key.starts_with("gw_test_") && !api_key.starts_with("gw_live_") {
            return Err(FlowError::Configuration(
                "GATEWAY_API_KEY must start with gw_test_ or gw_live_".to_string(),
            ));
        }

        if !signing_secret.starts_with("gws_") {
            return Err(FlowError::Configuration(
                "GATEWAY_SIGNING_SECRET must start with gws_".to_string(),
            ));
        }

        let base_url = env::var("GATEWAY_BASE_URL")
            .unwrap_or_else(|_| "https://api.paygate.example".to_string());

        Ok(Self {
            api_key,
            signing_secret,
            base_url,
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(api_key: impl Into<String>, signing_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            signing_secret: signing_secret.into(),
            base_url: "https://api.paygate.example".to_string(),
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.api_key.starts_with("gw_test_")
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Base URLs of the read-only collaborator services
#[derive(Debug, Clone)]
pub struct CollaboratorConfig {
    /// Product catalog service
    pub catalog_base_url: String,
    /// User directory service
    pub users_base_url: String,
}

impl CollaboratorConfig {
    /// Load from `CATALOG_BASE_URL` / `USERS_BASE_URL`
    pub fn from_env() -> Result<Self, FlowError> {
        dotenvy::dotenv().ok();

        let catalog_base_url = env::var("CATALOG_BASE_URL")
            .map_err(|_| FlowError::Configuration("CATALOG_BASE_URL not set".to_string()))?;
        let users_base_url = env::var("USERS_BASE_URL")
            .map_err(|_| FlowError::Configuration("USERS_BASE_URL not set".to_string()))?;

        Ok(Self {
            catalog_base_url,
            users_base_url,
        })
    }

    pub fn new(catalog_base_url: impl Into<String>, users_base_url: impl Into<String>) -> Self {
        Self {
            catalog_base_url: catalog_base_url.into(),
            users_base_url: users_base_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let config = GatewayConfig::new("gw_test_abc123", "gws_secret");
        assert!(config.is_test_mode());
        assert_eq!(config.auth_header(), "Bearer gw_test_abc123");

        let config = GatewayConfig::new("gw_live_abc123", "gws_secret");
        assert!(!config.is_test_mode());
    }

    #[test]
    fn test_with_base_url() {
        let config = GatewayConfig::new("gw_test_abc", "gws_x").with_base_url("http://127.0.0.1:9");
        assert_eq!(config.base_url, "http://127.0.0.1:9");
    }
}
