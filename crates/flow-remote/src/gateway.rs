//! # Gateway Payment Provider
//!
//! `PaymentProvider` implementation backed by the external card gateway.
//! Requests are JSON over HTTPS, authenticated with a bearer key and an
//! HMAC-SHA256 body signature in `X-Gateway-Signature`
//! (`t=<unix>,v1=<hex hmac of "<unix>.<body>">`).

use async_trait::async_trait;
use chrono::Utc;
use flow_core::{FlowError, FlowResult, PaymentMethod, PaymentProvider, Price};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::config::GatewayConfig;

/// Gateway-backed card payment provider
pub struct GatewayProvider {
    config: GatewayConfig,
    client: Client,
}

impl GatewayProvider {
    pub fn new(config: GatewayConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> FlowResult<Self> {
        let config = GatewayConfig::from_env()?;
        Ok(Self::new(config))
    }

    async fn post_signed<T: Serialize>(&self, path: &str, payload: &T) -> FlowResult<ChargeResponse> {
        let body = serde_json::to_string(payload)
            .map_err(|e| FlowError::Serialization(e.to_string()))?;
        let timestamp = Utc::now().timestamp();
        let signature = sign_payload(&self.config.signing_secret, timestamp, &body);

        let url = format!("{}{}", self.config.base_url, path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Content-Type", "application/json")
            .header("X-Gateway-Signature", signature)
            .body(body)
            .send()
            .await
            .map_err(|e| FlowError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FlowError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Gateway API error: status={}, body={}", status, text);

            if let Ok(err_body) = serde_json::from_str::<GatewayErrorResponse>(&text) {
                return Err(FlowError::Provider {
                    provider: "gateway".to_string(),
                    message: err_body.error.message,
                });
            }

            return Err(FlowError::Provider {
                provider: "gateway".to_string(),
                message: format!("HTTP {}: {}", status, text),
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| FlowError::Serialization(format!("Failed to parse gateway response: {}", e)))
    }
}

#[async_trait]
impl PaymentProvider for GatewayProvider {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Gateway
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    async fn create_payment(&self, amount: Price, order_id: Uuid) -> FlowResult<String> {
        if amount.amount <= 0 {
            return Err(FlowError::InvalidRequest(
                "Payment amount must be positive".to_string(),
            ));
        }

        let charge = self
            .post_signed(
                "/v1/charges",
                &CreateChargeRequest {
                    amount: amount.amount,
                    currency: amount.currency.as_str().to_string(),
                    order_id,
                },
            )
            .await?;

        info!("Created gateway charge: id={}", charge.id);
        Ok(charge.id)
    }

    #[instrument(skip(self))]
    async fn confirm_payment(&self, transaction_id: &str) -> FlowResult<bool> {
        let charge = self
            .post_signed(
                &format!("/v1/charges/{}/capture", transaction_id),
                &serde_json::json!({}),
            )
            .await?;

        Ok(matches!(charge.status.as_str(), "captured" | "succeeded"))
    }

    #[instrument(skip(self))]
    async fn refund_payment(&self, transaction_id: &str) -> FlowResult<bool> {
        let charge = self
            .post_signed(
                &format!("/v1/charges/{}/refunds", transaction_id),
                &serde_json::json!({}),
            )
            .await?;

        Ok(charge.status == "refunded")
    }
}

// =============================================================================
// Gateway API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreateChargeRequest {
    amount: i64,
    currency: String,
    order_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct ChargeResponse {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorResponse {
    error: GatewayErrorBody,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    message: String,
    #[serde(default)]
    #[allow(dead_code)]
    code: Option<String>,
}

// =============================================================================
// Request Signing
// =============================================================================

fn sign_payload(secret: &str, timestamp: i64, body: &str) -> String {
    let message = format!("{}.{}", timestamp, body);
    format!("t={},v1={}", timestamp, compute_hmac_sha256(secret, &message))
}

fn compute_hmac_sha256(secret: &str, message: &str) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_core::Currency;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> GatewayProvider {
        let config = GatewayConfig::new("gw_test_key", "gws_secret").with_base_url(server.uri());
        GatewayProvider::new(config)
    }

    #[test]
    fn test_signature_format() {
        let sig = sign_payload("gws_secret", 1234567890, "{}");
        assert!(sig.starts_with("t=1234567890,v1="));
        // HMAC-SHA256 hex digest is 64 chars
        assert_eq!(sig.split("v1=").nth(1).unwrap().len(), 64);
    }

    #[tokio::test]
    async fn test_create_payment_returns_charge_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/charges"))
            .and(header_exists("x-gateway-signature"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "ch_123",
                "status": "requires_capture"
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let txn = provider
            .create_payment(Price::new(25.0, Currency::USD), Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(txn, "ch_123");
    }

    #[tokio::test]
    async fn test_confirm_payment_captured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/charges/ch_123/capture"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "ch_123",
                "status": "captured"
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        assert!(provider.confirm_payment("ch_123").await.unwrap());
    }

    #[tokio::test]
    async fn test_gateway_error_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
                "error": {"message": "card declined", "code": "card_declined"}
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let err = provider
            .create_payment(Price::new(10.0, Currency::USD), Uuid::new_v4())
            .await
            .unwrap_err();
        match err {
            FlowError::Provider { provider, message } => {
                assert_eq!(provider, "gateway");
                assert_eq!(message, "card declined");
            }
            other => panic!("expected Provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_amount_rejected_locally() {
        let server = MockServer::start().await;
        let provider = provider_for(&server);
        let err = provider
            .create_payment(Price::zero(Currency::USD), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidRequest(_)));
    }
}
