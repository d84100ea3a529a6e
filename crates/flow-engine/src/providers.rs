//! # Offline Providers
//!
//! Provider implementations that settle without an external gateway:
//! the development/testing mock card and cash on delivery.

use async_trait::async_trait;
use flow_core::{FlowError, FlowResult, PaymentMethod, PaymentProvider, Price};
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// Mock card provider: accepts everything, remembers its transactions so
/// confirm/refund can reject handles it never issued.
#[derive(Debug, Default)]
pub struct MockCardProvider {
    transactions: Mutex<HashSet<String>>,
}

impl MockCardProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.transactions.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn knows(&self, transaction_id: &str) -> bool {
        self.lock().contains(transaction_id)
    }
}

#[async_trait]
impl PaymentProvider for MockCardProvider {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::MockCard
    }

    async fn create_payment(&self, amount: Price, order_id: Uuid) -> FlowResult<String> {
        if amount.amount <= 0 {
            return Err(FlowError::InvalidRequest(
                "Payment amount must be positive".to_string(),
            ));
        }
        let transaction_id = format!("mock_{}", Uuid::new_v4());
        self.lock().insert(transaction_id.clone());
        info!(
            "Mock card charge {} for order {} ({})",
            transaction_id,
            order_id,
            amount.display()
        );
        Ok(transaction_id)
    }

    async fn confirm_payment(&self, transaction_id: &str) -> FlowResult<bool> {
        Ok(self.knows(transaction_id))
    }

    async fn refund_payment(&self, transaction_id: &str) -> FlowResult<bool> {
        Ok(self.knows(transaction_id))
    }
}

/// Cash on delivery: settlement happens offline, so every lifecycle call
/// succeeds locally.
#[derive(Debug, Default)]
pub struct CashOnDeliveryProvider;

#[async_trait]
impl PaymentProvider for CashOnDeliveryProvider {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::CashOnDelivery
    }

    async fn create_payment(&self, amount: Price, order_id: Uuid) -> FlowResult<String> {
        if amount.amount <= 0 {
            return Err(FlowError::InvalidRequest(
                "Payment amount must be positive".to_string(),
            ));
        }
        let transaction_id = format!("cod_{}", Uuid::new_v4());
        info!(
            "Cash-on-delivery payment {} registered for order {} ({})",
            transaction_id,
            order_id,
            amount.display()
        );
        Ok(transaction_id)
    }

    async fn confirm_payment(&self, _transaction_id: &str) -> FlowResult<bool> {
        Ok(true)
    }

    async fn refund_payment(&self, _transaction_id: &str) -> FlowResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_core::Currency;

    #[tokio::test]
    async fn test_mock_card_round_trip() {
        let provider = MockCardProvider::new();
        let txn = provider
            .create_payment(Price::new(10.0, Currency::USD), Uuid::new_v4())
            .await
            .unwrap();

        assert!(txn.starts_with("mock_"));
        assert!(provider.confirm_payment(&txn).await.unwrap());
        assert!(provider.refund_payment(&txn).await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_card_rejects_unknown_handle() {
        let provider = MockCardProvider::new();
        assert!(!provider.confirm_payment("mock_unknown").await.unwrap());
    }

    #[tokio::test]
    async fn test_cash_on_delivery_always_settles() {
        let provider = CashOnDeliveryProvider;
        let txn = provider
            .create_payment(Price::new(5.0, Currency::USD), Uuid::new_v4())
            .await
            .unwrap();
        assert!(txn.starts_with("cod_"));
        assert!(provider.confirm_payment(&txn).await.unwrap());
    }

    #[tokio::test]
    async fn test_zero_amount_rejected() {
        let provider = CashOnDeliveryProvider;
        let err = provider
            .create_payment(Price::zero(Currency::USD), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidRequest(_)));
    }
}
