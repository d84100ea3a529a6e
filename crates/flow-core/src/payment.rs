//! # Payment Types
//!
//! Payment ledger entity and its state machine. At most one payment
//! exists per order; after creation only the status mutates.

use crate::money::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a payment is executed. Each method maps to exactly one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Real gateway-backed card payment
    Gateway,
    /// In-process mock card (development and testing)
    MockCard,
    /// Cash on delivery (offline settlement)
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Gateway => "gateway",
            PaymentMethod::MockCard => "mock_card",
            PaymentMethod::CashOnDelivery => "cash_on_delivery",
        }
    }

    /// Offline methods settle outside the system and need no confirm step
    pub fn is_offline(&self) -> bool {
        matches!(self, PaymentMethod::CashOnDelivery)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment lifecycle status.
///
/// `Processing`, `Failed`, and `PartiallyRefunded` are reserved: current
/// flows never assign them. A failed provider call leaves the payment in
/// its prior status so the attempt stays retryable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    RequiresConfirmation,
    Processing,
    Completed,
    Failed,
    Refunded,
    PartiallyRefunded,
}

impl PaymentStatus {
    /// Initial status depends only on the method, never on the provider
    /// response: offline methods start Pending, everything else waits for
    /// confirmation.
    pub fn initial_for(method: PaymentMethod) -> Self {
        if method.is_offline() {
            PaymentStatus::Pending
        } else {
            PaymentStatus::RequiresConfirmation
        }
    }
}

/// A payment row in the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    /// Unique: at most one payment per order
    pub order_id: Uuid,
    pub amount: Price,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// Opaque provider handle
    pub transaction_id: String,
    pub payment_date: DateTime<Utc>,
}

impl Payment {
    pub fn new(order_id: Uuid, amount: Price, method: PaymentMethod, transaction_id: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            amount,
            method,
            status: PaymentStatus::initial_for(method),
            transaction_id,
            payment_date: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Price};

    #[test]
    fn test_initial_status_by_method() {
        assert_eq!(
            PaymentStatus::initial_for(PaymentMethod::CashOnDelivery),
            PaymentStatus::Pending
        );
        assert_eq!(
            PaymentStatus::initial_for(PaymentMethod::Gateway),
            PaymentStatus::RequiresConfirmation
        );
        assert_eq!(
            PaymentStatus::initial_for(PaymentMethod::MockCard),
            PaymentStatus::RequiresConfirmation
        );
    }

    #[test]
    fn test_new_payment_carries_initial_status() {
        let payment = Payment::new(
            Uuid::new_v4(),
            Price::new(25.0, Currency::USD),
            PaymentMethod::CashOnDelivery,
            "cod_1".to_string(),
        );
        assert_eq!(payment.status, PaymentStatus::Pending);
    }

    #[test]
    fn test_method_wire_names() {
        assert_eq!(PaymentMethod::Gateway.as_str(), "gateway");
        assert_eq!(PaymentMethod::CashOnDelivery.as_str(), "cash_on_delivery");
    }
}
