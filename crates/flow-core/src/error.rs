//! # Error Types
//!
//! Typed error handling for the marketflow checkout engine.
//! All fallible operations return `Result<T, FlowError>`.

use crate::payment::PaymentMethod;
use thiserror::Error;
use uuid::Uuid;

/// Core error type for cart, checkout, order, and payment operations
#[derive(Debug, Error)]
pub enum FlowError {
    /// Configuration errors (missing env vars, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No cart exists for the customer
    #[error("Cart not found for customer: {customer_id}")]
    CartNotFound { customer_id: Uuid },

    /// Cart row absent when addressed by cart id
    #[error("Cart not found: {cart_id}")]
    UnknownCart { cart_id: Uuid },

    /// Checkout attempted on an empty cart
    #[error("Cart is empty for customer: {customer_id}")]
    EmptyCart { customer_id: Uuid },

    /// Product absent from the catalog
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: Uuid },

    /// Order absent from the ledger
    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: Uuid },

    /// Order item absent from an order
    #[error("Order item not found: {item_id}")]
    OrderItemNotFound { item_id: Uuid },

    /// Payment absent from the ledger
    #[error("Payment not found: {payment_id}")]
    PaymentNotFound { payment_id: Uuid },

    /// Illegal state transition (e.g. refunding a non-completed payment)
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// No provider registered for the payment method
    #[error("Unsupported payment method: {method}")]
    UnsupportedMethod { method: PaymentMethod },

    /// Ownership check failed
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Network/HTTP error reaching a collaborator
    #[error("Network error: {0}")]
    Network(String),

    /// Collaborator answered with an unexpected status
    #[error("Upstream error [{service}]: {message}")]
    Upstream { service: String, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FlowError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FlowError::Network(_) | FlowError::Upstream { .. } | FlowError::Provider { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            FlowError::Configuration(_) => 500,
            FlowError::InvalidRequest(_) => 400,
            FlowError::CartNotFound { .. } => 404,
            FlowError::UnknownCart { .. } => 404,
            FlowError::EmptyCart { .. } => 400,
            FlowError::ProductNotFound { .. } => 404,
            FlowError::OrderNotFound { .. } => 404,
            FlowError::OrderItemNotFound { .. } => 404,
            FlowError::PaymentNotFound { .. } => 404,
            FlowError::InvalidOperation(_) => 400,
            FlowError::UnsupportedMethod { .. } => 400,
            FlowError::Forbidden(_) => 403,
            FlowError::Provider { .. } => 502,
            FlowError::Network(_) => 503,
            FlowError::Upstream { .. } => 502,
            FlowError::Serialization(_) => 500,
            FlowError::Internal(_) => 500,
        }
    }
}

/// Result type alias for checkout/payment operations
pub type FlowResult<T> = Result<T, FlowError>;
