//! # Payment Provider Trait
//!
//! Strategy seam for payment execution. Each concrete provider supports
//! exactly one payment method; the registry is an immutable map built
//! once at process start.
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │            PaymentProvider (trait)         │
//! │  ├── create_payment()                      │
//! │  ├── confirm_payment()                     │
//! │  └── refund_payment()                      │
//! └────────────────────────────────────────────┘
//!            ▲              ▲              ▲
//!   ┌────────┴───┐  ┌───────┴────┐  ┌──────┴───────┐
//!   │  Gateway   │  │  MockCard  │  │ CashOnDelivery│
//!   └────────────┘  └────────────┘  └──────────────┘
//! ```

use crate::error::{FlowError, FlowResult};
use crate::money::Price;
use crate::payment::PaymentMethod;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Core trait for payment provider implementations
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// The one payment method this provider executes
    fn method(&self) -> PaymentMethod;

    /// Initiate a payment with the provider.
    ///
    /// # Returns
    /// The provider's opaque transaction handle.
    async fn create_payment(&self, amount: Price, order_id: Uuid) -> FlowResult<String>;

    /// Confirm (capture) a previously created payment
    async fn confirm_payment(&self, transaction_id: &str) -> FlowResult<bool>;

    /// Refund a captured payment
    async fn refund_payment(&self, transaction_id: &str) -> FlowResult<bool>;
}

/// Type alias for a shared provider (dynamic dispatch)
pub type SharedProvider = Arc<dyn PaymentProvider>;

/// Immutable method → provider map, built once at startup
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<PaymentMethod, SharedProvider>,
}

impl ProviderRegistry {
    /// Build the registry from the full set of registered providers.
    /// Later entries for the same method win (last registration).
    pub fn new(providers: impl IntoIterator<Item = SharedProvider>) -> Self {
        Self {
            providers: providers
                .into_iter()
                .map(|p| (p.method(), p))
                .collect(),
        }
    }

    /// Resolve the provider for a method
    pub fn get(&self, method: PaymentMethod) -> FlowResult<&SharedProvider> {
        self.providers
            .get(&method)
            .ok_or(FlowError::UnsupportedMethod { method })
    }

    /// All registered methods (the available-payment-methods listing)
    pub fn methods(&self) -> Vec<PaymentMethod> {
        self.providers.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("methods", &self.methods())
            .finish()
    }
}
