//! # Payment Engine
//!
//! Owns the payment state machine and drives whichever provider the
//! registry resolves for the payment's method. A failed provider call
//! leaves the status where it was; the payment stays retryable.

use flow_core::{
    FlowError, FlowResult, OrderStore, Payment, PaymentMethod, PaymentStatus, PaymentStore,
    ProviderRegistry,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Payment lifecycle service
#[derive(Clone)]
pub struct PaymentService {
    store: Arc<dyn PaymentStore>,
    orders: Arc<dyn OrderStore>,
    registry: ProviderRegistry,
}

impl PaymentService {
    pub fn new(
        store: Arc<dyn PaymentStore>,
        orders: Arc<dyn OrderStore>,
        registry: ProviderRegistry,
    ) -> Self {
        Self {
            store,
            orders,
            registry,
        }
    }

    /// Methods with a registered provider
    pub fn methods(&self) -> Vec<PaymentMethod> {
        self.registry.methods()
    }

    /// Create the order's payment. The caller supplies no amount: the
    /// charge is always the order's stored total, so the ledger and the
    /// provider charge cannot disagree. The transaction handle comes from
    /// the provider; the initial status depends only on the method
    /// (offline starts Pending, card methods wait for confirmation).
    #[instrument(skip(self))]
    pub async fn create_payment(
        &self,
        order_id: Uuid,
        method: PaymentMethod,
    ) -> FlowResult<Payment> {
        let order = self
            .orders
            .find(order_id)
            .await?
            .ok_or(FlowError::OrderNotFound { order_id })?;

        let provider = self.registry.get(method)?;
        let transaction_id = provider.create_payment(order.total, order_id).await?;

        let payment = Payment::new(order_id, order.total, method, transaction_id);
        let payment = self.store.insert(payment).await?;

        info!(
            "Payment created: {} for order {} ({:?})",
            payment.id, order_id, payment.status
        );
        Ok(payment)
    }

    /// Confirm a payment. Confirming a Completed payment is an idempotent
    /// no-op: the unchanged record comes back and no provider call is made.
    #[instrument(skip(self))]
    pub async fn confirm_payment(&self, payment_id: Uuid) -> FlowResult<Payment> {
        let mut payment = self.get(payment_id).await?;

        if payment.status == PaymentStatus::Completed {
            return Ok(payment);
        }

        let provider = self.registry.get(payment.method)?;
        let confirmed = provider.confirm_payment(&payment.transaction_id).await?;

        if !confirmed {
            // Status intentionally untouched: the attempt is retryable.
            return Err(FlowError::Provider {
                provider: payment.method.to_string(),
                message: format!("Confirmation declined for {}", payment.transaction_id),
            });
        }

        payment.status = PaymentStatus::Completed;
        self.store.update(payment).await
    }

    /// Refund a completed payment
    #[instrument(skip(self))]
    pub async fn refund_payment(&self, payment_id: Uuid) -> FlowResult<Payment> {
        let mut payment = self.get(payment_id).await?;

        if payment.status != PaymentStatus::Completed {
            return Err(FlowError::InvalidOperation(format!(
                "Cannot refund payment in status {:?}",
                payment.status
            )));
        }

        let provider = self.registry.get(payment.method)?;
        let refunded = provider.refund_payment(&payment.transaction_id).await?;

        if !refunded {
            return Err(FlowError::Provider {
                provider: payment.method.to_string(),
                message: format!("Refund declined for {}", payment.transaction_id),
            });
        }

        payment.status = PaymentStatus::Refunded;
        self.store.update(payment).await
    }

    pub async fn get(&self, payment_id: Uuid) -> FlowResult<Payment> {
        self.store
            .find(payment_id)
            .await?
            .ok_or(FlowError::PaymentNotFound { payment_id })
    }

    pub async fn payments_for_order(&self, order_id: Uuid) -> FlowResult<Vec<Payment>> {
        self.store.find_by_order(order_id).await
    }
}
