//! # Checkout Orchestrator
//!
//! Sequences the cross-service work of turning a cart into an order:
//! user-directory snapshot (best-effort), cart fetch (fatal when absent
//! or empty), authoritative re-pricing against the catalog (fatal when
//! any product is gone), one local order write, then a best-effort cart
//! clear backed by a retry outbox.
//!
//! The order insert is the only durable commit point. Nothing before it
//! writes; nothing after it can fail the operation.

use flow_core::{
    Currency, FlowError, FlowResult, CartStore, Order, OrderItemDraft, OrderStore,
    ProductLookup, UserLookup,
};
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Pending cart-clear retry queue. Entries are cart ids whose clear failed
/// after an order commit; they are drained at the start of the next
/// checkout so a paid-for cart cannot stay populated forever without a
/// background scheduler.
#[derive(Debug, Default)]
pub struct ClearOutbox {
    pending: Mutex<Vec<Uuid>>,
}

impl ClearOutbox {
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Uuid>> {
        // A poisoned queue still holds valid cart ids; keep draining.
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn enqueue(&self, cart_id: Uuid) {
        self.lock().push(cart_id);
    }

    pub fn take_all(&self) -> Vec<Uuid> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cross-service checkout orchestrator
#[derive(Clone)]
pub struct CheckoutService {
    users: Arc<dyn UserLookup>,
    catalog: Arc<dyn ProductLookup>,
    carts: Arc<dyn CartStore>,
    orders: Arc<dyn OrderStore>,
    outbox: Arc<ClearOutbox>,
}

impl CheckoutService {
    pub fn new(
        users: Arc<dyn UserLookup>,
        catalog: Arc<dyn ProductLookup>,
        carts: Arc<dyn CartStore>,
        orders: Arc<dyn OrderStore>,
    ) -> Self {
        Self {
            users,
            catalog,
            carts,
            orders,
            outbox: Arc::new(ClearOutbox::default()),
        }
    }

    /// Pending-clear queue, exposed for wiring and tests
    pub fn outbox(&self) -> &ClearOutbox {
        &self.outbox
    }

    /// Create an order from the customer's cart. Steps run strictly in
    /// order; only the cart/item/product fetches are fatal.
    #[instrument(skip(self))]
    pub async fn checkout_from_cart(&self, customer_id: Uuid) -> FlowResult<Order> {
        self.drain_outbox().await;

        // 1. Customer snapshot, best-effort
        let profile = match self.users.user(customer_id).await {
            Ok(found) => found,
            Err(e) => {
                warn!("User directory lookup failed, proceeding without snapshot: {}", e);
                None
            }
        };

        // 2-3. Cart must exist and be non-empty
        let cart = self
            .carts
            .find_by_customer(customer_id)
            .await?
            .ok_or(FlowError::CartNotFound { customer_id })?;

        if cart.is_empty() {
            return Err(FlowError::EmptyCart { customer_id });
        }

        // 4-5. Re-price every line against the catalog; any miss aborts
        // before anything is persisted.
        let mut drafts = Vec::with_capacity(cart.items.len());
        for item in &cart.items {
            let product = self
                .catalog
                .product(item.product_id)
                .await?
                .ok_or(FlowError::ProductNotFound {
                    product_id: item.product_id,
                })?;

            drafts.push(OrderItemDraft {
                product_id: product.id,
                quantity: item.quantity,
                price: product.price,
                product_name: product.name,
                category_name: product.category_name,
            });
        }

        // 6. Single durable write
        let mut order = Order::new(customer_id, drafts, Currency::USD);
        if let Some(profile) = profile {
            order.customer_name = Some(profile.name);
            order.customer_email = Some(profile.email);
        }
        let order = self.orders.insert(order).await?;

        info!(
            "Checkout committed: order={}, total={}",
            order.id,
            order.total.display()
        );

        // 7. Best-effort cart clear; failure goes to the outbox
        if let Err(e) = self.carts.delete(cart.id).await {
            warn!("Cart clear failed after commit, queued for retry: {}", e);
            self.outbox.enqueue(cart.id);
        }

        // 8
        Ok(order)
    }

    /// Retry previously failed cart clears. Failures re-queue.
    async fn drain_outbox(&self) {
        for cart_id in self.outbox.take_all() {
            if let Err(e) = self.carts.delete(cart_id).await {
                warn!("Outbox cart clear retry failed: {}", e);
                self.outbox.enqueue(cart_id);
            } else {
                info!("Outbox cleared cart {}", cart_id);
            }
        }
    }
}
