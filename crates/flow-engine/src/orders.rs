//! # Order Ledger
//!
//! Owns order state and status transitions. Status updates are
//! unconditional; item mutations recompute the total from the full item
//! list inside the single store write, so the stored total can never
//! drift from the item sum.

use flow_core::{
    order_total, Currency, FlowError, FlowResult, Order, OrderItemDraft, OrderStatus, OrderStore,
    Price,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Order ledger service
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    /// Create an order from an explicit item list (the non-checkout path)
    #[instrument(skip(self, items))]
    pub async fn create_order(
        &self,
        customer_id: Uuid,
        items: Vec<OrderItemDraft>,
    ) -> FlowResult<Order> {
        if items.is_empty() {
            return Err(FlowError::InvalidRequest(
                "Order must have at least one item".to_string(),
            ));
        }
        if items.iter().any(|i| i.quantity == 0) {
            return Err(FlowError::InvalidRequest(
                "Item quantity must be positive".to_string(),
            ));
        }

        let order = Order::new(customer_id, items, Currency::USD);
        let order = self.store.insert(order).await?;
        info!("Order created: {}", order.id);
        Ok(order)
    }

    pub async fn get(&self, order_id: Uuid) -> FlowResult<Order> {
        self.store
            .find(order_id)
            .await?
            .ok_or(FlowError::OrderNotFound { order_id })
    }

    pub async fn orders_for_customer(&self, customer_id: Uuid) -> FlowResult<Vec<Order>> {
        self.store.find_by_customer(customer_id).await
    }

    /// Set the status unconditionally: the ledger enforces no transition
    /// table, it records what the caller decided.
    #[instrument(skip(self))]
    pub async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> FlowResult<Order> {
        let mut order = self.get(order_id).await?;
        order.status = status;
        self.store.update(order).await
    }

    pub async fn cancel(&self, order_id: Uuid) -> FlowResult<Order> {
        self.update_status(order_id, OrderStatus::Canceled).await
    }

    /// Add an item; the total is recomputed from the full list in the
    /// same write.
    #[instrument(skip(self, draft))]
    pub async fn add_item(&self, order_id: Uuid, draft: OrderItemDraft) -> FlowResult<Order> {
        if draft.quantity == 0 {
            return Err(FlowError::InvalidRequest(
                "Item quantity must be positive".to_string(),
            ));
        }
        let mut order = self.get(order_id).await?;
        order.items.push(draft.into_item(order.id));
        order.recompute_total();
        self.store.update(order).await
    }

    /// Remove an item; same recompute-in-write rule as `add_item`
    #[instrument(skip(self))]
    pub async fn remove_item(&self, order_id: Uuid, item_id: Uuid) -> FlowResult<Order> {
        let mut order = self.get(order_id).await?;
        let before = order.items.len();
        order.items.retain(|i| i.id != item_id);
        if order.items.len() == before {
            return Err(FlowError::OrderItemNotFound { item_id });
        }
        order.recompute_total();
        self.store.update(order).await
    }

    /// Pure total over a candidate item list, usable before committing
    pub fn calculate_total(items: &[flow_core::OrderItem]) -> Price {
        order_total(items, Currency::USD)
    }
}
