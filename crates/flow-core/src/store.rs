//! # Store Traits
//!
//! Persistence seams for the three locally-owned aggregates. Schema and
//! migration mechanics live behind these traits; the engine ships
//! in-memory implementations.

use crate::cart::Cart;
use crate::error::FlowResult;
use crate::order::Order;
use crate::payment::Payment;
use async_trait::async_trait;
use uuid::Uuid;

/// Owns cart + line-item state. One cart per customer.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Return the customer's cart, creating an empty one when absent.
    /// Implementations must serialise this per customer so concurrent
    /// first touches cannot produce duplicate carts.
    async fn get_or_create(&self, customer_id: Uuid) -> FlowResult<Cart>;

    /// Find a cart by customer without creating one
    async fn find_by_customer(&self, customer_id: Uuid) -> FlowResult<Option<Cart>>;

    /// Find a cart by its own id
    async fn find(&self, cart_id: Uuid) -> FlowResult<Option<Cart>>;

    /// Replace the stored cart aggregate (items included)
    async fn save(&self, cart: Cart) -> FlowResult<()>;

    /// Delete a cart entirely (merge source, explicit clear-on-checkout)
    async fn delete(&self, cart_id: Uuid) -> FlowResult<()>;
}

/// Owns order + order-item state
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: Order) -> FlowResult<Order>;
    async fn find(&self, order_id: Uuid) -> FlowResult<Option<Order>>;
    async fn find_by_customer(&self, customer_id: Uuid) -> FlowResult<Vec<Order>>;
    /// Replace the stored order aggregate in one write
    async fn update(&self, order: Order) -> FlowResult<Order>;
}

/// Owns payment state. `order_id` is unique across rows.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Insert a payment; fails `InvalidOperation` when the order already
    /// has one.
    async fn insert(&self, payment: Payment) -> FlowResult<Payment>;
    async fn find(&self, payment_id: Uuid) -> FlowResult<Option<Payment>>;
    async fn find_by_order(&self, order_id: Uuid) -> FlowResult<Vec<Payment>>;
    async fn update(&self, payment: Payment) -> FlowResult<Payment>;
}
