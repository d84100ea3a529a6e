//! # In-Memory Stores
//!
//! Mutex-guarded map implementations of the store traits. The lock is
//! held across each read-modify-write, which serialises get-or-create and
//! confirm/refund against concurrent duplicates. The cart map is keyed by
//! customer id, so the one-cart-per-customer constraint is structural.

use async_trait::async_trait;
use flow_core::{
    Cart, CartStore, FlowError, FlowResult, Order, OrderStore, Payment, PaymentStore,
};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Cart store keyed by customer id
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    carts: Mutex<HashMap<Uuid, Cart>>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> FlowResult<std::sync::MutexGuard<'_, HashMap<Uuid, Cart>>> {
        self.carts
            .lock()
            .map_err(|_| FlowError::Internal("cart store lock poisoned".to_string()))
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn get_or_create(&self, customer_id: Uuid) -> FlowResult<Cart> {
        let mut carts = self.lock()?;
        Ok(carts
            .entry(customer_id)
            .or_insert_with(|| Cart::new(customer_id))
            .clone())
    }

    async fn find_by_customer(&self, customer_id: Uuid) -> FlowResult<Option<Cart>> {
        Ok(self.lock()?.get(&customer_id).cloned())
    }

    async fn find(&self, cart_id: Uuid) -> FlowResult<Option<Cart>> {
        Ok(self.lock()?.values().find(|c| c.id == cart_id).cloned())
    }

    async fn save(&self, cart: Cart) -> FlowResult<()> {
        self.lock()?.insert(cart.customer_id, cart);
        Ok(())
    }

    async fn delete(&self, cart_id: Uuid) -> FlowResult<()> {
        self.lock()?.retain(|_, c| c.id != cart_id);
        Ok(())
    }
}

/// Order store keyed by order id
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: Mutex<HashMap<Uuid, Order>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> FlowResult<std::sync::MutexGuard<'_, HashMap<Uuid, Order>>> {
        self.orders
            .lock()
            .map_err(|_| FlowError::Internal("order store lock poisoned".to_string()))
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert(&self, order: Order) -> FlowResult<Order> {
        self.lock()?.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find(&self, order_id: Uuid) -> FlowResult<Option<Order>> {
        Ok(self.lock()?.get(&order_id).cloned())
    }

    async fn find_by_customer(&self, customer_id: Uuid) -> FlowResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .lock()?
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.order_date);
        Ok(orders)
    }

    async fn update(&self, order: Order) -> FlowResult<Order> {
        let mut orders = self.lock()?;
        if !orders.contains_key(&order.id) {
            return Err(FlowError::OrderNotFound { order_id: order.id });
        }
        orders.insert(order.id, order.clone());
        Ok(order)
    }
}

/// Payment store keyed by payment id, with a unique index on order id
#[derive(Debug, Default)]
pub struct MemoryPaymentStore {
    payments: Mutex<HashMap<Uuid, Payment>>,
}

impl MemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> FlowResult<std::sync::MutexGuard<'_, HashMap<Uuid, Payment>>> {
        self.payments
            .lock()
            .map_err(|_| FlowError::Internal("payment store lock poisoned".to_string()))
    }
}

#[async_trait]
impl PaymentStore for MemoryPaymentStore {
    async fn insert(&self, payment: Payment) -> FlowResult<Payment> {
        let mut payments = self.lock()?;
        if payments.values().any(|p| p.order_id == payment.order_id) {
            return Err(FlowError::InvalidOperation(format!(
                "Order {} already has a payment",
                payment.order_id
            )));
        }
        payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn find(&self, payment_id: Uuid) -> FlowResult<Option<Payment>> {
        Ok(self.lock()?.get(&payment_id).cloned())
    }

    async fn find_by_order(&self, order_id: Uuid) -> FlowResult<Vec<Payment>> {
        Ok(self
            .lock()?
            .values()
            .filter(|p| p.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn update(&self, payment: Payment) -> FlowResult<Payment> {
        let mut payments = self.lock()?;
        if !payments.contains_key(&payment.id) {
            return Err(FlowError::PaymentNotFound {
                payment_id: payment.id,
            });
        }
        payments.insert(payment.id, payment.clone());
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_core::{Currency, PaymentMethod, Price};

    #[tokio::test]
    async fn test_get_or_create_is_stable() {
        let store = MemoryCartStore::new();
        let customer = Uuid::new_v4();

        let first = store.get_or_create(customer).await.unwrap();
        let second = store.get_or_create(customer).await.unwrap();

        assert_eq!(first.id, second.id);
        assert!(first.is_empty());
    }

    #[tokio::test]
    async fn test_cart_delete_by_cart_id() {
        let store = MemoryCartStore::new();
        let cart = store.get_or_create(Uuid::new_v4()).await.unwrap();

        store.delete(cart.id).await.unwrap();
        assert!(store
            .find_by_customer(cart.customer_id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_payment_unique_per_order() {
        let store = MemoryPaymentStore::new();
        let order_id = Uuid::new_v4();
        let amount = Price::new(10.0, Currency::USD);

        store
            .insert(Payment::new(
                order_id,
                amount,
                PaymentMethod::MockCard,
                "txn_1".into(),
            ))
            .await
            .unwrap();

        let err = store
            .insert(Payment::new(
                order_id,
                amount,
                PaymentMethod::MockCard,
                "txn_2".into(),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidOperation(_)));
    }

    #[tokio::test]
    async fn test_order_update_requires_existing() {
        let store = MemoryOrderStore::new();
        let order = Order::new(Uuid::new_v4(), vec![], Currency::USD);
        let err = store.update(order).await.unwrap_err();
        assert!(matches!(err, FlowError::OrderNotFound { .. }));
    }
}
