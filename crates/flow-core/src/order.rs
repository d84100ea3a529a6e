//! # Order Types
//!
//! Order ledger entities. Order items capture price-at-purchase: once an
//! order exists, catalog price changes must never alter it.

use crate::money::{Currency, Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order lifecycle status. Transitions are unconditional by design: the
/// ledger records whatever status the caller sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Canceled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

/// A line item on an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
    /// Unit price captured at order time, immutable afterwards
    pub price: Price,
    /// Name snapshots for historical display
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

impl OrderItem {
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Candidate line for order creation, before ids are assigned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDraft {
    pub product_id: Uuid,
    pub quantity: u32,
    pub price: Price,
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

impl OrderItemDraft {
    pub fn into_item(self, order_id: Uuid) -> OrderItem {
        OrderItem {
            id: Uuid::new_v4(),
            order_id,
            product_id: self.product_id,
            quantity: self.quantity,
            price: self.price,
            product_name: self.product_name,
            category_name: self.category_name,
        }
    }
}

/// Shipping destination snapshot captured on the order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub recipient: String,
    pub formatted: String,
}

/// An order in the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub total: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Build a new Pending order from candidate items; the total is
    /// computed from the items, never passed in.
    pub fn new(customer_id: Uuid, drafts: Vec<OrderItemDraft>, currency: Currency) -> Self {
        let id = Uuid::new_v4();
        let items: Vec<OrderItem> = drafts.into_iter().map(|d| d.into_item(id)).collect();
        let total = order_total(&items, currency);
        Self {
            id,
            customer_id,
            order_date: Utc::now(),
            status: OrderStatus::Pending,
            total,
            customer_name: None,
            customer_email: None,
            shipping_address: None,
            items,
        }
    }

    /// Recompute the stored total from the full item list
    pub fn recompute_total(&mut self) {
        self.total = order_total(&self.items, self.total.currency);
    }
}

/// Pure total over a candidate item list: Σ quantity × unit price
pub fn order_total(items: &[OrderItem], currency: Currency) -> Price {
    let amount = items.iter().map(|i| i.line_total().amount).sum();
    Price::from_minor(amount, currency)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(cents: i64, qty: u32) -> OrderItemDraft {
        OrderItemDraft {
            product_id: Uuid::new_v4(),
            quantity: qty,
            price: Price::from_minor(cents, Currency::USD),
            product_name: "widget".to_string(),
            category_name: None,
        }
    }

    #[test]
    fn test_new_order_total() {
        let order = Order::new(
            Uuid::new_v4(),
            vec![draft(1000, 2), draft(500, 1)],
            Currency::USD,
        );

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total.amount, 2500);
        assert!(order.items.iter().all(|i| i.order_id == order.id));
    }

    #[test]
    fn test_recompute_total_after_mutation() {
        let mut order = Order::new(Uuid::new_v4(), vec![draft(1000, 2)], Currency::USD);
        order.items.push(draft(250, 4).into_item(order.id));
        order.recompute_total();
        assert_eq!(order.total.amount, 3000);
    }

    #[test]
    fn test_order_total_empty() {
        assert_eq!(order_total(&[], Currency::USD).amount, 0);
    }
}
