//! # Cart Types
//!
//! Cart aggregate and line items. Each line item carries a denormalized
//! snapshot of the owning catalog's product data, captured at add-time and
//! treated as a cache: the read path repairs it, the write path never
//! trusts it for pricing.

use crate::lookup::ProductDetails;
use crate::money::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product kind carried in the snapshot for display purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    #[default]
    Physical,
    Digital,
    Service,
}

/// A line item in a cart, with its product snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    /// Always > 0 once stored; an update to <= 0 removes the item
    pub quantity: u32,

    // Snapshot of remote product data (cache, not source of truth)
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default)]
    pub product_kind: ProductKind,
}

impl CartItem {
    /// Create an item with an empty snapshot (catalog was unreachable at
    /// add-time; enrichment repairs it on the next read)
    pub fn bare(cart_id: Uuid, product_id: Uuid, quantity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            cart_id,
            product_id,
            quantity,
            name: String::new(),
            description: String::new(),
            price: Price::default(),
            category_id: None,
            category_name: None,
            product_kind: ProductKind::default(),
        }
    }

    /// Create an item with a fresh catalog snapshot
    pub fn with_snapshot(cart_id: Uuid, product: &ProductDetails, quantity: u32) -> Self {
        let mut item = Self::bare(cart_id, product.id, quantity);
        item.apply_snapshot(product);
        item
    }

    /// Replace all snapshot fields from authoritative product data
    pub fn apply_snapshot(&mut self, product: &ProductDetails) {
        self.name = product.name.clone();
        self.description = product.description.clone();
        self.price = product.price;
        self.category_id = product.category_id;
        self.category_name = product.category_name.clone();
        self.product_kind = product.kind;
    }

    /// Stale predicate: the snapshot is missing data the UI needs.
    /// Empty name, zero price, or a missing category field all count.
    pub fn is_stale(&self) -> bool {
        self.name.is_empty()
            || self.price.is_zero()
            || self.category_id.is_none()
            || self
                .category_name
                .as_deref()
                .map(str::is_empty)
                .unwrap_or(true)
    }
}

/// A customer's cart. One cart per customer, created lazily on first touch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new(customer_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            created_at: Utc::now(),
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_for_product(&self, product_id: Uuid) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Add quantity for a product: increments the existing line when the
    /// product is already in the cart, otherwise pushes the given item.
    pub fn add(&mut self, item: CartItem) {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            existing.quantity += item.quantity;
        } else {
            self.items.push(item);
        }
    }

    /// Set the quantity for a product; quantity <= 0 removes the line.
    /// Returns false when the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: Uuid, quantity: i64) -> bool {
        let Some(pos) = self.items.iter().position(|i| i.product_id == product_id) else {
            return false;
        };
        if quantity <= 0 {
            self.items.remove(pos);
        } else {
            // Services reject out-of-range values; saturating here keeps a
            // huge i64 from truncating into a stored zero.
            self.items[pos].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        true
    }

    /// Remove a product's line. Returns false when absent.
    pub fn remove(&mut self, product_id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Merge `source` into this cart: shared products sum quantities,
    /// unique items are copied over (re-homed under this cart's id).
    pub fn absorb(&mut self, source: &Cart) {
        for item in &source.items {
            let mut copy = item.clone();
            copy.cart_id = self.id;
            self.add(copy);
        }
    }
}
