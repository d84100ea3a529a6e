//! # flow-core
//!
//! Core types and traits for the marketflow checkout and payment engine.
//!
//! This crate provides:
//! - `Cart`, `CartItem` with product snapshots and the stale predicate
//! - `Order`, `OrderItem`, and the pure `order_total` function
//! - `Payment` with its method-driven state machine
//! - `ProductLookup` / `UserLookup` traits for remote collaborators
//! - `PaymentProvider` trait and the immutable `ProviderRegistry`
//! - `CartStore` / `OrderStore` / `PaymentStore` persistence seams
//! - `FlowError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use flow_core::{Order, OrderItemDraft, Currency, Price};
//!
//! let order = Order::new(customer_id, vec![
//!     OrderItemDraft {
//!         product_id,
//!         quantity: 2,
//!         price: Price::new(10.0, Currency::USD),
//!         product_name: "Widget".into(),
//!         category_name: None,
//!     },
//! ], Currency::USD);
//!
//! assert_eq!(order.total.amount, 2000);
//! ```

pub mod cart;
pub mod error;
pub mod lookup;
pub mod money;
pub mod order;
pub mod payment;
pub mod provider;
pub mod store;

// Re-exports for convenience
pub use cart::{Cart, CartItem, ProductKind};
pub use error::{FlowError, FlowResult};
pub use lookup::{ProductDetails, ProductLookup, UserLookup, UserProfile};
pub use money::{Currency, Price};
pub use order::{order_total, Order, OrderItem, OrderItemDraft, OrderStatus, ShippingAddress};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use provider::{PaymentProvider, ProviderRegistry, SharedProvider};
pub use store::{CartStore, OrderStore, PaymentStore};
