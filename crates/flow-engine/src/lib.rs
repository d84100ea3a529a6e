//! # flow-engine
//!
//! The checkout and payment orchestration engine:
//! - `CartService` — cart operations with read-time snapshot enrichment
//! - `CheckoutService` — the cross-service cart → order workflow
//! - `OrderService` — order ledger and status transitions
//! - `PaymentService` — payment state machine over the provider registry
//! - `MockCardProvider` / `CashOnDeliveryProvider` — offline providers
//! - in-memory store implementations for all three aggregates
//!
//! ## Example
//!
//! ```rust,ignore
//! let carts = Arc::new(MemoryCartStore::new());
//! let orders = Arc::new(MemoryOrderStore::new());
//! let cart_service = CartService::new(carts.clone(), catalog.clone());
//! let checkout = CheckoutService::new(users, catalog, carts, orders);
//!
//! cart_service.add_item(customer, product, 2).await?;
//! let order = checkout.checkout_from_cart(customer).await?;
//! ```

pub mod cart;
pub mod checkout;
pub mod memory;
pub mod orders;
pub mod payments;
pub mod providers;
pub mod testing;

pub use cart::CartService;
pub use checkout::{CheckoutService, ClearOutbox};
pub use memory::{MemoryCartStore, MemoryOrderStore, MemoryPaymentStore};
pub use orders::OrderService;
pub use payments::PaymentService;
pub use providers::{CashOnDeliveryProvider, MockCardProvider};
