//! # Remote Lookup Traits
//!
//! Read-only accessors for data owned by other services. Results are the
//! explicit three-state shape `FlowResult<Option<T>>`: found, not found,
//! or transport/upstream error — callers pick their own default instead
//! of relying on catch-and-ignore.

use crate::cart::ProductKind;
use crate::error::FlowResult;
use crate::money::Price;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authoritative product data from the catalog service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetails {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub kind: ProductKind,
}

/// Display data from the user directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Read-only accessor for the product catalog service
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Fetch authoritative product data by id.
    /// `Ok(None)` means the catalog does not know the product.
    async fn product(&self, product_id: Uuid) -> FlowResult<Option<ProductDetails>>;
}

/// Read-only accessor for the user directory service
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Fetch display name/email by user id
    async fn user(&self, user_id: Uuid) -> FlowResult<Option<UserProfile>>;
}
