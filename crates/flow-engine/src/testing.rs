//! # Test Support
//!
//! In-process stand-ins for the remote collaborators, used by unit and
//! scenario tests. Lookups can be toggled to fail to exercise the
//! best-effort paths.

use async_trait::async_trait;
use flow_core::{
    FlowError, FlowResult, Price, ProductDetails, ProductKind, ProductLookup, UserLookup,
    UserProfile,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Scriptable in-memory catalog
#[derive(Clone, Default)]
pub struct StubCatalog {
    products: Arc<Mutex<HashMap<Uuid, ProductDetails>>>,
    failing: Arc<AtomicBool>,
}

impl StubCatalog {
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, ProductDetails>> {
        self.products.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a product under a fresh id, with a category attached
    pub fn insert(&self, name: &str, price: Price) -> Uuid {
        let id = Uuid::new_v4();
        self.insert_with_id(id, name, price);
        id
    }

    /// Add a product under a known id
    pub fn insert_with_id(&self, id: Uuid, name: &str, price: Price) {
        let details = ProductDetails {
            id,
            name: name.to_string(),
            description: format!("{} description", name),
            price,
            category_id: Some(Uuid::new_v4()),
            category_name: Some("general".to_string()),
            kind: ProductKind::Physical,
        };
        self.lock().insert(id, details);
    }

    /// Drop a product from the catalog
    pub fn remove(&self, id: Uuid) {
        self.lock().remove(&id);
    }

    /// Make every lookup return a Network error
    pub fn fail_lookups(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Undo `fail_lookups`
    pub fn restore(&self) {
        self.failing.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductLookup for StubCatalog {
    async fn product(&self, product_id: Uuid) -> FlowResult<Option<ProductDetails>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FlowError::Network("stub catalog down".to_string()));
        }
        Ok(self.lock().get(&product_id).cloned())
    }
}

/// Scriptable in-memory user directory
#[derive(Clone, Default)]
pub struct StubDirectory {
    users: Arc<Mutex<HashMap<Uuid, UserProfile>>>,
    failing: Arc<AtomicBool>,
}

impl StubDirectory {
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, UserProfile>> {
        self.users.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn insert(&self, id: Uuid, name: &str, email: &str) {
        self.lock().insert(
            id,
            UserProfile {
                id,
                name: name.to_string(),
                email: email.to_string(),
            },
        );
    }

    pub fn fail_lookups(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserLookup for StubDirectory {
    async fn user(&self, user_id: Uuid) -> FlowResult<Option<UserProfile>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FlowError::Network("stub directory down".to_string()));
        }
        Ok(self.lock().get(&user_id).cloned())
    }
}
