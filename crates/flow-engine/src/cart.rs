//! # Cart Service
//!
//! Cart operations plus read-time snapshot enrichment. Enrichment repairs
//! what it returns, never what is stored: a snapshot captured while the
//! catalog was unreachable stays blank in the store and is filled in on
//! every read until a write refreshes it.

use flow_core::{
    Cart, CartItem, CartStore, FlowError, FlowResult, ProductLookup,
};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

/// Cart store & enrichment front
#[derive(Clone)]
pub struct CartService {
    store: Arc<dyn CartStore>,
    catalog: Arc<dyn ProductLookup>,
}

impl CartService {
    pub fn new(store: Arc<dyn CartStore>, catalog: Arc<dyn ProductLookup>) -> Self {
        Self { store, catalog }
    }

    /// Get the customer's cart, creating it lazily on first access.
    /// The returned copy is enriched.
    #[instrument(skip(self))]
    pub async fn get_or_create(&self, customer_id: Uuid) -> FlowResult<Cart> {
        let mut cart = self.store.get_or_create(customer_id).await?;
        self.enrich(&mut cart.items).await;
        Ok(cart)
    }

    /// List a cart's items by cart id, enriched
    #[instrument(skip(self))]
    pub async fn items(&self, cart_id: Uuid) -> FlowResult<Vec<CartItem>> {
        let cart = self
            .store
            .find(cart_id)
            .await?
            .ok_or(FlowError::UnknownCart { cart_id })?;
        let mut items = cart.items;
        self.enrich(&mut items).await;
        Ok(items)
    }

    /// Add quantity of a product to the customer's cart. The catalog is
    /// called optimistically for a fresh snapshot; if it fails, the item
    /// is stored with blank snapshot fields and repaired on the next read.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        customer_id: Uuid,
        product_id: Uuid,
        quantity: u32,
    ) -> FlowResult<Cart> {
        if quantity == 0 {
            return Err(FlowError::InvalidRequest(
                "Quantity must be positive".to_string(),
            ));
        }

        let mut cart = self.store.get_or_create(customer_id).await?;

        let item = match self.catalog.product(product_id).await {
            Ok(Some(product)) => CartItem::with_snapshot(cart.id, &product, quantity),
            Ok(None) => {
                warn!("Product {} not in catalog at add-time", product_id);
                CartItem::bare(cart.id, product_id, quantity)
            }
            Err(e) => {
                warn!("Catalog lookup failed at add-time: {}", e);
                CartItem::bare(cart.id, product_id, quantity)
            }
        };

        cart.add(item);
        self.store.save(cart.clone()).await?;
        self.enrich(&mut cart.items).await;
        Ok(cart)
    }

    /// Set a line's quantity; <= 0 removes the line
    #[instrument(skip(self))]
    pub async fn update_item(
        &self,
        customer_id: Uuid,
        product_id: Uuid,
        quantity: i64,
    ) -> FlowResult<Cart> {
        if quantity > u32::MAX as i64 {
            return Err(FlowError::InvalidRequest(
                "Quantity exceeds the supported maximum".to_string(),
            ));
        }

        let mut cart = self
            .store
            .find_by_customer(customer_id)
            .await?
            .ok_or(FlowError::CartNotFound { customer_id })?;

        if !cart.set_quantity(product_id, quantity) {
            return Err(FlowError::ProductNotFound { product_id });
        }

        self.store.save(cart.clone()).await?;
        self.enrich(&mut cart.items).await;
        Ok(cart)
    }

    /// Remove a product's line
    #[instrument(skip(self))]
    pub async fn remove_item(&self, customer_id: Uuid, product_id: Uuid) -> FlowResult<Cart> {
        let mut cart = self
            .store
            .find_by_customer(customer_id)
            .await?
            .ok_or(FlowError::CartNotFound { customer_id })?;

        if !cart.remove(product_id) {
            return Err(FlowError::ProductNotFound { product_id });
        }

        self.store.save(cart.clone()).await?;
        Ok(cart)
    }

    /// Remove every item, keeping the cart row
    #[instrument(skip(self))]
    pub async fn clear(&self, customer_id: Uuid) -> FlowResult<()> {
        let Some(mut cart) = self.store.find_by_customer(customer_id).await? else {
            return Ok(());
        };
        cart.clear();
        self.store.save(cart).await
    }

    /// Merge the source customer's cart into the target's: shared products
    /// sum quantities, unique items are copied, the source cart is deleted.
    #[instrument(skip(self))]
    pub async fn merge(&self, source_customer: Uuid, target_customer: Uuid) -> FlowResult<Cart> {
        if source_customer == target_customer {
            return Err(FlowError::InvalidRequest(
                "Cannot merge a cart into itself".to_string(),
            ));
        }

        let source = self
            .store
            .find_by_customer(source_customer)
            .await?
            .ok_or(FlowError::CartNotFound {
                customer_id: source_customer,
            })?;

        let mut target = self.store.get_or_create(target_customer).await?;
        target.absorb(&source);

        self.store.save(target.clone()).await?;
        self.store.delete(source.id).await?;

        self.enrich(&mut target.items).await;
        Ok(target)
    }

    /// Read-time repair: for each stale item, ask the catalog and replace
    /// the snapshot fields in the returned copy. Per-item failures leave
    /// that item untouched; nothing is written back to the store.
    async fn enrich(&self, items: &mut [CartItem]) {
        for item in items.iter_mut().filter(|i| i.is_stale()) {
            match self.catalog.product(item.product_id).await {
                Ok(Some(product)) => item.apply_snapshot(&product),
                Ok(None) => {
                    warn!("Enrichment: product {} not in catalog", item.product_id);
                }
                Err(e) => {
                    warn!("Enrichment lookup failed for {}: {}", item.product_id, e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCartStore;
    use crate::testing::StubCatalog;
    use flow_core::{Currency, Price};

    fn service(catalog: StubCatalog) -> (CartService, Arc<MemoryCartStore>) {
        let store = Arc::new(MemoryCartStore::new());
        (
            CartService::new(store.clone(), Arc::new(catalog)),
            store,
        )
    }

    #[tokio::test]
    async fn test_lazy_creation_is_stable() {
        let (service, _) = service(StubCatalog::default());
        let customer = Uuid::new_v4();

        let first = service.get_or_create(customer).await.unwrap();
        let second = service.get_or_create(customer).await.unwrap();

        assert!(first.is_empty());
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_add_twice_merges_quantity() {
        let catalog = StubCatalog::default();
        let product = catalog.insert("Widget", Price::new(10.0, Currency::USD));
        let (service, _) = service(catalog);
        let customer = Uuid::new_v4();

        service.add_item(customer, product, 2).await.unwrap();
        let cart = service.add_item(customer, product, 3).await.unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.items[0].name, "Widget");
    }

    #[tokio::test]
    async fn test_add_with_dead_catalog_stores_bare_item() {
        let catalog = StubCatalog::default();
        catalog.fail_lookups();
        let product = Uuid::new_v4();
        let (service, store) = service(catalog);
        let customer = Uuid::new_v4();

        service.add_item(customer, product, 1).await.unwrap();

        let stored = store.find_by_customer(customer).await.unwrap().unwrap();
        assert!(stored.items[0].is_stale());
        assert!(stored.items[0].name.is_empty());
    }

    #[tokio::test]
    async fn test_update_to_zero_removes() {
        let catalog = StubCatalog::default();
        let product = catalog.insert("Widget", Price::new(10.0, Currency::USD));
        let (service, _) = service(catalog);
        let customer = Uuid::new_v4();

        service.add_item(customer, product, 2).await.unwrap();
        let cart = service.update_item(customer, product, 0).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_update_beyond_max_quantity_rejected() {
        let catalog = StubCatalog::default();
        let product = catalog.insert("Widget", Price::new(10.0, Currency::USD));
        let (service, store) = service(catalog);
        let customer = Uuid::new_v4();
        service.add_item(customer, product, 2).await.unwrap();

        let err = service
            .update_item(customer, product, (u32::MAX as i64) + 1)
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidRequest(_)));

        // Stored line untouched, and certainly not zeroed.
        let stored = store.find_by_customer(customer).await.unwrap().unwrap();
        assert_eq!(stored.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_merge_sums_and_deletes_source() {
        let catalog = StubCatalog::default();
        let shared = catalog.insert("Widget", Price::new(10.0, Currency::USD));
        let unique = catalog.insert("Gadget", Price::new(5.0, Currency::USD));
        let (service, store) = service(catalog);
        let (alice, guest) = (Uuid::new_v4(), Uuid::new_v4());

        service.add_item(alice, shared, 2).await.unwrap();
        service.add_item(guest, shared, 3).await.unwrap();
        service.add_item(guest, unique, 1).await.unwrap();
        let source_cart_id = store.find_by_customer(guest).await.unwrap().unwrap().id;

        let merged = service.merge(guest, alice).await.unwrap();

        assert_eq!(merged.items.len(), 2);
        assert_eq!(merged.item_for_product(shared).unwrap().quantity, 5);
        assert!(store.find(source_cart_id).await.unwrap().is_none());
        assert!(store.find_by_customer(guest).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_enrichment_repairs_read_only() {
        // Item added while catalog was down, catalog comes back.
        let catalog = StubCatalog::default();
        catalog.fail_lookups();
        let (service, store) = service(catalog.clone());
        let customer = Uuid::new_v4();
        let product = Uuid::new_v4();
        service.add_item(customer, product, 1).await.unwrap();

        catalog.restore();
        catalog.insert_with_id(product, "Widget", Price::new(12.0, Currency::USD));

        let cart = service.get_or_create(customer).await.unwrap();
        assert_eq!(cart.items[0].name, "Widget");
        assert_eq!(cart.items[0].price.amount, 1200);

        // Stored row stays blank: enrichment never persists.
        let stored = store.find_by_customer(customer).await.unwrap().unwrap();
        assert!(stored.items[0].is_stale());
    }

    #[tokio::test]
    async fn test_enrichment_failure_leaves_item_unchanged() {
        let catalog = StubCatalog::default();
        catalog.fail_lookups();
        let (service, _) = service(catalog);
        let customer = Uuid::new_v4();
        service.add_item(customer, Uuid::new_v4(), 1).await.unwrap();

        // Catalog still down: read succeeds, item still bare.
        let cart = service.get_or_create(customer).await.unwrap();
        assert!(cart.items[0].is_stale());
    }
}
