//! # Application State
//!
//! Shared state for the axum application: the four services wired over
//! in-memory stores, the remote collaborators, and the provider registry
//! built once at startup.

use flow_core::{ProductLookup, ProviderRegistry, SharedProvider, UserLookup};
use flow_engine::{
    CartService, CashOnDeliveryProvider, CheckoutService, MemoryCartStore, MemoryOrderStore,
    MemoryPaymentStore, MockCardProvider, OrderService, PaymentService,
};
use flow_remote::{CatalogClient, CollaboratorConfig, DirectoryClient, GatewayProvider};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub carts: CartService,
    pub checkout: CheckoutService,
    pub orders: OrderService,
    pub payments: PaymentService,
    pub config: AppConfig,
}

impl AppState {
    /// Create state from the environment: real HTTP collaborators plus
    /// every provider the configuration allows.
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let collaborators = CollaboratorConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Collaborator config: {}", e))?;
        let catalog: Arc<dyn ProductLookup> =
            Arc::new(CatalogClient::new(collaborators.catalog_base_url));
        let users: Arc<dyn UserLookup> =
            Arc::new(DirectoryClient::new(collaborators.users_base_url));

        let mut providers: Vec<SharedProvider> = vec![
            Arc::new(MockCardProvider::new()),
            Arc::new(CashOnDeliveryProvider),
        ];
        match GatewayProvider::from_env() {
            Ok(gateway) => providers.push(Arc::new(gateway)),
            Err(e) => {
                tracing::warn!("Gateway provider disabled: {}", e);
            }
        }

        Ok(Self::wire(
            config,
            catalog,
            users,
            ProviderRegistry::new(providers),
        ))
    }

    /// Wire services over fresh in-memory stores. Split out so tests can
    /// substitute stub collaborators.
    pub fn wire(
        config: AppConfig,
        catalog: Arc<dyn ProductLookup>,
        users: Arc<dyn UserLookup>,
        registry: ProviderRegistry,
    ) -> Self {
        let cart_store = Arc::new(MemoryCartStore::new());
        let order_store = Arc::new(MemoryOrderStore::new());
        let payment_store = Arc::new(MemoryPaymentStore::new());

        Self {
            carts: CartService::new(cart_store.clone(), catalog.clone()),
            checkout: CheckoutService::new(users, catalog, cart_store, order_store.clone()),
            orders: OrderService::new(order_store.clone()),
            payments: PaymentService::new(payment_store, order_store, registry),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
        };

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }
}
