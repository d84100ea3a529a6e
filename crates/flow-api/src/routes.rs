//! # Routes
//!
//! Axum router configuration for the marketflow API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Carts:
///   - GET    /carts/customer/{customer_id} - Get or lazily create the cart
///   - GET    /carts/{cart_id}/items - List a cart's items
///   - POST   /carts/{customer_id}/items - Add an item
///   - PUT    /carts/{customer_id}/items - Update an item's quantity
///   - DELETE /carts/{customer_id}/items/{product_id} - Remove an item
///   - DELETE /carts/{customer_id} - Clear the cart
///   - POST   /carts/merge - Merge one cart into another
///
/// - Orders:
///   - POST   /orders - Create from an explicit item list
///   - POST   /orders/checkout/{customer_id} - Run the checkout orchestrator
///   - GET    /orders/{order_id} / GET /orders/customer/{customer_id}
///   - PUT    /orders/{order_id}/status / PUT /orders/{order_id}/cancel
///   - POST   /orders/{order_id}/items / DELETE /orders/{order_id}/items/{item_id}
///
/// - Payments:
///   - POST   /payments, /payments/{id}/confirm, /payments/{id}/refund
///   - GET    /payments/{id}, /payments/order/{order_id}, /payments/methods
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // `/{id}/items` is the cart id on GET and the customer id on POST/PUT,
    // matching the upstream route contract.
    let cart_routes = Router::new()
        .route("/customer/{customer_id}", get(handlers::get_cart))
        .route(
            "/{id}/items",
            get(handlers::list_cart_items)
                .post(handlers::add_cart_item)
                .put(handlers::update_cart_item),
        )
        .route(
            "/{customer_id}/items/{product_id}",
            delete(handlers::remove_cart_item),
        )
        .route("/{customer_id}", delete(handlers::clear_cart))
        .route("/merge", post(handlers::merge_carts));

    let order_routes = Router::new()
        .route("/", post(handlers::create_order))
        .route("/checkout/{customer_id}", post(handlers::checkout))
        .route("/{order_id}", get(handlers::get_order))
        .route("/customer/{customer_id}", get(handlers::list_customer_orders))
        .route("/{order_id}/status", put(handlers::update_order_status))
        .route("/{order_id}/cancel", put(handlers::cancel_order))
        .route("/{order_id}/items", post(handlers::add_order_item))
        .route(
            "/{order_id}/items/{item_id}",
            delete(handlers::remove_order_item),
        );

    let payment_routes = Router::new()
        .route("/", post(handlers::create_payment))
        .route("/methods", get(handlers::list_payment_methods))
        .route("/{payment_id}", get(handlers::get_payment))
        .route("/{payment_id}/confirm", post(handlers::confirm_payment))
        .route("/{payment_id}/refund", post(handlers::refund_payment))
        .route("/order/{order_id}", get(handlers::list_order_payments));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/carts", cart_routes)
        .nest("/orders", order_routes)
        .nest("/payments", payment_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AppConfig, AppState};
    use axum_test::TestServer;
    use flow_core::{Currency, PaymentMethod, Price, ProviderRegistry, SharedProvider};
    use flow_engine::testing::{StubCatalog, StubDirectory};
    use flow_engine::{CashOnDeliveryProvider, MockCardProvider};
    use std::sync::Arc;
    use uuid::Uuid;

    fn test_config() -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
        }
    }

    fn server_with(catalog: StubCatalog, directory: StubDirectory) -> TestServer {
        let registry = ProviderRegistry::new([
            Arc::new(MockCardProvider::new()) as SharedProvider,
            Arc::new(CashOnDeliveryProvider) as SharedProvider,
        ]);
        let state = AppState::wire(
            test_config(),
            Arc::new(catalog),
            Arc::new(directory),
            registry,
        );
        TestServer::new(create_router(state)).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let server = server_with(StubCatalog::default(), StubDirectory::default());
        let response = server.get("/health").await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_cart_checkout_payment_flow() {
        let catalog = StubCatalog::default();
        let product = catalog.insert("Desk", Price::new(10.0, Currency::USD));
        let server = server_with(catalog, StubDirectory::default());
        let customer = Uuid::new_v4();

        // Add 2 + 3 of the same product: one line of 5.
        server
            .post(&format!("/carts/{}/items", customer))
            .json(&serde_json::json!({"product_id": product, "quantity": 2}))
            .await
            .assert_status_ok();
        let cart = server
            .post(&format!("/carts/{}/items", customer))
            .json(&serde_json::json!({"product_id": product, "quantity": 3}))
            .await;
        cart.assert_status_ok();
        let cart_body: serde_json::Value = cart.json();
        assert_eq!(cart_body["items"][0]["quantity"], 5);

        // Checkout returns the order and the available methods.
        let checkout = server
            .post(&format!("/orders/checkout/{}", customer))
            .await;
        checkout.assert_status(axum::http::StatusCode::CREATED);
        let body: serde_json::Value = checkout.json();
        assert_eq!(body["order"]["total"]["amount"], 5000);
        assert!(!body["payment_methods"].as_array().unwrap().is_empty());
        let order_id = body["order"]["id"].as_str().unwrap().to_string();

        // Pay by mock card, confirm, refund.
        let payment = server
            .post("/payments")
            .json(&serde_json::json!({
                "order_id": order_id,
                "method": PaymentMethod::MockCard,
            }))
            .await;
        payment.assert_status(axum::http::StatusCode::CREATED);
        let payment_body: serde_json::Value = payment.json();
        assert_eq!(payment_body["status"], "requires_confirmation");
        let payment_id = payment_body["id"].as_str().unwrap().to_string();

        let confirmed = server
            .post(&format!("/payments/{}/confirm", payment_id))
            .await;
        confirmed.assert_status_ok();
        let confirmed_body: serde_json::Value = confirmed.json();
        assert_eq!(confirmed_body["status"], "completed");
    }

    #[tokio::test]
    async fn test_quantity_beyond_u32_is_400() {
        let catalog = StubCatalog::default();
        let product = catalog.insert("Desk", Price::new(10.0, Currency::USD));
        let server = server_with(catalog, StubDirectory::default());
        let customer = Uuid::new_v4();
        let oversized = (u32::MAX as i64) + 1;

        server
            .post(&format!("/carts/{}/items", customer))
            .json(&serde_json::json!({"product_id": product, "quantity": oversized}))
            .await
            .assert_status(axum::http::StatusCode::BAD_REQUEST);

        // A valid line must survive an oversized update untouched.
        server
            .post(&format!("/carts/{}/items", customer))
            .json(&serde_json::json!({"product_id": product, "quantity": 2}))
            .await
            .assert_status_ok();
        server
            .put(&format!("/carts/{}/items", customer))
            .json(&serde_json::json!({"product_id": product, "quantity": oversized}))
            .await
            .assert_status(axum::http::StatusCode::BAD_REQUEST);

        let cart = server.get(&format!("/carts/customer/{}", customer)).await;
        let body: serde_json::Value = cart.json();
        assert_eq!(body["items"][0]["quantity"], 2);
    }

    #[tokio::test]
    async fn test_checkout_without_cart_is_404() {
        let server = server_with(StubCatalog::default(), StubDirectory::default());
        let response = server
            .post(&format!("/orders/checkout/{}", Uuid::new_v4()))
            .await;
        response.assert_status(axum::http::StatusCode::NOT_FOUND);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn test_refund_pending_payment_is_400() {
        let catalog = StubCatalog::default();
        let product = catalog.insert("Desk", Price::new(10.0, Currency::USD));
        let server = server_with(catalog, StubDirectory::default());
        let customer = Uuid::new_v4();

        server
            .post(&format!("/carts/{}/items", customer))
            .json(&serde_json::json!({"product_id": product, "quantity": 1}))
            .await
            .assert_status_ok();
        let checkout = server
            .post(&format!("/orders/checkout/{}", customer))
            .await;
        let order_id = checkout.json::<serde_json::Value>()["order"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let payment = server
            .post("/payments")
            .json(&serde_json::json!({
                "order_id": order_id,
                "method": PaymentMethod::CashOnDelivery,
            }))
            .await;
        let payment_id = payment.json::<serde_json::Value>()["id"]
            .as_str()
            .unwrap()
            .to_string();

        let refund = server
            .post(&format!("/payments/{}/refund", payment_id))
            .await;
        refund.assert_status(axum::http::StatusCode::BAD_REQUEST);
    }
}
