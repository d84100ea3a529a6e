//! # Request Handlers
//!
//! Axum request handlers for carts, checkout, orders, and payments.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use flow_core::{
    Cart, CartItem, Currency, FlowError, Order, OrderItemDraft, OrderStatus, Payment,
    PaymentMethod, Price,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn flow_error_to_response(err: FlowError) -> HandlerError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

/// Add/update a cart line
#[derive(Debug, Deserialize)]
pub struct CartItemRequest {
    pub product_id: Uuid,
    /// For updates this may be zero or negative, which removes the line
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// Merge request: source cart is absorbed into target and deleted
#[derive(Debug, Deserialize)]
pub struct MergeCartsRequest {
    pub source_customer_id: Uuid,
    pub target_customer_id: Uuid,
}

/// Item in an explicit order-creation request, price in major units
#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: u32,
    pub price: f64,
    pub product_name: String,
    #[serde(default)]
    pub category_name: Option<String>,
}

impl OrderItemRequest {
    fn into_draft(self) -> OrderItemDraft {
        OrderItemDraft {
            product_id: self.product_id,
            quantity: self.quantity,
            price: Price::new(self.price, Currency::USD),
            product_name: self.product_name,
            category_name: self.category_name,
        }
    }
}

/// Create order from an explicit item list
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub items: Vec<OrderItemRequest>,
}

/// Checkout response: the committed order plus the methods the payment
/// engine currently offers
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order: Order,
    pub payment_methods: Vec<PaymentMethod>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub order_id: Uuid,
    pub method: PaymentMethod,
}

#[derive(Debug, Serialize)]
pub struct PaymentMethodsResponse {
    pub methods: Vec<PaymentMethod>,
}

// =============================================================================
// Health
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "marketflow",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// =============================================================================
// Cart Handlers
// =============================================================================

/// Get (or lazily create) the customer's cart
#[instrument(skip(state))]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<Cart>, HandlerError> {
    state
        .carts
        .get_or_create(customer_id)
        .await
        .map(Json)
        .map_err(flow_error_to_response)
}

/// List a cart's items by cart id
#[instrument(skip(state))]
pub async fn list_cart_items(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
) -> Result<Json<Vec<CartItem>>, HandlerError> {
    state
        .carts
        .items(cart_id)
        .await
        .map(Json)
        .map_err(flow_error_to_response)
}

/// Add quantity of a product to the customer's cart
#[instrument(skip(state, request))]
pub async fn add_cart_item(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(request): Json<CartItemRequest>,
) -> Result<Json<Cart>, HandlerError> {
    if request.quantity <= 0 {
        return Err(flow_error_to_response(FlowError::InvalidRequest(
            "Quantity must be positive".to_string(),
        )));
    }
    let quantity = u32::try_from(request.quantity).map_err(|_| {
        flow_error_to_response(FlowError::InvalidRequest(
            "Quantity exceeds the supported maximum".to_string(),
        ))
    })?;
    state
        .carts
        .add_item(customer_id, request.product_id, quantity)
        .await
        .map(Json)
        .map_err(flow_error_to_response)
}

/// Set a line's quantity (zero or negative removes it)
#[instrument(skip(state, request))]
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(request): Json<CartItemRequest>,
) -> Result<Json<Cart>, HandlerError> {
    state
        .carts
        .update_item(customer_id, request.product_id, request.quantity)
        .await
        .map(Json)
        .map_err(flow_error_to_response)
}

/// Remove a product's line from the cart
#[instrument(skip(state))]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Path((customer_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Cart>, HandlerError> {
    state
        .carts
        .remove_item(customer_id, product_id)
        .await
        .map(Json)
        .map_err(flow_error_to_response)
}

/// Clear all items from the customer's cart
#[instrument(skip(state))]
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<StatusCode, HandlerError> {
    state
        .carts
        .clear(customer_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(flow_error_to_response)
}

/// Merge one customer's cart into another's
#[instrument(skip(state, request))]
pub async fn merge_carts(
    State(state): State<AppState>,
    Json(request): Json<MergeCartsRequest>,
) -> Result<Json<Cart>, HandlerError> {
    state
        .carts
        .merge(request.source_customer_id, request.target_customer_id)
        .await
        .map(Json)
        .map_err(flow_error_to_response)
}

// =============================================================================
// Order Handlers
// =============================================================================

/// Create an order from an explicit item list
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), HandlerError> {
    let drafts = request.items.into_iter().map(|i| i.into_draft()).collect();
    state
        .orders
        .create_order(request.customer_id, drafts)
        .await
        .map(|order| (StatusCode::CREATED, Json(order)))
        .map_err(flow_error_to_response)
}

/// Run the checkout orchestrator for a customer
#[instrument(skip(state))]
pub async fn checkout(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<(StatusCode, Json<CheckoutResponse>), HandlerError> {
    let order = state
        .checkout
        .checkout_from_cart(customer_id)
        .await
        .map_err(flow_error_to_response)?;

    // Best-effort: the order stands even if no method is available.
    let payment_methods = state.payments.methods();

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order,
            payment_methods,
        }),
    ))
}

/// Get a single order
#[instrument(skip(state))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Order>, HandlerError> {
    state
        .orders
        .get(order_id)
        .await
        .map(Json)
        .map_err(flow_error_to_response)
}

/// List a customer's orders
#[instrument(skip(state))]
pub async fn list_customer_orders(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<Json<Vec<Order>>, HandlerError> {
    state
        .orders
        .orders_for_customer(customer_id)
        .await
        .map(Json)
        .map_err(flow_error_to_response)
}

/// Set an order's status
#[instrument(skip(state, request))]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, HandlerError> {
    state
        .orders
        .update_status(order_id, request.status)
        .await
        .map(Json)
        .map_err(flow_error_to_response)
}

/// Cancel an order
#[instrument(skip(state))]
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Order>, HandlerError> {
    state
        .orders
        .cancel(order_id)
        .await
        .map(Json)
        .map_err(flow_error_to_response)
}

/// Add an item to an existing order
#[instrument(skip(state, request))]
pub async fn add_order_item(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(request): Json<OrderItemRequest>,
) -> Result<Json<Order>, HandlerError> {
    state
        .orders
        .add_item(order_id, request.into_draft())
        .await
        .map(Json)
        .map_err(flow_error_to_response)
}

/// Remove an item from an existing order
#[instrument(skip(state))]
pub async fn remove_order_item(
    State(state): State<AppState>,
    Path((order_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Order>, HandlerError> {
    state
        .orders
        .remove_item(order_id, item_id)
        .await
        .map(Json)
        .map_err(flow_error_to_response)
}

// =============================================================================
// Payment Handlers
// =============================================================================

/// Create the payment for an order
#[instrument(skip(state, request))]
pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), HandlerError> {
    state
        .payments
        .create_payment(request.order_id, request.method)
        .await
        .map(|payment| (StatusCode::CREATED, Json(payment)))
        .map_err(flow_error_to_response)
}

/// Confirm a payment (idempotent once completed)
#[instrument(skip(state))]
pub async fn confirm_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<Payment>, HandlerError> {
    state
        .payments
        .confirm_payment(payment_id)
        .await
        .map(Json)
        .map_err(flow_error_to_response)
}

/// Refund a completed payment
#[instrument(skip(state))]
pub async fn refund_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<Payment>, HandlerError> {
    state
        .payments
        .refund_payment(payment_id)
        .await
        .map(Json)
        .map_err(flow_error_to_response)
}

/// Get a single payment
#[instrument(skip(state))]
pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<Json<Payment>, HandlerError> {
    state
        .payments
        .get(payment_id)
        .await
        .map(Json)
        .map_err(flow_error_to_response)
}

/// List an order's payments
#[instrument(skip(state))]
pub async fn list_order_payments(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Vec<Payment>>, HandlerError> {
    state
        .payments
        .payments_for_order(order_id)
        .await
        .map(Json)
        .map_err(flow_error_to_response)
}

/// List the registered payment methods
pub async fn list_payment_methods(State(state): State<AppState>) -> impl IntoResponse {
    Json(PaymentMethodsResponse {
        methods: state.payments.methods(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response() {
        let err = ErrorResponse::new("Test error", 400);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
    }

    #[test]
    fn test_flow_error_conversion() {
        let err = FlowError::PaymentNotFound {
            payment_id: Uuid::nil(),
        };
        let (status, _json) = flow_error_to_response(err);
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
