//! # Marketflow
//!
//! Checkout and payment orchestration service.
//!
//! ## Usage
//!
//! ```bash
//! # Point at the collaborator services
//! export CATALOG_BASE_URL=http://catalog.internal
//! export USERS_BASE_URL=http://users.internal
//!
//! # Optional: enable the card gateway
//! export GATEWAY_API_KEY=gw_test_...
//! export GATEWAY_SIGNING_SECRET=gws_...
//!
//! # Run the server
//! marketflow
//! ```

use flow_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment methods: {:?}", state.payments.methods());

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Marketflow starting on http://{}", addr);

    if !is_prod {
        info!("Checkout: POST http://{}/orders/checkout/{{customer_id}}", addr);
        info!("Payments: POST http://{}/payments", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
