//! PIX Payment Service - Main Application Entry Point
//!
//! This is a REST API server implementing the payment engine of an
//! e-commerce backend: PIX "Copy & Paste" code generation (EMV TLV +
//! CRC16-CCITT), card payment simulation, and a payment confirmation state
//! machine backed by an in-memory ledger.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Store**: in-memory ledger guarded by a mutex (no durable persistence)
//! - **Authentication**: simplified header-based identity (X-User-Email / X-User-Role)
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create the payment ledger
//! 3. Build HTTP router with routes and middleware
//! 4. Start server on configured port

mod config;
mod error;
mod handlers;
mod ledger;
mod middleware;
mod models;
mod services;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::Config, ledger::PaymentLedger};

/// Shared application state, cloned into every handler.
///
/// The ledger is dependency-injected here instead of living in a global so
/// it is testable in isolation and replaceable by a durable store later.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<PaymentLedger>,
    pub config: Arc<Config>,
}

/// Build the HTTP router.
///
/// Split out of `main` so router-level tests can drive the full
/// middleware/handler stack without binding a socket.
fn app(state: AppState) -> Router {
    // Authenticated routes (identity headers required)
    let authenticated_routes = Router::new()
        .route("/api/v1/payments", post(handlers::payments::create_payment))
        .route(
            "/api/v1/payments/{transaction_id}/confirm",
            post(handlers::payments::confirm_payment),
        )
        // Apply identity middleware to all routes in this group
        .route_layer(axum_middleware::from_fn(middleware::auth::auth_middleware));

    Router::new()
        // Public routes (no identity required)
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/v1/payments/options",
            get(handlers::payments::payment_options),
        )
        // Merge authenticated routes
        .merge(authenticated_routes)
        // Add tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // The storefront frontend calls this API from the browser
        .layer(CorsLayer::permissive())
        // Share ledger and config with all handlers via State extraction
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let state = AppState {
        ledger: Arc::new(PaymentLedger::new()),
        config: Arc::new(config),
    };

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", state.config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app(state)).await?;

    Ok(())
}
