//! Commerce Orders Service - Order management HTTP API.
//!
//! This binary serves the orders API on port 8002.
//!
//! # Architecture
//!
//! - Axum web framework with JSON request and response bodies
//! - In-memory persistence with relational-style tables
//! - Remote account resolution with bounded retry and optional static
//!   instance discovery
//!
//! The binary holds no credentials; it only needs network reach to the
//! account service named by `ACCOUNTS_BASE_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use commerce_orders_service::config::ServiceConfig;
use commerce_orders_service::routes;
use commerce_orders_service::state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = ServiceConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "commerce_orders_service=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build application state (wires the store and the account client)
    let state = AppState::new(config).expect("Failed to initialize application state");
    tracing::info!(
        accounts_url = %state.config().accounts.base_url,
        service_name = %state.config().accounts.service_name,
        "account service configured"
    );

    // Build router and start server
    let addr = state.config().socket_addr();
    let app = routes::app(state);

    tracing::info!("orders service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
