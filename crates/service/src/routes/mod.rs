//! HTTP route handlers for the orders service.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health              - Health check
//!
//! # Orders
//! POST   /orders              - Create an order
//! GET    /orders              - List orders (all, or ?accountId= scoped)
//! GET    /orders/{id}         - Fetch one order
//! PUT    /orders/{id}         - Merge an update payload into one order
//! DELETE /orders/{id}         - Delete one order
//! GET    /orders/{id}/details - Denormalized details projection
//! GET    /orders/{id}/lines   - The order's line items
//! ```

pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route(
            "/{id}",
            get(orders::show).put(orders::update).delete(orders::remove),
        )
        .route("/{id}/details", get(orders::details))
        .route("/{id}/lines", get(orders::lines))
}

/// Create all routes for the orders service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/orders", order_routes())
}

/// Assemble the application router with request tracing attached.
///
/// Shared by the binary and by tests that drive the service in-process.
#[allow(clippy::cast_possible_truncation)]
pub fn app(state: AppState) -> Router {
    routes()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
