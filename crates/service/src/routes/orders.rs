//! Order endpoints.
//!
//! Thin translation layer between HTTP and the order service: extractors
//! produce domain values, handlers call one service operation, and domain
//! errors map to responses through `AppError`.

use std::collections::HashSet;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use commerce_orders_core::model::{LineItem, Order, OrderDetailsView};
use commerce_orders_core::types::{AccountId, OrderId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Optional account scoping for the order listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersQuery {
    pub account_id: Option<AccountId>,
}

/// Create an order.
#[instrument(skip(state, order), fields(order_number = ?order.order_number))]
pub async fn create(
    State(state): State<AppState>,
    Json(order): Json<Order>,
) -> Result<Json<Order>> {
    let saved = state.orders().create(order).await?;
    Ok(Json(saved))
}

/// List orders, optionally scoped to one account.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> Result<Json<Vec<Order>>> {
    let orders = match query.account_id {
        Some(account_id) => state.orders().find_for_account(account_id).await?,
        None => state.orders().find_all().await?,
    };
    Ok(Json(orders))
}

/// Fetch one order.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    Ok(Json(state.orders().find_by_id(id).await?))
}

/// Merge an update payload into one order.
#[instrument(skip(state, order))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(order): Json<Order>,
) -> Result<Json<Order>> {
    Ok(Json(state.orders().update(id, order).await?))
}

/// Delete one order.
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Path(id): Path<OrderId>) -> Result<StatusCode> {
    state.orders().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Denormalized details projection of one order.
#[instrument(skip(state))]
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderDetailsView>> {
    Ok(Json(state.orders().details_view(id).await?))
}

/// The line items of one order.
#[instrument(skip(state))]
pub async fn lines(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<HashSet<LineItem>>> {
    Ok(Json(state.orders().find_line_items(id).await?))
}
