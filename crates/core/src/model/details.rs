//! Read-only order-details projection.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{Address, LineItem, Order};
use crate::types::OrderId;

/// Placeholder order number for persisted orders that never got one.
const NO_VALUE: &str = "N/A";

/// A read-only projection combining order number, shipping-address snapshot,
/// computed total, and line items. Assembled on demand from a persisted
/// order, never persisted itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailsView {
    pub order_id: OrderId,
    /// Defaults to `"N/A"` when the order carries no number.
    pub order_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
    /// Defaults to zero when the order carries no computed total.
    pub total_price: Decimal,
    pub line_items: HashSet<LineItem>,
}

impl OrderDetailsView {
    /// Assemble the projection for a persisted order.
    #[must_use]
    pub fn assemble(order_id: OrderId, order: &Order) -> Self {
        Self {
            order_id,
            order_number: order
                .order_number
                .clone()
                .unwrap_or_else(|| NO_VALUE.to_string()),
            shipping_address: order.shipping_address.clone(),
            total_price: order.total_price.unwrap_or(Decimal::ZERO),
            line_items: order.line_items.clone().unwrap_or_default(),
        }
    }
}
