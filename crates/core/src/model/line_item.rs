//! Order line-item record.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{LineItemId, OrderId, ProductId};

/// One product/quantity/price tuple within an order.
///
/// Line items form a set keyed by natural content: equality and hashing use
/// the product id, quantity, and unit price, never the storage id and never
/// insertion order. The computed `line_total` is excluded as well, so the
/// aggregator may rewrite totals without disturbing set membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Storage-assigned id, absent until persisted.
    #[serde(default)]
    pub id: Option<LineItemId>,
    /// Owning order, absent until the order is persisted.
    #[serde(default)]
    pub order_id: Option<OrderId>,
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price of the product.
    #[serde(rename = "price")]
    pub unit_price: Decimal,
    /// Computed as unit price times quantity, never taken from input.
    #[serde(rename = "totalPrice", default)]
    pub line_total: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LineItem {
    /// Create a line item from its natural content.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            id: None,
            order_id: None,
            product_id,
            quantity,
            unit_price,
            line_total: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl PartialEq for LineItem {
    fn eq(&self, other: &Self) -> bool {
        self.product_id == other.product_id
            && self.quantity == other.quantity
            && self.unit_price == other.unit_price
    }
}

impl Eq for LineItem {}

impl Hash for LineItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.product_id.hash(state);
        self.quantity.hash(state);
        self.unit_price.hash(state);
    }
}
