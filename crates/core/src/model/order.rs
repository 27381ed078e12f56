//! Order aggregate record.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{Account, Address, LineItem};
use crate::types::OrderId;

/// An order together with its embedded account, shipping address, and line
/// items. The unit of persistence.
///
/// Most fields are optional at this level so the same shape serves create
/// payloads, partial update payloads, and persisted aggregates; presence of
/// the required fields is enforced by the validator and by storage
/// constraints, not by the wire shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Order {
    /// Storage-assigned id, absent until persisted.
    pub id: Option<OrderId>,
    /// The owning account. Required by validation at create time.
    pub account: Option<Account>,
    /// Human-facing order number, 10-255 characters, required by storage.
    pub order_number: Option<String>,
    pub order_date: Option<DateTime<Utc>>,
    pub shipping_address: Option<Address>,
    /// Derived sum of line totals, recomputed on create, never trusted from
    /// input.
    pub total_price: Option<Decimal>,
    /// The order's line items, keyed by natural content.
    pub line_items: Option<HashSet<LineItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Whether the order carries at least one line item.
    #[must_use]
    pub fn has_line_items(&self) -> bool {
        self.line_items.as_ref().is_some_and(|items| !items.is_empty())
    }
}
