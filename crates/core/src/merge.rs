//! Update-merge semantics for partially specified order payloads.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::model::{Address, Order};

/// Merge an incoming update payload over a persisted order.
///
/// Field-by-field: a present incoming value wins, an absent one keeps the
/// persisted value. The persisted identity and timestamps always survive;
/// whatever the payload claims for them is ignored. Shipping address and
/// total fall back to an empty address and zero when neither side has a
/// value.
///
/// Line items never merge item-by-item. A non-empty incoming collection
/// replaces the persisted one wholesale when the persisted collection is
/// absent or itself non-empty; in every other case the persisted
/// collection (or an empty one, when both sides are absent) is kept.
#[must_use]
pub fn merge_for_update(existing: Order, incoming: Order) -> Order {
    let line_items = match (incoming.line_items, existing.line_items) {
        (None, None) => Some(HashSet::new()),
        (Some(inc), Some(ex)) if !inc.is_empty() && !ex.is_empty() => Some(inc),
        (Some(inc), None) if !inc.is_empty() => Some(inc),
        (_, ex) => ex,
    };

    Order {
        id: existing.id,
        account: incoming.account.or(existing.account),
        order_number: incoming.order_number.or(existing.order_number),
        order_date: incoming.order_date.or(existing.order_date),
        shipping_address: incoming
            .shipping_address
            .or(existing.shipping_address)
            .or_else(|| Some(Address::default())),
        total_price: incoming
            .total_price
            .or(existing.total_price)
            .or(Some(Decimal::ZERO)),
        line_items,
        created_at: existing.created_at,
        updated_at: existing.updated_at,
    }
}
