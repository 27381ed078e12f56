//! Line-total and order-total computation.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::error::OrderError;
use crate::model::{LineItem, Order};

/// Recompute every line total and the order total in place.
///
/// Each line total is `unit_price * quantity`; the order total is the sum
/// over all line items. Client-supplied totals are overwritten, which makes
/// the pass idempotent: a second run is a no-op. An order without line
/// items totals to zero.
///
/// # Errors
///
/// Returns [`OrderError::TotalOverflow`] when a line total or the running
/// sum leaves the representable price range.
pub fn aggregate_totals(order: &mut Order) -> Result<(), OrderError> {
    let mut total = Decimal::ZERO;
    if let Some(items) = order.line_items.take() {
        // Identity ignores line totals, so rewriting them cannot merge
        // two distinct items during the re-collect.
        let priced = items
            .into_iter()
            .map(|mut item| {
                let line_total = item
                    .unit_price
                    .checked_mul(Decimal::from(item.quantity))
                    .ok_or(OrderError::TotalOverflow)?;
                total = total
                    .checked_add(line_total)
                    .ok_or(OrderError::TotalOverflow)?;
                item.line_total = Some(line_total);
                Ok(item)
            })
            .collect::<Result<HashSet<LineItem>, OrderError>>()?;
        order.line_items = Some(priced);
    }
    order.total_price = Some(total);
    Ok(())
}
