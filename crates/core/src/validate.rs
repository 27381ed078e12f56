//! Order validation rules applied before account lookup and persistence.
//!
//! Validation is structural only. It never touches the network or the
//! store, so its failures map cleanly to bad-request responses.

use crate::error::OrderError;
use crate::model::Order;
use crate::types::Email;

/// Validate an incoming create-order payload.
///
/// Checks, in order:
/// 1. an account is attached,
/// 2. the account names at least one of first or last name,
/// 3. the account carries a well-formed email address,
/// 4. a shipping address is available, either on the account or on the
///    order itself.
///
/// Rules run in sequence and the first violation wins, so a payload with
/// several problems reports the earliest one.
pub fn validate_order(order: &Order) -> Result<(), OrderError> {
    let Some(account) = order.account.as_ref() else {
        return Err(OrderError::MissingAccount);
    };

    if is_empty(account.first_name.as_deref()) && is_empty(account.last_name.as_deref()) {
        return Err(OrderError::InvalidAccount {
            reason: "account must have a first or last name".to_string(),
        });
    }

    match account.email_address.as_deref() {
        None | Some("") => {
            return Err(OrderError::InvalidAccount {
                reason: "account must have an email address".to_string(),
            });
        }
        Some(raw) => {
            if let Err(e) = Email::parse(raw) {
                return Err(OrderError::InvalidAccount {
                    reason: format!("account email address is invalid: {e}"),
                });
            }
        }
    }

    if !account.has_addresses() && order.shipping_address.is_none() {
        return Err(OrderError::MissingAddress);
    }

    Ok(())
}

/// Absent or zero-length; whitespace counts as a provided value.
fn is_empty(value: Option<&str>) -> bool {
    matches!(value, None | Some(""))
}
