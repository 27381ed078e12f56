//! Postal address record.

use serde::{Deserialize, Serialize};

use crate::types::AddressId;

/// A postal address attached to an account or used as an order's shipping
/// address.
///
/// Every field is optional on the wire; the `Default` value is the empty
/// address record that the merge policy substitutes when neither the update
/// payload nor the persisted order carries a shipping address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    /// Storage-assigned id, absent until persisted.
    pub id: Option<AddressId>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    /// Marks the address as the shipping address of an order.
    pub shipping_address: bool,
}
