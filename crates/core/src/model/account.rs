//! Customer account record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Address;
use crate::types::{AccountId, AccountRef};

/// A customer account as referenced by an order.
///
/// On creation the payload embeds a candidate account whose reference is
/// resolved against the remote account service; the resolved record is what
/// gets persisted with the order. The wire shape matches the account
/// service's JSON representation
/// (`{id, accountRefId, firstName, lastName, emailAddress, addresses[]}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Storage-assigned id, absent until persisted.
    #[serde(default)]
    pub id: Option<AccountId>,
    /// Natural key used for cross-service lookup.
    pub account_ref_id: AccountRef,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    /// Addresses on file for the account. At least one is required for an
    /// order to be created unless the order carries an explicit shipping
    /// address.
    #[serde(default)]
    pub addresses: Option<Vec<Address>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Account {
    /// A bare account carrying only its reference.
    #[must_use]
    pub const fn new(account_ref_id: AccountRef) -> Self {
        Self {
            id: None,
            account_ref_id,
            first_name: None,
            last_name: None,
            email_address: None,
            addresses: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether the account has at least one address on file.
    #[must_use]
    pub fn has_addresses(&self) -> bool {
        self.addresses.as_ref().is_some_and(|a| !a.is_empty())
    }
}
