//! Remote account service integration.
//!
//! Orders never embed trusted account data from the request payload; the
//! account reference on an incoming order is resolved here against the
//! account service, and the resolved record is what gets persisted.

pub mod client;
pub mod discovery;

pub use client::{AccountServiceClient, RetryPolicy};
pub use discovery::{ServiceRegistry, StaticInstanceRegistry};

use async_trait::async_trait;
use commerce_orders_core::OrderError;
use commerce_orders_core::model::Account;
use thiserror::Error;

/// Errors surfaced by account resolution.
///
/// Every lookup failure collapses into one of two outcomes: the caller (or
/// the remote payload) broke the lookup contract, or the reference does not
/// resolve to a usable account. Transport details stay inside the client;
/// retry exhaustion is reported as `NotFound`.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The lookup contract was violated; no amount of retrying helps.
    #[error("invalid account lookup: {reason}")]
    InvalidArgument { reason: String },

    /// The reference did not resolve to a usable account.
    #[error("no account found for reference {reference}")]
    NotFound { reference: String },
}

impl From<LookupError> for OrderError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::InvalidArgument { reason } => Self::InvalidAccount { reason },
            LookupError::NotFound { reference } => Self::AccountNotFound { reference },
        }
    }
}

/// Read-only resolution of an account reference to a full account record.
#[async_trait]
pub trait AccountLookup: Send + Sync {
    /// Resolve `account_ref` against the remote account service.
    async fn find_by_account_ref(&self, account_ref: &str) -> Result<Account, LookupError>;
}
