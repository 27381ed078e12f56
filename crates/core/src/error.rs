//! Domain error taxonomy for order operations.

use thiserror::Error;

use crate::types::OrderId;

/// Errors raised by order validation, account resolution, and persistence.
///
/// Validation and lookup failures are terminal for the current request and
/// are never retried above the lookup client's own retry loop. Persistence
/// failures are surfaced distinctly and never reinterpreted as validation
/// failures. None of these variants carry a transport status; the HTTP
/// boundary owns that mapping.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order carries no account at all.
    #[error("a valid account is required to create an order")]
    MissingAccount,

    /// The account is present but fails identity or contact checks, or the
    /// remote lookup returned a structurally unusable record.
    #[error("invalid account: {reason}")]
    InvalidAccount {
        /// Which check rejected the account.
        reason: String,
    },

    /// Neither the account nor the order carries a usable address.
    #[error("an account address or a shipping address is required to create an order")]
    MissingAddress,

    /// A line total or the order total left the representable price range.
    #[error("order total exceeds the representable price range")]
    TotalOverflow,

    /// The remote account service reported absence, returned a mismatched
    /// identity, or exhausted the retry budget without a decodable success.
    #[error("account not found for reference {reference}")]
    AccountNotFound {
        /// The reference that failed to resolve.
        reference: String,
    },

    /// An id-based order read missed.
    #[error("order not found for id {id}")]
    OrderNotFound {
        /// The id that missed.
        id: OrderId,
    },

    /// The storage layer rejected the write or failed outright.
    #[error("order could not be persisted: {0}")]
    PersistenceFailure(String),
}
