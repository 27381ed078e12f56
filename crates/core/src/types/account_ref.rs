//! Account reference key type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`AccountRef`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum AccountRefError {
    /// The input string is empty.
    #[error("account reference cannot be empty")]
    Empty,
    /// The input string is too short.
    #[error("account reference must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// The input string is too long.
    #[error("account reference must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// The stable natural key identifying a customer account across services.
///
/// Distinct from the internal numeric account id: the reference travels on
/// the wire (order payloads, the remote account service) while the numeric
/// id is storage-local. Comparisons against remote responses are
/// case-insensitive, so two references that differ only in case name the
/// same account.
///
/// Wire values deserialize transparently; length bounds (6-255 characters)
/// are enforced by [`AccountRef::parse`] and re-checked as a storage
/// constraint before an account row is written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct AccountRef(String);

impl AccountRef {
    /// Minimum length of an account reference.
    pub const MIN_LENGTH: usize = 6;
    /// Maximum length of an account reference.
    pub const MAX_LENGTH: usize = 255;

    /// Parse an `AccountRef` from a string, enforcing length bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, shorter than 6 characters,
    /// or longer than 255 characters.
    pub fn parse(s: &str) -> Result<Self, AccountRefError> {
        if s.is_empty() {
            return Err(AccountRefError::Empty);
        }

        if s.len() < Self::MIN_LENGTH {
            return Err(AccountRefError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(AccountRefError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Re-run the length bounds against the current value.
    ///
    /// Used by the storage layer on values that arrived through transparent
    /// deserialization.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`AccountRef::parse`].
    pub fn validate(&self) -> Result<(), AccountRefError> {
        Self::parse(&self.0).map(|_| ())
    }

    /// Case-insensitive equality against a raw reference string.
    #[must_use]
    pub fn matches_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `AccountRef` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountRef {
    type Err = AccountRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for AccountRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
