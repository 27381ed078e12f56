//! Core types for the orders domain.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod account_ref;
pub mod email;
pub mod id;

pub use account_ref::{AccountRef, AccountRefError};
pub use email::{Email, EmailError};
pub use id::*;
