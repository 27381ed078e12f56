//! Commerce Orders Core - Shared order-domain library.
//!
//! This crate provides the domain model and the pure rules of the orders
//! service:
//! - [`model`] - Order, account, address, and line-item records plus the
//!   read-only order-details projection
//! - [`types`] - Newtype wrappers for type-safe IDs, email addresses, and
//!   account reference keys
//! - [`validate`] - Pre-persistence order validation
//! - [`totals`] - Line-item and order total computation
//! - [`merge`] - Default-preserving merge of update payloads into persisted
//!   orders
//!
//! # Architecture
//!
//! The core crate contains only data and rules - no I/O, no storage, no HTTP
//! clients. Remote account resolution and persistence live in the service
//! crate and consume these types.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod merge;
pub mod model;
pub mod totals;
pub mod types;
pub mod validate;

pub use error::OrderError;
pub use model::*;
pub use types::*;
