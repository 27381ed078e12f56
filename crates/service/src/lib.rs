//! Commerce Orders Service library.
//!
//! This crate provides the order-management HTTP service as a library,
//! allowing it to be tested and reused:
//! - [`config`] - Environment-driven configuration
//! - [`accounts`] - Remote account resolution with retry and instance
//!   discovery
//! - [`repository`] - Order persistence over in-memory relational-style
//!   tables
//! - [`orders`] - Order lifecycle operations
//! - [`routes`] - HTTP surface
//! - [`state`] - Shared application state
//! - [`error`] - Domain-to-HTTP error mapping

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod accounts;
pub mod config;
pub mod error;
pub mod orders;
pub mod repository;
pub mod routes;
pub mod state;
