//! Order-domain records.
//!
//! Plain serde values, not storage rows: ids are absent until the storage
//! layer assigns them, and entities reference each other by value here while
//! the storage layer keeps id-keyed tables with explicit foreign keys.
//! Field names serialize as camelCase for interoperability with the account
//! service's JSON representation.

pub mod account;
pub mod address;
pub mod details;
pub mod line_item;
pub mod order;

pub use account::Account;
pub use address::Address;
pub use details::OrderDetailsView;
pub use line_item::LineItem;
pub use order::Order;
