//! Order persistence.
//!
//! The store keeps arena tables keyed by numeric id with explicit
//! foreign-key columns, the way a relational schema would, instead of
//! nested object graphs. Saving decomposes an order into rows and loading
//! re-assembles it; replaced line items and shipping addresses are removed
//! with their parent, account rows are shared across orders and survive
//! order deletion. Shipping snapshots live apart from account address
//! books and always take store-allocated ids.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use commerce_orders_core::model::{Account, Address, LineItem, Order};
use commerce_orders_core::types::{AccountId, AccountRef, AddressId, LineItemId, OrderId, ProductId};
use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::RwLock;

/// Stored order numbers must fit the schema column.
const ORDER_NUMBER_MIN: usize = 10;
const ORDER_NUMBER_MAX: usize = 255;

/// Errors surfaced by the persistence layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A schema constraint rejected the write.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Stored rows are internally inconsistent.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Persistence surface consumed by the order service.
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Insert or update an order, returning the persisted form.
    async fn save(&self, order: Order) -> Result<Order, RepositoryError>;

    async fn exists_by_id(&self, id: OrderId) -> Result<bool, RepositoryError>;

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// All orders, ordered by id.
    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Delete by id. Deleting an absent id is not an error.
    async fn delete_by_id(&self, id: OrderId) -> Result<(), RepositoryError>;

    /// Orders referencing the account row, newest order date first.
    async fn find_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Order>, RepositoryError>;
}

#[derive(Debug, Clone)]
struct StoredOrder {
    id: i64,
    account_id: Option<i64>,
    order_number: String,
    order_date: DateTime<Utc>,
    shipping_address_id: Option<i64>,
    total_price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredAccount {
    id: i64,
    account_ref: AccountRef,
    first_name: Option<String>,
    last_name: Option<String>,
    email_address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Address row, shared by the account book and the shipping snapshot
/// table. `account_id` is set only for account-book rows; snapshot rows
/// are referenced from the order row instead.
#[derive(Debug, Clone)]
struct StoredAddress {
    id: i64,
    account_id: Option<i64>,
    address1: Option<String>,
    address2: Option<String>,
    city: Option<String>,
    state: Option<String>,
    province: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    shipping_address: bool,
}

#[derive(Debug, Clone)]
struct StoredLineItem {
    id: i64,
    order_id: i64,
    product_id: i64,
    quantity: u32,
    unit_price: Decimal,
    line_total: Option<Decimal>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    orders: HashMap<i64, StoredOrder>,
    accounts: HashMap<i64, StoredAccount>,
    addresses: HashMap<i64, StoredAddress>,
    shipping_addresses: HashMap<i64, StoredAddress>,
    line_items: HashMap<i64, StoredLineItem>,
    order_seq: i64,
    account_seq: i64,
    address_seq: i64,
    shipping_address_seq: i64,
    line_item_seq: i64,
}

impl Tables {
    /// Decompose and write an order. Constraint checks run before any
    /// mutation so a rejected write leaves no partial rows.
    fn store_order(&mut self, order: Order, now: DateTime<Utc>) -> Result<i64, RepositoryError> {
        let order_number = order
            .order_number
            .clone()
            .ok_or_else(|| constraint("order number is required"))?;
        let number_len = order_number.chars().count();
        if !(ORDER_NUMBER_MIN..=ORDER_NUMBER_MAX).contains(&number_len) {
            return Err(constraint(format!(
                "order number must be {ORDER_NUMBER_MIN} to {ORDER_NUMBER_MAX} characters, got {number_len}"
            )));
        }
        let order_date = order
            .order_date
            .ok_or_else(|| constraint("order date is required"))?;
        if order.id.is_none() && order.line_items.is_none() {
            return Err(constraint("a line item collection is required to create an order"));
        }
        if let Some(items) = &order.line_items {
            for item in items {
                if item.quantity == 0 {
                    return Err(constraint("line item quantity must be positive"));
                }
                if item.unit_price < Decimal::ZERO {
                    return Err(constraint("line item unit price must not be negative"));
                }
            }
        }
        if let Some(account) = &order.account {
            account
                .account_ref_id
                .validate()
                .map_err(|e| constraint(format!("account reference {e}")))?;
        }

        let (id, created_at, previous_shipping) = match order.id {
            Some(id) => {
                let id = id.as_i64();
                self.order_seq = self.order_seq.max(id);
                self.orders.get(&id).map_or((id, now, None), |existing| {
                    (id, existing.created_at, existing.shipping_address_id)
                })
            }
            None => (next_id(&mut self.order_seq), now, None),
        };

        let account_id = order
            .account
            .as_ref()
            .map(|account| self.upsert_account(account, now));
        let shipping_address_id =
            self.replace_shipping_address(previous_shipping, order.shipping_address.as_ref());
        if let Some(items) = order.line_items.as_ref() {
            self.replace_line_items(id, items, now);
        }

        self.orders.insert(
            id,
            StoredOrder {
                id,
                account_id,
                order_number,
                order_date,
                shipping_address_id,
                total_price: order.total_price.unwrap_or(Decimal::ZERO),
                created_at,
                updated_at: now,
            },
        );
        Ok(id)
    }

    /// Write the account row and its address book, keyed by the account's
    /// own id when it carries one so repeat saves share the row.
    fn upsert_account(&mut self, account: &Account, now: DateTime<Utc>) -> i64 {
        let id = match account.id {
            Some(id) => {
                let id = id.as_i64();
                self.account_seq = self.account_seq.max(id);
                id
            }
            None => next_id(&mut self.account_seq),
        };
        let created_at = self.accounts.get(&id).map_or(now, |row| row.created_at);
        self.accounts.insert(
            id,
            StoredAccount {
                id,
                account_ref: account.account_ref_id.clone(),
                first_name: account.first_name.clone(),
                last_name: account.last_name.clone(),
                email_address: account.email_address.clone(),
                created_at,
                updated_at: now,
            },
        );
        if let Some(addresses) = account.addresses.as_ref() {
            self.replace_account_addresses(id, addresses);
        }
        id
    }

    fn replace_account_addresses(&mut self, account_id: i64, addresses: &[Address]) {
        self.addresses
            .retain(|_, row| row.account_id != Some(account_id));
        for address in addresses {
            let id = match address.id {
                Some(id) => {
                    let id = id.as_i64();
                    self.address_seq = self.address_seq.max(id);
                    id
                }
                None => next_id(&mut self.address_seq),
            };
            self.addresses
                .insert(id, address_row(id, Some(account_id), address));
        }
    }

    /// Replace the order's shipping snapshot. Snapshot rows always take a
    /// store-allocated id; the payload's address id may name an
    /// account-book row and never keys a snapshot.
    fn replace_shipping_address(
        &mut self,
        previous: Option<i64>,
        address: Option<&Address>,
    ) -> Option<i64> {
        if let Some(old) = previous {
            self.shipping_addresses.remove(&old);
        }
        address.map(|address| {
            let id = next_id(&mut self.shipping_address_seq);
            self.shipping_addresses
                .insert(id, address_row(id, None, address));
            id
        })
    }

    /// Replace the order's line item rows wholesale; rows dropped from the
    /// incoming set are removed.
    fn replace_line_items(&mut self, order_id: i64, items: &HashSet<LineItem>, now: DateTime<Utc>) {
        self.line_items.retain(|_, row| row.order_id != order_id);
        for item in items {
            let id = match item.id {
                Some(id) => {
                    let id = id.as_i64();
                    self.line_item_seq = self.line_item_seq.max(id);
                    id
                }
                None => next_id(&mut self.line_item_seq),
            };
            self.line_items.insert(
                id,
                StoredLineItem {
                    id,
                    order_id,
                    product_id: item.product_id.as_i64(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    line_total: item.line_total,
                    created_at: now,
                    updated_at: now,
                },
            );
        }
    }

    fn remove_order(&mut self, id: i64) {
        let Some(row) = self.orders.remove(&id) else {
            return;
        };
        if let Some(address_id) = row.shipping_address_id {
            self.shipping_addresses.remove(&address_id);
        }
        self.line_items.retain(|_, item| item.order_id != id);
    }

    fn hydrate_order(&self, row: &StoredOrder) -> Result<Order, RepositoryError> {
        let account = row
            .account_id
            .map(|account_id| self.hydrate_account(row.id, account_id))
            .transpose()?;
        let shipping_address = match row.shipping_address_id {
            Some(address_id) => {
                let address = self.shipping_addresses.get(&address_id).ok_or_else(|| {
                    RepositoryError::DataCorruption(format!(
                        "order {} references missing shipping address row {address_id}",
                        row.id
                    ))
                })?;
                Some(hydrate_address(address))
            }
            None => None,
        };
        let line_items: HashSet<LineItem> = self
            .line_items
            .values()
            .filter(|item| item.order_id == row.id)
            .map(hydrate_line_item)
            .collect();

        Ok(Order {
            id: Some(OrderId::new(row.id)),
            account,
            order_number: Some(row.order_number.clone()),
            order_date: Some(row.order_date),
            shipping_address,
            total_price: Some(row.total_price),
            line_items: Some(line_items),
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        })
    }

    fn hydrate_account(&self, order_id: i64, account_id: i64) -> Result<Account, RepositoryError> {
        let row = self.accounts.get(&account_id).ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "order {order_id} references missing account row {account_id}"
            ))
        })?;
        let mut address_rows: Vec<&StoredAddress> = self
            .addresses
            .values()
            .filter(|address| address.account_id == Some(account_id))
            .collect();
        address_rows.sort_by_key(|address| address.id);

        Ok(Account {
            id: Some(AccountId::new(row.id)),
            account_ref_id: row.account_ref.clone(),
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            email_address: row.email_address.clone(),
            addresses: Some(address_rows.into_iter().map(hydrate_address).collect()),
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        })
    }
}

/// In-memory arena store.
#[derive(Debug, Default)]
pub struct InMemoryOrdersStore {
    tables: RwLock<Tables>,
}

impl InMemoryOrdersStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrdersRepository for InMemoryOrdersStore {
    async fn save(&self, order: Order) -> Result<Order, RepositoryError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let id = tables.store_order(order, now)?;
        let row = tables.orders.get(&id).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("order {id} vanished during save"))
        })?;
        tables.hydrate_order(row)
    }

    async fn exists_by_id(&self, id: OrderId) -> Result<bool, RepositoryError> {
        Ok(self.tables.read().await.orders.contains_key(&id.as_i64()))
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .orders
            .get(&id.as_i64())
            .map(|row| tables.hydrate_order(row))
            .transpose()
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&StoredOrder> = tables.orders.values().collect();
        rows.sort_by_key(|row| row.id);
        rows.into_iter()
            .map(|row| tables.hydrate_order(row))
            .collect()
    }

    async fn delete_by_id(&self, id: OrderId) -> Result<(), RepositoryError> {
        self.tables.write().await.remove_order(id.as_i64());
        Ok(())
    }

    async fn find_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&StoredOrder> = tables
            .orders
            .values()
            .filter(|row| row.account_id == Some(account_id.as_i64()))
            .collect();
        rows.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        rows.into_iter()
            .map(|row| tables.hydrate_order(row))
            .collect()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn next_id(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

fn constraint(message: impl Into<String>) -> RepositoryError {
    RepositoryError::Constraint(message.into())
}

fn address_row(id: i64, account_id: Option<i64>, address: &Address) -> StoredAddress {
    StoredAddress {
        id,
        account_id,
        address1: address.address1.clone(),
        address2: address.address2.clone(),
        city: address.city.clone(),
        state: address.state.clone(),
        province: address.province.clone(),
        postal_code: address.postal_code.clone(),
        country: address.country.clone(),
        shipping_address: address.shipping_address,
    }
}

fn hydrate_address(row: &StoredAddress) -> Address {
    Address {
        id: Some(AddressId::new(row.id)),
        address1: row.address1.clone(),
        address2: row.address2.clone(),
        city: row.city.clone(),
        state: row.state.clone(),
        province: row.province.clone(),
        postal_code: row.postal_code.clone(),
        country: row.country.clone(),
        shipping_address: row.shipping_address,
    }
}

fn hydrate_line_item(row: &StoredLineItem) -> LineItem {
    LineItem {
        id: Some(LineItemId::new(row.id)),
        order_id: Some(OrderId::new(row.order_id)),
        product_id: ProductId::new(row.product_id),
        quantity: row.quantity,
        unit_price: row.unit_price,
        line_total: row.line_total,
        created_at: Some(row.created_at),
        updated_at: Some(row.updated_at),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use super::*;

    const DUKE_REF: &str = "4f464483-a1f0-4ce9-a19e-3c0f23e84a67";

    fn duke_account() -> Account {
        Account {
            id: Some(AccountId::new(1)),
            first_name: Some("Duke".to_string()),
            last_name: Some("Java".to_string()),
            email_address: Some("duke.java@example.com".to_string()),
            addresses: Some(vec![Address {
                id: Some(AddressId::new(100)),
                address1: Some("100 Main St".to_string()),
                city: Some("Food Forest City".to_string()),
                postal_code: Some("33000".to_string()),
                shipping_address: true,
                ..Address::default()
            }]),
            ..Account::new(AccountRef::parse(DUKE_REF).unwrap())
        }
    }

    fn base_order() -> Order {
        Order {
            account: Some(duke_account()),
            order_number: Some("ord-4f464483-0001".to_string()),
            order_date: Some(Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap()),
            total_price: Some(dec!(33.99)),
            line_items: Some(
                [
                    LineItem::new(ProductId::new(1), 2, dec!(10.00)),
                    LineItem::new(ProductId::new(3), 1, dec!(13.99)),
                ]
                .into_iter()
                .collect(),
            ),
            ..Order::default()
        }
    }

    #[tokio::test]
    async fn test_save_assigns_ids_and_round_trips() {
        let store = InMemoryOrdersStore::new();

        let saved = store.save(base_order()).await.unwrap();
        let id = saved.id.unwrap();

        assert!(store.exists_by_id(id).await.unwrap());
        let loaded = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(loaded.order_number.as_deref(), Some("ord-4f464483-0001"));
        assert_eq!(loaded.total_price, Some(dec!(33.99)));
        assert_eq!(loaded.line_items.as_ref().unwrap().len(), 2);
        assert!(loaded.created_at.is_some());

        let account = loaded.account.unwrap();
        assert_eq!(account.id, Some(AccountId::new(1)));
        assert_eq!(account.account_ref_id.as_str(), DUKE_REF);
        assert_eq!(account.addresses.unwrap().len(), 1);

        // Line items pick up their row ids and parent id.
        let items = loaded.line_items.unwrap();
        assert!(items.iter().all(|item| item.id.is_some()));
        assert!(items.iter().all(|item| item.order_id == Some(id)));
    }

    #[tokio::test]
    async fn test_missing_order_number_is_rejected() {
        let store = InMemoryOrdersStore::new();
        let mut order = base_order();
        order.order_number = None;

        let err = store.save(order).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_short_order_number_is_rejected() {
        let store = InMemoryOrdersStore::new();
        let mut order = base_order();
        order.order_number = Some("short".to_string());

        let err = store.save(order).await.unwrap_err();
        assert!(err.to_string().contains("order number"));
    }

    #[tokio::test]
    async fn test_create_requires_line_item_collection() {
        let store = InMemoryOrdersStore::new();
        let mut order = base_order();
        order.line_items = None;

        let err = store.save(order).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Constraint(_)));

        // An empty collection is acceptable; only absence is not.
        let mut order = base_order();
        order.line_items = Some(HashSet::new());
        assert!(store.save(order).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_may_omit_line_item_collection() {
        let store = InMemoryOrdersStore::new();
        let saved = store.save(base_order()).await.unwrap();

        let mut update = saved.clone();
        update.line_items = None;
        let updated = store.save(update).await.unwrap();

        // Existing rows survive an update that does not touch them.
        assert_eq!(updated.line_items.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_zero_quantity_is_rejected() {
        let store = InMemoryOrdersStore::new();
        let mut order = base_order();
        order.line_items = Some(
            [LineItem::new(ProductId::new(1), 0, dec!(10.00))]
                .into_iter()
                .collect(),
        );

        let err = store.save(order).await.unwrap_err();
        assert!(err.to_string().contains("quantity"));
    }

    #[tokio::test]
    async fn test_negative_unit_price_is_rejected() {
        let store = InMemoryOrdersStore::new();
        let mut order = base_order();
        order.line_items = Some(
            [LineItem::new(ProductId::new(1), 1, dec!(-0.01))]
                .into_iter()
                .collect(),
        );

        let err = store.save(order).await.unwrap_err();
        assert!(err.to_string().contains("unit price"));
    }

    #[tokio::test]
    async fn test_rejected_write_leaves_no_partial_rows() {
        let store = InMemoryOrdersStore::new();
        let mut order = base_order();
        order.order_number = Some("short".to_string());

        let _ = store.save(order).await.unwrap_err();

        let tables = store.tables.read().await;
        assert!(tables.orders.is_empty());
        assert!(tables.accounts.is_empty());
        assert!(tables.addresses.is_empty());
        assert!(tables.shipping_addresses.is_empty());
        assert!(tables.line_items.is_empty());
    }

    #[tokio::test]
    async fn test_timestamps_are_write_once_then_monotonic() {
        let store = InMemoryOrdersStore::new();
        let saved = store.save(base_order()).await.unwrap();
        let created = saved.created_at.unwrap();

        let updated = store.save(saved).await.unwrap();
        assert_eq!(updated.created_at, Some(created));
        assert!(updated.updated_at.unwrap() >= created);
    }

    #[tokio::test]
    async fn test_line_item_replacement_removes_orphans() {
        let store = InMemoryOrdersStore::new();
        let saved = store.save(base_order()).await.unwrap();
        let id = saved.id.unwrap();

        let mut update = saved;
        update.line_items = Some(
            [LineItem::new(ProductId::new(9), 1, dec!(5.00))]
                .into_iter()
                .collect(),
        );
        store.save(update).await.unwrap();

        let loaded = store.find_by_id(id).await.unwrap().unwrap();
        let items = loaded.line_items.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(store.tables.read().await.line_items.len(), 1);
    }

    #[tokio::test]
    async fn test_orders_for_the_same_account_share_its_row() {
        let store = InMemoryOrdersStore::new();
        store.save(base_order()).await.unwrap();

        let mut second = base_order();
        second.order_number = Some("ord-4f464483-0002".to_string());
        store.save(second).await.unwrap();

        assert_eq!(store.tables.read().await.accounts.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_cascades() {
        let store = InMemoryOrdersStore::new();
        let saved = store.save(base_order()).await.unwrap();
        let id = saved.id.unwrap();

        store.delete_by_id(id).await.unwrap();
        assert!(!store.exists_by_id(id).await.unwrap());
        assert!(store.tables.read().await.line_items.is_empty());
        // The shared account row outlives the order.
        assert_eq!(store.tables.read().await.accounts.len(), 1);

        // Second delete of the same id is a no-op.
        store.delete_by_id(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_all_orders_by_id() {
        let store = InMemoryOrdersStore::new();
        for suffix in ["0001", "0002", "0003"] {
            let mut order = base_order();
            order.order_number = Some(format!("ord-4f464483-{suffix}"));
            store.save(order).await.unwrap();
        }

        let all = store.find_all().await.unwrap();
        let ids: Vec<i64> = all.iter().map(|o| o.id.unwrap().as_i64()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_find_for_account_sorts_newest_first() {
        let store = InMemoryOrdersStore::new();
        for (suffix, day) in [("0001", 1), ("0002", 15), ("0003", 7)] {
            let mut order = base_order();
            order.order_number = Some(format!("ord-4f464483-{suffix}"));
            order.order_date = Some(Utc.with_ymd_and_hms(2023, 2, day, 0, 0, 0).unwrap());
            store.save(order).await.unwrap();
        }

        let orders = store
            .find_for_account(AccountId::new(1))
            .await
            .unwrap();
        let numbers: Vec<&str> = orders
            .iter()
            .map(|o| o.order_number.as_deref().unwrap())
            .collect();
        assert_eq!(
            numbers,
            vec!["ord-4f464483-0002", "ord-4f464483-0003", "ord-4f464483-0001"]
        );
    }

    #[tokio::test]
    async fn test_find_for_unknown_account_is_empty() {
        let store = InMemoryOrdersStore::new();
        store.save(base_order()).await.unwrap();

        let orders = store.find_for_account(AccountId::new(99)).await.unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_order_without_account_is_storable() {
        // Account presence is a service-level rule, not a schema rule.
        let store = InMemoryOrdersStore::new();
        let mut order = base_order();
        order.account = None;

        let saved = store.save(order).await.unwrap();
        assert!(saved.account.is_none());
    }

    #[tokio::test]
    async fn test_invalid_account_reference_is_rejected() {
        let store = InMemoryOrdersStore::new();
        let mut order = base_order();
        let mut account = duke_account();
        // Transparent deserialization lets out-of-bounds refs in; the write
        // path must re-check them.
        account.account_ref_id = serde_json::from_str("\"abc\"").unwrap();
        order.account = Some(account);

        let err = store.save(order).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_shipping_address_row_is_replaced_not_leaked() {
        let store = InMemoryOrdersStore::new();
        let mut order = base_order();
        order.shipping_address = Some(Address {
            city: Some("Food Forest City".to_string()),
            shipping_address: true,
            ..Address::default()
        });
        let saved = store.save(order).await.unwrap();

        let mut update = saved.clone();
        update.shipping_address = Some(Address {
            city: Some("Porto".to_string()),
            shipping_address: true,
            ..Address::default()
        });
        let updated = store.save(update).await.unwrap();
        assert_eq!(
            updated.shipping_address.unwrap().city.as_deref(),
            Some("Porto")
        );

        // One shipping snapshot plus the untouched account-book row.
        let tables = store.tables.read().await;
        assert_eq!(tables.shipping_addresses.len(), 1);
        assert_eq!(tables.addresses.len(), 1);
    }

    #[tokio::test]
    async fn test_shipping_address_reusing_the_account_address_keeps_the_book() {
        // One address record can arrive in both positions, carrying the
        // account-book id as the shipping address id.
        let store = InMemoryOrdersStore::new();
        let mut order = base_order();
        order.shipping_address = Some(Address {
            id: Some(AddressId::new(100)),
            address1: Some("100 Main St".to_string()),
            city: Some("Food Forest City".to_string()),
            shipping_address: true,
            ..Address::default()
        });

        let saved = store.save(order).await.unwrap();
        let id = saved.id.unwrap();
        assert_eq!(saved.account.unwrap().addresses.unwrap().len(), 1);
        // The snapshot row gets its own id instead of the payload's.
        let snapshot_id = saved.shipping_address.unwrap().id.unwrap();
        assert_ne!(snapshot_id, AddressId::new(100));

        // A remote address-book change must not strand the snapshot.
        let mut update = store.find_by_id(id).await.unwrap().unwrap();
        let mut account = update.account.take().unwrap();
        account.addresses = Some(vec![Address {
            id: Some(AddressId::new(200)),
            city: Some("Porto".to_string()),
            ..Address::default()
        }]);
        update.account = Some(account);
        store.save(update).await.unwrap();

        let loaded = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(
            loaded.shipping_address.unwrap().city.as_deref(),
            Some("Food Forest City")
        );
        assert_eq!(store.find_all().await.unwrap().len(), 1);

        // Deleting the order removes the snapshot, never the book.
        store.delete_by_id(id).await.unwrap();
        let tables = store.tables.read().await;
        assert!(tables.shipping_addresses.is_empty());
        assert_eq!(tables.addresses.len(), 1);
    }
}
