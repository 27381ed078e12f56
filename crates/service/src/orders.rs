//! Order operations.
//!
//! [`OrderService`] drives the order lifecycle against the persistence and
//! account-lookup seams. Creation validates the payload, resolves its account
//! against the remote account service, recomputes every total, and persists
//! the result; the payload's own account fields and prices are never stored
//! as-is. Updates merge the incoming payload into the persisted order and
//! save what the merge produced, without re-resolving the account or
//! re-pricing.

use std::collections::HashSet;
use std::sync::Arc;

use commerce_orders_core::error::OrderError;
use commerce_orders_core::merge::merge_for_update;
use commerce_orders_core::model::{LineItem, Order, OrderDetailsView};
use commerce_orders_core::totals::aggregate_totals;
use commerce_orders_core::types::{AccountId, OrderId};
use commerce_orders_core::validate::validate_order;

use crate::accounts::AccountLookup;
use crate::repository::{OrdersRepository, RepositoryError};

/// Order lifecycle operations over pluggable storage and account lookup.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrdersRepository>,
    accounts: Arc<dyn AccountLookup>,
}

impl OrderService {
    #[must_use]
    pub fn new(store: Arc<dyn OrdersRepository>, accounts: Arc<dyn AccountLookup>) -> Self {
        Self { store, accounts }
    }

    /// Validate, resolve the account, price, and persist a new order.
    ///
    /// The persisted account is the record the account service returned, not
    /// the one the payload carried; the payload account only has to pass
    /// validation and supply the reference to resolve.
    ///
    /// # Errors
    ///
    /// Returns validation errors for an unusable payload,
    /// [`OrderError::AccountNotFound`] when the reference does not resolve,
    /// [`OrderError::TotalOverflow`] when repricing leaves the representable
    /// range, and [`OrderError::PersistenceFailure`] when storage rejects
    /// the write.
    #[tracing::instrument(skip(self, order))]
    pub async fn create(&self, mut order: Order) -> Result<Order, OrderError> {
        validate_order(&order)?;
        let Some(account) = order.account.as_ref() else {
            return Err(OrderError::MissingAccount);
        };

        let resolved = self
            .accounts
            .find_by_account_ref(account.account_ref_id.as_str())
            .await?;
        order.account = Some(resolved);

        aggregate_totals(&mut order)?;

        let saved = self
            .store
            .save(order)
            .await
            .map_err(persistence_failure)?;
        if let Some(id) = saved.id {
            tracing::info!(order_id = %id, "order created");
        }
        Ok(saved)
    }

    /// Merge an update payload into the persisted order and save the result.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::OrderNotFound`] when no order exists for `id`
    /// and [`OrderError::PersistenceFailure`] when storage rejects the write.
    #[tracing::instrument(skip(self, incoming))]
    pub async fn update(&self, id: OrderId, incoming: Order) -> Result<Order, OrderError> {
        let existing = self.find_by_id(id).await?;
        let merged = merge_for_update(existing, incoming);

        let saved = self
            .store
            .save(merged)
            .await
            .map_err(persistence_failure)?;
        tracing::info!(order_id = %id, "order updated");
        Ok(saved)
    }

    /// Delete an order. Deleting an id that does not exist is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::PersistenceFailure`] when storage fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: OrderId) -> Result<(), OrderError> {
        self.store
            .delete_by_id(id)
            .await
            .map_err(persistence_failure)?;
        tracing::info!(order_id = %id, "order deleted");
        Ok(())
    }

    /// Load one order by id.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::OrderNotFound`] when no order exists for `id`.
    pub async fn find_by_id(&self, id: OrderId) -> Result<Order, OrderError> {
        if !self
            .store
            .exists_by_id(id)
            .await
            .map_err(persistence_failure)?
        {
            return Err(OrderError::OrderNotFound { id });
        }
        self.store
            .find_by_id(id)
            .await
            .map_err(persistence_failure)?
            .ok_or(OrderError::OrderNotFound { id })
    }

    /// All orders, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::PersistenceFailure`] when storage fails.
    pub async fn find_all(&self) -> Result<Vec<Order>, OrderError> {
        self.store.find_all().await.map_err(persistence_failure)
    }

    /// Orders belonging to one account, newest order date first.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::PersistenceFailure`] when storage fails.
    pub async fn find_for_account(&self, account_id: AccountId) -> Result<Vec<Order>, OrderError> {
        self.store
            .find_for_account(account_id)
            .await
            .map_err(persistence_failure)
    }

    /// The line items of one order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::OrderNotFound`] when no order exists for `id`.
    pub async fn find_line_items(&self, id: OrderId) -> Result<HashSet<LineItem>, OrderError> {
        let order = self.find_by_id(id).await?;
        Ok(order.line_items.unwrap_or_default())
    }

    /// The denormalized details projection of one order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::OrderNotFound`] when no order exists for `id`.
    pub async fn details_view(&self, id: OrderId) -> Result<OrderDetailsView, OrderError> {
        let order = self.find_by_id(id).await?;
        Ok(OrderDetailsView::assemble(id, &order))
    }
}

fn persistence_failure(err: RepositoryError) -> OrderError {
    OrderError::PersistenceFailure(err.to_string())
}
