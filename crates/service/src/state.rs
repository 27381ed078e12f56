//! Application state shared across handlers.

use std::sync::Arc;

use crate::accounts::AccountServiceClient;
use crate::config::ServiceConfig;
use crate::orders::OrderService;
use crate::repository::InMemoryOrdersStore;

/// Error assembling application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The account-service HTTP client could not be built.
    #[error("account service client error: {0}")]
    AccountClient(#[from] reqwest::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// order service and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServiceConfig,
    orders: OrderService,
}

impl AppState {
    /// Create application state from configuration, wiring the order service
    /// to an empty in-memory store and the remote account client.
    ///
    /// # Errors
    ///
    /// Returns an error if the account-service HTTP client cannot be built.
    pub fn new(config: ServiceConfig) -> Result<Self, StateError> {
        let client = AccountServiceClient::new(&config.accounts)?;
        let orders = OrderService::new(Arc::new(InMemoryOrdersStore::new()), Arc::new(client));

        Ok(Self {
            inner: Arc::new(AppStateInner { config, orders }),
        })
    }

    /// State wired to a prebuilt order service, for handler tests.
    #[cfg(test)]
    pub(crate) fn with_orders(config: ServiceConfig, orders: OrderService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, orders }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    /// Get a reference to the order service.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }
}
