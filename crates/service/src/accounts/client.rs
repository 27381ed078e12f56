//! Account lookup client with bounded-retry resilience.
//!
//! # Retry contract
//!
//! | Outcome | Handling |
//! |---------|----------|
//! | Transport error | retry with doubling backoff |
//! | 5xx response | retry with doubling backoff |
//! | Undecodable success body | retry with doubling backoff |
//! | 4xx response | terminal, reported as not-found |
//! | Retries exhausted | reported as not-found |
//!
//! The default policy performs up to three retries after the initial
//! attempt, waiting 1s, 2s, then 4s. Decoded records that fail the
//! integrity checks (structural completeness, reference identity) are
//! never retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use commerce_orders_core::model::Account;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use url::Url;

use super::discovery::{ServiceRegistry, StaticInstanceRegistry};
use super::{AccountLookup, LookupError};
use crate::config::AccountServiceConfig;

/// Per-request timeout; a hung connection counts as a transport failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Retry policy for account lookups.
///
/// `max_retries` counts retries after the initial attempt, so the worst
/// case issues `max_retries + 1` requests.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Policy with explicit bounds. Tests use millisecond delays to avoid
    /// second-scale waits.
    #[must_use]
    pub const fn new(max_retries: u32, initial_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
        }
    }
}

/// Doubling backoff without jitter.
#[derive(Debug)]
struct ExponentialBackoff {
    attempt: u32,
    max_retries: u32,
    current_backoff: Duration,
}

impl ExponentialBackoff {
    const fn new(policy: RetryPolicy) -> Self {
        Self {
            attempt: 0,
            max_retries: policy.max_retries,
            current_backoff: policy.initial_backoff,
        }
    }

    /// Next delay, or `None` once retries are exhausted.
    fn next_backoff(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_retries {
            return None;
        }
        self.attempt += 1;
        let delay = self.current_backoff;
        self.current_backoff = self.current_backoff.saturating_mul(2);
        Some(delay)
    }
}

/// Single-attempt failure, classified for the retry loop.
#[derive(Debug)]
enum FetchFailure {
    /// 4xx response; the reference will never resolve on this path.
    Terminal { status: StatusCode },
    /// Transport error, 5xx, or an undecodable success body.
    Transient { reason: String },
}

/// HTTP client for the remote account service.
///
/// Base-address resolution asks the instance registry first and falls back
/// to the configured base URL, so a registry outage degrades to static
/// addressing instead of failing lookups outright.
#[derive(Clone)]
pub struct AccountServiceClient {
    http: reqwest::Client,
    base_url: Url,
    find_by_ref_path: String,
    service_name: String,
    registry: Arc<dyn ServiceRegistry>,
    retry: RetryPolicy,
}

impl AccountServiceClient {
    /// Build a client from configuration with the default retry policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &AccountServiceConfig) -> Result<Self, reqwest::Error> {
        Self::with_retry_policy(config, RetryPolicy::default())
    }

    /// Build a client with an explicit retry policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_retry_policy(
        config: &AccountServiceConfig,
        retry: RetryPolicy,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let registry = Arc::new(StaticInstanceRegistry::new(
            config.service_name.clone(),
            config.instances.clone(),
        ));

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            find_by_ref_path: config.find_by_ref_path.clone(),
            service_name: config.service_name.clone(),
            registry,
            retry,
        })
    }

    /// Resolve the base address for this lookup.
    async fn resolve_base(&self) -> Url {
        if let Some(instance) = self.registry.first_instance(&self.service_name).await {
            tracing::debug!(instance = %instance, "resolved account service instance from registry");
            return instance;
        }
        self.base_url.clone()
    }

    /// Substitute the reference into the path template and join onto `base`.
    fn build_lookup_url(&self, base: &Url, account_ref: &str) -> Result<Url, LookupError> {
        let path = self
            .find_by_ref_path
            .replace("{id}", &urlencoding::encode(account_ref));
        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| LookupError::InvalidArgument {
            reason: format!("malformed lookup URL {joined}: {e}"),
        })
    }

    /// Issue one GET and classify the outcome.
    async fn attempt_fetch(&self, url: &Url) -> Result<Account, FetchFailure> {
        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchFailure::Transient {
                reason: format!("transport error: {e}"),
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<Account>()
                .await
                .map_err(|e| FetchFailure::Transient {
                    reason: format!("undecodable account payload: {e}"),
                });
        }
        if status.is_client_error() {
            return Err(FetchFailure::Terminal { status });
        }
        Err(FetchFailure::Transient {
            reason: format!("account service returned {status}"),
        })
    }
}

#[async_trait]
impl AccountLookup for AccountServiceClient {
    #[tracing::instrument(skip(self))]
    async fn find_by_account_ref(&self, account_ref: &str) -> Result<Account, LookupError> {
        if account_ref.trim().is_empty() {
            return Err(LookupError::InvalidArgument {
                reason: "account reference must not be empty".to_string(),
            });
        }

        let base = self.resolve_base().await;
        let url = self.build_lookup_url(&base, account_ref)?;
        let mut backoff = ExponentialBackoff::new(self.retry);

        loop {
            match self.attempt_fetch(&url).await {
                Ok(account) => return verify_record(account, account_ref),
                Err(FetchFailure::Terminal { status }) => {
                    tracing::warn!(%status, "account lookup rejected by remote");
                    return Err(LookupError::NotFound {
                        reference: account_ref.to_string(),
                    });
                }
                Err(FetchFailure::Transient { reason }) => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            reason = %reason,
                            delay_ms = delay.as_millis(),
                            attempt = backoff.attempt,
                            "account lookup failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    tracing::error!(
                        reason = %reason,
                        attempts = backoff.attempt,
                        "account lookup retries exhausted"
                    );
                    return Err(LookupError::NotFound {
                        reference: account_ref.to_string(),
                    });
                }
            }
        }
    }
}

/// Integrity checks on a decoded account record.
///
/// The remote service is not trusted to return a complete record, nor the
/// record for the reference that was actually requested.
fn verify_record(account: Account, account_ref: &str) -> Result<Account, LookupError> {
    if is_blank(account.first_name.as_deref())
        || is_blank(account.last_name.as_deref())
        || is_blank(account.email_address.as_deref())
    {
        return Err(LookupError::InvalidArgument {
            reason: format!("account record for {account_ref} is missing name or contact fields"),
        });
    }
    if !account.has_addresses() {
        return Err(LookupError::InvalidArgument {
            reason: format!("account record for {account_ref} has no addresses"),
        });
    }
    if !account.account_ref_id.matches_ignore_case(account_ref) {
        tracing::warn!(
            expected = account_ref,
            received = %account.account_ref_id,
            "account service returned a record for a different reference"
        );
        return Err(LookupError::NotFound {
            reference: account_ref.to_string(),
        });
    }
    Ok(account)
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|s| s.trim().is_empty())
}
