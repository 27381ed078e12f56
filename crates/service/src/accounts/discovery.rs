//! Registry-based discovery of account service instances.
//!
//! The deployment registers account service instances under a logical
//! service name. The lookup client asks the registry for the first live
//! instance and falls back to its configured base URL when the registry
//! has nothing to offer, so a missing or empty registry never blocks
//! lookups.

use async_trait::async_trait;
use url::Url;

/// Directory of service instances keyed by logical service name.
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    /// Base URL of the first registered instance of `service_name`, if any.
    async fn first_instance(&self, service_name: &str) -> Option<Url>;
}

/// Registry backed by a fixed instance list from configuration.
#[derive(Debug, Clone)]
pub struct StaticInstanceRegistry {
    service_name: String,
    instances: Vec<Url>,
}

impl StaticInstanceRegistry {
    /// Create a registry serving `instances` under `service_name`.
    #[must_use]
    pub fn new(service_name: impl Into<String>, instances: Vec<Url>) -> Self {
        Self {
            service_name: service_name.into(),
            instances,
        }
    }
}

#[async_trait]
impl ServiceRegistry for StaticInstanceRegistry {
    async fn first_instance(&self, service_name: &str) -> Option<Url> {
        if self.service_name != service_name {
            return None;
        }
        self.instances.first().cloned()
    }
}
