//! End-to-end tests for the commerce orders service.
//!
//! Each test boots the full application on an ephemeral port with a mock
//! account service behind it, then drives it over real HTTP with `reqwest`.
//! No external processes or credentials are required.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p commerce-orders-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use commerce_orders_service::config::{AccountServiceConfig, ServiceConfig};
use commerce_orders_service::routes;
use commerce_orders_service::state::AppState;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// The account reference every fixture resolves.
pub const DUKE_REF: &str = "4f464483-a1f0-4ce9-a19e-3c0f23e84a67";

/// A fully wired service instance on an ephemeral port, backed by a mock
/// account service.
pub struct TestService {
    pub base_url: String,
    pub accounts: MockServer,
    pub client: reqwest::Client,
}

impl TestService {
    /// Boot the service against a fresh mock account service.
    ///
    /// # Panics
    ///
    /// Panics when the listener or application state cannot be set up.
    pub async fn start() -> Self {
        let accounts = MockServer::start().await;
        let config = ServiceConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            accounts: AccountServiceConfig {
                base_url: Url::parse(&accounts.uri()).expect("mock server uri"),
                find_by_ref_path: "/accounts/{id}".to_string(),
                service_name: "accounts-service".to_string(),
                instances: Vec::new(),
            },
        };

        let state = AppState::new(config).expect("Failed to initialize application state");
        let app = routes::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            accounts,
            client: reqwest::Client::new(),
        }
    }

    /// Absolute URL for a service path.
    #[must_use]
    pub fn url(&self, route: &str) -> String {
        format!("{}{route}", self.base_url)
    }

    /// Mount the canonical account record for [`DUKE_REF`].
    pub async fn mount_duke_account(&self) {
        Mock::given(method("GET"))
            .and(path(format!("/accounts/{DUKE_REF}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(duke_account_json()))
            .mount(&self.accounts)
            .await;
    }
}

/// The account record the mock account service serves for [`DUKE_REF`].
#[must_use]
pub fn duke_account_json() -> serde_json::Value {
    json!({
        "id": 1,
        "accountRefId": DUKE_REF,
        "firstName": "DukeFirstName",
        "lastName": "DukeLastName",
        "emailAddress": "dukefirst.last@enjoy.com",
        "addresses": [{
            "id": 100,
            "address1": "100",
            "city": "Food Forest City",
            "state": "FL",
            "postalCode": "33000",
            "country": "US"
        }]
    })
}

/// A create payload whose account passes validation but carries spoofed
/// identity fields; resolution replaces them with the mock's record.
#[must_use]
pub fn create_order_payload() -> serde_json::Value {
    json!({
        "account": {
            "accountRefId": DUKE_REF,
            "firstName": "Spoofed",
            "emailAddress": "spoofed@example.com",
            "addresses": [{"city": "Spoofed City"}]
        },
        "orderNumber": "ord-4f464483-0001",
        "orderDate": "2023-02-01T00:00:00Z",
        "lineItems": [
            {"productId": 1, "quantity": 2, "price": "10.00"},
            {"productId": 3, "quantity": 1, "price": "13.99"}
        ]
    })
}
