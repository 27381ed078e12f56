//! Remote account resolution as observed at the HTTP surface.
//!
//! The mock account service stands in for the real one; these tests pin the
//! externally visible contract: definitive absence is terminal, identity
//! mismatches and unusable records are surfaced, and matching is
//! case-insensitive.

use commerce_orders_integration_tests::{
    DUKE_REF, TestService, create_order_payload, duke_account_json,
};
use reqwest::StatusCode;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_unknown_reference_is_not_found_without_retrying() {
    let svc = TestService::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/accounts/{DUKE_REF}")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&svc.accounts)
        .await;

    let resp = svc
        .client
        .post(svc.url("/orders"))
        .json(&create_order_payload())
        .send()
        .await
        .expect("Failed to create order");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("Failed to read body");
    assert_eq!(
        body["message"],
        format!("account not found for reference {DUKE_REF}")
    );

    // Definitive absence is terminal; exactly one lookup went out.
    let requests = svc
        .accounts
        .received_requests()
        .await
        .expect("request recording");
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_record_with_mismatched_reference_is_not_found() {
    let svc = TestService::start().await;
    let mut record = duke_account_json();
    record["accountRefId"] = json!("some-other-reference");
    Mock::given(method("GET"))
        .and(path(format!("/accounts/{DUKE_REF}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(record))
        .mount(&svc.accounts)
        .await;

    let resp = svc
        .client
        .post(svc.url("/orders"))
        .json(&create_order_payload())
        .send()
        .await
        .expect("Failed to create order");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_record_without_addresses_is_rejected_as_invalid() {
    let svc = TestService::start().await;
    let mut record = duke_account_json();
    record["addresses"] = json!([]);
    Mock::given(method("GET"))
        .and(path(format!("/accounts/{DUKE_REF}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(record))
        .mount(&svc.accounts)
        .await;

    let resp = svc
        .client
        .post(svc.url("/orders"))
        .json(&create_order_payload())
        .send()
        .await
        .expect("Failed to create order");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to read body");
    assert!(
        body["message"]
            .as_str()
            .expect("message")
            .contains("addresses")
    );
}

#[tokio::test]
async fn test_reference_matching_is_case_insensitive() {
    let svc = TestService::start().await;
    let requested = DUKE_REF.to_uppercase();
    // The stored record still carries the lowercase reference.
    Mock::given(method("GET"))
        .and(path(format!("/accounts/{requested}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(duke_account_json()))
        .mount(&svc.accounts)
        .await;

    let mut payload = create_order_payload();
    payload["account"]["accountRefId"] = json!(requested);
    let resp = svc
        .client
        .post(svc.url("/orders"))
        .json(&payload)
        .send()
        .await
        .expect("Failed to create order");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read body");
    assert_eq!(body["account"]["accountRefId"], DUKE_REF);
}
