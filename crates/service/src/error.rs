//! HTTP error mapping.
//!
//! Provides the `AppError` type that adapts domain failures to responses.
//! All route handlers return `Result<T, AppError>`. Every failure resolves
//! to a status code and a JSON `{"message": ...}` body; validation failures
//! are client errors, and everything that amounts to "no such thing" maps
//! to not-found, including storage-level write rejections.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use commerce_orders_core::error::OrderError;
use thiserror::Error;

/// Application-level error type for the orders service.
#[derive(Debug, Error)]
pub enum AppError {
    /// An order operation failed.
    #[error(transparent)]
    Order(#[from] OrderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let Self::Order(err) = self;

        if matches!(err, OrderError::PersistenceFailure(_)) {
            tracing::error!(error = %err, "order persistence failed");
        }

        let status = match &err {
            OrderError::MissingAccount
            | OrderError::InvalidAccount { .. }
            | OrderError::MissingAddress
            | OrderError::TotalOverflow => StatusCode::BAD_REQUEST,
            OrderError::AccountNotFound { .. }
            | OrderError::OrderNotFound { .. }
            | OrderError::PersistenceFailure(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(serde_json::json!({ "message": err.to_string() }));
        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use commerce_orders_core::types::OrderId;

    use super::*;

    fn get_status(err: OrderError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn test_validation_failures_are_bad_requests() {
        assert_eq!(
            get_status(OrderError::MissingAccount),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(OrderError::InvalidAccount {
                reason: "account must have an email address".to_string()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(OrderError::MissingAddress),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(OrderError::TotalOverflow),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_absences_are_not_found() {
        assert_eq!(
            get_status(OrderError::OrderNotFound {
                id: OrderId::new(42)
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(OrderError::AccountNotFound {
                reference: "4f464483-a1f0-4ce9-a19e-3c0f23e84a67".to_string()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(OrderError::PersistenceFailure(
                "constraint violation: order number is required".to_string()
            )),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_body_is_a_json_message() {
        let response = AppError::from(OrderError::MissingAccount).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body["message"],
            "a valid account is required to create an order"
        );
    }
}
