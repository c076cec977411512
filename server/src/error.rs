use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error response returned to the admin panel.
///
/// Exactly two failure shapes leave this server: 404 with a fixed message
/// when a lookup misses, and 500 with a fixed message for everything else.
/// The underlying store error is logged, never serialized.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Fold any error into the endpoint's fixed 500 message, logging the
    /// cause.
    pub fn internal<E: std::fmt::Display>(message: &'static str) -> impl FnOnce(E) -> ApiError {
        move |err| {
            error!("{message}: {err}");
            ApiError::Internal(message)
        }
    }

    /// Like [`ApiError::internal`], but a missing record surfaces as 404
    /// with its own message.
    pub fn not_found_or(
        not_found: &'static str,
        message: &'static str,
    ) -> impl FnOnce(api::Error) -> ApiError {
        move |err| {
            if err.is_not_found() {
                ApiError::NotFound(not_found)
            } else {
                error!("{message}: {err}");
                ApiError::Internal(message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn not_found_maps_to_404_with_error_body() {
        let response = ApiError::NotFound("User not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "error": "User not found" }));
    }

    #[tokio::test]
    async fn internal_maps_to_500_with_error_body() {
        let response = ApiError::Internal("Failed to fetch users").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "error": "Failed to fetch users" }));
    }

    #[test]
    fn missing_record_surfaces_as_not_found() {
        let err = ApiError::not_found_or("User not found", "Failed to fetch user")(
            api::Error::NotFound("user"),
        );
        assert!(matches!(err, ApiError::NotFound("User not found")));
    }

    #[test]
    fn internal_folds_any_error_into_fixed_message() {
        let err = ApiError::internal("Failed to fetch users")("connection refused");
        assert!(matches!(err, ApiError::Internal("Failed to fetch users")));
    }
}
