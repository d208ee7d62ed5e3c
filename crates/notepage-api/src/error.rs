//! HTTP error mapping.

use axum::{http::StatusCode, response::IntoResponse, Json};

/// Error returned by handlers, rendered as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    Database(notepage_core::Error),
    BadRequest(String),
    Internal(String),
}

impl From<notepage_core::Error> for ApiError {
    fn from(err: notepage_core::Error) -> Self {
        match err {
            notepage_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            e @ notepage_core::Error::UnsupportedCursorVersion(_) => {
                ApiError::BadRequest(e.to_string())
            }
            e @ notepage_core::Error::Database(_) => ApiError::Database(e),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Database(err) => {
                tracing::error!(
                    subsystem = "api",
                    error = %err,
                    "Request failed on backing store"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                tracing::error!(subsystem = "api", error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
