//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::store::StoreError;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Validation Errors**: Missing or malformed request data
/// - **Authentication Errors**: Credential mismatch on login
/// - **Resource Errors**: Referenced user or transaction absent
/// - **Conflict Errors**: Duplicate unique key (email already registered)
/// - **Store Errors**: The external item store failed or timed out
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("{0}")]
    Validation(String),

    /// Password verification failed on login.
    ///
    /// Returns HTTP 401 Unauthorized. The message deliberately does not
    /// say whether the email or the password was wrong.
    #[error("Incorrect email or password")]
    Auth,

    /// Referenced user or transaction does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("{0}")]
    NotFound(String),

    /// A unique key is already taken (e.g. registering a duplicate email).
    ///
    /// Returns HTTP 409 Conflict.
    #[error("{0}")]
    Conflict(String),

    /// A store call exceeded its per-call deadline.
    ///
    /// Returns HTTP 408 Request Timeout, distinct from NotFound so callers
    /// can tell "the item is absent" apart from "the store did not answer".
    #[error("The data store did not respond in time")]
    Timeout,

    /// Store operation failed for any reason other than a timeout.
    ///
    /// Returns HTTP 500 Internal Server Error (hides details from client).
    #[error("Store error: {0}")]
    Store(StoreError),

    /// Password hashing failed.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("Password hashing failed")]
    Hashing(#[from] bcrypt::BcryptError),

    /// An item read from the store did not match the expected shape.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("Malformed item: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Store errors propagate unchanged except that timeouts get their own
/// variant so they map to a distinct status code.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Timeout => AppError::Timeout,
            other => AppError::Store(other),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return the same envelope as successful responses:
/// ```json
/// {
///   "success": false,
///   "message": "Human-readable error message"
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `Validation` → 400 Bad Request
/// - `Auth` → 401 Unauthorized
/// - `NotFound` → 404 Not Found
/// - `Timeout` → 408 Request Timeout
/// - `Conflict` → 409 Conflict
/// - `Store` / `Hashing` / `Serde` → 500 Internal Server Error
///
/// Internal failures never leak store error codes or stack traces; the
/// client sees a generic message while the detail is logged server-side.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(ref msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Auth => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Timeout => (StatusCode::REQUEST_TIMEOUT, self.to_string()),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Store(_) | AppError::Hashing(_) | AppError::Serde(_) => {
                tracing::error!(error = %self, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message
        }));

        (status, body).into_response()
    }
}
