//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They validate input, enforce the user/transaction integrity rules, and
//! perform the store calls. All store failures propagate immediately; no
//! retries happen at this layer.

pub mod transaction_service;
pub mod user_service;

use crate::error::AppError;

/// Unwrap a required text field, treating absent and blank the same way.
fn required_text(field: Option<String>, message: &str) -> Result<String, AppError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

/// Unwrap a required non-text field.
fn required<T>(field: Option<T>, message: &str) -> Result<T, AppError> {
    field.ok_or_else(|| AppError::Validation(message.to_string()))
}
