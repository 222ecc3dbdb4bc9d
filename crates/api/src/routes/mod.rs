//! HTTP route handlers.

pub mod expenses;
pub mod groups;
pub mod health;
pub mod users;

use crate::error::ApiError;

/// Unwraps a required query parameter.
pub(crate) fn required<T>(value: Option<T>, name: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::Validation(format!("{} query parameter is required", name)))
}

/// Message returned when a request passed validation but a field was lost
/// on conversion.
pub(crate) fn incomplete_payload() -> ApiError {
    ApiError::Validation("Request payload is incomplete".to_string())
}
