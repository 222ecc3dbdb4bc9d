//! Errors raised by the domain services.

use shared::jwt::JwtError;
use shared::password::PasswordError;
use thiserror::Error;

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    /// Maps a unique violation to `Conflict` with the given message.
    pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                ServiceError::Conflict(message.to_string())
            }
            _ => ServiceError::Database(err),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => ApiError::Validation(msg),
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Forbidden(msg) => ApiError::Forbidden(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid username or password".to_string())
            }
            ServiceError::Password(e) => ApiError::Internal(e.to_string()),
            ServiceError::Token(e) => ApiError::Internal(e.to_string()),
            ServiceError::Database(e) => ApiError::from(e),
        }
    }
}
