//! Authentication error types

use thiserror::Error;

use super::validation::UserValidationError;
use crate::domain::DomainError;

/// Failures surfaced by registration, login and identity resolution
///
/// `InvalidCredentials` deliberately covers both an unknown email and a wrong
/// password, and `Unauthorized` covers every token failure.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed: {0}")]
    ValidationFailure(String),

    #[error("User already exists")]
    UserExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Store failure: {0}")]
    StoreFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UserValidationError> for AuthError {
    fn from(err: UserValidationError) -> Self {
        Self::ValidationFailure(err.to_string())
    }
}

impl From<DomainError> for AuthError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Conflict { .. } => Self::UserExists,
            DomainError::Validation { message } => Self::ValidationFailure(message),
            DomainError::Internal { message } | DomainError::Configuration { message } => {
                Self::Internal(message)
            }
            other => Self::StoreFailure(other.to_string()),
        }
    }
}
