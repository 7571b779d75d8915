//! User domain
//!
//! This module provides domain types and traits for user authentication,
//! including user entities, validation, errors and the credential store trait.

mod entity;
mod error;
mod repository;
mod validation;

pub use entity::{User, UserId, UserRecord};
pub use error::AuthError;
pub use repository::CredentialStore;
pub use validation::{validate_email, validate_password, validate_user_id, UserValidationError};

#[cfg(test)]
pub use repository::mock::MockCredentialStore;
