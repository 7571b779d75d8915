//! Credential store trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{UserId, UserRecord};
use crate::domain::DomainError;

/// Persistence for user identities and their password hashes
///
/// Implementations must enforce email uniqueness themselves and report a
/// duplicate as `DomainError::Conflict`; callers treat any pre-check as an
/// optimization only.
#[async_trait]
pub trait CredentialStore: Send + Sync + Debug {
    /// Insert a new user and return the identifier assigned to it
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<UserId, DomainError>;

    /// Look up a user by exact (case-sensitive) email
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DomainError>;

    /// Look up a user by identifier
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, DomainError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
