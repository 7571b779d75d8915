//! Auth service: registration, login and identity resolution

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::user::{validate_email, validate_password, AuthError, CredentialStore, User, UserId};
use crate::domain::DomainError;
use crate::infrastructure::auth::{TokenError, TokenPair, TokenService};

use super::password::PasswordHasher;

/// Orchestrates the credential store, password hasher and token service
#[derive(Debug, Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Register a new user and return it without its password hash
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        validate_email(email)?;
        validate_password(password)?;

        if self.store.email_exists(email).await? {
            debug!("Registration rejected: email already registered");
            return Err(AuthError::UserExists);
        }

        let password_hash = self.hash_password(password).await?;

        // The store's uniqueness constraint is authoritative; a concurrent
        // registration that passed the pre-check surfaces here as Conflict.
        let id = self.store.create_user(email, &password_hash).await?;

        let record = self.store.find_by_id(&id).await?.ok_or_else(|| {
            AuthError::StoreFailure(format!("User '{}' missing after insert", id))
        })?;

        info!(user_id = %id, "User registered");
        Ok(record.into_user())
    }

    /// Authenticate by email and password and issue a token pair
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let Some(record) = self.store.find_by_email(email).await? else {
            debug!("Login rejected: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_password(password, record.password_hash()).await? {
            debug!(user_id = %record.user().id(), "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self.tokens.issue(record.user().id()).map_err(|e| {
            warn!(error = %e, "Failed to issue tokens");
            AuthError::Internal(e.to_string())
        })?;

        info!(user_id = %record.user().id(), "User logged in");
        Ok(pair)
    }

    /// Resolve the profile of an already authenticated identity
    pub async fn current_user(&self, id: &UserId) -> Result<User, AuthError> {
        match self.store.find_by_id(id).await? {
            Some(record) => Ok(record.into_user()),
            None => {
                warn!(user_id = %id, "Valid token for unknown user");
                Err(AuthError::Unauthorized)
            }
        }
    }

    /// Validate a bearer token and return the identity it carries
    pub fn authenticate(&self, token: &str) -> Result<UserId, AuthError> {
        self.tokens.validate(token).map_err(|e| match e {
            TokenError::Invalid => AuthError::Unauthorized,
            TokenError::Signing(message) => AuthError::Internal(message),
        })
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();

        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?;

        hash.map_err(|e: DomainError| AuthError::Internal(e.to_string()))
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("Verification task failed: {}", e)))
    }
}
