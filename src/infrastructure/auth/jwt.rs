//! JWT access/refresh token issuance and validation

use std::fmt::Debug;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::user::UserId;

/// The only algorithm tokens may be signed with or claim in their header
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Identifier of the authenticated user
    pub user_id: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl TokenClaims {
    /// Create claims for a user, valid for `lifetime` from now
    pub fn new(user_id: &UserId, lifetime: Duration) -> Self {
        let now = Utc::now().timestamp();
        let lifetime_secs = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);

        Self {
            user_id: user_id.as_str().to_string(),
            iat: now,
            exp: now.saturating_add(lifetime_secs),
        }
    }

    /// Check if the token has expired; a token is valid only while `exp > now`
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Errors returned by the token service
///
/// Every validation failure collapses into `Invalid` so callers cannot learn
/// why a token was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token")]
    Invalid,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Configuration for the token service
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret
    pub secret: String,
    /// Lifetime of access tokens
    pub access_token_ttl: Duration,
    /// Lifetime of refresh tokens
    pub refresh_token_ttl: Duration,
}

impl JwtConfig {
    /// Create new JWT configuration
    pub fn new(
        secret: impl Into<String>,
        access_token_ttl: Duration,
        refresh_token_ttl: Duration,
    ) -> Self {
        Self {
            secret: secret.into(),
            access_token_ttl,
            refresh_token_ttl,
        }
    }
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

/// Access and refresh tokens minted together on login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the access token expires
    pub expires_in: u64,
}

/// Stateless HS256 token service
///
/// Holds only the secret and the two lifetimes; safe to share across
/// requests without synchronization.
#[derive(Clone)]
pub struct TokenService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("config", &self.config)
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl TokenService {
    /// Create a new token service with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Issue an access token and a refresh token for `user_id`
    pub fn issue(&self, user_id: &UserId) -> Result<TokenPair, TokenError> {
        let access_token = self.sign(&TokenClaims::new(user_id, self.config.access_token_ttl))?;
        let refresh_token = self.sign(&TokenClaims::new(user_id, self.config.refresh_token_ttl))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_token_ttl().as_secs(),
        })
    }

    /// Validate a token and return the user it was issued for
    pub fn validate(&self, token: &str) -> Result<UserId, TokenError> {
        let claims = self.decode_claims(token)?;

        UserId::new(claims.user_id).map_err(|e| reject(format!("bad user_id claim: {}", e)))
    }

    /// Verify a token and return its claims
    pub fn decode_claims(&self, token: &str) -> Result<TokenClaims, TokenError> {
        if self.config.secret.is_empty() {
            return Err(reject("no signing secret configured"));
        }

        // The header is untrusted: it must name exactly our algorithm before
        // any key material is used.
        let header = decode_header(token).map_err(|e| reject(format!("malformed header: {}", e)))?;

        if header.alg != SIGNING_ALGORITHM {
            return Err(reject(format!("unexpected algorithm {:?}", header.alg)));
        }

        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| reject(e.to_string()))?;

        // jsonwebtoken still accepts exp == now even with zero leeway
        if data.claims.is_expired() {
            return Err(reject("expired"));
        }

        Ok(data.claims)
    }

    /// Lifetime of access tokens
    pub fn access_token_ttl(&self) -> Duration {
        self.config.access_token_ttl
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        if self.config.secret.is_empty() {
            return Err(TokenError::Signing("signing secret is empty".to_string()));
        }

        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

fn reject(reason: impl std::fmt::Display) -> TokenError {
    debug!(reason = %reason, "Token rejected");
    TokenError::Invalid
}
