//! Authentication infrastructure module
//!
//! Stateless HS256 token issuance and validation.

mod jwt;

pub use jwt::{JwtConfig, TokenClaims, TokenError, TokenPair, TokenService, SIGNING_ALGORITHM};
