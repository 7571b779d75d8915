//! User infrastructure module
//!
//! Argon2 password hashing, in-memory and PostgreSQL credential stores, and
//! the auth service that ties them to the token service.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresCredentialStore;
pub use repository::InMemoryCredentialStore;
pub use service::AuthService;
