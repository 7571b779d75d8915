//! PostgreSQL credential store implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::user::{CredentialStore, User, UserId, UserRecord};
use crate::domain::DomainError;

/// PostgreSQL implementation of CredentialStore
///
/// Email uniqueness is enforced by the `users_email_key` constraint created
/// in the migrations; the store maps its violation to `Conflict`.
#[derive(Debug, Clone)]
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    /// Create a new store with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<UserId, DomainError> {
        let id = UserId::generate();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            "#,
        )
        .bind(id.as_str())
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(format!("Email '{}' is already registered", email))
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_record).transpose()
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

fn row_to_record(row: &sqlx::postgres::PgRow) -> Result<UserRecord, DomainError> {
    let id: String = row.get("id");
    let email: String = row.get("email");
    let password_hash: String = row.get("password_hash");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let user_id = UserId::new(&id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(UserRecord::new(
        User::from_parts(user_id, email, created_at, updated_at),
        password_hash,
    ))
}
