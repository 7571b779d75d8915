//! Storage factory for runtime backend selection

use std::str::FromStr;
use std::sync::Arc;

use crate::domain::expense::ExpenseRepository;
use crate::domain::user::CredentialStore;
use crate::domain::DomainError;
use crate::infrastructure::expense::{InMemoryExpenseRepository, PostgresExpenseRepository};
use crate::infrastructure::user::{InMemoryCredentialStore, PostgresCredentialStore};

use super::postgres::{connect_pool, PostgresConfig};

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(DomainError::configuration(format!(
                "Unknown storage backend '{}'",
                other
            ))),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Creates an in-memory storage configuration
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Creates a PostgreSQL storage configuration
    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// The shared mutable resources of the application
#[derive(Debug, Clone)]
pub struct Stores {
    pub credentials: Arc<dyn CredentialStore>,
    pub expenses: Arc<dyn ExpenseRepository>,
}

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates the stores for the configured backend
    pub async fn create(config: &StorageConfig) -> Result<Stores, DomainError> {
        match config {
            StorageConfig::InMemory => Ok(Self::create_in_memory()),
            StorageConfig::Postgres(pg_config) => {
                let pool = connect_pool(pg_config).await?;

                Ok(Stores {
                    credentials: Arc::new(PostgresCredentialStore::new(pool.clone())),
                    expenses: Arc::new(PostgresExpenseRepository::new(pool)),
                })
            }
        }
    }

    /// Creates empty in-memory stores
    pub fn create_in_memory() -> Stores {
        Stores {
            credentials: Arc::new(InMemoryCredentialStore::new()),
            expenses: Arc::new(InMemoryExpenseRepository::new()),
        }
    }
}
