//! Expense Tracker API
//!
//! A personal expense-tracking backend:
//! - Registration and login with Argon2id password hashing
//! - HS256 access/refresh tokens and a bearer-token identity guard
//! - Owner-scoped expense records with date, category and period filters
//! - In-memory or PostgreSQL storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{
    auth::TokenService,
    expense::ExpenseService,
    storage::StorageFactory,
    user::{Argon2Hasher, AuthService},
};
use tracing::info;

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = config.storage.storage_config()?;
    info!(backend = ?storage_config.storage_type(), "Initializing storage");

    let stores = StorageFactory::create(&storage_config).await?;
    let tokens = Arc::new(TokenService::new(config.auth.jwt_config()));

    let auth_service = AuthService::new(stores.credentials, Arc::new(Argon2Hasher::new()), tokens);
    let expense_service = ExpenseService::new(stores.expenses);

    Ok(AppState::new(
        Arc::new(auth_service),
        Arc::new(expense_service),
    ))
}
