//! Domain layer - Core business logic and entities

pub mod error;
pub mod expense;
pub mod user;

pub use error::DomainError;
pub use expense::{Category, Expense, ExpenseFilter, ExpenseId, ExpenseRepository, Period};
pub use user::{AuthError, CredentialStore, User, UserId, UserRecord};
