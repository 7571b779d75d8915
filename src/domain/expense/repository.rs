//! Expense repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Expense, ExpenseId};
use super::filter::ExpenseFilter;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for expense storage
///
/// Every read and write is scoped by owner: a record belonging to another
/// user behaves exactly like a missing one.
#[async_trait]
pub trait ExpenseRepository: Send + Sync + Debug {
    /// Insert a new expense
    async fn create(&self, expense: Expense) -> Result<Expense, DomainError>;

    /// Get an expense by ID if it belongs to `owner`
    async fn get(&self, id: &ExpenseId, owner: &UserId) -> Result<Option<Expense>, DomainError>;

    /// List an owner's expenses matching `filter`, newest date first
    async fn list(
        &self,
        owner: &UserId,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>, DomainError>;

    /// Persist changes to an existing expense owned by `expense.user_id()`
    async fn update(&self, expense: &Expense) -> Result<Expense, DomainError>;

    /// Delete an expense; returns false when nothing owned by `owner` matched
    async fn delete(&self, id: &ExpenseId, owner: &UserId) -> Result<bool, DomainError>;
}
