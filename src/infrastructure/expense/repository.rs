//! In-memory expense repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::expense::{Expense, ExpenseFilter, ExpenseId, ExpenseRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of ExpenseRepository
#[derive(Debug, Default)]
pub struct InMemoryExpenseRepository {
    expenses: Arc<RwLock<HashMap<String, Expense>>>,
}

impl InMemoryExpenseRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryExpenseRepository {
    async fn create(&self, expense: Expense) -> Result<Expense, DomainError> {
        let mut expenses = self.expenses.write().await;
        let id = expense.id().as_str().to_string();

        if expenses.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "Expense with ID '{}' already exists",
                id
            )));
        }

        expenses.insert(id, expense.clone());
        Ok(expense)
    }

    async fn get(&self, id: &ExpenseId, owner: &UserId) -> Result<Option<Expense>, DomainError> {
        let expenses = self.expenses.read().await;

        Ok(expenses
            .get(id.as_str())
            .filter(|e| e.is_owned_by(owner))
            .cloned())
    }

    async fn list(
        &self,
        owner: &UserId,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>, DomainError> {
        let expenses = self.expenses.read().await;

        let mut result: Vec<Expense> = expenses
            .values()
            .filter(|e| e.is_owned_by(owner) && filter.matches(e))
            .cloned()
            .collect();

        result.sort_by(|a, b| {
            b.date()
                .cmp(&a.date())
                .then_with(|| b.created_at().cmp(&a.created_at()))
        });

        Ok(result)
    }

    async fn update(&self, expense: &Expense) -> Result<Expense, DomainError> {
        let mut expenses = self.expenses.write().await;

        match expenses.get_mut(expense.id().as_str()) {
            Some(existing) if existing.is_owned_by(expense.user_id()) => {
                *existing = expense.clone();
                Ok(expense.clone())
            }
            _ => Err(DomainError::not_found(format!(
                "Expense '{}' not found",
                expense.id()
            ))),
        }
    }

    async fn delete(&self, id: &ExpenseId, owner: &UserId) -> Result<bool, DomainError> {
        let mut expenses = self.expenses.write().await;

        let owned = expenses
            .get(id.as_str())
            .is_some_and(|e| e.is_owned_by(owner));

        if owned {
            expenses.remove(id.as_str());
        }

        Ok(owned)
    }
}
