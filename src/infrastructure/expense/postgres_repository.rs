//! PostgreSQL expense repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::domain::expense::{Category, Expense, ExpenseFilter, ExpenseId, ExpenseRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

const EXPENSE_COLUMNS: &str =
    "id, user_id, amount, description, category, date, created_at, updated_at";

/// PostgreSQL implementation of ExpenseRepository
#[derive(Debug, Clone)]
pub struct PostgresExpenseRepository {
    pool: PgPool,
}

impl PostgresExpenseRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpenseRepository for PostgresExpenseRepository {
    async fn create(&self, expense: Expense) -> Result<Expense, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO expenses (id, user_id, amount, description, category, date,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(expense.id().as_str())
        .bind(expense.user_id().as_str())
        .bind(expense.amount())
        .bind(expense.description())
        .bind(expense.category().as_str())
        .bind(expense.date())
        .bind(expense.created_at())
        .bind(expense.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create expense: {}", e)))?;

        Ok(expense)
    }

    async fn get(&self, id: &ExpenseId, owner: &UserId) -> Result<Option<Expense>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM expenses WHERE id = $1 AND user_id = $2",
            EXPENSE_COLUMNS
        ))
        .bind(id.as_str())
        .bind(owner.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get expense: {}", e)))?;

        row.as_ref().map(row_to_expense).transpose()
    }

    async fn list(
        &self,
        owner: &UserId,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>, DomainError> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM expenses WHERE user_id = ",
            EXPENSE_COLUMNS
        ));
        query.push_bind(owner.as_str());

        if let Some(start) = filter.start_date {
            query.push(" AND date >= ").push_bind(start);
        }

        if let Some(end) = filter.end_date {
            query.push(" AND date <= ").push_bind(end);
        }

        if let Some(category) = filter.category {
            query.push(" AND category = ").push_bind(category.as_str());
        }

        query.push(" ORDER BY date DESC, created_at DESC");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list expenses: {}", e)))?;

        rows.iter().map(row_to_expense).collect()
    }

    async fn update(&self, expense: &Expense) -> Result<Expense, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET amount = $3, description = $4, category = $5, date = $6, updated_at = $7
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(expense.id().as_str())
        .bind(expense.user_id().as_str())
        .bind(expense.amount())
        .bind(expense.description())
        .bind(expense.category().as_str())
        .bind(expense.date())
        .bind(expense.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update expense: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Expense '{}' not found",
                expense.id()
            )));
        }

        Ok(expense.clone())
    }

    async fn delete(&self, id: &ExpenseId, owner: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id.as_str())
            .bind(owner.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete expense: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_expense(row: &sqlx::postgres::PgRow) -> Result<Expense, DomainError> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let category: String = row.get("category");

    let id = ExpenseId::new(&id)
        .map_err(|e| DomainError::storage(format!("Invalid expense ID in database: {}", e)))?;
    let user_id = UserId::new(&user_id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;
    let category: Category = category
        .parse()
        .map_err(|e| DomainError::storage(format!("Invalid category in database: {}", e)))?;

    Ok(Expense::from_parts(
        id,
        user_id,
        row.get("amount"),
        row.get::<String, _>("description"),
        category,
        row.get("date"),
        row.get("created_at"),
        row.get("updated_at"),
    ))
}
