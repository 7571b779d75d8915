//! Expense entity and related types

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_expense_id, ExpenseValidationError};
use crate::domain::user::UserId;

/// Expense identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Create a new ExpenseId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ExpenseValidationError> {
        let id = id.into();
        validate_expense_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ExpenseId {
    type Error = ExpenseValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExpenseId> for String {
    fn from(id: ExpenseId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Expense category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Groceries,
    Leisure,
    Electronics,
    Utilities,
    Clothing,
    Health,
    Others,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Groceries,
        Category::Leisure,
        Category::Electronics,
        Category::Utilities,
        Category::Clothing,
        Category::Health,
        Category::Others,
    ];

    /// Wire and storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groceries => "GROCERIES",
            Self::Leisure => "LEISURE",
            Self::Electronics => "ELECTRONICS",
            Self::Utilities => "UTILITIES",
            Self::Clothing => "CLOTHING",
            Self::Health => "HEALTH",
            Self::Others => "OTHERS",
        }
    }
}

impl FromStr for Category {
    type Err = ExpenseValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ExpenseValidationError::UnknownCategory(s.to_string()))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single expense owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    id: ExpenseId,
    user_id: UserId,
    amount: f64,
    description: String,
    category: Category,
    date: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense with a generated ID
    pub fn new(
        user_id: UserId,
        amount: f64,
        description: impl Into<String>,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: ExpenseId::generate(),
            user_id,
            amount,
            description: description.into(),
            category,
            date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild an expense from persisted fields
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: ExpenseId,
        user_id: UserId,
        amount: f64,
        description: impl Into<String>,
        category: Category,
        date: NaiveDate,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            amount,
            description: description.into(),
            category,
            date,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &ExpenseId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Check if the expense belongs to the given user
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    // Mutators

    pub fn set_amount(&mut self, amount: f64) {
        self.amount = amount;
        self.touch();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.touch();
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.touch();
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
