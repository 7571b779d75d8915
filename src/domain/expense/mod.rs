//! Expense domain
//!
//! Expense entities, list filters, validation, and the owner-scoped
//! repository trait.

mod entity;
mod filter;
mod repository;
mod validation;

pub use entity::{Category, Expense, ExpenseId};
pub use filter::{ExpenseFilter, Period};
pub use repository::ExpenseRepository;
pub use validation::{
    validate_amount, validate_description, validate_expense_id, ExpenseValidationError,
};
