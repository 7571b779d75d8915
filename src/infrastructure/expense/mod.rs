//! Expense infrastructure module

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresExpenseRepository;
pub use repository::InMemoryExpenseRepository;
pub use service::{CreateExpenseRequest, ExpenseService, UpdateExpenseRequest};
