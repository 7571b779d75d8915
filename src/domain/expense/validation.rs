//! Expense validation utilities

use thiserror::Error;

/// Errors that can occur during expense validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExpenseValidationError {
    #[error("Expense ID cannot be empty")]
    EmptyId,

    #[error("Expense ID exceeds maximum length of {0} characters")]
    IdTooLong(usize),

    #[error("Amount must be a finite number greater than zero")]
    InvalidAmount,

    #[error("Description is too short. Minimum length is {0} characters")]
    DescriptionTooShort(usize),

    #[error("Description exceeds maximum length of {0} characters")]
    DescriptionTooLong(usize),

    #[error("Unknown category: '{0}'")]
    UnknownCategory(String),

    #[error("Unknown period: '{0}'. Expected one of: week, month, quarter")]
    UnknownPeriod(String),

    #[error("Start date {start} is after end date {end}")]
    InvertedRange { start: String, end: String },
}

const MAX_EXPENSE_ID_LENGTH: usize = 64;
const MIN_DESCRIPTION_LENGTH: usize = 3;
const MAX_DESCRIPTION_LENGTH: usize = 255;

/// Validate an expense ID
pub fn validate_expense_id(id: &str) -> Result<(), ExpenseValidationError> {
    if id.is_empty() {
        return Err(ExpenseValidationError::EmptyId);
    }

    if id.len() > MAX_EXPENSE_ID_LENGTH {
        return Err(ExpenseValidationError::IdTooLong(MAX_EXPENSE_ID_LENGTH));
    }

    Ok(())
}

/// Validate an amount: finite and strictly positive
pub fn validate_amount(amount: f64) -> Result<(), ExpenseValidationError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ExpenseValidationError::InvalidAmount);
    }

    Ok(())
}

/// Validate a description
///
/// Rules:
/// - Minimum 3 characters
/// - Maximum 255 characters
pub fn validate_description(description: &str) -> Result<(), ExpenseValidationError> {
    let length = description.chars().count();

    if length < MIN_DESCRIPTION_LENGTH {
        return Err(ExpenseValidationError::DescriptionTooShort(
            MIN_DESCRIPTION_LENGTH,
        ));
    }

    if length > MAX_DESCRIPTION_LENGTH {
        return Err(ExpenseValidationError::DescriptionTooLong(
            MAX_DESCRIPTION_LENGTH,
        ));
    }

    Ok(())
}
