//! Expense list filters

use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};

use super::entity::{Category, Expense};
use super::validation::ExpenseValidationError;

/// Optional constraints applied when listing a user's expenses
///
/// Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<Category>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Filter covering the given period and ending on `today`
    pub fn for_period(period: Period, today: NaiveDate) -> Self {
        Self::new()
            .with_start_date(period.start_from(today))
            .with_end_date(today)
    }

    /// Reject ranges whose start lies after their end
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ExpenseValidationError::InvertedRange {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Check whether an expense satisfies every set constraint
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(start) = self.start_date {
            if expense.date() < start {
                return false;
            }
        }

        if let Some(end) = self.end_date {
            if expense.date() > end {
                return false;
            }
        }

        if let Some(category) = self.category {
            if expense.category() != category {
                return false;
            }
        }

        true
    }
}

/// Predefined look-back windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    Quarter,
}

impl Period {
    /// First day of the window that ends on `today`
    pub fn start_from(&self, today: NaiveDate) -> NaiveDate {
        let start = match self {
            Self::Week => today.checked_sub_days(Days::new(7)),
            Self::Month => today.checked_sub_months(Months::new(1)),
            Self::Quarter => today.checked_sub_months(Months::new(3)),
        };

        start.unwrap_or(NaiveDate::MIN)
    }
}

impl FromStr for Period {
    type Err = ExpenseValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            other => Err(ExpenseValidationError::UnknownPeriod(other.to_string())),
        }
    }
}
