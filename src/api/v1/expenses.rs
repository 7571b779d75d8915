//! Expense endpoints
//!
//! Every handler here sits behind the identity guard and scopes its work to
//! the caller's own records.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::expense::{Category, Expense, ExpenseFilter, Period};
use crate::infrastructure::expense::{CreateExpenseRequest, UpdateExpenseRequest};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Body of POST /api/v1/expenses
#[derive(Debug, Deserialize)]
pub struct CreateExpenseBody {
    pub amount: f64,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
}

/// Body of PUT /api/v1/expenses/{id}; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateExpenseBody {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
}

/// Query string of GET /api/v1/expenses
///
/// `period` takes precedence over the explicit range and category.
#[derive(Debug, Default, Deserialize)]
pub struct ListExpensesQuery {
    pub period: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub category: Option<String>,
}

enum ListSelection {
    Period(Period),
    Filter(ExpenseFilter),
}

impl ListExpensesQuery {
    fn selection(&self) -> Result<ListSelection, ApiError> {
        if let Some(period) = non_empty(&self.period) {
            let period = period
                .parse::<Period>()
                .map_err(|e| ApiError::bad_request(e.to_string()).with_param("period"))?;
            return Ok(ListSelection::Period(period));
        }

        let mut filter = ExpenseFilter::new();

        if let Some(start) = non_empty(&self.start_date) {
            filter = filter.with_start_date(parse_date(start, "start_date")?);
        }

        if let Some(end) = non_empty(&self.end_date) {
            filter = filter.with_end_date(parse_date(end, "end_date")?);
        }

        if let Some(category) = non_empty(&self.category) {
            let category = category
                .parse::<Category>()
                .map_err(|e| ApiError::bad_request(e.to_string()).with_param("category"))?;
            filter = filter.with_category(category);
        }

        Ok(ListSelection::Filter(filter))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_date(value: &str, param: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        ApiError::bad_request(format!("Invalid date '{}', expected YYYY-MM-DD", value))
            .with_param(param)
    })
}

/// POST /api/v1/expenses
pub async fn create_expense(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(body): Json<CreateExpenseBody>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let expense = state
        .expense_service
        .create(
            &user_id,
            CreateExpenseRequest {
                amount: body.amount,
                description: body.description,
                category: body.category,
                date: body.date,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// GET /api/v1/expenses
pub async fn list_expenses(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<ListExpensesQuery>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let expenses = match query.selection()? {
        ListSelection::Period(period) => {
            state.expense_service.list_by_period(&user_id, period).await?
        }
        ListSelection::Filter(filter) => state.expense_service.list(&user_id, &filter).await?,
    };

    Ok(Json(expenses))
}

/// GET /api/v1/expenses/{id}
pub async fn get_expense(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Expense>, ApiError> {
    let expense = state.expense_service.get(&user_id, &id).await?;
    Ok(Json(expense))
}

/// PUT /api/v1/expenses/{id}
pub async fn update_expense(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateExpenseBody>,
) -> Result<Json<Expense>, ApiError> {
    let expense = state
        .expense_service
        .update(
            &user_id,
            &id,
            UpdateExpenseRequest {
                amount: body.amount,
                description: body.description,
                category: body.category,
                date: body.date,
            },
        )
        .await?;

    Ok(Json(expense))
}

/// DELETE /api/v1/expenses/{id}
pub async fn delete_expense(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.expense_service.delete(&user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
