//! Expense service - owner-scoped CRUD for expenses

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::domain::expense::{
    validate_amount, validate_description, Category, Expense, ExpenseFilter, ExpenseId,
    ExpenseRepository, ExpenseValidationError, Period,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Request to create a new expense
#[derive(Debug, Clone)]
pub struct CreateExpenseRequest {
    pub amount: f64,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
}

/// Partial update of an existing expense
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseRequest {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
}

/// Expense service
///
/// Every operation takes the authenticated owner; records belonging to
/// anyone else are reported as not found.
#[derive(Debug, Clone)]
pub struct ExpenseService {
    repository: Arc<dyn ExpenseRepository>,
}

impl ExpenseService {
    /// Create a new ExpenseService with the given repository
    pub fn new(repository: Arc<dyn ExpenseRepository>) -> Self {
        Self { repository }
    }

    /// Create an expense for `owner`
    pub async fn create(
        &self,
        owner: &UserId,
        request: CreateExpenseRequest,
    ) -> Result<Expense, DomainError> {
        validate_amount(request.amount).map_err(invalid)?;
        validate_description(&request.description).map_err(invalid)?;

        let expense = Expense::new(
            owner.clone(),
            request.amount,
            request.description,
            request.category,
            request.date,
        );

        let created = self.repository.create(expense).await?;
        debug!(expense_id = %created.id(), user_id = %owner, "Expense created");

        Ok(created)
    }

    /// Get one of `owner`'s expenses
    pub async fn get(&self, owner: &UserId, id: &str) -> Result<Expense, DomainError> {
        let expense_id = parse_expense_id(id)?;

        self.repository
            .get(&expense_id, owner)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// List `owner`'s expenses matching `filter`, newest first
    pub async fn list(
        &self,
        owner: &UserId,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>, DomainError> {
        filter.validate().map_err(invalid)?;
        self.repository.list(owner, filter).await
    }

    /// List `owner`'s expenses within a look-back window ending today
    pub async fn list_by_period(
        &self,
        owner: &UserId,
        period: Period,
    ) -> Result<Vec<Expense>, DomainError> {
        let filter = ExpenseFilter::for_period(period, Utc::now().date_naive());
        self.list(owner, &filter).await
    }

    /// Apply a partial update to one of `owner`'s expenses
    pub async fn update(
        &self,
        owner: &UserId,
        id: &str,
        request: UpdateExpenseRequest,
    ) -> Result<Expense, DomainError> {
        let mut expense = self.get(owner, id).await?;

        if let Some(amount) = request.amount {
            validate_amount(amount).map_err(invalid)?;
            expense.set_amount(amount);
        }

        if let Some(description) = request.description {
            validate_description(&description).map_err(invalid)?;
            expense.set_description(description);
        }

        if let Some(category) = request.category {
            expense.set_category(category);
        }

        if let Some(date) = request.date {
            expense.set_date(date);
        }

        self.repository.update(&expense).await
    }

    /// Delete one of `owner`'s expenses
    pub async fn delete(&self, owner: &UserId, id: &str) -> Result<(), DomainError> {
        let expense_id = parse_expense_id(id)?;

        if !self.repository.delete(&expense_id, owner).await? {
            return Err(not_found(id));
        }

        debug!(expense_id = %expense_id, user_id = %owner, "Expense deleted");
        Ok(())
    }
}

fn parse_expense_id(id: &str) -> Result<ExpenseId, DomainError> {
    ExpenseId::new(id).map_err(invalid)
}

fn invalid(err: ExpenseValidationError) -> DomainError {
    DomainError::validation(err.to_string())
}

fn not_found(id: &str) -> DomainError {
    DomainError::not_found(format!("Expense '{}' not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::expense::InMemoryExpenseRepository;
    use chrono::Days;

    fn create_service() -> ExpenseService {
        ExpenseService::new(Arc::new(InMemoryExpenseRepository::new()))
    }

    fn alice() -> UserId {
        UserId::new("alice").unwrap()
    }

    fn bob() -> UserId {
        UserId::new("bob").unwrap()
    }

    fn request(amount: f64, date: NaiveDate) -> CreateExpenseRequest {
        CreateExpenseRequest {
            amount,
            description: "Weekly groceries".to_string(),
            category: Category::Groceries,
            date,
        }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = create_service();

        let created = service.create(&alice(), request(42.0, today())).await.unwrap();
        assert_eq!(created.user_id(), &alice());

        let fetched = service.get(&alice(), created.id().as_str()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let service = create_service();

        let result = service.create(&alice(), request(0.0, today())).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let mut short = request(5.0, today());
        short.description = "ab".to_string();
        let result = service.create(&alice(), short).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_other_owner_sees_nothing() {
        let service = create_service();
        let created = service.create(&alice(), request(10.0, today())).await.unwrap();
        let id = created.id().as_str();

        assert!(matches!(
            service.get(&bob(), id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(service.list(&bob(), &ExpenseFilter::new()).await.unwrap().is_empty());
        assert!(matches!(
            service
                .update(&bob(), id, UpdateExpenseRequest { amount: Some(1.0), ..Default::default() })
                .await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete(&bob(), id).await,
            Err(DomainError::NotFound { .. })
        ));

        // Untouched for the owner
        let kept = service.get(&alice(), id).await.unwrap();
        assert_eq!(kept.amount(), 10.0);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let service = create_service();
        let created = service.create(&alice(), request(10.0, today())).await.unwrap();

        let updated = service
            .update(
                &alice(),
                created.id().as_str(),
                UpdateExpenseRequest {
                    category: Some(Category::Leisure),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.category(), Category::Leisure);
        assert_eq!(updated.amount(), 10.0);
        assert_eq!(updated.description(), "Weekly groceries");
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_amount() {
        let service = create_service();
        let created = service.create(&alice(), request(10.0, today())).await.unwrap();

        let result = service
            .update(
                &alice(),
                created.id().as_str(),
                UpdateExpenseRequest {
                    amount: Some(-3.0),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = create_service();
        let created = service.create(&alice(), request(10.0, today())).await.unwrap();
        let id = created.id().as_str();

        service.delete(&alice(), id).await.unwrap();
        assert!(matches!(
            service.get(&alice(), id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_by_period() {
        let service = create_service();
        let now = today();

        service.create(&alice(), request(1.0, now)).await.unwrap();
        service
            .create(&alice(), request(2.0, now.checked_sub_days(Days::new(20)).unwrap()))
            .await
            .unwrap();
        service
            .create(&alice(), request(3.0, now.checked_sub_days(Days::new(200)).unwrap()))
            .await
            .unwrap();

        assert_eq!(service.list_by_period(&alice(), Period::Week).await.unwrap().len(), 1);
        assert_eq!(service.list_by_period(&alice(), Period::Month).await.unwrap().len(), 2);
        assert_eq!(service.list_by_period(&alice(), Period::Quarter).await.unwrap().len(), 2);
        assert_eq!(service.list(&alice(), &ExpenseFilter::new()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_rejects_inverted_range() {
        let service = create_service();
        let now = today();
        let filter = ExpenseFilter::new()
            .with_start_date(now)
            .with_end_date(now.checked_sub_days(Days::new(1)).unwrap());

        let result = service.list(&alice(), &filter).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_malformed_id() {
        let service = create_service();

        assert!(matches!(
            service.get(&alice(), "").await,
            Err(DomainError::Validation { .. })
        ));
    }
}
