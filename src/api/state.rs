//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::expense::ExpenseService;
use crate::infrastructure::user::AuthService;

/// Application state shared by every handler
///
/// Services are immutable once built; the stores behind them handle their
/// own synchronization.
#[derive(Debug, Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub expense_service: Arc<ExpenseService>,
}

impl AppState {
    pub fn new(auth_service: Arc<AuthService>, expense_service: Arc<ExpenseService>) -> Self {
        Self {
            auth_service,
            expense_service,
        }
    }
}
