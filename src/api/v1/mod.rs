//! Versioned API endpoints

pub mod auth;
pub mod expenses;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::middleware::require_identity;
use super::state::AppState;

/// Create the /api/v1 router
///
/// Registration and login are public; everything else passes the identity
/// guard first.
pub fn create_v1_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route(
            "/expenses",
            post(expenses::create_expense).get(expenses::list_expenses),
        )
        .route(
            "/expenses/{id}",
            get(expenses::get_expense)
                .put(expenses::update_expense)
                .delete(expenses::delete_expense),
        )
        .route_layer(middleware::from_fn_with_state(state, require_identity));

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected)
}
