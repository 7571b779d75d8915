use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use super::health;
use super::middleware::logging_middleware;
use super::state::AppState;
use super::types::ApiError;
use super::v1;

/// Create the full router with application state
///
/// Requests exceeding `request_timeout` are dropped with 408; dropping the
/// handler future also cancels any storage call it was awaiting.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let router = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .nest("/api/v1", v1::create_v1_router(state.clone()))
        .with_state(state);

    with_middleware(router, request_timeout)
}

fn with_middleware(router: Router, request_timeout: Duration) -> Router {
    router
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::map_response(timeout_error_body))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

/// TimeoutLayer answers with an empty 408; give it the API error body
async fn timeout_error_body(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return ApiError::timeout("Request timed out").into_response();
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::test_support::in_memory_state;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(in_memory_state(), Duration::from_secs(30))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, value)
    }

    async fn register_and_login(app: &Router, email: &str) -> String {
        let credentials = json!({ "email": email, "password": "secret1" });

        let (status, _) = send(app, "POST", "/api/v1/auth/register", None, Some(credentials.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(app, "POST", "/api/v1/auth/login", None, Some(credentials)).await;
        assert_eq!(status, StatusCode::OK);

        body["token"].as_str().unwrap().to_string()
    }

    fn lunch() -> Value {
        json!({
            "amount": 23.5,
            "description": "Team lunch",
            "category": "LEISURE",
            "date": "2024-03-14"
        })
    }

    #[tokio::test]
    async fn test_health_and_banner() {
        let app = app();

        let (status, body) = send(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_response_shape() {
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({ "email": "a@b.com", "password": "secret1" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "a@b.com");
        assert!(body["id"].is_string());
        assert!(body["created_at"].is_string());
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_register_login_flow() {
        let app = app();
        let credentials = json!({ "email": "a@b.com", "password": "secret1" });

        let (status, _) = send(&app, "POST", "/api/v1/auth/register", None, Some(credentials.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({ "email": "a@b.com", "password": "other1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["type"], "conflict_error");

        let (status, body) = send(&app, "POST", "/api/v1/auth/login", None, Some(credentials)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["token"].is_string());
        assert!(body["refresh_token"].is_string());
        assert_eq!(body["expires_in"], 3600);

        let token = body["token"].as_str().unwrap();
        let (status, me) = send(&app, "GET", "/api/v1/auth/me", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["email"], "a@b.com");
    }

    #[tokio::test]
    async fn test_login_failures_share_one_response() {
        let app = app();
        register_and_login(&app, "a@b.com").await;

        let wrong_password = send(
            &app,
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "a@b.com", "password": "wrong" })),
        )
        .await;
        let unknown_email = send(
            &app,
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "x@y.com", "password": "secret1" })),
        )
        .await;

        assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password, unknown_email);
    }

    #[tokio::test]
    async fn test_register_validation_errors() {
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({ "email": "nope", "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["type"], "invalid_request_error");

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({ "email": "a@b.com" })),
        )
        .await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let app = app();

        for (method, uri) in [
            ("GET", "/api/v1/auth/me"),
            ("GET", "/api/v1/expenses"),
            ("POST", "/api/v1/expenses"),
            ("GET", "/api/v1/expenses/abc"),
            ("PUT", "/api/v1/expenses/abc"),
            ("DELETE", "/api/v1/expenses/abc"),
        ] {
            let (status, body) = send(&app, method, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
            assert_eq!(body["error"]["type"], "authentication_error");

            let (status, _) = send(&app, method, uri, Some("garbage"), None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        }
    }

    #[tokio::test]
    async fn test_expense_crud() {
        let app = app();
        let token = register_and_login(&app, "a@b.com").await;

        let (status, created) = send(&app, "POST", "/api/v1/expenses", Some(&token), Some(lunch())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["category"], "LEISURE");
        let id = created["id"].as_str().unwrap().to_string();
        let path = format!("/api/v1/expenses/{}", id);

        let (status, fetched) = send(&app, "GET", &path, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["description"], "Team lunch");

        let (status, updated) = send(
            &app,
            "PUT",
            &path,
            Some(&token),
            Some(json!({ "amount": 30.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["amount"], 30.0);
        assert_eq!(updated["description"], "Team lunch");

        let (status, list) = send(
            &app,
            "GET",
            "/api/v1/expenses?start_date=2024-03-01&end_date=2024-03-31&category=LEISURE",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, "DELETE", &path, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "GET", &path, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_expenses_are_private() {
        let app = app();
        let alice = register_and_login(&app, "alice@x.com").await;
        let bob = register_and_login(&app, "bob@x.com").await;

        let (_, created) = send(&app, "POST", "/api/v1/expenses", Some(&alice), Some(lunch())).await;
        let path = format!("/api/v1/expenses/{}", created["id"].as_str().unwrap());

        let (status, _) = send(&app, "GET", &path, Some(&bob), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "PUT", &path, Some(&bob), Some(json!({ "amount": 1.0 }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", &path, Some(&bob), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, list) = send(&app, "GET", "/api/v1/expenses", Some(&bob), None).await;
        assert!(list.as_array().unwrap().is_empty());

        let (status, kept) = send(&app, "GET", &path, Some(&alice), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(kept["amount"], 23.5);
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_period() {
        let app = app();
        let token = register_and_login(&app, "a@b.com").await;

        let (status, body) = send(&app, "GET", "/api/v1/expenses?period=year", Some(&token), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["param"], "period");
    }

    #[tokio::test]
    async fn test_invalid_expense_is_rejected() {
        let app = app();
        let token = register_and_login(&app, "a@b.com").await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/expenses",
            Some(&token),
            Some(json!({
                "amount": -5.0,
                "description": "Refund",
                "category": "OTHERS",
                "date": "2024-03-14"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_slow_request_times_out_with_error_body() {
        let slow = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "done"
            }),
        );
        let app = with_middleware(slow, Duration::from_millis(50));

        let response = app
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["type"], "timeout_error");
        assert_eq!(body["error"]["message"], "Request timed out");
    }
}
