//! Request identity guard
//!
//! `require_identity` runs in front of every protected route. It accepts only
//! an `Authorization` header of the exact form `Bearer <token>`, validates the
//! token, and stores the resulting [`AuthenticatedIdentity`] in the request
//! extensions. Handlers read it back with the [`CurrentUser`] extractor and
//! never look at the header themselves.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::UserId;

const BEARER_SCHEME: &str = "Bearer";

/// Identity bound to a request that passed the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub user_id: UserId,
}

/// Middleware rejecting any request without a valid bearer token
pub async fn require_identity(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = parse_bearer(request.headers()) else {
        debug!("Rejected request: missing or malformed Authorization header");
        return Err(ApiError::invalid_token());
    };

    let user_id = state.auth_service.authenticate(token).map_err(|_| {
        debug!("Rejected request: token failed validation");
        ApiError::invalid_token()
    })?;

    request
        .extensions_mut()
        .insert(AuthenticatedIdentity { user_id });

    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`
///
/// Exactly one space separates the scheme from a non-empty token; any other
/// shape returns `None`.
pub fn parse_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let mut parts = value.split(' ');
    let (scheme, token) = (parts.next()?, parts.next()?);

    if parts.next().is_some() || scheme != BEARER_SCHEME || token.is_empty() {
        return None;
    }

    Some(token)
}

/// The authenticated user of the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthenticatedIdentity>() {
            Some(identity) => Ok(CurrentUser(identity.user_id.clone())),
            None => {
                error!(path = %parts.uri.path(), "Handler reached without identity guard");
                Err(ApiError::invalid_token())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::test_support::in_memory_state;
    use axum::{
        body::to_bytes,
        http::StatusCode,
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    async fn whoami(CurrentUser(user_id): CurrentUser) -> String {
        user_id.to_string()
    }

    fn guarded_app(state: AppState) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_identity))
            .route("/open", get(whoami))
            .with_state(state)
    }

    async fn call(app: Router, auth: Option<&str>, uri: &str) -> (StatusCode, String) {
        let mut builder = Request::builder().uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }

        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn valid_token(state: &AppState) -> (UserId, String) {
        let user = state.auth_service.register("a@b.com", "secret1").await.unwrap();
        let pair = state.auth_service.login("a@b.com", "secret1").await.unwrap();
        (user.id().clone(), pair.access_token)
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn test_parse_bearer_rejects_malformed_shapes() {
        assert_eq!(parse_bearer(&HeaderMap::new()), None);
        assert_eq!(parse_bearer(&headers("Bearer")), None);
        assert_eq!(parse_bearer(&headers("Bearer ")), None);
        assert_eq!(parse_bearer(&headers("bearer abc")), None);
        assert_eq!(parse_bearer(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(parse_bearer(&headers("Bearer  abc")), None);
        assert_eq!(parse_bearer(&headers("Bearer abc def")), None);
        assert_eq!(parse_bearer(&headers("abc")), None);
    }

    #[tokio::test]
    async fn test_valid_token_binds_identity() {
        let state = in_memory_state();
        let (user_id, token) = valid_token(&state).await;

        let (status, body) = call(
            guarded_app(state),
            Some(&format!("Bearer {}", token)),
            "/whoami",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, user_id.as_str());
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let (status, body) = call(guarded_app(in_memory_state()), None, "/whoami").await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("authentication_error"));
    }

    #[tokio::test]
    async fn test_bad_token_and_bad_scheme_look_the_same() {
        let state = in_memory_state();
        let (_, token) = valid_token(&state).await;

        let (s1, b1) = call(guarded_app(state.clone()), Some("Bearer not-a-token"), "/whoami").await;
        let (s2, b2) = call(
            guarded_app(state.clone()),
            Some(&format!("Token {}", token)),
            "/whoami",
        )
        .await;
        let (s3, b3) = call(
            guarded_app(state),
            Some(&format!("Bearer {}x", token)),
            "/whoami",
        )
        .await;

        assert_eq!(s1, StatusCode::UNAUTHORIZED);
        assert_eq!((s1, &b1), (s2, &b2));
        assert_eq!((s1, &b1), (s3, &b3));
    }

    #[tokio::test]
    async fn test_unguarded_handler_rejects_without_identity() {
        let (status, _) = call(guarded_app(in_memory_state()), None, "/open").await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
