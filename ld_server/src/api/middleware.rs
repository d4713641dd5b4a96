//! Authentication middleware for protected endpoints.
//!
//! Resolves the `Authorization: Bearer <token>` header against the session
//! store and injects the [`CurrentUser`] into request extensions.
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use ld_server::api::middleware::CurrentUser;
//!
//! async fn protected_handler(Extension(user): Extension<CurrentUser>) -> String {
//!     format!("Authenticated as user {}", user.user_id)
//! }
//! # let _ = protected_handler;
//! ```

use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use liars_dice::{Outcome, UserId};

use super::AppState;

/// The authenticated caller of a request.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub token: String,
}

/// Bearer token from the `Authorization` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Reject requests without a live session with `401 Unauthorized`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()).map(str::to_string) else {
        return unauthorized();
    };

    match state.sessions.user_for(&token) {
        Some(user_id) => {
            request
                .extensions_mut()
                .insert(CurrentUser { user_id, token });
            next.run(request).await
        }
        None => unauthorized(),
    }
}

fn unauthorized() -> Response {
    let body: Outcome<()> = Outcome {
        ok: false,
        message: "not logged in.".to_string(),
        value: None,
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
