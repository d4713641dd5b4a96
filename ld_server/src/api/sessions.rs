//! Login and logout handlers.

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use liars_dice::{Outcome, UserId};

use super::{ApiResult, AppState, middleware::{CurrentUser, bearer_token}};
use crate::session::Session;

/// Start a session.
///
/// A request that already carries a live bearer token is rejected with
/// `400 Bad Request` and `already logged in.`.
///
/// # Response
///
/// ```json
/// {"ok": true, "message": "logged in.", "value": {"token": "...", "userId": "..."}}
/// ```
pub async fn login(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Session> {
    match state.sessions.login(bearer_token(&headers)) {
        Ok(session) => {
            log::info!("User {} logged in", session.user_id);
            Ok(Json(Outcome::success("logged in.", session)))
        }
        Err(e) => Err((
            StatusCode::BAD_REQUEST,
            Json(Outcome {
                ok: false,
                message: e.to_string(),
                value: None,
            }),
        )),
    }
}

/// End the caller's session and drop their live connection.
pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<UserId> {
    state.sessions.logout(&user.token);
    state.connections.unregister(&user.user_id);
    log::info!("User {} logged out", user.user_id);
    Ok(Json(Outcome::success("logged out.", user.user_id)))
}
