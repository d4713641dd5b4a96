//! HTTP/WebSocket API for the liar's dice server.
//!
//! # Endpoints Overview
//!
//! ## Sessions
//! - `POST /api/v1/login` - Start a session, returns a bearer token and user id
//! - `DELETE /api/v1/logout` - End the session (requires auth)
//!
//! ## Games (require auth)
//! - `POST /api/v1/game/create` - Create an empty game
//! - `POST /api/v1/game/{game_id}/join` - Join with `{"name": ...}`
//! - `POST /api/v1/game/{game_id}/start` - Start the game and deal the first round
//! - `POST /api/v1/game/{game_id}/round` - Retry dealing after a failed deal
//! - `POST /api/v1/game/{game_id}/claim` - Claim `{"quantity", "value"}` or `{"cheat": true}`
//! - `GET /api/v1/game/{game_id}/log` - The caller's view of the game log
//!
//! ## WebSocket
//! - `GET /ws?token=<token>` - Live channel for game messages
//!
//! ## Health Check
//! - `GET /health` - Server health status
//!
//! Every game and session response body is an `{ok, message, value?}` record.

pub mod games;
pub mod middleware;
pub mod request_id;
pub mod sessions;
pub mod websocket;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
};
use liars_dice::{ConnectionRegistry, GameEngine, GameError, GamePopulation, Outcome};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::{config::ServerConfig, session::SessionStore};

/// Application state shared across all HTTP handlers and WebSocket connections.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<GameEngine>,
    pub population: Arc<GamePopulation>,
    pub connections: Arc<ConnectionRegistry>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Build fresh, empty stores and an engine wired to the connection registry.
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        let connections = Arc::new(ConnectionRegistry::new(config.ws_queue_capacity));
        let engine = match config.seed {
            Some(seed) => GameEngine::with_seed(connections.clone(), seed),
            None => GameEngine::new(connections.clone()),
        };

        Self {
            engine: Arc::new(engine),
            population: Arc::new(GamePopulation::new()),
            connections,
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

/// Error half of every API handler's result.
pub type ApiError = (StatusCode, Json<Outcome<()>>);

/// Result type for API handlers
pub type ApiResult<T> = Result<Json<Outcome<T>>, ApiError>;

/// Map an engine error to its HTTP status and outcome body.
pub fn reject(error: GameError) -> ApiError {
    let status = match error {
        GameError::GameNotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, Json(Outcome::failure(&error)))
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let v1_routes = create_v1_router(state.clone());

    let root_routes = Router::new()
        .route("/health", get(health_check))
        // WebSocket route handles its own auth via query parameter
        .route("/ws", get(websocket::websocket_handler));

    Router::new()
        .merge(root_routes)
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn create_v1_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new().route("/login", post(sessions::login));

    let protected_routes = Router::new()
        .route("/logout", delete(sessions::logout))
        .route("/game/create", post(games::create_game))
        .route("/game/{game_id}/join", post(games::join_game))
        .route("/game/{game_id}/start", post(games::start_game))
        .route("/game/{game_id}/round", post(games::start_round))
        .route("/game/{game_id}/claim", post(games::claim))
        .route("/game/{game_id}/log", get(games::game_log))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth_middleware,
        ));

    Router::new().merge(public_routes).merge(protected_routes)
}

/// Health check endpoint for monitoring and load balancers.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","games":3,"connections":5,"sessions":6}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "games": state.population.len(),
            "connections": state.connections.len(),
            "sessions": state.sessions.len(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_status_codes() {
        let (status, Json(body)) = reject(GameError::GameNotFound);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "game not found");

        let (status, Json(body)) = reject(GameError::NotYourTurn);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.ok);
    }
}
