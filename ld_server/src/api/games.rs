//! Game API handlers.
//!
//! Thin wrappers over [`GameEngine`](liars_dice::GameEngine) operations. The
//! caller's user id always comes from their session, never from the body.
//!
//! # Examples
//!
//! Make a claim:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/game/GAME_ID/claim \
//!   -H "Authorization: Bearer TOKEN" \
//!   -H "Content-Type: application/json" \
//!   -d '{"quantity": 3, "value": 4}'
//! ```

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use liars_dice::{
    Claim, ClaimOutcome, Die, GameError, GameId, GameMessage, Outcome, Participant, UserId,
};
use serde::Deserialize;

use super::{ApiResult, AppState, middleware::CurrentUser, reject};

#[derive(Debug, Default, Deserialize)]
pub struct JoinGameRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Claim payload. A cheat call needs no quantity or value.
#[derive(Debug, Default, Deserialize)]
pub struct ClaimRequest {
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub value: Option<Die>,
    #[serde(default)]
    pub cheat: bool,
}

impl ClaimRequest {
    fn into_claim(self) -> Result<Claim, GameError> {
        if self.cheat {
            return Ok(Claim::cheat());
        }
        match (self.quantity, self.value) {
            (Some(quantity), Some(value)) => Ok(Claim::new(quantity, value)),
            _ => Err(GameError::NoClaimProvided),
        }
    }
}

/// Create an empty game owned by no one yet.
///
/// The creator still has to join it.
pub async fn create_game(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<GameId> {
    let game_id = state
        .engine
        .create_game(&user.user_id, &state.population)
        .map_err(reject)?;
    Ok(Json(Outcome::success("game created.", game_id)))
}

/// Join a game under a display name.
///
/// # Request Body
///
/// ```json
/// {"name": "Alice"}
/// ```
pub async fn join_game(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(game_id): Path<String>,
    Json(request): Json<JoinGameRequest>,
) -> ApiResult<Vec<Participant>> {
    let name = request.name.unwrap_or_default();
    let participants = state
        .engine
        .join_game(&user.user_id, &game_id, &name, &state.population)
        .map_err(reject)?;
    Ok(Json(Outcome::success("game joined.", participants)))
}

/// Start a game and deal its first round.
///
/// If dealing fails (typically because a participant has no live WebSocket)
/// the game stays started and the error is returned. Dealing can then be
/// retried through [`start_round`].
pub async fn start_game(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(game_id): Path<String>,
) -> ApiResult<GameId> {
    let game_id = state
        .engine
        .start_game(&user.user_id, &game_id, &state.population)
        .map_err(reject)?;
    state
        .engine
        .start_round(&game_id, &state.population)
        .map_err(reject)?;
    Ok(Json(Outcome::success("game started.", game_id)))
}

/// Deal the next round again after dealing failed.
///
/// Only a game whose log ends in `GameStarted` or `RoundResults` can be
/// dealt, so a round in progress is never replaced. Returns the starting
/// player's id.
pub async fn start_round(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(game_id): Path<String>,
) -> ApiResult<UserId> {
    let seated = state
        .population
        .snapshot(&game_id)
        .ok_or(GameError::GameNotFound)
        .map_err(reject)?
        .has_participant(&user.user_id);
    if !seated {
        return Err(reject(GameError::NotAParticipant));
    }

    let starting_player = state
        .engine
        .start_round(&game_id, &state.population)
        .map_err(reject)?;
    Ok(Json(Outcome::success("round started.", starting_player.user_id)))
}

/// Make a claim or call cheat.
///
/// # Request Body
///
/// ```json
/// {"quantity": 3, "value": 4}
/// {"cheat": true}
/// ```
pub async fn claim(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(game_id): Path<String>,
    Json(request): Json<ClaimRequest>,
) -> ApiResult<ClaimOutcome> {
    let claim = request.into_claim().map_err(reject)?;
    let outcome = state
        .engine
        .process_claim(&game_id, &user.user_id, claim, &state.population)
        .map_err(reject)?;
    Ok(Json(Outcome::success("claim processed.", outcome)))
}

/// The caller's view of a game's message log.
///
/// Other participants' `RoundStarted` records, and with them their dice,
/// are left out.
pub async fn game_log(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(game_id): Path<String>,
) -> ApiResult<Vec<GameMessage>> {
    let log = state
        .engine
        .game_log(&game_id, &user.user_id, &state.population)
        .map_err(reject)?;
    Ok(Json(Outcome::success("game log.", log)))
}
