//! Engine error catalog and the wire outcome record.
//!
//! The `Display` strings of [`GameError`] are part of the client contract and
//! must not change.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by engine operations and the message delivery layer.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("no userId provided")]
    NoUserIDProvided,
    #[error("no gamePopulation provided")]
    NoGamePopulationProvided,
    #[error("no gameId provided")]
    NoGameIDProvided,
    #[error("no name provided")]
    NoNameProvided,
    #[error("no game provided")]
    NoGameSpecified,
    #[error("no claim provided")]
    NoClaimProvided,
    #[error("no starting player provided")]
    NoStartingPlayerProvided,
    #[error("no messageType provided")]
    NoMessageTypeProvided,
    #[error("no wsConnections provided")]
    NoConnectionListProvided,
    #[error("no participant provided")]
    NoParticipantProvided,
    #[error("no message provided")]
    NoMessageProvided,
    #[error("it's not your turn.")]
    NotYourTurn,
    #[error("can't call cheat if no one has made a claim.")]
    CanOnlyCheatClaim,
    #[error("you need to make a claim of larger quantity than the last claim or call cheat.")]
    ClaimTooLow,
    #[error("participantId not found in wsConnection list.")]
    ParticipantNotInConnectionList,
    #[error("player can't create a new game when already in a game.")]
    CantCreateNewGameWhenInGame,
    #[error("game not found")]
    GameNotFound,
    #[error("player can't join a new game when already in a running game.")]
    CantJoinGameWhenInRunningGame,
    #[error("game already started.")]
    GameAlreadyStarted,
    #[error("you must be in the game to start the game.")]
    MustBeInGameToStartGame,
    #[error("no gameMessages.  Start the game before calculating starting player.")]
    NoGameMessagesFound,
    #[error("Unable to determine starting player.")]
    UnableToDetermineStartingPlayer,
    #[error("game not started")]
    GameNotStarted,
    #[error("game already finished.")]
    GameAlreadyFinished,
    #[error("must have 2 or more players.")]
    MustHaveTwoOrMorePlayers,
    #[error("claim value must be a die face between 1 and 6.")]
    InvalidClaimValue,
    #[error("claim quantity must be at least 1.")]
    InvalidClaimQuantity,
    #[error("you are not a participant in this game.")]
    NotAParticipant,
    #[error("failed to encode game message: {0}")]
    MessageEncoding(String),
}

/// Result type for engine operations
pub type GameResult<T> = Result<T, GameError>;

/// The `{ok, message, value?}` record returned to clients for every action.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub ok: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
}

impl<T> Outcome<T> {
    pub fn success(message: impl Into<String>, value: T) -> Self {
        Self {
            ok: true,
            message: message.into(),
            value: Some(value),
        }
    }

    pub fn failure(error: &GameError) -> Self {
        Self {
            ok: false,
            message: error.to_string(),
            value: None,
        }
    }

    /// Build an outcome from an engine result, using `message` on success.
    pub fn from_result(result: GameResult<T>, message: impl Into<String>) -> Self {
        match result {
            Ok(value) => Self::success(message, value),
            Err(error) => Self::failure(&error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_strings_are_verbatim() {
        assert_eq!(GameError::NotYourTurn.to_string(), "it's not your turn.");
        assert_eq!(
            GameError::CanOnlyCheatClaim.to_string(),
            "can't call cheat if no one has made a claim."
        );
        assert_eq!(
            GameError::NoGameMessagesFound.to_string(),
            "no gameMessages.  Start the game before calculating starting player."
        );
        assert_eq!(
            GameError::NoConnectionListProvided.to_string(),
            "no wsConnections provided"
        );
    }

    #[test]
    fn test_outcome_failure_has_no_value() {
        let outcome: Outcome<String> = Outcome::failure(&GameError::GameNotFound);
        assert!(!outcome.ok);
        assert_eq!(outcome.message, "game not found");

        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("value").is_none());
    }

    #[test]
    fn test_outcome_from_result() {
        let outcome = Outcome::from_result(Ok::<_, GameError>(3), "done");
        assert!(outcome.ok);
        assert_eq!(outcome.value, Some(3));

        let outcome = Outcome::from_result(Err::<u8, _>(GameError::ClaimTooLow), "done");
        assert!(!outcome.ok);
        assert_eq!(outcome.message, GameError::ClaimTooLow.to_string());
    }
}
