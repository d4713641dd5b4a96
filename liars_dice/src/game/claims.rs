//! Claim validation, relaying and cheat adjudication.

use serde::{Deserialize, Serialize};

use super::{
    GameError, GameResult,
    constants::DIE_FACES,
    engine::{GameEngine, require},
    entities::{Claim, Game, GameMessage, GameOver, Participant, RoundResults, UserId},
    population::{GamePopulation, lock},
};

/// What happened to a processed claim.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClaimOutcome {
    /// The claim was relayed and play passed to the next active participant.
    Passed { next_player_id: UserId },
    /// The claim was a cheat call and has been adjudicated.
    Challenged(CheatOutcome),
}

/// Result of adjudicating a cheat call.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheatOutcome {
    pub results: RoundResults,
    /// Set when the call left a single active participant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Participant>,
}

impl GameEngine {
    /// Validate a player's claim against the game's log tail and dispatch it.
    ///
    /// Turn order comes from the last log entry:
    /// - after a claim, only that claim's `next_player_id` may act
    /// - at the start of a round, only the round's starting player may act
    ///
    /// Non-cheat claims must name a die face, a positive quantity and, after a
    /// claim, a strictly larger quantity than that claim.
    pub fn process_claim(
        &self,
        game_id: &str,
        player_id: &str,
        claim: Claim,
        game_population: &GamePopulation,
    ) -> GameResult<ClaimOutcome> {
        require(game_id, GameError::NoGameIDProvided)?;
        require(player_id, GameError::NoUserIDProvided)?;

        let handle = game_population
            .get(game_id)
            .ok_or(GameError::GameNotFound)?;
        let mut game = lock(&handle);

        if !game.is_started() {
            return Err(GameError::GameNotStarted);
        }
        if game.is_finished() {
            return Err(GameError::GameAlreadyFinished);
        }

        let previous = check_turn(&game, player_id).inspect_err(|_| {
            log::warn!("{} acted out of turn in game {}", player_id, game_id);
        })?;

        if claim.cheat {
            let last = game
                .last_message()
                .cloned()
                .ok_or(GameError::CanOnlyCheatClaim)?;
            return self
                .resolve_cheat_locked(game_id, player_id, &last, &mut game)
                .map(ClaimOutcome::Challenged);
        }

        if !DIE_FACES.contains(&claim.value) {
            return Err(GameError::InvalidClaimValue);
        }
        if claim.quantity == 0 {
            return Err(GameError::InvalidClaimQuantity);
        }
        if previous.is_some_and(|previous| claim.quantity <= previous.quantity) {
            return Err(GameError::ClaimTooLow);
        }

        self.resolve_claim_locked(game_id, player_id, claim, &mut game)
            .map(|next_player_id| ClaimOutcome::Passed { next_player_id })
    }

    /// Stamp a claim with its author and the next active participant, then
    /// broadcast it.
    ///
    /// Returns the id of the participant whose turn it now is.
    pub fn resolve_claim(
        &self,
        game_id: &str,
        player_id: &str,
        claim: Claim,
        game_population: &GamePopulation,
    ) -> GameResult<UserId> {
        require(game_id, GameError::NoGameIDProvided)?;
        require(player_id, GameError::NoUserIDProvided)?;

        let handle = game_population
            .get(game_id)
            .ok_or(GameError::GameNotFound)?;
        let mut game = lock(&handle);
        self.resolve_claim_locked(game_id, player_id, claim, &mut game)
    }

    fn resolve_claim_locked(
        &self,
        game_id: &str,
        player_id: &str,
        mut claim: Claim,
        game: &mut Game,
    ) -> GameResult<UserId> {
        let position = game
            .position_of(player_id)
            .ok_or(GameError::NotAParticipant)?;
        let next_player_id = game
            .next_active_after(position)
            .map(|p| p.user_id.clone())
            .ok_or(GameError::NotYourTurn)?;

        claim.cheat = false;
        claim.player_id = Some(player_id.to_string());
        claim.next_player_id = Some(next_player_id.clone());
        log::debug!(
            "{} claims {} in game {}, {} is next",
            player_id,
            claim,
            game_id,
            next_player_id
        );

        self.messenger
            .send_game_message_to_all(game, GameMessage::Claim(claim));
        Ok(next_player_id)
    }

    /// Adjudicate a cheat call against `last_claim_message`.
    ///
    /// Only the accused participant's own dice are counted. The call succeeds
    /// when the claimed quantity exceeds that count, and the accused loses a
    /// die; otherwise the caller does. `RoundResults` is broadcast, then the
    /// game either ends with `GameOver` or moves straight into the next round.
    /// A failure to start that round is returned even though the results were
    /// already sent.
    pub fn resolve_cheat(
        &self,
        game_id: &str,
        player_id: &str,
        last_claim_message: &GameMessage,
        game_population: &GamePopulation,
    ) -> GameResult<CheatOutcome> {
        require(game_id, GameError::NoGameIDProvided)?;
        require(player_id, GameError::NoUserIDProvided)?;

        let handle = game_population
            .get(game_id)
            .ok_or(GameError::GameNotFound)?;
        let mut game = lock(&handle);
        if game.is_finished() {
            return Err(GameError::GameAlreadyFinished);
        }
        self.resolve_cheat_locked(game_id, player_id, last_claim_message, &mut game)
    }

    fn resolve_cheat_locked(
        &self,
        game_id: &str,
        player_id: &str,
        last_claim_message: &GameMessage,
        game: &mut Game,
    ) -> GameResult<CheatOutcome> {
        let GameMessage::Claim(last_claim) = last_claim_message else {
            return Err(GameError::CanOnlyCheatClaim);
        };
        let accused = last_claim
            .player_id
            .as_deref()
            .and_then(|id| game.position_of(id))
            .ok_or(GameError::CanOnlyCheatClaim)?;
        let caller = game
            .position_of(player_id)
            .ok_or(GameError::NotAParticipant)?;

        let count = game.participants[accused].count_of(last_claim.value);
        let cheat_success = usize::try_from(last_claim.quantity).unwrap_or(usize::MAX) > count;
        log::debug!(
            "Game {}: {} of {} showing {} (claimed {})",
            game_id,
            count,
            game.participants[accused].user_id,
            last_claim.value,
            last_claim.quantity
        );

        let loser = if cheat_success { accused } else { caller };
        let player_eliminated = game.participants[loser].lose_die();

        let results = RoundResults {
            calling_player: game.participants[caller].clone(),
            called_player: game.participants[accused].clone(),
            claim: last_claim.clone(),
            cheat_success,
            player_eliminated,
        };
        log::info!(
            "Game {}: {} called cheat on {}, {} loses a die{}",
            game_id,
            results.calling_player.user_id,
            results.called_player.user_id,
            game.participants[loser].user_id,
            if player_eliminated { " and is out" } else { "" }
        );
        self.messenger
            .send_game_message_to_all(game, GameMessage::RoundResults(results.clone()));

        let winner = {
            let mut active = game.active_participants();
            match (active.next(), active.next()) {
                (Some(last_standing), None) => Some(last_standing.clone()),
                _ => None,
            }
        };

        if let Some(winner) = winner {
            game.mark_finished();
            log::info!("Game {} over, {} wins", game_id, winner.user_id);
            self.messenger.send_game_message_to_all(
                game,
                GameMessage::GameOver(GameOver {
                    winner: winner.clone(),
                }),
            );
            return Ok(CheatOutcome {
                results,
                winner: Some(winner),
            });
        }

        self.start_round_locked(game_id, game)?;
        Ok(CheatOutcome {
            results,
            winner: None,
        })
    }
}

/// Check that `player_id` may act on the current log tail, returning the claim
/// being answered, if any.
///
/// A round opener may act even when eliminated. Relayed claims only ever name
/// active participants.
fn check_turn(game: &Game, player_id: &str) -> GameResult<Option<Claim>> {
    if !game.has_participant(player_id) {
        return Err(GameError::NotYourTurn);
    }

    match game.last_message() {
        Some(GameMessage::Claim(claim)) => {
            if claim.next_player_id.as_deref() == Some(player_id) {
                Ok(Some(claim.clone()))
            } else {
                Err(GameError::NotYourTurn)
            }
        }
        Some(GameMessage::RoundStarted(_)) => match game.round_opener() {
            Some(opener) if opener.participant.user_id == player_id => Ok(None),
            _ => Err(GameError::NotYourTurn),
        },
        _ => Err(GameError::NotYourTurn),
    }
}
