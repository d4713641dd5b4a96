use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use std::sync::{Arc, Mutex, PoisonError};

use super::{
    GameError, GameResult,
    constants::DIE_FACES,
    entities::{Die, GameMessage},
    population::{GamePopulation, lock},
};
use crate::net::messenger::Messenger;

/// The liar's dice rules engine.
///
/// The engine holds no game state of its own. Every operation takes the
/// [`GamePopulation`] it acts on, locks the one game it touches for the whole
/// validate-then-mutate sequence, and hands outbound messages to its
/// [`Messenger`].
///
/// Operations are split across submodules by concern:
/// - lifecycle: `create_game`, `join_game`, `start_game`
/// - rounds: `start_round`, `generate_dice_and_notify_game_message`
/// - starting player: `calculate_starting_player`
/// - claims: `process_claim`, `resolve_claim`, `resolve_cheat`
pub struct GameEngine {
    pub(super) messenger: Arc<dyn Messenger>,
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl GameEngine {
    /// Create an engine whose dice are seeded from OS entropy.
    #[must_use]
    pub fn new(messenger: Arc<dyn Messenger>) -> Self {
        Self::with_rng(messenger, StdRng::from_os_rng())
    }

    /// Create an engine drawing dice and starting players from `rng`.
    pub fn with_rng(messenger: Arc<dyn Messenger>, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            messenger,
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Create an engine with a deterministic RNG.
    #[must_use]
    pub fn with_seed(messenger: Arc<dyn Messenger>, seed: u64) -> Self {
        Self::with_rng(messenger, StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn messenger(&self) -> &Arc<dyn Messenger> {
        &self.messenger
    }

    /// The log of a game as `viewer` is allowed to see it.
    ///
    /// Only participants may read a game's log.
    pub fn game_log(
        &self,
        game_id: &str,
        viewer: &str,
        game_population: &GamePopulation,
    ) -> GameResult<Vec<GameMessage>> {
        require(game_id, GameError::NoGameIDProvided)?;
        require(viewer, GameError::NoUserIDProvided)?;

        let handle = game_population
            .get(game_id)
            .ok_or(GameError::GameNotFound)?;
        let game = lock(&handle);
        if !game.has_participant(viewer) {
            return Err(GameError::NotAParticipant);
        }
        Ok(game.log_for(viewer))
    }

    /// Roll `count` dice.
    pub(super) fn roll_dice(&self, count: u8) -> Vec<Die> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        (0..count).map(|_| rng.random_range(DIE_FACES)).collect()
    }

    /// Uniform index into a non-empty sequence of length `len`.
    pub(super) fn pick_index(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(0..len)
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine").finish_non_exhaustive()
    }
}

/// Treat an empty or whitespace-only argument as absent.
pub(super) fn require(value: &str, error: GameError) -> GameResult<()> {
    if value.trim().is_empty() {
        Err(error)
    } else {
        Ok(())
    }
}
