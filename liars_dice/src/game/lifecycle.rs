//! Admission rules: creating, joining and starting games.

use uuid::Uuid;

use super::{
    GameError, GameResult,
    constants::MIN_PLAYERS,
    engine::{GameEngine, require},
    entities::{Game, GameId, GameMessage, Participant},
    population::{GamePopulation, lock},
};

impl GameEngine {
    /// Create an empty game and return its id.
    ///
    /// Only a game that is currently running blocks a new one; games that
    /// haven't started or have finished don't count.
    pub fn create_game(&self, user_id: &str, game_population: &GamePopulation) -> GameResult<GameId> {
        require(user_id, GameError::NoUserIDProvided)?;

        if game_population.any_game(None, |game| {
            game.is_running() && game.has_participant(user_id)
        }) {
            log::warn!("{} tried to create a game while in a running game", user_id);
            return Err(GameError::CantCreateNewGameWhenInGame);
        }

        let game_id = Uuid::new_v4().to_string();
        game_population.insert(game_id.clone(), Game::new());
        log::info!("Game {} created by {}", game_id, user_id);
        Ok(game_id)
    }

    /// Seat a new participant and broadcast `PlayerJoined`.
    ///
    /// Returns the updated participant list. A game may be joined mid-round, so
    /// every roll other than the joiner's own is cleared.
    pub fn join_game(
        &self,
        user_id: &str,
        game_id: &str,
        name: &str,
        game_population: &GamePopulation,
    ) -> GameResult<Vec<Participant>> {
        require(user_id, GameError::NoUserIDProvided)?;
        require(game_id, GameError::NoGameIDProvided)?;
        require(name, GameError::NoNameProvided)?;

        let handle = game_population
            .get(game_id)
            .ok_or(GameError::GameNotFound)?;

        // Other games are checked before this game's lock is taken.
        let busy_elsewhere = game_population.any_game(Some(game_id), |game| {
            game.is_running() && game.participant(user_id).is_some_and(Participant::is_active)
        });
        if busy_elsewhere {
            log::warn!("{} tried to join {} while in a running game", user_id, game_id);
            return Err(GameError::CantJoinGameWhenInRunningGame);
        }

        let mut game = lock(&handle);
        if game.has_participant(user_id) {
            log::warn!("{} is already seated in {}", user_id, game_id);
            return Err(GameError::CantJoinGameWhenInRunningGame);
        }

        let participant = Participant::new(user_id, name);
        game.participants.push(participant.clone());
        self.messenger
            .send_game_message_to_all(&mut game, GameMessage::PlayerJoined(participant));
        log::info!(
            "{} joined game {} ({} seated)",
            user_id,
            game_id,
            game.participants.len()
        );
        Ok(game
            .participants
            .iter()
            .map(|p| {
                let mut seen = p.clone();
                if seen.user_id != user_id {
                    seen.roll.clear();
                }
                seen
            })
            .collect())
    }

    /// Mark a game started and broadcast `GameStarted`.
    ///
    /// The first round is not dealt here; callers follow up with
    /// [`GameEngine::start_round`].
    pub fn start_game(
        &self,
        user_id: &str,
        game_id: &str,
        game_population: &GamePopulation,
    ) -> GameResult<GameId> {
        require(user_id, GameError::NoUserIDProvided)?;
        require(game_id, GameError::NoGameIDProvided)?;

        let handle = game_population
            .get(game_id)
            .ok_or(GameError::GameNotFound)?;
        let mut game = lock(&handle);

        if game.is_started() {
            return Err(GameError::GameAlreadyStarted);
        }
        if !game.has_participant(user_id) {
            return Err(GameError::MustBeInGameToStartGame);
        }
        if game.participants.len() < MIN_PLAYERS {
            return Err(GameError::MustHaveTwoOrMorePlayers);
        }

        game.mark_started();
        self.messenger
            .send_game_message_to_all(&mut game, GameMessage::GameStarted);
        log::info!(
            "Game {} started by {} with {} players",
            game_id,
            user_id,
            game.participants.len()
        );
        Ok(game_id.to_string())
    }
}
