//! Dealing rounds and private round notifications.

use super::{
    GameError, GameResult,
    engine::{GameEngine, require},
    entities::{Game, GameMessage, Participant, RoundSetup},
    population::{GamePopulation, lock},
};

impl GameEngine {
    /// Resolve the starting player, deal fresh dice to everyone and notify
    /// each participant privately.
    ///
    /// Returns the starting player.
    pub fn start_round(
        &self,
        game_id: &str,
        game_population: &GamePopulation,
    ) -> GameResult<Participant> {
        require(game_id, GameError::NoGameIDProvided)?;

        let handle = game_population
            .get(game_id)
            .ok_or(GameError::GameNotFound)?;
        let mut game = lock(&handle);
        self.start_round_locked(game_id, &mut game)
    }

    pub(super) fn start_round_locked(
        &self,
        game_id: &str,
        game: &mut Game,
    ) -> GameResult<Participant> {
        let starting_player = self.calculate_starting_player(game)?;
        self.deal_and_notify(game_id, &starting_player.user_id, game)?;
        log::info!(
            "Round started in game {}, {} opens",
            game_id,
            starting_player.user_id
        );
        Ok(starting_player)
    }

    /// Roll every participant's dice and send each participant a private
    /// `RoundStarted` record with their own roll.
    ///
    /// Every participant needs a live channel. If one is missing nothing is
    /// rolled or sent.
    pub fn generate_dice_and_notify_game_message(
        &self,
        game_id: &str,
        starting_player_id: &str,
        game_population: &GamePopulation,
    ) -> GameResult<()> {
        require(game_id, GameError::NoGameIDProvided)?;
        require(starting_player_id, GameError::NoStartingPlayerProvided)?;

        let handle = game_population
            .get(game_id)
            .ok_or(GameError::GameNotFound)?;
        let mut game = lock(&handle);
        self.deal_and_notify(game_id, starting_player_id, &mut game)
    }

    fn deal_and_notify(
        &self,
        game_id: &str,
        starting_player_id: &str,
        game: &mut Game,
    ) -> GameResult<()> {
        if !game.has_participant(starting_player_id) {
            log::error!(
                "Starting player {} is not seated in game {}",
                starting_player_id,
                game_id
            );
            return Err(GameError::UnableToDetermineStartingPlayer);
        }
        if let Some(missing) = game
            .participants
            .iter()
            .find(|p| !self.messenger.is_connected(&p.user_id))
        {
            log::warn!(
                "Cannot deal game {}: {} has no live connection",
                game_id,
                missing.user_id
            );
            return Err(GameError::ParticipantNotInConnectionList);
        }

        for index in 0..game.participants.len() {
            let roll = self.roll_dice(game.participants[index].number_of_dice);
            log::debug!(
                "Dealt {:?} to {} in game {}",
                roll,
                game.participants[index].user_id,
                game_id
            );
            game.participants[index].roll = roll;
        }

        let setups: Vec<RoundSetup> = game
            .participants
            .iter()
            .map(|participant| RoundSetup {
                participant: participant.clone(),
                starting_player: participant.user_id == starting_player_id,
            })
            .collect();
        for setup in setups {
            let recipient = setup.participant.user_id.clone();
            self.messenger
                .send_game_message_to_one(game, &recipient, GameMessage::RoundStarted(setup))?;
        }
        Ok(())
    }
}
