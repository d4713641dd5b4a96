use super::{
    GameError, GameResult,
    engine::GameEngine,
    entities::{Game, GameMessage, Participant},
};

impl GameEngine {
    /// Derive who opens the next round from the tail of the game's log.
    ///
    /// - after `GameStarted`, a participant chosen uniformly at random
    /// - after `RoundResults`, the called player of that result, whether or not
    ///   the cheat call succeeded and even if it eliminated them
    ///
    /// Any other log tail is an error.
    pub fn calculate_starting_player(&self, game: &Game) -> GameResult<Participant> {
        let Some(last) = game.last_message() else {
            return Err(GameError::NoGameMessagesFound);
        };
        if !game.is_started() {
            return Err(GameError::GameNotStarted);
        }
        if game.is_finished() {
            return Err(GameError::GameAlreadyFinished);
        }

        match last {
            GameMessage::GameStarted => {
                if game.participants.is_empty() {
                    log::error!("Game started without participants");
                    return Err(GameError::UnableToDetermineStartingPlayer);
                }
                let index = self.pick_index(game.participants.len());
                Ok(game.participants[index].clone())
            }
            GameMessage::RoundResults(results) => {
                let called_id = &results.called_player.user_id;
                match game.participant(called_id) {
                    Some(called) => Ok(called.clone()),
                    None => {
                        log::error!("Called player {} is not seated in the game", called_id);
                        Err(GameError::UnableToDetermineStartingPlayer)
                    }
                }
            }
            other => {
                log::error!(
                    "Cannot derive a starting player from a {} log tail",
                    other.message_type()
                );
                Err(GameError::UnableToDetermineStartingPlayer)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        game::entities::{Claim, RoundResults, Visibility},
        net::connections::ConnectionRegistry,
    };

    fn engine() -> GameEngine {
        GameEngine::with_seed(Arc::new(ConnectionRegistry::default()), 11)
    }

    fn started_game() -> Game {
        let mut game = Game::with_participants(vec![
            Participant::new("a", "A"),
            Participant::new("b", "B"),
            Participant::new("c", "C"),
        ]);
        game.mark_started();
        game.append(Visibility::Public, GameMessage::GameStarted);
        game
    }

    fn results(game: &Game, calling: usize, called: usize, cheat_success: bool) -> GameMessage {
        GameMessage::RoundResults(RoundResults {
            calling_player: game.participants[calling].clone(),
            called_player: game.participants[called].clone(),
            claim: Claim::new(2, 2),
            cheat_success,
            player_eliminated: false,
        })
    }

    #[test]
    fn test_error_order() {
        let engine = engine();
        let mut game = Game::new();
        assert_eq!(
            engine.calculate_starting_player(&game),
            Err(GameError::NoGameMessagesFound)
        );

        game.append(Visibility::Public, GameMessage::GameStarted);
        assert_eq!(
            engine.calculate_starting_player(&game),
            Err(GameError::GameNotStarted)
        );

        game.mark_finished();
        assert_eq!(
            engine.calculate_starting_player(&game),
            Err(GameError::GameAlreadyFinished)
        );
    }

    #[test]
    fn test_first_round_picks_a_participant() {
        let engine = engine();
        let game = started_game();
        for _ in 0..20 {
            let starter = engine.calculate_starting_player(&game).unwrap();
            assert!(game.has_participant(&starter.user_id));
        }
    }

    #[test]
    fn test_called_player_opens_regardless_of_outcome() {
        let engine = engine();
        for cheat_success in [true, false] {
            let mut game = started_game();
            let message = results(&game, 0, 1, cheat_success);
            game.append(Visibility::Public, message);

            let starter = engine.calculate_starting_player(&game).unwrap();
            assert_eq!(starter.user_id, "b");
        }
    }

    #[test]
    fn test_eliminated_called_player_still_opens() {
        let engine = engine();
        let mut game = started_game();
        game.participants[1].number_of_dice = 0;
        game.participants[1].eliminated = true;
        let message = results(&game, 0, 1, true);
        game.append(Visibility::Public, message);

        let starter = engine.calculate_starting_player(&game).unwrap();
        assert_eq!(starter.user_id, "b");
        assert!(starter.eliminated);
    }

    #[test]
    fn test_other_tails_are_errors() {
        let engine = engine();
        let mut game = started_game();
        game.append(Visibility::Public, GameMessage::Claim(Claim::new(1, 1)));
        assert_eq!(
            engine.calculate_starting_player(&game),
            Err(GameError::UnableToDetermineStartingPlayer)
        );
    }
}
