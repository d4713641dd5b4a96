/// Property-based tests over randomly played games
///
/// Each case seats a random number of players, deals with a random seed and
/// then plays a random sequence of raises and cheat calls, checking the
/// game's invariants after every action.
use std::sync::Arc;

use liars_dice::{
    Claim, ClaimOutcome, ConnectionRegistry, Game, GameEngine, GamePopulation, STARTING_DICE,
};
use proptest::prelude::*;

const NAMES: [&str; 6] = ["p0", "p1", "p2", "p3", "p4", "p5"];

fn check_invariants(game: &Game) -> Result<(), TestCaseError> {
    for participant in &game.participants {
        prop_assert_eq!(participant.eliminated, participant.number_of_dice == 0);
        prop_assert!(participant.number_of_dice <= STARTING_DICE);
    }
    prop_assert!(!game.is_finished() || game.is_started());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_play_keeps_invariants(
        players in 2usize..=6,
        seed in any::<u64>(),
        actions in prop::collection::vec((any::<bool>(), 1u8..=6), 1..120),
    ) {
        let connections = Arc::new(ConnectionRegistry::default());
        let engine = GameEngine::with_seed(connections.clone(), seed);
        let population = GamePopulation::new();
        let game_id = engine.create_game(NAMES[0], &population).unwrap();

        let mut receivers = Vec::new();
        for name in &NAMES[..players] {
            receivers.push(connections.register(name));
            engine.join_game(name, &game_id, name, &population).unwrap();
        }
        engine.start_game(NAMES[0], &game_id, &population).unwrap();

        let mut current = engine.start_round(&game_id, &population).unwrap().user_id;
        let mut previous_quantity: Option<u32> = None;

        for (call_cheat, value) in actions {
            // Drain so bounded queues never fill up
            for receiver in &mut receivers {
                while receiver.try_recv().is_ok() {}
            }

            let claim = match previous_quantity {
                Some(_) if call_cheat => Claim::cheat(),
                Some(quantity) => Claim::new(quantity + 1, value),
                None => Claim::new(1, value),
            };
            let outcome = engine.process_claim(&game_id, &current, claim, &population);
            prop_assert!(outcome.is_ok(), "{:?}", outcome);

            let game = population.snapshot(&game_id).unwrap();
            check_invariants(&game)?;

            match outcome.unwrap() {
                ClaimOutcome::Passed { next_player_id } => {
                    let actor = game.position_of(&current).unwrap();
                    let expected = game.next_active_after(actor).unwrap();
                    prop_assert_eq!(&next_player_id, &expected.user_id);
                    prop_assert!(expected.is_active());
                    previous_quantity = previous_quantity.map_or(Some(1), |q| Some(q + 1));
                    current = next_player_id;
                }
                ClaimOutcome::Challenged(cheat) => {
                    if let Some(winner) = cheat.winner {
                        prop_assert!(game.is_finished());
                        prop_assert_eq!(game.active_participants().count(), 1);
                        prop_assert!(winner.is_active());
                        break;
                    }
                    let opener = game.round_opener().unwrap();
                    prop_assert_eq!(
                        &opener.participant.user_id,
                        &cheat.results.called_player.user_id
                    );
                    for participant in &game.participants {
                        prop_assert_eq!(participant.roll.len(), usize::from(participant.number_of_dice));
                    }
                    current = opener.participant.user_id.clone();
                    previous_quantity = None;
                }
            }
        }
    }
}
