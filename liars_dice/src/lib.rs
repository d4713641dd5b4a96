//! # Liar's Dice
//!
//! A rules engine for online, turn-based liar's dice.
//!
//! The engine validates player actions and keeps every game's turn state in an
//! append-only message log. "Whose turn is it" and "what was last claimed" are
//! always re-derived from the tail of that log, never stored as separate fields.
//!
//! ## Core Modules
//!
//! - [`game`]: Entities, the error catalog, and the [`GameEngine`] operations
//!   (lifecycle, rounds, starting player, claims and cheat calls)
//! - [`net`]: The [`Messenger`] delivery contract and the channel-backed
//!   [`ConnectionRegistry`]
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use liars_dice::{ConnectionRegistry, GameEngine, GamePopulation};
//!
//! let connections = Arc::new(ConnectionRegistry::new(16));
//! let engine = GameEngine::with_seed(connections.clone(), 7);
//! let population = GamePopulation::new();
//!
//! let game_id = engine.create_game("alice", &population).unwrap();
//! let _alice = connections.register("alice");
//! let participants = engine.join_game("alice", &game_id, "Alice", &population).unwrap();
//! assert_eq!(participants.len(), 1);
//! ```

/// Game entities, errors, and engine operations.
pub mod game;
pub use game::{
    ClaimOutcome, CheatOutcome, GameEngine, GameError, GamePopulation, GameResult, Outcome,
    constants::{self, DIE_FACES, MIN_PLAYERS, STARTING_DICE},
    entities::{
        self, Claim, Die, Game, GameId, GameMessage, GameOver, LogEntry, MessageType, Participant,
        RoundResults, RoundSetup, UserId, Visibility,
    },
};

/// Message delivery to live participants.
pub mod net;
pub use net::{connections::ConnectionRegistry, messenger::Messenger};
