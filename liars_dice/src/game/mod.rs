//! Liar's dice game engine.
//!
//! This module provides:
//! - Entities and the tagged [`GameMessage`](entities::GameMessage) log
//! - The verbatim error catalog ([`GameError`])
//! - Lifecycle operations (create, join, start)
//! - Rounds (dice generation and private notification)
//! - Starting-player resolution from the message log
//! - Claim processing and cheat adjudication
//! - The shared [`GamePopulation`] store with per-game locking

pub mod constants;
pub mod entities;
pub mod errors;
pub mod population;

mod claims;
mod engine;
mod lifecycle;
mod round;
mod starting_player;

pub use claims::{CheatOutcome, ClaimOutcome};
pub use engine::GameEngine;
pub use errors::{GameError, GameResult, Outcome};
pub use population::GamePopulation;
