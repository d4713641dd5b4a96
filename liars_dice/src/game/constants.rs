use std::ops::RangeInclusive;

use super::entities::Die;

/// Dice every participant starts a game with.
pub const STARTING_DICE: u8 = 5;

/// Fewest participants a game can start with.
pub const MIN_PLAYERS: usize = 2;

/// Faces of a six-sided die.
pub const DIE_FACES: RangeInclusive<Die> = 1..=6;
