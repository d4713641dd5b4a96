use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::STARTING_DICE;

/// Opaque user identifier, stable for the lifetime of a game.
pub type UserId = String;

/// Key of a game in the [`GamePopulation`](super::GamePopulation).
pub type GameId = String;

/// Face value of a single die (1 through 6).
pub type Die = u8;

/// A player seated in a game.
///
/// `roll` is private to the participant. It only leaves the engine inside
/// that participant's own `RoundStarted` record, or in the `RoundResults`
/// that settle a cheat call.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: UserId,
    pub name: String,
    pub number_of_dice: u8,
    pub roll: Vec<Die>,
    pub eliminated: bool,
}

impl Participant {
    #[must_use]
    pub fn new(user_id: &str, name: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            name: name.to_string(),
            number_of_dice: STARTING_DICE,
            roll: Vec::new(),
            eliminated: false,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.eliminated
    }

    /// Take one die away, returning whether that eliminated the participant.
    pub fn lose_die(&mut self) -> bool {
        self.number_of_dice = self.number_of_dice.saturating_sub(1);
        self.eliminated = self.number_of_dice == 0;
        self.eliminated
    }

    /// Number of dice in this participant's roll showing `face`.
    #[must_use]
    pub fn count_of(&self, face: Die) -> usize {
        self.roll.iter().filter(|&&die| die == face).count()
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.user_id)
    }
}

/// An assertion that at least `quantity` dice show `value`, or a cheat call.
///
/// `player_id` and `next_player_id` are stamped by the engine when a claim is
/// relayed. Whatever a client sends in those fields is overwritten.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub quantity: u32,
    pub value: Die,
    #[serde(default)]
    pub cheat: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_player_id: Option<UserId>,
}

impl Claim {
    #[must_use]
    pub fn new(quantity: u32, value: Die) -> Self {
        Self {
            quantity,
            value,
            ..Self::default()
        }
    }

    /// A challenge against the previous claim.
    #[must_use]
    pub fn cheat() -> Self {
        Self {
            cheat: true,
            ..Self::default()
        }
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cheat {
            write!(f, "cheat")
        } else {
            write!(f, "{} x {}", self.quantity, self.value)
        }
    }
}

/// One participant's private view of a new round.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSetup {
    pub participant: Participant,
    pub starting_player: bool,
}

/// Outcome of a cheat call.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResults {
    pub calling_player: Participant,
    pub called_player: Participant,
    pub claim: Claim,
    pub cheat_success: bool,
    pub player_eliminated: bool,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameOver {
    pub winner: Participant,
}

/// Tag of a [`GameMessage`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum MessageType {
    GameStarted,
    RoundStarted,
    Claim,
    RoundResults,
    GameOver,
    PlayerJoined,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::GameStarted => "GameStarted",
            Self::RoundStarted => "RoundStarted",
            Self::Claim => "Claim",
            Self::RoundResults => "RoundResults",
            Self::GameOver => "GameOver",
            Self::PlayerJoined => "PlayerJoined",
        };
        write!(f, "{repr}")
    }
}

/// An entry of a game's message log, serialized on the wire as
/// `{"messageType": ..., "message": ...}`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "messageType", content = "message")]
pub enum GameMessage {
    GameStarted,
    RoundStarted(RoundSetup),
    Claim(Claim),
    RoundResults(RoundResults),
    GameOver(GameOver),
    PlayerJoined(Participant),
}

impl GameMessage {
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::GameStarted => MessageType::GameStarted,
            Self::RoundStarted(_) => MessageType::RoundStarted,
            Self::Claim(_) => MessageType::Claim,
            Self::RoundResults(_) => MessageType::RoundResults,
            Self::GameOver(_) => MessageType::GameOver,
            Self::PlayerJoined(_) => MessageType::PlayerJoined,
        }
    }
}

/// Who may see a log entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Visibility {
    Public,
    Private(UserId),
}

impl Visibility {
    #[must_use]
    pub fn is_visible_to(&self, viewer: &str) -> bool {
        match self {
            Self::Public => true,
            Self::Private(owner) => owner == viewer,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogEntry {
    pub visibility: Visibility,
    pub message: GameMessage,
}

/// A single game instance.
///
/// There is no "current player" or "current claim" field; both are derived
/// from the tail of the message log. `started` and `finished` only ever go
/// from `false` to `true`.
#[derive(Clone, Debug, Default)]
pub struct Game {
    /// Participants in join order, which is also turn order.
    pub participants: Vec<Participant>,
    started: bool,
    finished: bool,
    game_message_log: Vec<LogEntry>,
}

impl Game {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_participants(participants: Vec<Participant>) -> Self {
        Self {
            participants,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Started and not yet finished.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started && !self.finished
    }

    pub fn mark_started(&mut self) {
        self.started = true;
    }

    /// Finishing a game also marks it started.
    pub fn mark_finished(&mut self) {
        self.started = true;
        self.finished = true;
    }

    /// Append a message to the log. Entries are never removed or reordered.
    pub fn append(&mut self, visibility: Visibility, message: GameMessage) {
        self.game_message_log.push(LogEntry {
            visibility,
            message,
        });
    }

    #[must_use]
    pub fn log(&self) -> &[LogEntry] {
        &self.game_message_log
    }

    #[must_use]
    pub fn last_message(&self) -> Option<&GameMessage> {
        self.game_message_log.last().map(|entry| &entry.message)
    }

    /// The log as `viewer` is allowed to see it: every public entry plus the
    /// viewer's own private entries.
    #[must_use]
    pub fn log_for(&self, viewer: &str) -> Vec<GameMessage> {
        self.game_message_log
            .iter()
            .filter(|entry| entry.visibility.is_visible_to(viewer))
            .map(|entry| entry.message.clone())
            .collect()
    }

    /// The starting player's `RoundStarted` record of the round the log
    /// currently ends in.
    ///
    /// Each round appends one record per participant, so the flagged record
    /// is not necessarily the last one.
    #[must_use]
    pub fn round_opener(&self) -> Option<&RoundSetup> {
        self.game_message_log
            .iter()
            .rev()
            .map_while(|entry| match &entry.message {
                GameMessage::RoundStarted(setup) => Some(setup),
                _ => None,
            })
            .find(|setup| setup.starting_player)
    }

    #[must_use]
    pub fn participant(&self, user_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    #[must_use]
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participant(user_id).is_some()
    }

    #[must_use]
    pub fn position_of(&self, user_id: &str) -> Option<usize> {
        self.participants.iter().position(|p| p.user_id == user_id)
    }

    pub fn active_participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.is_active())
    }

    /// First active participant after seat `index` in join order, wrapping
    /// around. The participant at `index` itself is only returned when no one
    /// else is active.
    #[must_use]
    pub fn next_active_after(&self, index: usize) -> Option<&Participant> {
        let len = self.participants.len();
        (1..=len)
            .map(|offset| &self.participants[(index + offset) % len])
            .find(|p| p.is_active())
    }
}
