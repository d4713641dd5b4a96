use log::{debug, error};

use crate::game::{
    GameError, GameResult,
    entities::{Game, GameMessage, Visibility},
};

/// Delivers game messages to participants' live channels.
///
/// Implementors only resolve and write to channels. The provided
/// `send_game_message_*` methods own the log-append semantics:
/// - sending to one participant is strict: without a live channel nothing is
///   appended and the call fails
/// - sending to all is best effort: the message is appended once and a missing
///   channel for one participant is logged without stopping the others
pub trait Messenger: Send + Sync {
    /// Whether `recipient` currently has a live channel.
    fn is_connected(&self, recipient: &str) -> bool;

    /// Write `message` to the live channel of `recipient`.
    fn deliver(&self, recipient: &str, message: &GameMessage) -> GameResult<()>;

    /// Deliver `message` to one participant only and append it to the log as
    /// private to that participant.
    fn send_game_message_to_one(
        &self,
        game: &mut Game,
        participant_id: &str,
        message: GameMessage,
    ) -> GameResult<&'static str> {
        if participant_id.trim().is_empty() {
            return Err(GameError::NoParticipantProvided);
        }
        if !self.is_connected(participant_id) {
            return Err(GameError::ParticipantNotInConnectionList);
        }

        self.deliver(participant_id, &message)?;
        debug!(
            "Sent {} privately to {}",
            message.message_type(),
            participant_id
        );
        game.append(Visibility::Private(participant_id.to_string()), message);
        Ok("message sent.")
    }

    /// Append `message` to the log as public and deliver it to every
    /// participant, returning how many deliveries succeeded.
    fn send_game_message_to_all(&self, game: &mut Game, message: GameMessage) -> usize {
        let mut delivered = 0;
        for participant in &game.participants {
            match self.deliver(&participant.user_id, &message) {
                Ok(()) => delivered += 1,
                Err(e) => error!(
                    "Could not send {} to {}: {}",
                    message.message_type(),
                    participant.user_id,
                    e
                ),
            }
        }

        debug!(
            "Broadcast {} to {}/{} participants",
            message.message_type(),
            delivered,
            game.participants.len()
        );
        game.append(Visibility::Public, message);
        delivered
    }
}
