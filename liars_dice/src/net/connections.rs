use log::{debug, warn};
use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};
use tokio::sync::mpsc;

use super::messenger::Messenger;
use crate::game::{
    GameError, GameResult,
    entities::{GameMessage, UserId},
};

/// Default number of frames buffered per connection.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Registry of live connections, keyed by user id.
///
/// Each connection is the sending half of a bounded channel of JSON text
/// frames. The transport owns the receiving half and writes frames to the
/// socket. Dropping the receiver makes every later delivery to that user fail.
#[derive(Debug)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<UserId, mpsc::Sender<String>>>,
    capacity: usize,
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl ConnectionRegistry {
    /// Create a registry whose channels buffer up to `capacity` frames.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Register a live channel for `user_id`, replacing any previous one.
    pub fn register(&self, user_id: &str) -> mpsc::Receiver<String> {
        let (sender, receiver) = mpsc::channel(self.capacity);
        let mut connections = self
            .connections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if connections.insert(user_id.to_string(), sender).is_some() {
            debug!("Replaced existing connection for {}", user_id);
        }
        receiver
    }

    /// Drop the channel for `user_id`, returning whether one was registered.
    pub fn unregister(&self, user_id: &str) -> bool {
        let mut connections = self
            .connections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        connections.remove(user_id).is_some()
    }

    /// Drop the channel for `user_id` only if its receiver is gone, so a newer
    /// connection for the same user survives an older one closing.
    pub fn prune(&self, user_id: &str) -> bool {
        let mut connections = self
            .connections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match connections.get(user_id) {
            Some(sender) if sender.is_closed() => connections.remove(user_id).is_some(),
            _ => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Messenger for ConnectionRegistry {
    fn is_connected(&self, recipient: &str) -> bool {
        self.connections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(recipient)
            .is_some_and(|sender| !sender.is_closed())
    }

    fn deliver(&self, recipient: &str, message: &GameMessage) -> GameResult<()> {
        let frame =
            serde_json::to_string(message).map_err(|e| GameError::MessageEncoding(e.to_string()))?;

        let connections = self
            .connections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let sender = connections
            .get(recipient)
            .ok_or(GameError::ParticipantNotInConnectionList)?;

        match sender.try_send(frame) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Connection for {} is full, dropping message", recipient);
                Err(GameError::ParticipantNotInConnectionList)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("Connection for {} is closed", recipient);
                Err(GameError::ParticipantNotInConnectionList)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{Claim, Game, Participant};

    fn two_player_game() -> Game {
        Game::with_participants(vec![
            Participant::new("alice", "Alice"),
            Participant::new("bob", "Bob"),
        ])
    }

    #[test]
    fn test_send_to_one_requires_participant_id() {
        let registry = ConnectionRegistry::default();
        let mut game = two_player_game();
        let result = registry.send_game_message_to_one(&mut game, "", GameMessage::GameStarted);
        assert_eq!(result, Err(GameError::NoParticipantProvided));
    }

    #[test]
    fn test_send_to_one_fails_without_connection() {
        let registry = ConnectionRegistry::default();
        let mut game = two_player_game();

        let result =
            registry.send_game_message_to_one(&mut game, "alice", GameMessage::GameStarted);

        assert_eq!(result, Err(GameError::ParticipantNotInConnectionList));
        assert!(game.log().is_empty());
    }

    #[test]
    fn test_send_to_one_appends_and_delivers() {
        let registry = ConnectionRegistry::default();
        let mut alice = registry.register("alice");
        let mut bob = registry.register("bob");
        let mut game = two_player_game();

        let result =
            registry.send_game_message_to_one(&mut game, "alice", GameMessage::GameStarted);

        assert_eq!(result, Ok("message sent."));
        assert_eq!(alice.try_recv().unwrap(), r#"{"messageType":"GameStarted"}"#);
        assert!(bob.try_recv().is_err());
        assert_eq!(game.log().len(), 1);
        assert!(game.log_for("bob").is_empty());
    }

    #[test]
    fn test_send_to_all_is_best_effort() {
        let registry = ConnectionRegistry::default();
        let mut bob = registry.register("bob");
        let mut game = two_player_game();

        let delivered =
            registry.send_game_message_to_all(&mut game, GameMessage::Claim(Claim::new(2, 3)));

        assert_eq!(delivered, 1);
        assert!(bob.try_recv().unwrap().contains("\"quantity\":2"));
        assert_eq!(game.log().len(), 1);
    }

    #[test]
    fn test_dropped_receiver_disconnects() {
        let registry = ConnectionRegistry::default();
        let receiver = registry.register("alice");
        assert!(registry.is_connected("alice"));

        drop(receiver);
        assert!(!registry.is_connected("alice"));
        assert!(registry.prune("alice"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_prune_keeps_newer_connection() {
        let registry = ConnectionRegistry::default();
        let old = registry.register("alice");
        let _new = registry.register("alice");
        drop(old);

        assert!(!registry.prune("alice"));
        assert!(registry.is_connected("alice"));
    }

    #[test]
    fn test_full_queue_fails_delivery() {
        let registry = ConnectionRegistry::new(1);
        let _alice = registry.register("alice");

        assert!(registry.deliver("alice", &GameMessage::GameStarted).is_ok());
        assert_eq!(
            registry.deliver("alice", &GameMessage::GameStarted),
            Err(GameError::ParticipantNotInConnectionList)
        );
    }
}
