//! Message delivery to live participants.
//!
//! The engine never owns sockets. It appends to a game's log and hands
//! messages to a [`Messenger`](messenger::Messenger), which resolves each
//! recipient's live channel.

/// Channel-backed registry of live connections.
pub mod connections;

/// The delivery contract consumed by the engine.
pub mod messenger;
