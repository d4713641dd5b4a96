//! HTTP and WebSocket server for the liar's dice engine.
//!
//! - [`api`]: Router, handlers and middleware
//! - [`config`]: CLI/environment configuration
//! - [`logging`]: `tracing` subscriber setup
//! - [`session`]: Login sessions

pub mod api;
pub mod config;
pub mod logging;
pub mod session;
