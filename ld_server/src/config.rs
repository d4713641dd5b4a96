//! Server configuration management.
//!
//! Settings come from CLI overrides first, then environment variables
//! (optionally loaded from `.env`), then defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::logging::DEFAULT_LOG_FILTER;

/// Default bind address, `127.0.0.1:8080`
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080);

/// Default number of frames buffered per WebSocket
pub const DEFAULT_WS_QUEUE_CAPACITY: usize = 64;

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Outbound frames buffered per live connection before delivery fails
    pub ws_queue_capacity: usize,
    /// `tracing-subscriber` filter directives
    pub log_filter: String,
    /// Fixed dice seed, for reproducible test servers
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND,
            ws_queue_capacity: DEFAULT_WS_QUEUE_CAPACITY,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `seed_override` - Optional dice seed override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but can't be parsed
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        seed_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(bind_override, seed_override, |key| std::env::var(key).ok())
    }

    /// Load configuration with `lookup` standing in for the environment.
    pub fn from_lookup(
        bind_override: Option<SocketAddr>,
        seed_override: Option<u64>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => parse_var(&lookup, "SERVER_BIND")?.unwrap_or(DEFAULT_BIND),
        };

        let seed = match seed_override {
            Some(seed) => Some(seed),
            None => parse_var(&lookup, "DICE_SEED")?,
        };

        let ws_queue_capacity =
            parse_var(&lookup, "WS_QUEUE_CAPACITY")?.unwrap_or(DEFAULT_WS_QUEUE_CAPACITY);

        let log_filter = lookup("RUST_LOG")
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(ServerConfig {
            bind,
            ws_queue_capacity,
            log_filter,
            seed,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ws_queue_capacity == 0 {
            return Err(ConfigError::Invalid {
                var: "WS_QUEUE_CAPACITY".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse an optional variable, rejecting values that are set but malformed.
fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                var: key.to_string(),
                reason: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(None, None, lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_filter, "info,tower_http=warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_values() {
        let config = ServerConfig::from_lookup(
            None,
            None,
            lookup(&[
                ("SERVER_BIND", "0.0.0.0:9000"),
                ("WS_QUEUE_CAPACITY", "8"),
                ("DICE_SEED", "42"),
                ("RUST_LOG", "debug"),
            ]),
        )
        .unwrap();

        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.ws_queue_capacity, 8);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_cli_overrides_environment() {
        let bind: SocketAddr = "127.0.0.1:7000".parse().unwrap();
        let config = ServerConfig::from_lookup(
            Some(bind),
            Some(1),
            lookup(&[("SERVER_BIND", "0.0.0.0:9000"), ("DICE_SEED", "42")]),
        )
        .unwrap();

        assert_eq!(config.bind, bind);
        assert_eq!(config.seed, Some(1));
    }

    #[test]
    fn test_malformed_value_is_an_error() {
        let err = ServerConfig::from_lookup(None, None, lookup(&[("DICE_SEED", "lots")]))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("DICE_SEED"));
    }

    #[test]
    fn test_config_validation_zero_capacity() {
        let config = ServerConfig {
            ws_queue_capacity: 0, // Invalid
            ..ServerConfig::default()
        };

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
