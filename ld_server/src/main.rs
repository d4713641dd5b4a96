//! Liar's dice server.
//!
//! Serves the game engine over HTTP, with per-user WebSocket channels for
//! game messages.

use std::net::SocketAddr;

use anyhow::Error;
use ld_server::{
    api::{self, AppState},
    config::ServerConfig,
    logging,
};
use log::{error, info};
use pico_args::Arguments;

const HELP: &str = "\
Run a liar's dice server

USAGE:
  ld_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --seed       N           Fixed dice seed             [default: env DICE_SEED or OS entropy]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  WS_QUEUE_CAPACITY        Messages buffered per WebSocket [default: 64]
  DICE_SEED                Fixed dice seed
  RUST_LOG                 Log filter [default: info,tower_http=warn]
";

struct Args {
    bind: Option<SocketAddr>,
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        seed: pargs.opt_value_from_str("--seed")?,
    };

    let config = ServerConfig::from_env(args.bind, args.seed)?;
    config.validate()?;

    logging::init(&config.log_filter);
    info!("Starting liar's dice server at {}", config.bind);
    if config.seed.is_some() {
        info!("Dice are seeded; rolls are reproducible");
    }

    let app = api::create_router(AppState::new(&config));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
