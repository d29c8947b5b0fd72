//! Server command - set up a game and start the HTTP server
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), prepare_game(), start_server()
//! - Level 3: (delegated to setup and hexfront-server)
//! - Level 4: configuration validation

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use hexfront_core::{Faction, Game, GameConfig};
use hexfront_overpass::DEFAULT_TIMEOUT_SECS;
use hexfront_server::{run_server, ServerConfig};

use crate::setup;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8003")]
    pub port: u16,

    /// Directory containing the browser front-end
    #[arg(long, default_value = "web")]
    pub static_dir: PathBuf,

    /// Faction controlled by the player (US, ROK, DPRK, PLA)
    #[arg(long)]
    pub faction: Option<Faction>,

    /// Skip the terrain download and play on open ground
    #[arg(long)]
    pub offline: bool,

    /// Terrain request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run server command
///
/// 1. Configure server
/// 2. Fetch terrain, ingest and deploy
/// 3. Start server (blocking)
pub fn run(args: ServerArgs, config: GameConfig) -> Result<()> {
    let server_config = configure_server(&args)?;
    let game = prepare_game(&args, config)?;

    tracing::info!(
        "Starting HEXFRONT server on port {} as {}",
        server_config.port,
        game.turn().player()
    );

    start_server(server_config, game)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Configure server from command arguments
fn configure_server(args: &ServerArgs) -> Result<ServerConfig> {
    validate_static_dir(&args.static_dir)?;

    Ok(ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().to_string(),
    })
}

/// Terrain and starting forces, before any async runtime exists
fn prepare_game(args: &ServerArgs, mut config: GameConfig) -> Result<Game> {
    if let Some(faction) = args.faction {
        config = config.with_player(faction);
    }

    let features = setup::fetch_features(&config, args.offline, args.timeout);
    let (mut game, _) = setup::build_game(config, features.as_deref())?;
    game.deploy_initial_units();
    Ok(game)
}

/// Start the server (blocking)
fn start_server(config: ServerConfig, game: Game) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server(config, game).await })
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Validate that static directory exists
fn validate_static_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Static directory does not exist: {}. Only the API will be served.",
            path.display()
        );
    } else if !path.is_dir() {
        anyhow::bail!("Static path exists but is not a directory: {}", path.display());
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
