//! HEXFRONT CLI - Command-line interface
//!
//! Commands:
//! - serve: Load terrain, deploy, and start the game server
//! - simulate: Play AI-only games headless and report standings
//! - terrain: Preview the ingested terrain as an ASCII map

mod server;
mod setup;
mod simulate;
mod terrain;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexfront")]
#[command(about = "HEXFRONT turn-based hex strategy engine")]
struct Cli {
    /// Game configuration JSON file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// RNG seed (overrides the config file)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the game server
    Serve(server::ServerArgs),
    /// Run AI-only games
    Simulate(simulate::SimulateArgs),
    /// Ingest terrain and print the map
    Terrain(terrain::TerrainArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = setup::load_config(cli.config.as_deref(), cli.seed)?;

    match cli.command {
        Commands::Serve(args) => server::run(args, config),
        Commands::Simulate(args) => simulate::run(args, config),
        Commands::Terrain(args) => terrain::run(args, config),
    }
}
