//! Example to run the HEXFRONT server standalone on default terrain
//!
//! Run with: cargo run -p hexfront-server --example run_server

use hexfront_core::{Game, GameConfig};
use hexfront_server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ServerConfig::default();
    let mut game = Game::new(GameConfig::default())?;
    game.ingest_terrain(None);
    game.deploy_initial_units();

    println!("Starting HEXFRONT server on port {}", config.port);
    println!("Static files from: {}", config.static_dir);

    run_server(config, game).await
}
