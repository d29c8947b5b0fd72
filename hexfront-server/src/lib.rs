//! HEXFRONT Server - HTTP API for the browser front-end
//!
//! This crate provides the web backend:
//! - Read access to board, turn and selection state
//! - Player actions (select, move, attack, capture, end turn)
//! - New games on the loaded terrain
//! - Static file serving for the front-end

mod error;
mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use hexfront_core::Game;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;

pub use error::ApiError;
pub use state::ServerState;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8003,
            static_dir: "web".to_string(),
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Status and static tables
        .route("/api/status", get(routes::status::status_handler))
        .route("/api/catalog", get(routes::catalog::get_catalog))
        // Read-only game state
        .route("/api/board", get(routes::board::get_board))
        .route("/api/turn", get(routes::turn::get_turn))
        .route("/api/selection", get(routes::turn::get_selection))
        // Player actions
        .route("/api/select", post(routes::actions::select_cell))
        .route("/api/unit/move", post(routes::actions::request_move))
        .route("/api/unit/attack", post(routes::actions::request_attack))
        .route("/api/unit/capture", post(routes::actions::request_capture))
        .route("/api/move", post(routes::actions::confirm_move))
        .route("/api/attack", post(routes::actions::confirm_attack))
        .route("/api/end-turn", post(routes::turn::end_turn))
        // Game lifecycle
        .route("/api/game/new", post(routes::game::new_game))
        // Shared state
        .with_state(state)
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Start the HTTP server with an already set-up game
pub async fn run_server(config: ServerConfig, game: Game) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::new(game));
    let router = create_router(&config, state);

    tracing::info!("HEXFRONT Server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
