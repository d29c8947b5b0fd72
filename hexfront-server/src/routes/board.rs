//! Board state endpoint

use crate::state::ServerState;
use axum::{extract::State, Json};
use hexfront_core::HexGrid;
use std::sync::Arc;

/// Full grid: terrain, units and city owners for every cell
pub async fn get_board(State(state): State<Arc<ServerState>>) -> Json<HexGrid> {
    Json(state.read().grid().clone())
}
