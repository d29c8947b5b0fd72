//! Player action endpoints
//!
//! Rejected actions answer 409 with the reason; the game is unchanged.

use crate::error::ApiError;
use crate::state::ServerState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use hexfront_core::{AttackOutcome, Coord, MoveOutcome, Selection};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Target cell of an action
#[derive(Deserialize)]
pub struct CoordRequest {
    pub row: i32,
    pub col: i32,
}

impl From<CoordRequest> for Coord {
    fn from(req: CoordRequest) -> Self {
        Coord::new(req.row, req.col)
    }
}

pub async fn select_cell(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<CoordRequest>, JsonRejection>,
) -> Result<Json<Selection>, ApiError> {
    let Json(req) = payload?;
    let mut game = state.write();
    let selection = game.select_cell(req.into())?;
    Ok(Json(selection.clone()))
}

pub async fn request_move(State(state): State<Arc<ServerState>>) -> Result<Json<Value>, ApiError> {
    let mut game = state.write();
    let moves = game.request_move()?;
    Ok(Json(json!({ "moves": moves })))
}

pub async fn request_attack(State(state): State<Arc<ServerState>>) -> Result<Json<Value>, ApiError> {
    let mut game = state.write();
    let attacks = game.request_attack()?;
    Ok(Json(json!({ "attacks": attacks })))
}

pub async fn request_capture(State(state): State<Arc<ServerState>>) -> Result<Json<Value>, ApiError> {
    let mut game = state.write();
    let captured = game.request_capture()?;
    Ok(Json(json!({
        "captured": captured,
        "action_points": game.turn().action_points(),
    })))
}

#[derive(Serialize)]
pub struct MoveResponse {
    #[serde(flatten)]
    pub outcome: MoveOutcome,
    pub action_points: u32,
    pub selection: Selection,
}

pub async fn confirm_move(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<CoordRequest>, JsonRejection>,
) -> Result<Json<MoveResponse>, ApiError> {
    let Json(req) = payload?;
    let mut game = state.write();
    let outcome = game.confirm_move_to(req.into())?;
    Ok(Json(MoveResponse {
        outcome,
        action_points: game.turn().action_points(),
        selection: game.selection().clone(),
    }))
}

#[derive(Serialize)]
pub struct AttackResponse {
    #[serde(flatten)]
    pub outcome: AttackOutcome,
    pub action_points: u32,
}

pub async fn confirm_attack(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<CoordRequest>, JsonRejection>,
) -> Result<Json<AttackResponse>, ApiError> {
    let Json(req) = payload?;
    let mut game = state.write();
    let outcome = game.confirm_attack_on(req.into())?;
    Ok(Json(AttackResponse {
        outcome,
        action_points: game.turn().action_points(),
    }))
}
