//! Turn, selection and end-of-turn endpoints

use crate::error::ApiError;
use crate::state::ServerState;
use axum::{extract::State, Json};
use hexfront_core::{AiTurnReport, Faction, Game, Selection, Standing};
use serde::Serialize;
use std::sync::Arc;

/// HUD view of the turn state
#[derive(Serialize)]
pub struct TurnResponse {
    pub round: u32,
    pub active: Faction,
    pub player: Faction,
    pub action_points: u32,
    pub is_player_turn: bool,
    pub standings: Vec<Standing>,
}

impl TurnResponse {
    pub fn of(game: &Game) -> Self {
        let turn = game.turn();
        Self {
            round: turn.round(),
            active: turn.active(),
            player: turn.player(),
            action_points: turn.action_points(),
            is_player_turn: turn.is_player_turn(),
            standings: game.standings(),
        }
    }
}

pub async fn get_turn(State(state): State<Arc<ServerState>>) -> Json<TurnResponse> {
    Json(TurnResponse::of(&state.read()))
}

pub async fn get_selection(State(state): State<Arc<ServerState>>) -> Json<Selection> {
    Json(state.read().selection().clone())
}

#[derive(Serialize)]
pub struct EndTurnResponse {
    pub ai_turns: Vec<AiTurnReport>,
    pub turn: TurnResponse,
}

/// End the player's turn and play every AI faction
pub async fn end_turn(State(state): State<Arc<ServerState>>) -> Result<Json<EndTurnResponse>, ApiError> {
    let mut game = state.write();
    let ai_turns = game.end_turn_and_run_ai()?;
    Ok(Json(EndTurnResponse {
        ai_turns,
        turn: TurnResponse::of(&game),
    }))
}
