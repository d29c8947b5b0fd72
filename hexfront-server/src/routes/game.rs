//! Game lifecycle endpoint

use crate::error::ApiError;
use crate::routes::turn::TurnResponse;
use crate::state::ServerState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use hexfront_core::Faction;
use serde::Deserialize;
use std::sync::Arc;

/// New game options; omitted fields keep the server's configuration
#[derive(Default, Deserialize)]
pub struct NewGameRequest {
    pub player_faction: Option<Faction>,
    pub seed: Option<u64>,
}

/// Start over on the loaded terrain with a fresh deployment
pub async fn new_game(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<NewGameRequest>, JsonRejection>,
) -> Result<Json<TurnResponse>, ApiError> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(JsonRejection::MissingJsonContentType(_)) => NewGameRequest::default(),
        Err(e) => return Err(e.into()),
    };
    state.new_game(req.player_faction, req.seed)?;
    Ok(Json(TurnResponse::of(&state.read())))
}
