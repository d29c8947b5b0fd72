//! Integration tests for hexfront-server API

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use hexfront_core::{Coord, Faction, Game, GameConfig, TerrainKind, Unit, UnitKind};
use hexfront_server::{create_router, ServerConfig, ServerState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// US infantry at (10,10) next to a ROK tank at (10,11), US infantry on a
/// city at (20,5)
fn scenario() -> Game {
    let mut game = Game::new(GameConfig::default().with_seed(4)).unwrap();
    let grid = game.grid_mut();
    grid.place_unit(Coord::new(10, 10), Unit::new(UnitKind::Infantry, Faction::Us)).unwrap();
    grid.place_unit(Coord::new(10, 11), Unit::new(UnitKind::Tank, Faction::Rok)).unwrap();
    grid.place_unit(Coord::new(20, 5), Unit::new(UnitKind::Infantry, Faction::Us)).unwrap();
    grid.set_terrain(Coord::new(20, 5), TerrainKind::City);
    game
}

fn test_app() -> (axum::Router, Arc<ServerState>) {
    let config = ServerConfig::default();
    let state = Arc::new(ServerState::new(scenario()));
    (create_router(&config, state.clone()), state)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post(app: axum::Router, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method("POST").uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.oneshot(request).await.unwrap();
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_status_endpoint() {
    let (app, _) = test_app();
    let (status, json) = get(app, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["engine"], "hexfront");
}

#[tokio::test]
async fn test_catalog_endpoint() {
    let (app, _) = test_app();
    let (status, json) = get(app, "/api/catalog").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["units"].as_array().unwrap().len(), 3);
    assert_eq!(json["units"][2]["name"], "Artillery");
    assert_eq!(json["units"][2]["stats"]["range"], 2);
    assert_eq!(json["terrain"][3]["kind"], "water");
}

#[tokio::test]
async fn test_board_endpoint() {
    let (app, _) = test_app();
    let (status, json) = get(app, "/api/board").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["rows"], 30);
    assert_eq!(json["cols"], 18);
    let cells = json["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 540);
    // Row-major: (10,10) is index 190
    assert_eq!(cells[190]["unit"]["kind"], "infantry");
    assert_eq!(cells[190]["unit"]["faction"], "US");
}

#[tokio::test]
async fn test_turn_endpoint() {
    let (app, _) = test_app();
    let (status, json) = get(app, "/api/turn").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["round"], 1);
    assert_eq!(json["active"], "US");
    assert_eq!(json["action_points"], 3);
    assert_eq!(json["is_player_turn"], true);
    assert_eq!(json["standings"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_select_and_attack() {
    let (app, state) = test_app();

    let (status, json) = post(app.clone(), "/api/select", Some(json!({"row": 10, "col": 10}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["selected"], json!({"row": 10, "col": 10}));
    assert_eq!(json["attacks"], json!([{"row": 10, "col": 11}]));

    let (status, json) = post(app.clone(), "/api/attack", Some(json!({"row": 10, "col": 11}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["defender"], json!({"row": 10, "col": 11}));
    assert_eq!(json["action_points"], 2);
    assert!(state.read().grid().unit(Coord::new(10, 10)).unwrap().has_attacked);

    // Second attack is rejected with a reason
    post(app.clone(), "/api/select", Some(json!({"row": 10, "col": 10}))).await;
    let (status, json) = post(app, "/api/attack", Some(json!({"row": 10, "col": 11}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("already attacked"));
}

#[tokio::test]
async fn test_move_flow() {
    let (app, _) = test_app();
    post(app.clone(), "/api/select", Some(json!({"row": 10, "col": 10}))).await;

    let (status, json) = post(app.clone(), "/api/unit/move", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!json["moves"].as_array().unwrap().is_empty());

    let (status, json) = post(app.clone(), "/api/move", Some(json!({"row": 11, "col": 10}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["to"], json!({"row": 11, "col": 10}));
    assert_eq!(json["cost"], 1);
    assert_eq!(json["selection"]["selected"], json!({"row": 11, "col": 10}));

    let (_, json) = get(app, "/api/selection").await;
    assert_eq!(json["selected"], json!({"row": 11, "col": 10}));
}

#[tokio::test]
async fn test_capture() {
    let (app, state) = test_app();
    post(app.clone(), "/api/select", Some(json!({"row": 20, "col": 5}))).await;
    let (status, json) = post(app, "/api/unit/capture", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["action_points"], 1);
    assert_eq!(state.read().grid().cell(Coord::new(20, 5)).unwrap().owner, Some(Faction::Us));
}

#[tokio::test]
async fn test_action_without_selection() {
    let (app, _) = test_app();
    let (status, json) = post(app, "/api/unit/attack", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "No unit selected");
}

#[tokio::test]
async fn test_bad_coordinates() {
    let (app, _) = test_app();
    let (status, _) = post(app.clone(), "/api/select", Some(json!({"row": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = post(app, "/api/select", Some(json!({"row": 99, "col": 0}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().is_some());
}

#[tokio::test]
async fn test_end_turn_runs_ai() {
    let (app, state) = test_app();
    let (status, json) = post(app, "/api/end-turn", None).await;
    assert_eq!(status, StatusCode::OK);

    let factions: Vec<_> = json["ai_turns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["faction"].clone())
        .collect();
    assert_eq!(factions, vec![json!("ROK"), json!("DPRK"), json!("PLA")]);
    assert_eq!(json["turn"]["round"], 2);
    assert!(state.read().turn().is_player_turn());
}

#[tokio::test]
async fn test_new_game() {
    let (app, state) = test_app();
    let (status, json) = post(app, "/api/game/new", Some(json!({"player_faction": "PLA", "seed": 3}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["player"], "PLA");
    assert_eq!(json["active"], "PLA");

    let game = state.read();
    assert_eq!(game.grid().units().count(), 32);
    // Terrain survives, earlier units do not
    assert_eq!(game.grid().terrain(Coord::new(20, 5)), Some(TerrainKind::City));
}
