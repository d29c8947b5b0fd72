//! Unit and terrain tables

use axum::Json;
use hexfront_core::{TerrainType, UnitType, TERRAIN_TYPES, UNIT_TYPES};
use serde::Serialize;

#[derive(Serialize)]
pub struct CatalogResponse {
    pub units: &'static [UnitType],
    pub terrain: &'static [TerrainType],
}

pub async fn get_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        units: &UNIT_TYPES,
        terrain: &TERRAIN_TYPES,
    })
}
