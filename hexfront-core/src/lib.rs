//! HEXFRONT Core - Game engine and AI
//!
//! This crate provides the core game logic for HEXFRONT:
//! - Board geometry (offset-coordinate hex grid)
//! - Unit and terrain catalogs
//! - Terrain ingestion from geographic features
//! - Movement/attack range search and combat resolution
//! - Turn rotation with action points
//! - Greedy AI planner
//! - Game facade tying it all together

pub mod board;
pub mod catalog;
pub mod units;
pub mod error;
pub mod geo;
pub mod terrain;
pub mod range;
pub mod combat;
pub mod turn;
pub mod eval;
pub mod ai;
pub mod config;
pub mod deploy;
pub mod game;

// Re-exports for convenient access
pub use board::{Cell, Coord, HexGrid, DEFAULT_COLS, DEFAULT_ROWS};
pub use catalog::{TerrainKind, TerrainType, UnitKind, UnitStats, UnitType, TERRAIN_TYPES, UNIT_TYPES};
pub use units::{Faction, Unit};
pub use error::{ActionError, DataFetchError, GameError};
pub use geo::{fetch_with_fallback, FeatureKind, FeatureSource, GeoBounds, GeoFeature};
pub use terrain::{classify, BatchProgress, IngestReport, TerrainCounts, TerrainIngestor};
pub use range::{attack_range, movement_range};
pub use combat::{estimate_damage, resolve_attack, AttackOutcome};
pub use turn::{TurnChange, TurnState, ACTION_POINTS_PER_TURN, CAPTURE_COST};
pub use eval::AiWeights;
pub use ai::{AiAction, AiPlanner, AiTurnReport};
pub use config::{DeploymentConfig, GameConfig};
pub use deploy::FactionDeployment;
pub use game::{Game, MoveOutcome, Selection, Standing};
