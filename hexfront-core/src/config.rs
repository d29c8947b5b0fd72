//! Game configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::board::{DEFAULT_COLS, DEFAULT_ROWS};
use crate::catalog::UnitKind;
use crate::error::GameError;
use crate::eval::AiWeights;
use crate::geo::GeoBounds;
use crate::terrain::DEFAULT_BATCH_SIZE;
use crate::turn::{ACTION_POINTS_PER_TURN, CAPTURE_COST};
use crate::units::Faction;

/// Starting force composition for every faction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Unit kinds and counts, placed in this order
    pub composition: Vec<(UnitKind, u32)>,
    /// Random placement attempts per faction
    pub max_attempts: u32,
    /// Height of each start area in rows
    pub area_rows: usize,
    /// Width of each start area in columns
    pub area_cols: usize,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            composition: vec![
                (UnitKind::Infantry, 4),
                (UnitKind::Tank, 2),
                (UnitKind::Artillery, 2),
            ],
            max_attempts: 100,
            area_rows: 4,
            area_cols: 7,
        }
    }
}

impl DeploymentConfig {
    pub fn total_units(&self) -> u32 {
        self.composition.iter().map(|(_, n)| n).sum()
    }
}

/// Everything needed to set up a game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub bounds: GeoBounds,
    pub player_faction: Faction,
    pub action_points_per_turn: u32,
    pub capture_cost: u32,
    pub ingest_batch_size: usize,
    /// Fixed RNG seed; entropy when absent
    pub seed: Option<u64>,
    pub deployment: DeploymentConfig,
    pub ai: AiWeights,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            bounds: GeoBounds::default(),
            player_faction: Faction::Us,
            action_points_per_turn: ACTION_POINTS_PER_TURN,
            capture_cost: CAPTURE_COST,
            ingest_batch_size: DEFAULT_BATCH_SIZE,
            seed: None,
            deployment: DeploymentConfig::default(),
            ai: AiWeights::default(),
        }
    }
}

impl GameConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_player(mut self, faction: Faction) -> Self {
        self.player_faction = faction;
        self
    }

    pub fn validate(&self) -> Result<(), GameError> {
        let area = &self.deployment;
        if self.rows < area.area_rows || self.cols < area.area_cols || self.rows == 0 || self.cols == 0 {
            return Err(GameError::InvalidGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.bounds.validate()?;
        if self.action_points_per_turn == 0 {
            return Err(GameError::Configuration(
                "action_points_per_turn must be positive".to_string(),
            ));
        }
        if self.ingest_batch_size == 0 {
            return Err(GameError::Configuration(
                "ingest_batch_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
