//! Initial unit placement in per-faction start areas

use std::ops::Range;

use rand::Rng;
use serde::Serialize;

use crate::board::{Coord, HexGrid};
use crate::catalog::UnitKind;
use crate::config::DeploymentConfig;
use crate::units::{Faction, Unit};

/// Rectangle a faction deploys into
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartArea {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl StartArea {
    /// US bottom-left, ROK bottom-right, DPRK top-left, PLA top-right
    pub fn for_faction(faction: Faction, grid: &HexGrid, config: &DeploymentConfig) -> Self {
        let (rows, cols) = (grid.rows(), grid.cols());
        let top = 0..config.area_rows.min(rows);
        let bottom = rows.saturating_sub(config.area_rows)..rows;
        let left = 0..config.area_cols.min(cols);
        let right = cols.saturating_sub(config.area_cols)..cols;

        let (rows, cols) = match faction {
            Faction::Us => (bottom, left),
            Faction::Rok => (bottom, right),
            Faction::Dprk => (top, left),
            Faction::Pla => (top, right),
        };
        Self { rows, cols }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && self.rows.contains(&(coord.row as usize))
            && self.cols.contains(&(coord.col as usize))
    }

    fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }
}

/// Units placed for one faction
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FactionDeployment {
    pub faction: Faction,
    pub placed: u32,
    pub requested: u32,
    pub attempts: u32,
}

impl FactionDeployment {
    pub fn is_complete(&self) -> bool {
        self.placed == self.requested
    }
}

/// Place every faction's starting force on random empty cells its
/// infantry can stand on. Shortfalls are logged, never fatal.
pub fn deploy_initial_units<R: Rng>(
    grid: &mut HexGrid,
    config: &DeploymentConfig,
    rng: &mut R,
) -> Vec<FactionDeployment> {
    Faction::ALL
        .into_iter()
        .map(|faction| deploy_faction(grid, faction, config, rng))
        .collect()
}

fn deploy_faction<R: Rng>(
    grid: &mut HexGrid,
    faction: Faction,
    config: &DeploymentConfig,
    rng: &mut R,
) -> FactionDeployment {
    let area = StartArea::for_faction(faction, grid, config);
    let mut report = FactionDeployment {
        faction,
        placed: 0,
        requested: config.total_units(),
        attempts: 0,
    };

    if !area.is_empty() {
        for &(kind, count) in &config.composition {
            let mut placed_of_kind = 0;
            while placed_of_kind < count && report.attempts < config.max_attempts {
                report.attempts += 1;
                let coord = Coord::new(
                    rng.gen_range(area.rows.clone()) as i32,
                    rng.gen_range(area.cols.clone()) as i32,
                );
                if can_deploy(grid, coord) && grid.place_unit(coord, Unit::new(kind, faction)).is_ok() {
                    placed_of_kind += 1;
                    report.placed += 1;
                }
            }
        }
    }

    if report.is_complete() {
        tracing::info!("Deployed {} units for {}", report.placed, faction);
    } else {
        tracing::warn!(
            "{} could only deploy {}/{} units",
            faction,
            report.placed,
            report.requested
        );
    }
    report
}

fn can_deploy(grid: &HexGrid, coord: Coord) -> bool {
    grid.cell(coord)
        .is_some_and(|c| !c.is_occupied() && c.terrain.is_passable(UnitKind::Infantry))
}
