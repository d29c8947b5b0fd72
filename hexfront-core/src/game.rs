//! Game facade: owns the grid, the turn state, the selection and the RNG
//!
//! All player actions go through here and are validated against the turn
//! state before anything is mutated. A rejected action returns an
//! `ActionError` and leaves the game exactly as it was.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::ai::{AiPlanner, AiTurnReport};
use crate::board::{Coord, HexGrid};
use crate::catalog::TerrainKind;
use crate::combat::{resolve_attack, AttackOutcome};
use crate::config::GameConfig;
use crate::deploy::{deploy_initial_units, FactionDeployment};
use crate::error::{ActionError, GameError};
use crate::geo::GeoFeature;
use crate::range::{attack_range, movement_range};
use crate::terrain::{BatchProgress, IngestReport, TerrainIngestor};
use crate::turn::{attack_cost, move_cost, TurnChange, TurnState};
use crate::units::{Faction, Unit};

// ============================================================================
// SELECTION
// ============================================================================

/// Selected unit and the cells highlighted for it
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub selected: Option<Coord>,
    pub moves: Vec<Coord>,
    pub attacks: Vec<Coord>,
}

impl Selection {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }
}

/// A completed player move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub from: Coord,
    pub to: Coord,
    pub cost: u32,
}

/// Per-faction summary. No victory is declared from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub faction: Faction,
    pub units: usize,
    pub total_health: i32,
    pub cities: usize,
}

// ============================================================================
// GAME
// ============================================================================

/// A running game
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    grid: HexGrid,
    turn: TurnState,
    selection: Selection,
    planner: AiPlanner,
    rng: ChaCha8Rng,
}

impl Game {
    /// Empty all-Plain grid, player to act
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let grid = HexGrid::new(config.rows, config.cols);
        Ok(Self::assemble(config, grid))
    }

    /// Start from an existing grid (its dimensions override the config)
    pub fn with_grid(mut config: GameConfig, grid: HexGrid) -> Result<Self, GameError> {
        config.rows = grid.rows();
        config.cols = grid.cols();
        config.validate()?;
        Ok(Self::assemble(config, grid))
    }

    fn assemble(config: GameConfig, grid: HexGrid) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let turn = TurnState::with_budget(config.player_faction, config.action_points_per_turn);
        let planner = AiPlanner::new(config.ai.clone()).with_capture_cost(config.capture_cost);

        tracing::info!(
            "New game: {}x{} grid, player {}",
            grid.rows(),
            grid.cols(),
            config.player_faction
        );

        Self {
            config,
            grid,
            turn,
            selection: Selection::default(),
            planner,
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    /// Direct grid access for scenario setup
    pub fn grid_mut(&mut self) -> &mut HexGrid {
        &mut self.grid
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // ------------------------------------------------------------------------
    // Setup
    // ------------------------------------------------------------------------

    /// Replace all terrain from the given features (None = all Plain)
    pub fn ingest_terrain(&mut self, features: Option<&[GeoFeature]>) -> IngestReport {
        self.ingest_terrain_with_progress(features, |_| {})
    }

    pub fn ingest_terrain_with_progress<F>(&mut self, features: Option<&[GeoFeature]>, on_batch: F) -> IngestReport
    where
        F: FnMut(BatchProgress),
    {
        self.selection.clear();
        TerrainIngestor::new(self.config.bounds)
            .with_batch_size(self.config.ingest_batch_size)
            .ingest_with_progress(&mut self.grid, features, on_batch)
    }

    pub fn deploy_initial_units(&mut self) -> Vec<FactionDeployment> {
        deploy_initial_units(&mut self.grid, &self.config.deployment, &mut self.rng)
    }

    // ------------------------------------------------------------------------
    // Player actions
    // ------------------------------------------------------------------------

    /// Select whatever is at `coord`. An own unit of the acting faction gets
    /// its moves and attacks highlighted; other units are only selected; an
    /// empty cell clears the selection.
    pub fn select_cell(&mut self, coord: Coord) -> Result<&Selection, ActionError> {
        let cell = self.grid.cell(coord).ok_or(ActionError::OutOfBounds(coord))?;
        self.selection.clear();

        if let Some(unit) = &cell.unit {
            self.selection.selected = Some(coord);
            if unit.faction == self.turn.active() {
                if !unit.has_moved {
                    self.selection.moves = movement_range(&self.grid, coord);
                }
                if !unit.has_attacked {
                    self.selection.attacks = attack_range(&self.grid, coord);
                }
            }
        }
        Ok(&self.selection)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Highlight the selected unit's reachable cells
    pub fn request_move(&mut self) -> Result<&[Coord], ActionError> {
        let (pos, unit) = self.acting_unit()?;
        if unit.has_moved {
            return Err(ActionError::AlreadyMoved);
        }
        self.selection.moves = movement_range(&self.grid, pos);
        self.selection.attacks.clear();
        Ok(&self.selection.moves)
    }

    /// Highlight the selected unit's targets
    pub fn request_attack(&mut self) -> Result<&[Coord], ActionError> {
        let (pos, unit) = self.acting_unit()?;
        if unit.has_attacked {
            return Err(ActionError::AlreadyAttacked);
        }
        let targets = attack_range(&self.grid, pos);
        if targets.is_empty() {
            return Err(ActionError::NoTargets);
        }
        self.selection.moves.clear();
        self.selection.attacks = targets;
        Ok(&self.selection.attacks)
    }

    /// Capture the city under the selected unit
    pub fn request_capture(&mut self) -> Result<Coord, ActionError> {
        let (pos, unit) = self.acting_unit()?;
        let faction = unit.faction;
        let fresh = unit.is_fresh();

        let cell = self.grid.cell(pos).ok_or(ActionError::OutOfBounds(pos))?;
        if cell.terrain != TerrainKind::City {
            return Err(ActionError::NotACity);
        }
        if cell.owner == Some(faction) {
            return Err(ActionError::AlreadyOwned(faction));
        }
        self.turn.ensure_affordable(self.config.capture_cost)?;
        if !fresh {
            return Err(ActionError::AlreadyActed);
        }

        self.turn.spend(self.config.capture_cost)?;
        if let Some(cell) = self.grid.cell_mut(pos) {
            cell.owner = Some(faction);
            if let Some(unit) = cell.unit.as_mut() {
                unit.has_moved = true;
                unit.has_attacked = true;
            }
        }
        self.selection.clear();

        tracing::info!("{} captured city at {}", faction, pos);
        Ok(pos)
    }

    /// Move the selected unit to `target`. The unit stays selected with its
    /// attack targets highlighted.
    pub fn confirm_move_to(&mut self, target: Coord) -> Result<MoveOutcome, ActionError> {
        let (from, unit) = self.acting_unit()?;
        if unit.has_moved {
            return Err(ActionError::AlreadyMoved);
        }
        let terrain = self.grid.terrain(target).ok_or(ActionError::OutOfBounds(target))?;
        if !movement_range(&self.grid, from).contains(&target) {
            return Err(ActionError::Unreachable(target));
        }
        let cost = move_cost(unit, terrain);
        self.turn.ensure_affordable(cost)?;

        if !self.grid.move_unit(from, target) {
            return Err(ActionError::Unreachable(target));
        }
        self.turn.spend(cost)?;
        let has_attacked = match self.grid.unit_mut(target) {
            Some(unit) => {
                unit.has_moved = true;
                unit.has_attacked
            }
            None => true,
        };

        self.selection.clear();
        self.selection.selected = Some(target);
        if !has_attacked {
            self.selection.attacks = attack_range(&self.grid, target);
        }

        tracing::debug!("Player moved {} -> {} for {} points", from, target, cost);
        Ok(MoveOutcome { from, to: target, cost })
    }

    /// Attack `target` with the selected unit
    pub fn confirm_attack_on(&mut self, target: Coord) -> Result<AttackOutcome, ActionError> {
        let (from, unit) = self.acting_unit()?;
        let cost = attack_cost(unit);
        let defender = self
            .grid
            .cell(target)
            .ok_or(ActionError::OutOfBounds(target))?
            .unit
            .as_ref()
            .ok_or(ActionError::NoUnit(target))?;
        if defender.faction == unit.faction {
            return Err(ActionError::NotEnemy(target));
        }
        if unit.has_attacked {
            return Err(ActionError::AlreadyAttacked);
        }
        if !attack_range(&self.grid, from).contains(&target) {
            return Err(ActionError::OutOfRange(target));
        }
        self.turn.spend(cost)?;

        let outcome = resolve_attack(&mut self.grid, from, target, &mut self.rng)?;
        self.selection.clear();

        tracing::info!(
            "Player {:?} at {} hit {} for {}{}",
            outcome.attacker_kind,
            from,
            target,
            outcome.damage,
            if outcome.destroyed { ", target destroyed" } else { "" }
        );
        Ok(outcome)
    }

    /// Selected unit, if it belongs to the player and the player is acting
    fn acting_unit(&self) -> Result<(Coord, &Unit), ActionError> {
        if !self.turn.is_player_turn() {
            return Err(ActionError::NotPlayerTurn {
                active: self.turn.active(),
            });
        }
        let pos = self.selection.selected.ok_or(ActionError::NoSelection)?;
        let unit = self.grid.unit(pos).ok_or(ActionError::NoUnit(pos))?;
        if unit.faction != self.turn.active() {
            return Err(ActionError::NotOwnUnit {
                owner: unit.faction,
                active: self.turn.active(),
            });
        }
        Ok((pos, unit))
    }

    // ------------------------------------------------------------------------
    // Turns
    // ------------------------------------------------------------------------

    /// End the active faction's turn
    pub fn end_turn(&mut self) -> TurnChange {
        self.selection.clear();
        self.turn.end_turn(&mut self.grid)
    }

    /// Let the planner play the active faction's turn, then end it
    pub fn play_ai_turn(&mut self) -> AiTurnReport {
        self.selection.clear();
        let report = self.planner.play_turn(&mut self.grid, &mut self.turn, &mut self.rng);
        self.turn.end_turn(&mut self.grid);
        report
    }

    /// Play AI turns until the player's faction is active again
    pub fn run_ai_turns(&mut self) -> Vec<AiTurnReport> {
        let mut reports = Vec::new();
        while !self.turn.is_player_turn() {
            reports.push(self.play_ai_turn());
        }
        reports
    }

    /// End the player's turn and run every AI faction after it
    pub fn end_turn_and_run_ai(&mut self) -> Result<Vec<AiTurnReport>, ActionError> {
        if !self.turn.is_player_turn() {
            return Err(ActionError::NotPlayerTurn {
                active: self.turn.active(),
            });
        }
        self.end_turn();
        Ok(self.run_ai_turns())
    }

    pub fn standings(&self) -> Vec<Standing> {
        Faction::ALL
            .into_iter()
            .map(|faction| {
                let (units, total_health) = self
                    .grid
                    .units()
                    .filter(|(_, u)| u.faction == faction)
                    .fold((0, 0), |(n, hp), (_, u)| (n + 1, hp + u.health));
                let cities = self
                    .grid
                    .cells()
                    .filter(|c| c.terrain == TerrainKind::City && c.owner == Some(faction))
                    .count();
                Standing {
                    faction,
                    units,
                    total_health,
                    cities,
                }
            })
            .collect()
    }
}
