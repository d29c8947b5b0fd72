//! Greedy single-turn planner for computer-controlled factions
//!
//! Units act one at a time in priority order. Each unit tries, in order:
//! capture the city it stands on, attack the best target in range, or move
//! to the best-scoring reachable cell and then attack from there.

use rand::Rng;
use serde::Serialize;

use crate::board::{Coord, HexGrid};
use crate::catalog::TerrainKind;
use crate::combat::{resolve_attack, AttackOutcome};
use crate::eval::{move_position_score, nearest_enemy, target_priority, AiWeights};
use crate::range::{attack_range, movement_range};
use crate::turn::{attack_cost, move_cost, TurnState, CAPTURE_COST};
use crate::units::Faction;

/// One action taken by the planner
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum AiAction {
    Capture { at: Coord },
    Attack(AttackOutcome),
    Move { from: Coord, to: Coord, cost: u32 },
}

/// Everything a faction did in one turn
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AiTurnReport {
    pub faction: Faction,
    pub actions: Vec<AiAction>,
    pub points_remaining: u32,
}

impl AiTurnReport {
    pub fn attacks(&self) -> impl Iterator<Item = &AttackOutcome> + '_ {
        self.actions.iter().filter_map(|a| match a {
            AiAction::Attack(outcome) => Some(outcome),
            _ => None,
        })
    }
}

/// Greedy planner
#[derive(Clone, Debug)]
pub struct AiPlanner {
    weights: AiWeights,
    capture_cost: u32,
}

impl AiPlanner {
    pub fn new(weights: AiWeights) -> Self {
        Self {
            weights,
            capture_cost: CAPTURE_COST,
        }
    }

    pub fn with_capture_cost(mut self, cost: u32) -> Self {
        self.capture_cost = cost;
        self
    }

    pub fn weights(&self) -> &AiWeights {
        &self.weights
    }

    /// Play the active faction's turn. Does not end the turn.
    pub fn play_turn<R: Rng>(&self, grid: &mut HexGrid, turn: &mut TurnState, rng: &mut R) -> AiTurnReport {
        let faction = turn.active();
        let mut actions = Vec::new();

        for pos in self.unit_order(grid, faction) {
            if turn.action_points() < 1 {
                tracing::debug!("{} out of action points", faction);
                break;
            }
            self.act(grid, turn, rng, pos, &mut actions);
        }

        tracing::info!(
            "AI {} finished with {} actions, {} points left",
            faction,
            actions.len(),
            turn.action_points()
        );

        AiTurnReport {
            faction,
            actions,
            points_remaining: turn.action_points(),
        }
    }

    /// Units on capturable cities first, then damaged, then ranged
    fn unit_order(&self, grid: &HexGrid, faction: Faction) -> Vec<Coord> {
        let mut positions = grid.unit_positions(faction);
        positions.sort_by_key(|&pos| {
            let on_city = grid.cell(pos).is_some_and(|c| c.is_capturable_by(faction));
            let (damaged, ranged) = grid
                .unit(pos)
                .map_or((false, false), |u| (u.is_damaged(), u.is_ranged()));
            (!on_city, !damaged, !ranged)
        });
        positions
    }

    fn act<R: Rng>(
        &self,
        grid: &mut HexGrid,
        turn: &mut TurnState,
        rng: &mut R,
        pos: Coord,
        actions: &mut Vec<AiAction>,
    ) {
        let Some(unit) = grid.unit(pos) else { return };
        if unit.is_spent() {
            return;
        }
        let faction = unit.faction;
        let fresh = unit.is_fresh();
        let has_attacked = unit.has_attacked;

        // Capture
        let capturable = grid.cell(pos).is_some_and(|c| c.is_capturable_by(faction));
        if fresh && capturable && turn.spend(self.capture_cost).is_ok() {
            if let Some(cell) = grid.cell_mut(pos) {
                cell.owner = Some(faction);
                if let Some(unit) = cell.unit.as_mut() {
                    unit.has_moved = true;
                    unit.has_attacked = true;
                }
            }
            tracing::info!("AI {} captured city at {}", faction, pos);
            actions.push(AiAction::Capture { at: pos });
            return;
        }

        // Attack in place
        if !has_attacked {
            if let Some(outcome) = self.try_attack(grid, turn, rng, pos) {
                actions.push(AiAction::Attack(outcome));
                return;
            }
        }

        // Move, then attack from the new cell
        let Some(unit) = grid.unit(pos) else { return };
        if unit.has_moved || !turn.can_afford(unit.kind.cost().action_points) {
            return;
        }
        let Some(enemy) = nearest_enemy(grid, faction, pos) else {
            return;
        };

        let best = movement_range(grid, pos)
            .into_iter()
            .map(|to| (to, move_position_score(grid, unit, to, enemy, &self.weights)))
            .fold(None, |best: Option<(Coord, f64)>, (to, score)| match best {
                Some((_, s)) if s >= score => best,
                _ => Some((to, score)),
            });
        let Some((to, _)) = best else { return };

        let cost = move_cost(unit, grid.terrain(to).unwrap_or(TerrainKind::Plain));
        if turn.spend(cost).is_err() || !grid.move_unit(pos, to) {
            return;
        }
        if let Some(unit) = grid.unit_mut(to) {
            unit.has_moved = true;
        }
        tracing::debug!("AI {} moved {} -> {}", faction, pos, to);
        actions.push(AiAction::Move { from: pos, to, cost });

        if let Some(outcome) = self.try_attack(grid, turn, rng, to) {
            actions.push(AiAction::Attack(outcome));
        }
    }

    /// Attack the highest-priority target in range if affordable
    fn try_attack<R: Rng>(
        &self,
        grid: &mut HexGrid,
        turn: &mut TurnState,
        rng: &mut R,
        pos: Coord,
    ) -> Option<AttackOutcome> {
        let unit = grid.unit(pos)?;
        if unit.has_attacked || turn.action_points() == 0 {
            return None;
        }
        let cost = attack_cost(unit);

        let target = attack_range(grid, pos)
            .into_iter()
            .filter_map(|t| target_priority(grid, pos, t, &self.weights).map(|p| (t, p)))
            .fold(None, |best: Option<(Coord, f64)>, (t, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((t, p)),
            })
            .map(|(t, _)| t)?;

        turn.spend(cost).ok()?;
        match resolve_attack(grid, pos, target, rng) {
            Ok(outcome) => {
                tracing::info!(
                    "AI {} {:?} at {} attacked {} for {}",
                    turn.active(),
                    outcome.attacker_kind,
                    pos,
                    target,
                    outcome.damage
                );
                Some(outcome)
            }
            Err(e) => {
                tracing::warn!("AI attack from {} failed: {}", pos, e);
                None
            }
        }
    }
}

impl Default for AiPlanner {
    fn default() -> Self {
        Self::new(AiWeights::default())
    }
}
