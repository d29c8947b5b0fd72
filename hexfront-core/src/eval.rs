//! Scoring functions for the AI planner

use serde::{Deserialize, Serialize};

use crate::board::{Coord, HexGrid};
use crate::catalog::{TerrainKind, UnitKind};
use crate::combat::estimate_damage;
use crate::units::{Faction, Unit};

/// Tunable constants for target and position scoring
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiWeights {
    /// Scales (1 - health ratio) of a target
    pub low_health_weight: f64,
    pub near_death_ratio: f64,
    pub near_death_bonus: f64,
    /// Target value by `UnitKind as usize`
    pub target_values: [f64; 3],
    pub city_target_bonus: f64,
    /// Extra when the target's city is held by someone else
    pub held_city_target_bonus: f64,
    /// Per point of target terrain defense
    pub terrain_target_penalty: f64,
    pub lethal_bonus: f64,
    /// Target is artillery that can already reach the attacker
    pub artillery_threat_bonus: f64,

    pub distance_base: f64,
    /// Per step away from the ideal distance
    pub distance_penalty: f64,
    /// Per point of destination terrain defense
    pub cover_weight: f64,
    pub wounded_ratio: f64,
    /// Extra cover weight for wounded units
    pub wounded_cover_weight: f64,
    pub unowned_city_bonus: f64,
    pub enemy_city_bonus: f64,
    pub own_city_bonus: f64,
    pub single_ally_bonus: f64,
    /// Per adjacent ally beyond the first
    pub crowding_penalty: f64,
    /// Threat value by `UnitKind as usize`
    pub threat_values: [f64; 3],
}

impl Default for AiWeights {
    fn default() -> Self {
        Self {
            low_health_weight: 40.0,
            near_death_ratio: 0.3,
            near_death_bonus: 50.0,
            target_values: [40.0, 60.0, 80.0],
            city_target_bonus: 30.0,
            held_city_target_bonus: 20.0,
            terrain_target_penalty: 10.0,
            lethal_bonus: 100.0,
            artillery_threat_bonus: 40.0,

            distance_base: 50.0,
            distance_penalty: 10.0,
            cover_weight: 15.0,
            wounded_ratio: 0.6,
            wounded_cover_weight: 20.0,
            unowned_city_bonus: 40.0,
            enemy_city_bonus: 60.0,
            own_city_bonus: 10.0,
            single_ally_bonus: 15.0,
            crowding_penalty: 10.0,
            threat_values: [10.0, 15.0, 20.0],
        }
    }
}

/// How attractive the unit at `target` is for the unit at `attacker`.
/// Returns None unless both cells hold units.
pub fn target_priority(grid: &HexGrid, attacker: Coord, target: Coord, w: &AiWeights) -> Option<f64> {
    let attacking = grid.unit(attacker)?;
    let cell = grid.cell(target)?;
    let defending = cell.unit.as_ref()?;

    let mut priority = 0.0;

    let ratio = defending.health_ratio();
    priority += (1.0 - ratio) * w.low_health_weight;
    if ratio < w.near_death_ratio {
        priority += w.near_death_bonus;
    }

    priority += w.target_values[defending.kind as usize];

    if cell.terrain == TerrainKind::City {
        priority += w.city_target_bonus;
        if cell.owner.is_some_and(|o| o != attacking.faction) {
            priority += w.held_city_target_bonus;
        }
    }

    priority -= f64::from(cell.terrain.defense_modifier()) * w.terrain_target_penalty;

    if estimate_damage(attacking, defending, cell.terrain) >= defending.health {
        priority += w.lethal_bonus;
    }

    if defending.kind == UnitKind::Artillery && attacker.distance_to(target) <= defending.attack_range() {
        priority += w.artillery_threat_bonus;
    }

    Some(priority)
}

/// Score for moving `unit` to `candidate`, given the nearest enemy
/// position. The grid is scored as it stands, with the mover still on its
/// origin cell.
pub fn move_position_score(
    grid: &HexGrid,
    unit: &Unit,
    candidate: Coord,
    nearest_enemy: Coord,
    w: &AiWeights,
) -> f64 {
    let Some(cell) = grid.cell(candidate) else {
        return f64::NEG_INFINITY;
    };
    let mut score = 0.0;

    let ideal = if unit.kind == UnitKind::Artillery {
        unit.attack_range()
    } else {
        1
    };
    let distance = candidate.distance_to(nearest_enemy);
    score += w.distance_base - f64::from(distance.abs_diff(ideal)) * w.distance_penalty;

    let cover = f64::from(cell.terrain.defense_modifier());
    score += cover * w.cover_weight;
    if unit.health_ratio() < w.wounded_ratio {
        score += cover * w.wounded_cover_weight;
    }

    if cell.terrain == TerrainKind::City {
        score += match cell.owner {
            None => w.unowned_city_bonus,
            Some(owner) if owner != unit.faction => w.enemy_city_bonus,
            Some(_) => w.own_city_bonus,
        };
    }

    let allies = grid
        .neighbors(candidate)
        .into_iter()
        .filter(|&n| grid.unit(n).is_some_and(|u| u.faction == unit.faction))
        .count();
    if allies == 1 {
        score += w.single_ally_bonus;
    } else if allies > 1 {
        score -= (allies - 1) as f64 * w.crowding_penalty;
    }

    score - position_exposure(grid, unit.faction, candidate, w)
}

/// Sum of enemy threat reaching `position`, weighted by proximity
pub fn position_exposure(grid: &HexGrid, faction: Faction, position: Coord, w: &AiWeights) -> f64 {
    grid.units()
        .filter(|(_, enemy)| enemy.faction != faction)
        .filter_map(|(pos, enemy)| {
            let range = enemy.attack_range();
            let distance = position.distance_to(pos);
            (distance <= range).then(|| {
                let proximity = f64::from(range - distance + 1) / f64::from(range);
                w.threat_values[enemy.kind as usize] * proximity
            })
        })
        .sum()
}

/// Closest enemy of `faction` to `from`; ties go to the first in row-major order
pub fn nearest_enemy(grid: &HexGrid, faction: Faction, from: Coord) -> Option<Coord> {
    grid.units()
        .filter(|(_, u)| u.faction != faction)
        .map(|(pos, _)| pos)
        .min_by_key(|&pos| from.distance_to(pos))
}
