//! Damage estimation and attack resolution

use rand::Rng;
use serde::Serialize;

use crate::board::{Coord, HexGrid};
use crate::catalog::{TerrainKind, UnitKind};
use crate::error::ActionError;
use crate::units::{Faction, Unit};

/// Lower and upper bound of the random damage factor
pub const JITTER_RANGE: (f64, f64) = (0.9, 1.1);

/// Matchup multiplier for an attacker/defender kind pair
pub fn type_multiplier(attacker: UnitKind, defender: UnitKind) -> f64 {
    match (attacker, defender) {
        (UnitKind::Artillery, UnitKind::Infantry) => 1.5,
        (UnitKind::Tank, UnitKind::Artillery) => 1.3,
        (UnitKind::Infantry, UnitKind::Tank) => 1.2,
        _ => 1.0,
    }
}

/// Expected damage before jitter. Always at least 1.
pub fn estimate_damage(attacker: &Unit, defender: &Unit, defender_terrain: TerrainKind) -> i32 {
    let health_factor = 0.5 + 0.5 * attacker.health_ratio();
    let raw = f64::from(attacker.stats.attack) * health_factor;

    let effective_defense = defender.stats.defense + defender_terrain.defense_modifier();
    let after_defense = (raw - f64::from(effective_defense)).max(1.0);

    let damage = (after_defense * type_multiplier(attacker.kind, defender.kind)).floor() as i32;
    damage.max(1)
}

/// What happened in one attack
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttackOutcome {
    pub attacker: Coord,
    pub defender: Coord,
    pub attacker_kind: UnitKind,
    pub defender_kind: UnitKind,
    pub defender_faction: Faction,
    pub damage: i32,
    pub remaining_health: i32,
    pub destroyed: bool,
}

/// Apply one attack with random jitter. Validates only that both cells hold
/// units of different factions; range, turn and cost checks are the
/// caller's job.
pub fn resolve_attack<R: Rng>(
    grid: &mut HexGrid,
    attacker_pos: Coord,
    defender_pos: Coord,
    rng: &mut R,
) -> Result<AttackOutcome, ActionError> {
    let attacker = grid
        .unit(attacker_pos)
        .ok_or(ActionError::NoUnit(attacker_pos))?;
    let defender_cell = grid
        .cell(defender_pos)
        .ok_or(ActionError::OutOfBounds(defender_pos))?;
    let defender = defender_cell
        .unit
        .as_ref()
        .ok_or(ActionError::NoUnit(defender_pos))?;
    if defender.faction == attacker.faction {
        return Err(ActionError::NotEnemy(defender_pos));
    }

    let estimate = estimate_damage(attacker, defender, defender_cell.terrain);
    let jitter = rng.gen_range(JITTER_RANGE.0..=JITTER_RANGE.1);
    let damage = ((f64::from(estimate) * jitter).floor() as i32).max(1);

    let attacker_kind = attacker.kind;
    let defender_kind = defender.kind;
    let defender_faction = defender.faction;

    let remaining_health = match grid.unit_mut(defender_pos) {
        Some(target) => {
            target.health -= damage;
            target.health
        }
        None => 0,
    };
    let destroyed = remaining_health <= 0;
    if destroyed {
        grid.take_unit(defender_pos);
    }

    if let Some(unit) = grid.unit_mut(attacker_pos) {
        unit.has_attacked = true;
        unit.has_moved = true;
    }

    tracing::debug!(
        "{:?} at {} hit {:?} at {} for {} damage{}",
        attacker_kind,
        attacker_pos,
        defender_kind,
        defender_pos,
        damage,
        if destroyed { " (destroyed)" } else { "" }
    );

    Ok(AttackOutcome {
        attacker: attacker_pos,
        defender: defender_pos,
        attacker_kind,
        defender_kind,
        defender_faction,
        damage,
        remaining_health: remaining_health.max(0),
        destroyed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_infantry_vs_infantry_on_plain() {
        let a = Unit::new(UnitKind::Infantry, Faction::Us);
        let d = Unit::new(UnitKind::Infantry, Faction::Dprk);
        assert_eq!(estimate_damage(&a, &d, TerrainKind::Plain), 2);
    }

    #[test]
    fn test_minimum_one_damage() {
        let mut a = Unit::new(UnitKind::Infantry, Faction::Us);
        a.health = 1;
        let d = Unit::new(UnitKind::Tank, Faction::Dprk);
        // raw 2.75 - 7 floors at 1, then x1.2
        assert_eq!(estimate_damage(&a, &d, TerrainKind::City), 1);
    }

    #[test]
    fn test_matchups() {
        let art = Unit::new(UnitKind::Artillery, Faction::Us);
        let inf = Unit::new(UnitKind::Infantry, Faction::Pla);
        // (10 - 3) * 1.5 = 10.5
        assert_eq!(estimate_damage(&art, &inf, TerrainKind::Plain), 10);

        let tank = Unit::new(UnitKind::Tank, Faction::Us);
        let art_d = Unit::new(UnitKind::Artillery, Faction::Pla);
        // (8 - 1) * 1.3 = 9.1
        assert_eq!(estimate_damage(&tank, &art_d, TerrainKind::Plain), 9);
        assert!((type_multiplier(UnitKind::Tank, UnitKind::Tank) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_terrain_defense_reduces_damage() {
        let a = Unit::new(UnitKind::Tank, Faction::Us);
        let d = Unit::new(UnitKind::Infantry, Faction::Dprk);
        let open = estimate_damage(&a, &d, TerrainKind::Plain);
        let forest = estimate_damage(&a, &d, TerrainKind::Forest);
        assert!(forest < open);
    }

    #[test]
    fn test_resolve_marks_attacker_spent() {
        let mut grid = HexGrid::default();
        let a = Coord::new(5, 5);
        let d = Coord::new(5, 6);
        grid.place_unit(a, Unit::new(UnitKind::Tank, Faction::Us)).unwrap();
        grid.place_unit(d, Unit::new(UnitKind::Tank, Faction::Pla)).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let outcome = resolve_attack(&mut grid, a, d, &mut rng).unwrap();

        // estimate 3, jitter keeps it at 2..=3
        assert!((2..=3).contains(&outcome.damage));
        assert_eq!(grid.unit(d).unwrap().health, 15 - outcome.damage);
        let attacker = grid.unit(a).unwrap();
        assert!(attacker.has_attacked && attacker.has_moved);
    }

    #[test]
    fn test_resolve_destroys_defender() {
        let mut grid = HexGrid::default();
        let a = Coord::new(5, 5);
        let d = Coord::new(5, 6);
        grid.place_unit(a, Unit::new(UnitKind::Artillery, Faction::Us)).unwrap();
        let mut victim = Unit::new(UnitKind::Infantry, Faction::Rok);
        victim.health = 2;
        grid.place_unit(d, victim).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let outcome = resolve_attack(&mut grid, a, d, &mut rng).unwrap();
        assert!(outcome.destroyed);
        assert_eq!(outcome.remaining_health, 0);
        assert!(grid.unit(d).is_none());
    }

    #[test]
    fn test_resolve_rejects_friendly() {
        let mut grid = HexGrid::default();
        grid.place_unit(Coord::new(1, 1), Unit::new(UnitKind::Tank, Faction::Us)).unwrap();
        grid.place_unit(Coord::new(1, 2), Unit::new(UnitKind::Tank, Faction::Us)).unwrap();
        let before = grid.clone();

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = resolve_attack(&mut grid, Coord::new(1, 1), Coord::new(1, 2), &mut rng);
        assert_eq!(err, Err(ActionError::NotEnemy(Coord::new(1, 2))));
        assert_eq!(grid, before);
    }
}
