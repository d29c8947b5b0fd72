//! Breadth-first movement and attack range search

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::board::{Coord, HexGrid};

/// Reachable cells with the path cost that first admitted them, in BFS order.
///
/// A cell is admitted once (first admission wins). Occupied and impassable
/// cells are never admitted and never expanded. The origin is excluded.
/// Empty if no unit stands on `origin`.
pub fn movement_costs(grid: &HexGrid, origin: Coord) -> Vec<(Coord, u32)> {
    let Some(unit) = grid.unit(origin) else {
        return Vec::new();
    };
    let budget = unit.stats.movement;
    let kind = unit.kind;

    let mut visited = FxHashSet::default();
    visited.insert(origin);
    let mut queue = VecDeque::from([(origin, 0u32)]);
    let mut reachable = Vec::new();

    while let Some((current, cost)) = queue.pop_front() {
        for next in grid.neighbors(current) {
            if visited.contains(&next) {
                continue;
            }
            let Some(cell) = grid.cell(next) else { continue };
            if cell.is_occupied() {
                continue;
            }
            let Some(step) = cell.terrain.movement_cost(kind) else {
                continue;
            };

            let total = cost + step;
            if total <= budget {
                visited.insert(next);
                reachable.push((next, total));
                queue.push_back((next, total));
            }
        }
    }

    reachable
}

/// Cells the unit at `origin` may move to
pub fn movement_range(grid: &HexGrid, origin: Coord) -> Vec<Coord> {
    movement_costs(grid, origin)
        .into_iter()
        .map(|(coord, _)| coord)
        .collect()
}

/// Every on-grid cell at hex distance 1..=radius, ignoring terrain and
/// occupancy, in BFS order
pub fn cells_within(grid: &HexGrid, origin: Coord, radius: u32) -> Vec<Coord> {
    let mut visited = FxHashSet::default();
    visited.insert(origin);
    let mut queue = VecDeque::from([(origin, 0u32)]);
    let mut cells = Vec::new();

    while let Some((current, steps)) = queue.pop_front() {
        if steps >= radius {
            continue;
        }
        for next in grid.neighbors(current) {
            if visited.insert(next) {
                cells.push(next);
                queue.push_back((next, steps + 1));
            }
        }
    }

    cells
}

/// Cells within the attacker's range holding a unit of another faction.
/// Empty if no unit stands on `origin`.
pub fn attack_range(grid: &HexGrid, origin: Coord) -> Vec<Coord> {
    let Some(unit) = grid.unit(origin) else {
        return Vec::new();
    };
    let faction = unit.faction;

    cells_within(grid, origin, unit.attack_range())
        .into_iter()
        .filter(|&c| grid.unit(c).is_some_and(|u| u.faction != faction))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{TerrainKind, UnitKind};
    use crate::units::{Faction, Unit};

    fn place(grid: &mut HexGrid, row: i32, col: i32, kind: UnitKind, faction: Faction) -> Coord {
        let c = Coord::new(row, col);
        grid.place_unit(c, Unit::new(kind, faction)).unwrap();
        c
    }

    #[test]
    fn test_empty_origin_has_no_range() {
        let grid = HexGrid::default();
        assert!(movement_range(&grid, Coord::new(5, 5)).is_empty());
        assert!(attack_range(&grid, Coord::new(5, 5)).is_empty());
    }

    #[test]
    fn test_infantry_open_field() {
        let mut grid = HexGrid::default();
        let origin = place(&mut grid, 15, 9, UnitKind::Infantry, Faction::Us);
        let moves = movement_range(&grid, origin);

        // 6 + 12 + 18 cells within 3 steps on open ground
        assert_eq!(moves.len(), 36);
        assert!(!moves.contains(&origin));
        assert!(moves.iter().all(|&c| origin.distance_to(c) <= 3));
    }

    #[test]
    fn test_costs_within_budget() {
        let mut grid = HexGrid::default();
        for col in 0..18 {
            grid.set_terrain(Coord::new(14, col), TerrainKind::Forest);
        }
        let origin = place(&mut grid, 15, 9, UnitKind::Tank, Faction::Rok);
        for (coord, cost) in movement_costs(&grid, origin) {
            assert!(cost <= 5, "{coord} cost {cost}");
            assert!(coord != origin);
        }
    }

    #[test]
    fn test_water_and_occupied_excluded() {
        let mut grid = HexGrid::default();
        let origin = place(&mut grid, 10, 10, UnitKind::Infantry, Faction::Us);
        let blocker = place(&mut grid, 10, 11, UnitKind::Tank, Faction::Dprk);
        grid.set_terrain(Coord::new(10, 9), TerrainKind::Water);

        let moves = movement_range(&grid, origin);
        assert!(!moves.contains(&blocker));
        assert!(!moves.contains(&Coord::new(10, 9)));
        assert!(moves.iter().all(|&c| grid.unit(c).is_none()));
    }

    #[test]
    fn test_surrounded_unit_cannot_move() {
        let mut grid = HexGrid::default();
        let origin = place(&mut grid, 10, 10, UnitKind::Tank, Faction::Us);
        for n in grid.neighbors(origin) {
            grid.set_terrain(n, TerrainKind::Water);
        }
        assert!(movement_range(&grid, origin).is_empty());
    }

    #[test]
    fn test_cells_within_counts() {
        let grid = HexGrid::default();
        assert_eq!(cells_within(&grid, Coord::new(15, 9), 1).len(), 6);
        assert_eq!(cells_within(&grid, Coord::new(15, 9), 2).len(), 18);
        assert!(cells_within(&grid, Coord::new(15, 9), 0).is_empty());
    }

    #[test]
    fn test_attack_range_enemies_only() {
        let mut grid = HexGrid::default();
        let origin = place(&mut grid, 10, 10, UnitKind::Infantry, Faction::Us);
        let enemy = place(&mut grid, 10, 11, UnitKind::Tank, Faction::Pla);
        place(&mut grid, 10, 9, UnitKind::Tank, Faction::Us);
        place(&mut grid, 10, 13, UnitKind::Tank, Faction::Pla);

        assert_eq!(attack_range(&grid, origin), vec![enemy]);
    }

    #[test]
    fn test_artillery_reaches_two() {
        let mut grid = HexGrid::default();
        let origin = place(&mut grid, 10, 10, UnitKind::Artillery, Faction::Dprk);
        let far = place(&mut grid, 10, 12, UnitKind::Infantry, Faction::Us);
        place(&mut grid, 10, 13, UnitKind::Infantry, Faction::Us);

        assert_eq!(attack_range(&grid, origin), vec![far]);
    }
}
