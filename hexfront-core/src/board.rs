//! Hex grid geometry with offset coordinates
//!
//! Pointy-top hexes, even rows shifted half a cell to the right.

use serde::{Deserialize, Serialize};

use crate::catalog::TerrainKind;
use crate::units::{Faction, Unit};

/// Default grid height
pub const DEFAULT_ROWS: usize = 30;
/// Default grid width
pub const DEFAULT_COLS: usize = 18;

/// Neighbor offsets (d_row, d_col) for even rows
const EVEN_ROW_OFFSETS: [(i32, i32); 6] = [(-1, 0), (-1, 1), (0, 1), (1, 1), (1, 0), (0, -1)];

/// Neighbor offsets (d_row, d_col) for odd rows
const ODD_ROW_OFFSETS: [(i32, i32); 6] = [(-1, -1), (-1, 0), (0, 1), (1, 0), (1, -1), (0, -1)];

/// Offset coordinates into the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Convert to cube coordinates (x, y, z) with x + y + z = 0
    pub fn to_cube(self) -> (i32, i32, i32) {
        let x = self.col - (self.row + (self.row & 1)) / 2;
        let z = self.row;
        (x, -x - z, z)
    }

    /// Hex steps between two cells
    pub fn distance_to(self, other: Coord) -> u32 {
        let (ax, ay, az) = self.to_cube();
        let (bx, by, bz) = other.to_cube();
        ((ax - bx).abs() + (ay - by).abs() + (az - bz).abs()).unsigned_abs() / 2
    }

    /// Unclipped neighbor positions
    pub fn raw_neighbors(self) -> [Coord; 6] {
        let offsets = if self.row & 1 == 0 {
            EVEN_ROW_OFFSETS
        } else {
            ODD_ROW_OFFSETS
        };
        offsets.map(|(dr, dc)| Coord::new(self.row + dr, self.col + dc))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]", self.row, self.col)
    }
}

/// One grid cell
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub coord: Coord,
    pub terrain: TerrainKind,
    pub unit: Option<Unit>,
    /// Capturing faction, meaningful for cities only
    pub owner: Option<Faction>,
}

impl Cell {
    fn new(coord: Coord) -> Self {
        Self {
            coord,
            terrain: TerrainKind::Plain,
            unit: None,
            owner: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.unit.is_some()
    }

    /// City not yet held by the given faction
    pub fn is_capturable_by(&self, faction: Faction) -> bool {
        self.terrain == TerrainKind::City && self.owner != Some(faction)
    }
}

/// Fixed-size grid, row-major
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HexGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl HexGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        let cells = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| Cell::new(Coord::new(r as i32, c as i32))))
            .collect();
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Check if coordinate lies on the grid
    pub fn contains(&self, coord: Coord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && (coord.row as usize) < self.rows
            && (coord.col as usize) < self.cols
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        self.contains(coord)
            .then(|| coord.row as usize * self.cols + coord.col as usize)
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).map(|i| &self.cells[i])
    }

    pub fn cell_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        self.index(coord).map(move |i| &mut self.cells[i])
    }

    pub fn unit(&self, coord: Coord) -> Option<&Unit> {
        self.cell(coord).and_then(|c| c.unit.as_ref())
    }

    pub fn unit_mut(&mut self, coord: Coord) -> Option<&mut Unit> {
        self.cell_mut(coord).and_then(|c| c.unit.as_mut())
    }

    pub fn terrain(&self, coord: Coord) -> Option<TerrainKind> {
        self.cell(coord).map(|c| c.terrain)
    }

    /// On-grid neighbors (at most 6)
    pub fn neighbors(&self, coord: Coord) -> Vec<Coord> {
        coord
            .raw_neighbors()
            .into_iter()
            .filter(|&n| self.contains(n))
            .collect()
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// All units with their positions, row-major
    pub fn units(&self) -> impl Iterator<Item = (Coord, &Unit)> + '_ {
        self.cells
            .iter()
            .filter_map(|c| c.unit.as_ref().map(|u| (c.coord, u)))
    }

    /// Positions of a faction's units, row-major
    pub fn unit_positions(&self, faction: Faction) -> Vec<Coord> {
        self.units()
            .filter(|(_, u)| u.faction == faction)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Put a unit on an empty cell. Returns the unit back if the cell is
    /// off-grid or occupied.
    pub fn place_unit(&mut self, coord: Coord, unit: Unit) -> Result<(), Unit> {
        match self.cell_mut(coord) {
            Some(cell) if cell.unit.is_none() => {
                cell.unit = Some(unit);
                Ok(())
            }
            _ => Err(unit),
        }
    }

    pub fn take_unit(&mut self, coord: Coord) -> Option<Unit> {
        self.cell_mut(coord).and_then(|c| c.unit.take())
    }

    /// Relocate a unit to an empty cell. Returns false (and changes
    /// nothing) if the source is empty or the destination is taken.
    pub fn move_unit(&mut self, from: Coord, to: Coord) -> bool {
        if from == to || !self.contains(to) || self.unit(to).is_some() {
            return false;
        }
        match self.take_unit(from) {
            Some(unit) => self.place_unit(to, unit).is_ok(),
            None => false,
        }
    }

    pub fn set_terrain(&mut self, coord: Coord, terrain: TerrainKind) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.terrain = terrain;
        }
    }

    /// Overwrite every cell's terrain
    pub fn fill_terrain(&mut self, terrain: TerrainKind) {
        for cell in &mut self.cells {
            cell.terrain = terrain;
        }
    }

    /// Copy of the grid with units and ownership removed
    pub fn terrain_only(&self) -> Self {
        let mut grid = self.clone();
        for cell in &mut grid.cells {
            cell.unit = None;
            cell.owner = None;
        }
        grid
    }
}

impl Default for HexGrid {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::UnitKind;

    #[test]
    fn test_neighbors_are_distance_one() {
        let grid = HexGrid::default();
        for coord in [Coord::new(5, 5), Coord::new(6, 5), Coord::new(10, 0), Coord::new(11, 17)] {
            for n in grid.neighbors(coord) {
                assert_eq!(coord.distance_to(n), 1, "{coord} -> {n}");
            }
        }
    }

    #[test]
    fn test_neighbors_clipped_at_corner() {
        let grid = HexGrid::default();
        let corner = grid.neighbors(Coord::new(0, 0));
        assert_eq!(corner.len(), 3);
        assert!(corner.iter().all(|&c| grid.contains(c)));
        assert_eq!(grid.neighbors(Coord::new(5, 5)).len(), 6);
    }

    #[test]
    fn test_distance() {
        let a = Coord::new(0, 0);
        assert_eq!(a.distance_to(a), 0);
        assert_eq!(a.distance_to(Coord::new(0, 3)), 3);
        assert_eq!(a.distance_to(Coord::new(2, 1)), 2);
        assert_eq!(Coord::new(4, 2).distance_to(Coord::new(1, 7)), Coord::new(1, 7).distance_to(Coord::new(4, 2)));
    }

    #[test]
    fn test_cell_out_of_bounds() {
        let grid = HexGrid::new(4, 4);
        assert!(grid.cell(Coord::new(-1, 0)).is_none());
        assert!(grid.cell(Coord::new(0, 4)).is_none());
        assert!(grid.cell(Coord::new(3, 3)).is_some());
    }

    #[test]
    fn test_move_unit_respects_occupancy() {
        let mut grid = HexGrid::new(4, 4);
        grid.place_unit(Coord::new(0, 0), Unit::new(UnitKind::Infantry, Faction::Us)).unwrap();
        grid.place_unit(Coord::new(0, 1), Unit::new(UnitKind::Tank, Faction::Rok)).unwrap();

        assert!(!grid.move_unit(Coord::new(0, 0), Coord::new(0, 1)));
        assert!(grid.move_unit(Coord::new(0, 0), Coord::new(1, 1)));
        assert!(grid.unit(Coord::new(0, 0)).is_none());
        assert_eq!(grid.units().count(), 2);
    }

    #[test]
    fn test_place_on_occupied_returns_unit() {
        let mut grid = HexGrid::new(2, 2);
        grid.place_unit(Coord::new(1, 1), Unit::new(UnitKind::Infantry, Faction::Us)).unwrap();
        let rejected = grid.place_unit(Coord::new(1, 1), Unit::new(UnitKind::Tank, Faction::Pla));
        assert_eq!(rejected.map_err(|u| u.kind), Err(UnitKind::Tank));
    }
}
