//! Unit and terrain type definitions

use serde::{Deserialize, Serialize};

// ============================================================================
// UNIT TYPES
// ============================================================================

/// Unit kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Infantry = 0,
    Tank = 1,
    Artillery = 2,
}

impl UnitKind {
    pub const ALL: [UnitKind; 3] = [UnitKind::Infantry, UnitKind::Tank, UnitKind::Artillery];

    /// Static definition for this kind
    pub fn unit_type(self) -> &'static UnitType {
        &UNIT_TYPES[self as usize]
    }

    pub fn stats(self) -> UnitStats {
        self.unit_type().stats
    }

    pub fn cost(self) -> UnitCost {
        self.unit_type().cost
    }
}

/// Combat and movement statistics
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStats {
    pub max_health: i32,
    pub attack: i32,
    pub defense: i32,
    /// Movement budget in terrain cost units
    pub movement: u32,
    /// Attack radius in hex steps (None = adjacent only)
    pub range: Option<u32>,
}

impl UnitStats {
    /// Attack radius, defaulting to 1
    pub fn attack_range(&self) -> u32 {
        self.range.unwrap_or(1)
    }
}

/// Acquisition and per-action cost
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCost {
    pub resources: u32,
    pub action_points: u32,
}

/// Unit type definition
#[derive(Clone, Debug, Serialize)]
pub struct UnitType {
    pub kind: UnitKind,
    pub name: &'static str,
    pub icon: char,
    pub stats: UnitStats,
    pub cost: UnitCost,
}

impl UnitType {
    const fn new(
        kind: UnitKind,
        name: &'static str,
        icon: char,
        stats: UnitStats,
        cost: UnitCost,
    ) -> Self {
        Self { kind, name, icon, stats, cost }
    }
}

/// Indexed by `UnitKind as usize`
pub static UNIT_TYPES: [UnitType; 3] = [
    UnitType::new(
        UnitKind::Infantry,
        "Infantry",
        'I',
        UnitStats { max_health: 10, attack: 5, defense: 3, movement: 3, range: None },
        UnitCost { resources: 50, action_points: 1 },
    ),
    UnitType::new(
        UnitKind::Tank,
        "Tank",
        'T',
        UnitStats { max_health: 15, attack: 8, defense: 5, movement: 5, range: None },
        UnitCost { resources: 100, action_points: 2 },
    ),
    UnitType::new(
        UnitKind::Artillery,
        "Artillery",
        'A',
        UnitStats { max_health: 8, attack: 10, defense: 1, movement: 2, range: Some(2) },
        UnitCost { resources: 80, action_points: 2 },
    ),
];

// ============================================================================
// TERRAIN TYPES
// ============================================================================

/// Terrain kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainKind {
    #[default]
    Plain = 0,
    Forest = 1,
    City = 2,
    Water = 3,
}

impl TerrainKind {
    pub const ALL: [TerrainKind; 4] = [
        TerrainKind::Plain,
        TerrainKind::Forest,
        TerrainKind::City,
        TerrainKind::Water,
    ];

    /// Static definition for this kind
    pub fn terrain_type(self) -> &'static TerrainType {
        &TERRAIN_TYPES[self as usize]
    }

    /// Movement cost for a unit kind, None if impassable
    pub fn movement_cost(self, unit: UnitKind) -> Option<u32> {
        self.terrain_type().movement[unit as usize]
    }

    pub fn is_passable(self, unit: UnitKind) -> bool {
        self.movement_cost(unit).is_some()
    }

    /// Flat bonus added to a defender's defense
    pub fn defense_modifier(self) -> i32 {
        self.terrain_type().defense
    }

    /// Extra action points charged for moving onto this terrain
    pub fn action_surcharge(self) -> u32 {
        self.terrain_type().action_surcharge
    }

    /// Ingestion priority when several features land on one cell
    pub fn priority(self) -> u8 {
        self.terrain_type().priority
    }
}

/// Terrain type definition
#[derive(Clone, Debug, Serialize)]
pub struct TerrainType {
    pub kind: TerrainKind,
    pub name: &'static str,
    /// Indexed by `UnitKind as usize`
    pub movement: [Option<u32>; 3],
    pub defense: i32,
    pub action_surcharge: u32,
    pub priority: u8,
}

impl TerrainType {
    const fn new(
        kind: TerrainKind,
        name: &'static str,
        movement: [Option<u32>; 3],
        defense: i32,
        priority: u8,
    ) -> Self {
        Self {
            kind,
            name,
            movement,
            defense,
            action_surcharge: 0,
            priority,
        }
    }
}

/// Indexed by `TerrainKind as usize`
pub static TERRAIN_TYPES: [TerrainType; 4] = [
    TerrainType::new(TerrainKind::Plain, "Plain", [Some(1), Some(1), Some(1)], 0, 1),
    TerrainType::new(TerrainKind::Forest, "Forest", [Some(1), Some(2), Some(2)], 2, 2),
    TerrainType::new(TerrainKind::City, "City", [Some(1), Some(1), Some(1)], 2, 3),
    TerrainType::new(TerrainKind::Water, "Water", [None, None, None], 0, 0),
];
