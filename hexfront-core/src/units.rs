//! Factions and unit instances

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{UnitKind, UnitStats};

/// Playable faction, in fixed rotation order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Faction {
    Us,
    Rok,
    Dprk,
    Pla,
}

impl Faction {
    /// Turn rotation order
    pub const ALL: [Faction; 4] = [Faction::Us, Faction::Rok, Faction::Dprk, Faction::Pla];

    /// Next faction in the rotation (wraps)
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn code(self) -> &'static str {
        match self {
            Faction::Us => "US",
            Faction::Rok => "ROK",
            Faction::Dprk => "DPRK",
            Faction::Pla => "PLA",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Faction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Faction::ALL
            .into_iter()
            .find(|f| f.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown faction: {s}"))
    }
}

/// A unit on the map
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub kind: UnitKind,
    pub faction: Faction,
    pub stats: UnitStats,
    pub health: i32,
    pub has_moved: bool,
    pub has_attacked: bool,
}

impl Unit {
    /// Fresh full-health unit
    pub fn new(kind: UnitKind, faction: Faction) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            faction,
            stats,
            health: stats.max_health,
            has_moved: false,
            has_attacked: false,
        }
    }

    pub fn health_ratio(&self) -> f64 {
        f64::from(self.health) / f64::from(self.stats.max_health)
    }

    pub fn is_damaged(&self) -> bool {
        self.health < self.stats.max_health
    }

    pub fn attack_range(&self) -> u32 {
        self.stats.attack_range()
    }

    pub fn is_ranged(&self) -> bool {
        self.attack_range() > 1
    }

    /// Neither moved nor attacked this turn
    pub fn is_fresh(&self) -> bool {
        !self.has_moved && !self.has_attacked
    }

    /// Both action flags spent
    pub fn is_spent(&self) -> bool {
        self.has_moved && self.has_attacked
    }

    pub fn reset_actions(&mut self) {
        self.has_moved = false;
        self.has_attacked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_wraps() {
        assert_eq!(Faction::Us.next(), Faction::Rok);
        assert_eq!(Faction::Dprk.next(), Faction::Pla);
        assert_eq!(Faction::Pla.next(), Faction::Us);
    }

    #[test]
    fn test_faction_parse() {
        assert_eq!("dprk".parse::<Faction>(), Ok(Faction::Dprk));
        assert_eq!("ROK".parse::<Faction>(), Ok(Faction::Rok));
        assert!("USSR".parse::<Faction>().is_err());
    }

    #[test]
    fn test_new_unit_is_fresh() {
        let unit = Unit::new(UnitKind::Tank, Faction::Pla);
        assert_eq!(unit.health, 15);
        assert!(unit.is_fresh());
        assert!(!unit.is_damaged());
        assert!((unit.health_ratio() - 1.0).abs() < f64::EPSILON);
    }
}
