//! Error types

use std::time::Duration;

use crate::board::Coord;
use crate::units::Faction;

/// Fatal setup and configuration failures
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Invalid grid dimensions: {rows}x{cols}")]
    InvalidGrid { rows: usize, cols: usize },

    #[error("Invalid geographic bounds: {0}")]
    InvalidBounds(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

/// Failure of one geographic data source. Always recovered by falling
/// through to the next source, then to default terrain.
#[derive(Debug, thiserror::Error)]
pub enum DataFetchError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error status {0}")]
    Http(u16),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Empty response body")]
    EmptyBody,

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Invalid data structure in response")]
    InvalidStructure,
}

/// A rejected player or AI action. State is unchanged when one of these is
/// returned; the message is meant for display.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("It is {active}'s turn, not the player's")]
    NotPlayerTurn { active: Faction },

    #[error("No unit selected")]
    NoSelection,

    #[error("No unit at {0}")]
    NoUnit(Coord),

    #[error("Coordinate {0} is outside the map")]
    OutOfBounds(Coord),

    #[error("Unit belongs to {owner}, but {active} is acting")]
    NotOwnUnit { owner: Faction, active: Faction },

    #[error("This unit has already moved this turn")]
    AlreadyMoved,

    #[error("This unit has already attacked this turn")]
    AlreadyAttacked,

    #[error("This unit has already acted this turn")]
    AlreadyActed,

    #[error("Not enough action points: need {needed}, have {available}")]
    InsufficientActionPoints { needed: u32, available: u32 },

    #[error("Cell {0} is not reachable")]
    Unreachable(Coord),

    #[error("Target {0} is not in attack range")]
    OutOfRange(Coord),

    #[error("No enemy units in attack range")]
    NoTargets,

    #[error("Unit at {0} is not an enemy")]
    NotEnemy(Coord),

    #[error("Only cities can be captured")]
    NotACity,

    #[error("This city is already held by {0}")]
    AlreadyOwned(Faction),
}
