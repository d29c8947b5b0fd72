//! Turn rotation and action-point accounting

use serde::{Deserialize, Serialize};

use crate::board::HexGrid;
use crate::catalog::TerrainKind;
use crate::error::ActionError;
use crate::units::{Faction, Unit};

/// Action points granted at the start of every faction turn
pub const ACTION_POINTS_PER_TURN: u32 = 3;

/// Fixed cost of capturing a city
pub const CAPTURE_COST: u32 = 2;

/// Cost of moving `unit` onto `destination`
pub fn move_cost(unit: &Unit, destination: TerrainKind) -> u32 {
    unit.kind.cost().action_points + destination.action_surcharge()
}

pub fn attack_cost(unit: &Unit) -> u32 {
    unit.kind.cost().action_points
}

/// Result of ending a turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TurnChange {
    pub ended: Faction,
    pub active: Faction,
    pub round: u32,
    /// Rotation came back to the player's faction
    pub new_round: bool,
}

/// Whose turn it is and how many action points remain
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    round: u32,
    active: Faction,
    action_points: u32,
    player: Faction,
    budget: u32,
}

impl TurnState {
    /// Round 1, player's faction active with a full budget
    pub fn new(player: Faction) -> Self {
        Self::with_budget(player, ACTION_POINTS_PER_TURN)
    }

    pub fn with_budget(player: Faction, budget: u32) -> Self {
        Self {
            round: 1,
            active: player,
            action_points: budget,
            player,
            budget,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn active(&self) -> Faction {
        self.active
    }

    pub fn player(&self) -> Faction {
        self.player
    }

    pub fn action_points(&self) -> u32 {
        self.action_points
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn is_player_turn(&self) -> bool {
        self.active == self.player
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.action_points >= cost
    }

    /// Check affordability without spending
    pub fn ensure_affordable(&self, cost: u32) -> Result<(), ActionError> {
        if self.can_afford(cost) {
            Ok(())
        } else {
            Err(ActionError::InsufficientActionPoints {
                needed: cost,
                available: self.action_points,
            })
        }
    }

    /// Deduct `cost`, or reject and leave the points untouched
    pub fn spend(&mut self, cost: u32) -> Result<(), ActionError> {
        self.ensure_affordable(cost)?;
        self.action_points -= cost;
        Ok(())
    }

    /// Reset the ending faction's units, hand over to the next faction and
    /// refill its action points
    pub fn end_turn(&mut self, grid: &mut HexGrid) -> TurnChange {
        let ended = self.active;
        for coord in grid.unit_positions(ended) {
            if let Some(unit) = grid.unit_mut(coord) {
                unit.reset_actions();
            }
        }

        self.active = ended.next();
        self.action_points = self.budget;

        let new_round = self.active == self.player;
        if new_round {
            self.round += 1;
        }

        tracing::info!(
            "{} ended turn; {} to act (round {})",
            ended,
            self.active,
            self.round
        );

        TurnChange {
            ended,
            active: self.active,
            round: self.round,
            new_round,
        }
    }
}
