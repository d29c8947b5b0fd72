//! Server state management
//!
//! One running game behind a lock, plus the terrain it was started on so
//! new games can reuse it without another fetch.

use hexfront_core::{Faction, Game, GameConfig, GameError, HexGrid};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Server-wide shared state
pub struct ServerState {
    game: RwLock<Game>,
    terrain: HexGrid,
    config: GameConfig,
}

impl ServerState {
    pub fn new(game: Game) -> Self {
        Self {
            terrain: game.grid().terrain_only(),
            config: game.config().clone(),
            game: RwLock::new(game),
        }
    }

    /// A handler that panicked mid-action leaves the game usable
    pub fn read(&self) -> RwLockReadGuard<'_, Game> {
        self.game.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Game> {
        self.game.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the running game with a freshly deployed one on the same
    /// terrain
    pub fn new_game(&self, player: Option<Faction>, seed: Option<u64>) -> Result<(), GameError> {
        let mut config = self.config.clone();
        if let Some(player) = player {
            config.player_faction = player;
        }
        if seed.is_some() {
            config.seed = seed;
        }

        let mut game = Game::with_grid(config, self.terrain.clone())?;
        game.deploy_initial_units();
        *self.write() = game;

        tracing::info!("Started new game");
        Ok(())
    }
}
