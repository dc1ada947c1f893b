/// Mutable game state: the grid, the movable objects, the player, and the
/// bookkeeping around them. Construction happens once per level load (and
/// again on restart); the step function owns all mutation after that.

use crate::domain::entity::{Entity, Player, Visual};
use crate::domain::grid::{GridBuild, TileGrid};

/// Physics tuning, copied out of the config at load time so the simulation
/// never touches the config layer.
#[derive(Clone, Copy, Debug)]
pub struct Tuning {
    pub player_speed: f32,
    pub jump_strength: f32,
    pub gravity: f32,
    pub friction: f32,
    pub eject_velocity: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            player_speed: 5.0,
            jump_strength: -20.0,
            gravity: 1.0,
            friction: 0.9,
            eject_velocity: -10.0,
        }
    }
}

pub struct WorldState {
    pub grid: TileGrid,
    pub movables: Vec<Entity>,
    pub player: Player,
    /// Index of the movable currently riding the player's head.
    pub rider: Option<usize>,
    pub tuning: Tuning,
    /// Visual applied to a prop when paint brings it alive.
    pub prop_alive_visual: Visual,
    message: Option<String>,
    message_ttl: u32,
}

impl WorldState {
    pub fn new(build: GridBuild, tuning: Tuning, prop_alive_visual: Visual) -> Self {
        let tile = build.grid.tile_size();
        let (sx, sy) = build.spawn.unwrap_or((tile, tile));
        let mut player = Player::new(sx, sy);
        player.speed = tuning.player_speed;
        player.jump_strength = tuning.jump_strength;
        player.gravity = tuning.gravity;
        WorldState {
            grid: build.grid,
            movables: build.movables,
            player,
            rider: None,
            tuning,
            prop_alive_visual,
            message: None,
            message_ttl: 0,
        }
    }

    /// Show a status message for `ttl` ticks.
    pub fn set_message(&mut self, text: impl Into<String>, ttl: u32) {
        self.message = Some(text.into());
        self.message_ttl = ttl;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Called once per tick; expires the status message.
    pub fn tick_message(&mut self) {
        if self.message_ttl > 0 {
            self.message_ttl -= 1;
            if self.message_ttl == 0 {
                self.message = None;
            }
        }
    }
}
