//! Game configuration

use anyhow::{bail, Result};

use crate::core::world::LatLng;

/// Default starting point for a fresh session
pub const DEFAULT_ORIGIN: LatLng = LatLng {
    lat: 36.98949379578401,
    lng: -122.06277128548504,
};

/// Width of one grid cell in degrees
pub const DEFAULT_TILE_WIDTH: f64 = 1e-4;

/// How many cells the player can see in each direction
pub const DEFAULT_VISIBILITY_RADIUS: i64 = 8;

/// Chance that a cell hosts a cache
pub const DEFAULT_SPAWN_PROBABILITY: f64 = 0.1;

/// Upper bound (exclusive) on the coins a new cache starts with
pub const DEFAULT_MAX_INITIAL_COINS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    pub tile_width: f64,
    pub visibility_radius: i64,
    pub spawn_probability: f64,
    pub max_initial_coins: u32,
    pub origin: LatLng,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_width: DEFAULT_TILE_WIDTH,
            visibility_radius: DEFAULT_VISIBILITY_RADIUS,
            spawn_probability: DEFAULT_SPAWN_PROBABILITY,
            max_initial_coins: DEFAULT_MAX_INITIAL_COINS,
            origin: DEFAULT_ORIGIN,
        }
    }
}

impl GameConfig {
    /// Reject values that would make the grid meaningless
    pub fn validate(&self) -> Result<()> {
        if !(self.tile_width.is_finite() && self.tile_width > 0.0) {
            bail!("tile width must be a positive number, got {}", self.tile_width);
        }
        if self.visibility_radius < 0 {
            bail!(
                "visibility radius must not be negative, got {}",
                self.visibility_radius
            );
        }
        if !(0.0..=1.0).contains(&self.spawn_probability) {
            bail!(
                "spawn probability must be within [0, 1], got {}",
                self.spawn_probability
            );
        }
        Ok(())
    }
}
