//! Game - Ties the registry, cache store and player together
//!
//! A `Game` is one session: restore from storage, apply commands, save.
//! Every view change demotes caches that fell out of view before the new
//! visible set is materialized.

use anyhow::Result;
use std::collections::HashSet;
use std::rc::Rc;

use crate::cache::ledger;
use crate::cache::store::CacheStore;
use crate::core::board::CellRegistry;
use crate::core::config::GameConfig;
use crate::core::error::GeoError;
use crate::core::luck::Luck;
use crate::core::world::{Bounds, Cache, Cell, CellKey, Coin, CoinRecord, LatLng, PlayerState};
use crate::session::persist;
use crate::session::storage::KvStorage;

pub struct Game {
    config: GameConfig,
    luck: Box<dyn Luck>,
    registry: CellRegistry,
    store: CacheStore,
    player: PlayerState,
    visible: Vec<Rc<Cell>>,
}

impl Game {
    /// Fresh session with the player at the configured origin
    #[cfg(test)]
    pub fn new(config: GameConfig, luck: Box<dyn Luck>) -> Self {
        let mut game = Self {
            registry: CellRegistry::new(config.tile_width, config.spawn_probability),
            store: CacheStore::new(config.max_initial_coins),
            player: PlayerState::at(config.origin),
            visible: Vec::new(),
            config,
            luck,
        };
        game.refresh_view();
        game
    }

    /// Session rebuilt from whatever `storage` holds
    pub fn restore(config: GameConfig, luck: Box<dyn Luck>, storage: &dyn KvStorage) -> Self {
        let mut registry = CellRegistry::new(config.tile_width, config.spawn_probability);
        let restored = persist::restore(storage, &mut registry, config.origin);
        let player = restored.player();
        let mut game = Self {
            store: CacheStore::with_dormant(config.max_initial_coins, restored.dormant),
            player,
            registry,
            visible: Vec::new(),
            config,
            luck,
        };
        game.refresh_view();
        game
    }

    /// Demote everything and write the session out
    pub fn save(&mut self, storage: &mut dyn KvStorage) -> Result<()> {
        persist::save(&mut self.store, &self.player, storage)?;
        self.visible.clear();
        Ok(())
    }

    /// Wipe storage and start over at the origin
    pub fn reset(&mut self, storage: &mut dyn KvStorage) -> Result<()> {
        storage.clear()?;
        self.store.clear();
        self.player = PlayerState::at(self.config.origin);
        self.refresh_view();
        tracing::info!("session reset");
        Ok(())
    }

    /// Recompute the visible cells around the player and bring their caches in
    pub fn refresh_view(&mut self) {
        let cells = self.registry.cells_near(
            self.player.position,
            self.config.visibility_radius,
            self.luck.as_ref(),
        );
        let keys: HashSet<CellKey> = cells.iter().map(|cell| cell.key()).collect();

        self.store.demote_out_of_view(&keys);
        for cell in &cells {
            self.store
                .materialize(cell, &mut self.registry, self.luck.as_ref());
        }

        self.visible = cells;
        self.visible.sort_by_key(|cell| cell.key());
    }

    /// Step by whole tiles: `d_lat` north, `d_lng` east
    pub fn move_by(&mut self, d_lat: i64, d_lng: i64) -> Result<LatLng, GeoError> {
        let w = self.config.tile_width;
        let to = LatLng::new(
            self.player.position.lat + d_lat as f64 * w,
            self.player.position.lng + d_lng as f64 * w,
        );
        self.move_to(to)
    }

    /// Jump to an absolute position
    ///
    /// Positions the grid cannot index are refused and the player stays put.
    pub fn move_to(&mut self, to: LatLng) -> Result<LatLng, GeoError> {
        if !self.registry.in_range(to) {
            return Err(GeoError::InvalidPosition {
                lat: to.lat,
                lng: to.lng,
            });
        }
        self.player.travel_to(to);
        tracing::debug!(lat = to.lat, lng = to.lng, "player moved");
        self.refresh_view();
        Ok(to)
    }

    /// Take the top coin of the cache at `key`
    pub fn withdraw(&mut self, key: CellKey) -> Result<Option<Coin>, GeoError> {
        let cache = self.store.get_mut(&key).ok_or_else(|| not_in_view(key))?;
        Ok(ledger::withdraw(cache, &mut self.player.coins))
    }

    /// Drop the player's top coin into the cache at `key`
    pub fn deposit(&mut self, key: CellKey) -> Result<Option<Coin>, GeoError> {
        let cache = self.store.get_mut(&key).ok_or_else(|| not_in_view(key))?;
        Ok(ledger::deposit(cache, &mut self.player.coins))
    }

    /// Visible caches with their bounds, ordered by key
    pub fn visible_caches(&self) -> Vec<(&Cache, Bounds)> {
        self.visible
            .iter()
            .filter_map(|cell| {
                self.store
                    .get(&cell.key())
                    .map(|cache| (cache, self.registry.bounds_for_cell(cell)))
            })
            .collect()
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Total coins held by the player and every cache, active or dormant
    pub fn coin_census(&self) -> usize {
        let active: usize = self.store.active_caches().map(Cache::len).sum();
        let dormant: usize = self
            .store
            .dormant_table()
            .values()
            .map(|snapshot| {
                serde_json::from_str::<Vec<CoinRecord>>(snapshot)
                    .map(|records| records.len())
                    .unwrap_or(0)
            })
            .sum();
        self.player.coins.len() + active + dormant
    }
}

fn not_in_view(key: CellKey) -> GeoError {
    GeoError::UnknownCache {
        key: key.to_string(),
    }
}
