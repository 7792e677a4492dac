//! Cache store - Active and dormant caches
//!
//! Every cache key that has been visited lives in exactly one of two tables:
//! `active` (in-memory coin stacks for cells in view) or `dormant` (snapshot
//! text for everything else). The only transitions are `materialize` and
//! `demote_out_of_view`.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::cache::snapshot::{deserialize, serialize};
use crate::core::board::CellRegistry;
use crate::core::luck::Luck;
use crate::core::world::{Cache, Cell, CellKey, Coin};

/// Suffix appended to a cell key when deriving its starting coin count
pub const INITIAL_VALUE_SUFFIX: &str = ":initialValue";

#[derive(Debug, Default)]
pub struct CacheStore {
    max_initial_coins: u32,
    active: HashMap<CellKey, Cache>,
    dormant: HashMap<CellKey, String>,
}

impl CacheStore {
    pub fn new(max_initial_coins: u32) -> Self {
        Self {
            max_initial_coins,
            active: HashMap::new(),
            dormant: HashMap::new(),
        }
    }

    /// Start from a previously saved snapshot table
    pub fn with_dormant(max_initial_coins: u32, dormant: HashMap<CellKey, String>) -> Self {
        Self {
            max_initial_coins,
            active: HashMap::new(),
            dormant,
        }
    }

    /// Bring the cache for `cell` into the active table
    ///
    /// A first visit mints fresh coins, a dormant cache is decoded from its
    /// snapshot, and an active cache is returned as is. A snapshot that fails
    /// to decode is dropped and the cache starts over empty.
    pub fn materialize(
        &mut self,
        cell: &Rc<Cell>,
        registry: &mut CellRegistry,
        luck: &dyn Luck,
    ) -> &mut Cache {
        let key = cell.key();
        match self.active.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let cache = match self.dormant.remove(&key) {
                    Some(snapshot) => match deserialize(key, &snapshot, registry) {
                        Ok(cache) => {
                            tracing::debug!(cache = %key, coins = cache.len(), "restored dormant cache");
                            cache
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "discarding unreadable cache snapshot");
                            Cache::new(key)
                        }
                    },
                    None => {
                        let cache = mint(cell, self.max_initial_coins, luck);
                        tracing::debug!(cache = %key, coins = cache.len(), "generated new cache");
                        cache
                    }
                };
                entry.insert(cache)
            }
        }
    }

    /// Move every active cache outside `visible` into the dormant table
    ///
    /// Returns the number of caches demoted.
    pub fn demote_out_of_view(&mut self, visible: &HashSet<CellKey>) -> usize {
        let leaving: Vec<CellKey> = self
            .active
            .keys()
            .filter(|key| !visible.contains(key))
            .copied()
            .collect();

        for key in &leaving {
            if let Some(cache) = self.active.remove(key) {
                self.dormant.insert(*key, serialize(&cache));
            }
        }

        if !leaving.is_empty() {
            tracing::debug!(demoted = leaving.len(), "demoted caches out of view");
        }
        leaving.len()
    }

    /// Demote everything; used before saving
    pub fn demote_all(&mut self) -> usize {
        self.demote_out_of_view(&HashSet::new())
    }

    pub fn get(&self, key: &CellKey) -> Option<&Cache> {
        self.active.get(key)
    }

    pub fn get_mut(&mut self, key: &CellKey) -> Option<&mut Cache> {
        self.active.get_mut(key)
    }

    #[cfg(test)]
    pub fn is_active(&self, key: &CellKey) -> bool {
        self.active.contains_key(key)
    }

    #[cfg(test)]
    pub fn is_dormant(&self, key: &CellKey) -> bool {
        self.dormant.contains_key(key)
    }

    /// Active cache keys in sorted order
    pub fn active_keys(&self) -> Vec<CellKey> {
        let mut keys: Vec<_> = self.active.keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn active_caches(&self) -> impl Iterator<Item = &Cache> {
        self.active.values()
    }

    pub fn dormant_table(&self) -> &HashMap<CellKey, String> {
        &self.dormant
    }

    /// Forget every cache, active and dormant
    pub fn clear(&mut self) {
        self.active.clear();
        self.dormant.clear();
    }
}

/// Fill a brand new cache for `cell` with its deterministic starting coins
fn mint(cell: &Rc<Cell>, max_initial_coins: u32, luck: &dyn Luck) -> Cache {
    let key = cell.key();
    let roll = luck.value(&format!("{}{}", key, INITIAL_VALUE_SUFFIX));
    let count = (roll * f64::from(max_initial_coins)).floor() as u32;

    Cache {
        key,
        coins: (0..count)
            .map(|serial| Coin {
                cell: Rc::clone(cell),
                serial,
            })
            .collect(),
    }
}
