//! Session save/restore
//!
//! Saving demotes every active cache, then writes each part of the session
//! under its own key. Restoring reads the keys independently: a missing or
//! unreadable field falls back to its default without affecting the others.
//!
//! The full set of fields is first written as one journal entry under
//! `pending_save` and removed once every key is in place. A journal found on
//! restore belongs to a save that stopped part way; its fields are used
//! instead of the per-key values, which may mix two sessions.

use anyhow::Result;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};

use crate::cache::store::CacheStore;
use crate::core::board::CellRegistry;
use crate::core::error::GeoError;
use crate::core::world::{CellKey, Coin, CoinRecord, LatLng, PathSegment, PlayerState};
use crate::session::meta::SessionMeta;
use crate::session::storage::KvStorage;

/// Storage keys
pub const SNAPSHOTS_KEY: &str = "cache_snapshots";
pub const PLAYER_COINS_KEY: &str = "player_coins";
pub const PLAYER_POSITION_KEY: &str = "player_position";
pub const TRAIL_KEY: &str = "movement_trail";
pub const META_KEY: &str = "meta";
pub const PENDING_KEY: &str = "pending_save";

/// Session state read back from storage
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredSession {
    pub dormant: HashMap<CellKey, String>,
    pub coins: Vec<Coin>,
    pub position: LatLng,
    pub trail: Vec<PathSegment>,
}

impl RestoredSession {
    pub fn player(&self) -> PlayerState {
        PlayerState {
            position: self.position,
            coins: self.coins.clone(),
            trail: self.trail.clone(),
        }
    }
}

/// Demote every cache and write the whole session to `storage`
pub fn save(store: &mut CacheStore, player: &PlayerState, storage: &mut dyn KvStorage) -> Result<()> {
    store.demote_all();

    let table: BTreeMap<String, &String> = store
        .dormant_table()
        .iter()
        .map(|(key, snapshot)| (key.to_string(), snapshot))
        .collect();
    let coins: Vec<CoinRecord> = player.coins.iter().map(|coin| coin.record()).collect();

    let meta = SessionMeta::new(table.len(), coins.len());

    let fields: BTreeMap<&str, String> = BTreeMap::from([
        (SNAPSHOTS_KEY, serde_json::to_string(&table)?),
        (PLAYER_COINS_KEY, serde_json::to_string(&coins)?),
        (PLAYER_POSITION_KEY, serde_json::to_string(&player.position)?),
        (TRAIL_KEY, serde_json::to_string(&player.trail)?),
        (META_KEY, serde_json::to_string_pretty(&meta)?),
    ]);

    storage.set_item(PENDING_KEY, &serde_json::to_string(&fields)?)?;
    for (key, value) in &fields {
        storage.set_item(key, value)?;
    }
    storage.remove_item(PENDING_KEY)?;

    tracing::debug!(
        caches = table.len(),
        coins = coins.len(),
        trail = player.trail.len(),
        "saved session"
    );
    Ok(())
}

/// Read a session back, defaulting each absent or malformed field
pub fn restore(
    storage: &dyn KvStorage,
    registry: &mut CellRegistry,
    origin: LatLng,
) -> RestoredSession {
    let journal = read_raw(storage, PENDING_KEY).and_then(|raw| {
        match serde_json::from_str::<HashMap<String, String>>(&raw) {
            Ok(fields) => Some(fields),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable pending save");
                None
            }
        }
    });
    if journal.is_some() {
        tracing::warn!("previous save was interrupted; restoring from its journal");
    }
    let fields = Fields { storage, journal };

    if let Some(meta) = fields.read::<SessionMeta>(META_KEY) {
        if !meta.is_current() {
            tracing::warn!(
                found = %meta.session_version,
                "session was written by a different format version"
            );
        }
    }

    let dormant = fields
        .read::<BTreeMap<String, String>>(SNAPSHOTS_KEY)
        .map(parse_snapshot_table)
        .unwrap_or_default();

    let coins = fields
        .read::<Vec<CoinRecord>>(PLAYER_COINS_KEY)
        .unwrap_or_default()
        .into_iter()
        .map(|record| registry.resolve_coin(record))
        .collect();

    let position = fields
        .read::<LatLng>(PLAYER_POSITION_KEY)
        .filter(|p| registry.in_range(*p))
        .unwrap_or(origin);

    let trail = fields
        .read::<Vec<PathSegment>>(TRAIL_KEY)
        .unwrap_or_default();

    RestoredSession {
        dormant,
        coins,
        position,
        trail,
    }
}

/// Where restored fields come from: the journal of an interrupted save when
/// one exists, the per-key values otherwise
struct Fields<'a> {
    storage: &'a dyn KvStorage,
    journal: Option<HashMap<String, String>>,
}

impl Fields<'_> {
    fn raw(&self, key: &str) -> Option<String> {
        match &self.journal {
            Some(journal) => journal.get(key).cloned(),
            None => read_raw(self.storage, key),
        }
    }

    /// Read and decode one field; failures are logged and treated as absence
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        decode_field(key, &self.raw(key)?)
    }
}

fn read_raw(storage: &dyn KvStorage, key: &str) -> Option<String> {
    match storage.get_item(key) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(field = key, error = %err, "could not read session field");
            None
        }
    }
}

fn decode_field<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            let err = GeoError::MalformedSessionField {
                field: key.to_string(),
                reason: e.to_string(),
            };
            tracing::warn!(error = %err, "using default for session field");
            None
        }
    }
}

/// Entries with unreadable keys are dropped; the rest survive
fn parse_snapshot_table(table: BTreeMap<String, String>) -> HashMap<CellKey, String> {
    table
        .into_iter()
        .filter_map(|(key, snapshot)| match key.parse::<CellKey>() {
            Ok(cell_key) => Some((cell_key, snapshot)),
            Err(err) => {
                tracing::warn!(error = %err, "dropping cache snapshot");
                None
            }
        })
        .collect()
}
