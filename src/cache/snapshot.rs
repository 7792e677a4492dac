//! Cache snapshots
//!
//! A snapshot is the JSON array of a cache's coin records, bottom of the
//! stack first. Restoring goes through the registry so every coin points at
//! the canonical owner cell again.

use crate::core::board::CellRegistry;
use crate::core::error::GeoError;
use crate::core::world::{Cache, CellKey, CoinRecord};

/// Encode a cache's coins, preserving stack order
pub fn serialize(cache: &Cache) -> String {
    let records: Vec<CoinRecord> = cache.coins.iter().map(|coin| coin.record()).collect();
    serde_json::to_string(&records).expect("coin records always serialize")
}

/// Decode a snapshot into a cache for `key`
///
/// Either every coin is reconstructed or an error is returned; no partially
/// filled cache is ever produced.
pub fn deserialize(
    key: CellKey,
    snapshot: &str,
    registry: &mut CellRegistry,
) -> Result<Cache, GeoError> {
    let records: Vec<CoinRecord> =
        serde_json::from_str(snapshot).map_err(|e| GeoError::MalformedSnapshot {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

    let coins = records
        .into_iter()
        .map(|record| registry.resolve_coin(record))
        .collect();

    Ok(Cache { key, coins })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::world::Coin;
    use std::rc::Rc;

    fn sample_cache(registry: &mut CellRegistry) -> Cache {
        let home = registry.canonical_cell(4, 5);
        let away = registry.canonical_cell(-1, 9);
        Cache {
            key: home.key(),
            coins: vec![
                Coin {
                    cell: Rc::clone(&home),
                    serial: 0,
                },
                Coin {
                    cell: away,
                    serial: 3,
                },
                Coin {
                    cell: home,
                    serial: 1,
                },
            ],
        }
    }

    #[test]
    fn test_serialize_writes_every_record() {
        let mut registry = CellRegistry::new(1e-4, 0.1);
        let cache = sample_cache(&mut registry);

        let records: Vec<CoinRecord> = serde_json::from_str(&serialize(&cache)).unwrap();

        assert_eq!(
            records,
            vec![
                CoinRecord { i: 4, j: 5, serial: 0 },
                CoinRecord { i: -1, j: 9, serial: 3 },
                CoinRecord { i: 4, j: 5, serial: 1 },
            ]
        );
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let mut registry = CellRegistry::new(1e-4, 0.1);
        let cache = sample_cache(&mut registry);

        let snapshot = serialize(&cache);
        let restored = deserialize(cache.key, &snapshot, &mut registry).unwrap();

        assert_eq!(restored, cache);
        let serials: Vec<_> = restored.coins.iter().map(|c| c.serial).collect();
        assert_eq!(serials, vec![0, 3, 1]);
    }

    #[test]
    fn test_restored_coins_use_canonical_cells() {
        let mut registry = CellRegistry::new(1e-4, 0.1);
        let cache = sample_cache(&mut registry);
        let snapshot = serialize(&cache);

        let restored = deserialize(cache.key, &snapshot, &mut registry).unwrap();
        let away = registry.canonical_cell(-1, 9);
        assert!(Rc::ptr_eq(&restored.coins[1].cell, &away));
        assert!(Rc::ptr_eq(&restored.coins[0].cell, &restored.coins[2].cell));
    }

    #[test]
    fn test_empty_cache_round_trip() {
        let mut registry = CellRegistry::new(1e-4, 0.1);
        let cache = Cache::new(CellKey::new(0, 0));
        let snapshot = serialize(&cache);
        assert_eq!(snapshot, "[]");
        assert!(deserialize(cache.key, &snapshot, &mut registry)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_truncated_snapshot_is_rejected() {
        let mut registry = CellRegistry::new(1e-4, 0.1);
        let cache = sample_cache(&mut registry);
        let snapshot = serialize(&cache);
        let truncated = &snapshot[..snapshot.len() / 2];

        let before = registry.len();
        let err = deserialize(cache.key, truncated, &mut registry).unwrap_err();
        assert!(matches!(err, GeoError::MalformedSnapshot { .. }));
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let mut registry = CellRegistry::new(1e-4, 0.1);
        let key = CellKey::new(1, 1);
        for bad in ["", "{}", "[{\"i\":1}]", "[{\"i\":1,\"j\":2,\"serial\":-1}]", "nope"] {
            assert!(deserialize(key, bad, &mut registry).is_err(), "{:?}", bad);
        }
    }
}
