//! Deterministic luck
//!
//! Maps an arbitrary string key to a value in `[0, 1)`. The value depends on
//! the key alone, so anything derived from it (cache placement, initial coin
//! counts) can be recomputed after a restore without persisting it.

use xxhash_rust::xxh3::xxh3_64;

/// Source of deterministic pseudo-random values
pub trait Luck {
    /// Value in `[0, 1)` for `key`; equal keys always give equal values
    fn value(&self, key: &str) -> f64;
}

/// XXH3-backed luck used by the game
#[derive(Debug, Clone, Copy, Default)]
pub struct HashLuck;

impl Luck for HashLuck {
    fn value(&self, key: &str) -> f64 {
        unit_interval(xxh3_64(key.as_bytes()))
    }
}

/// Project a 64-bit hash onto `[0, 1)` using its top 53 bits
pub fn unit_interval(hash: u64) -> f64 {
    (hash >> 11) as f64 / (1u64 << 53) as f64
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_deterministic() {
        let luck = HashLuck;
        for key in ["0,0", "-1,5", "369894,-1220628:initialValue", ""] {
            assert_eq!(luck.value(key), luck.value(key));
            assert_eq!(luck.value(key), HashLuck.value(key));
        }
    }

    #[test]
    fn test_value_in_unit_interval() {
        let luck = HashLuck;
        for x in -20..20 {
            for y in -20..20 {
                let v = luck.value(&format!("{},{}", x, y));
                assert!((0.0..1.0).contains(&v), "{} out of range", v);
            }
        }
    }

    #[test]
    fn test_unit_interval_bounds() {
        assert_eq!(unit_interval(0), 0.0);
        assert!(unit_interval(u64::MAX) < 1.0);
    }

    #[test]
    fn test_different_keys_spread() {
        let luck = HashLuck;
        assert_ne!(luck.value("1,2"), luck.value("2,1"));
    }
}
