//! Session metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session format version
pub const SESSION_VERSION: &str = "1";

/// Metadata stored alongside a saved session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMeta {
    /// Session format version
    pub session_version: String,

    /// Version of the program that wrote the session
    pub written_by: String,

    /// When the session was saved
    pub saved_at: DateTime<Utc>,

    /// Number of caches in the snapshot table
    pub caches: usize,

    /// Number of coins the player held
    pub player_coins: usize,
}

impl SessionMeta {
    pub fn new(caches: usize, player_coins: usize) -> Self {
        Self {
            session_version: SESSION_VERSION.to_string(),
            written_by: env!("CARGO_PKG_VERSION").to_string(),
            saved_at: Utc::now(),
            caches,
            player_coins,
        }
    }

    pub fn is_current(&self) -> bool {
        self.session_version == SESSION_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_round_trip() {
        let meta = SessionMeta::new(3, 7);
        let json = serde_json::to_string(&meta).unwrap();
        let read: SessionMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(read.caches, 3);
        assert_eq!(read.player_coins, 7);
        assert_eq!(read.saved_at, meta.saved_at);
        assert!(read.is_current());
    }
}
