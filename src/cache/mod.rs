//! Cache module - Per-cell coin caches
//!
//! Provides:
//! - Active/dormant cache storage
//! - Snapshot encoding for dormant caches
//! - LIFO coin transfers between caches and the player

pub mod ledger;
pub mod snapshot;
pub mod store;
