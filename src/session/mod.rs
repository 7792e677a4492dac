//! Session module - Durable game state
//!
//! Provides:
//! - Key-value storage (on disk or in memory)
//! - Session save/restore with per-field fallback
//! - Session metadata

pub mod meta;
pub mod persist;
pub mod storage;
