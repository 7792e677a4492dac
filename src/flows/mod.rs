//! Flows module - Session-level workflows
//!
//! Flows combine the registry, cache store, ledger and persistence into the
//! commands the CLI exposes.

pub mod game;
pub mod play;
