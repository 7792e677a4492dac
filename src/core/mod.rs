//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - World model (cells, coins, caches, player)
//! - Deterministic luck and the cell registry
//! - Unified result model and rendering
//! - Configuration, errors and path helpers

pub mod board;
pub mod config;
pub mod error;
pub mod luck;
pub mod model;
pub mod paths;
pub mod render;
pub mod world;
