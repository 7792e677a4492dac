//! Coin ledger - LIFO transfers between a cache and the player
//!
//! Each call moves at most one coin from the top of one stack to the top of
//! the other. An empty source is a no-op, not an error.

use crate::core::world::{Cache, Coin};

/// Take the most recently added coin from `cache` into `inventory`
pub fn withdraw(cache: &mut Cache, inventory: &mut Vec<Coin>) -> Option<Coin> {
    let coin = cache.coins.pop()?;
    inventory.push(coin.clone());
    tracing::debug!(cache = %cache.key, coin = %coin, "withdrew coin");
    Some(coin)
}

/// Put the most recently collected coin from `inventory` into `cache`
pub fn deposit(cache: &mut Cache, inventory: &mut Vec<Coin>) -> Option<Coin> {
    let coin = inventory.pop()?;
    cache.coins.push(coin.clone());
    tracing::debug!(cache = %cache.key, coin = %coin, "deposited coin");
    Some(coin)
}
