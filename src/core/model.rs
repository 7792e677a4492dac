//! Unified Result Model
//!
//! Every command maps its outcome to this model before rendering output.

use serde::{Deserialize, Serialize};

use crate::core::error::GeoError;
use crate::core::world::{coin_to_display_string, Bounds, Cache, Coin, LatLng, PlayerState};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Player,
    Cache,
    Transfer,
    Session,
    Error,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub code: String,
    pub message: String,
}

impl Issue {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&GeoError> for Issue {
    fn from(err: &GeoError) -> Self {
        Issue::new(err.code(), err.to_string())
    }
}

/// The unified result item that all commands produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Cell key (`x,y`) the item refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Geographic position (player items)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<LatLng>,

    /// Area covered by the cell (cache items)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,

    /// Coins in display form, bottom of the stack first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coins: Vec<String>,

    /// Short human-readable summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Structured data payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Issue>,
}

impl ResultItem {
    fn empty(kind: Kind) -> Self {
        Self {
            kind,
            key: None,
            position: None,
            bounds: None,
            coins: Vec::new(),
            message: None,
            data: None,
            errors: Vec::new(),
        }
    }

    /// Create a player result
    pub fn player(player: &PlayerState) -> Self {
        let mut item = Self::empty(Kind::Player);
        item.position = Some(player.position);
        item.coins = display_coins(&player.coins);
        item.data = Some(serde_json::json!({ "trail": player.trail.len() }));
        item
    }

    /// Create a cache result
    pub fn cache(cache: &Cache, bounds: Bounds) -> Self {
        let mut item = Self::empty(Kind::Cache);
        item.key = Some(cache.key.to_string());
        item.bounds = Some(bounds);
        item.coins = display_coins(&cache.coins);
        item
    }

    /// Create a transfer result; `coin` is `None` when nothing moved
    pub fn transfer(action: &str, key: &str, coin: Option<&Coin>) -> Self {
        let mut item = Self::empty(Kind::Transfer);
        item.key = Some(key.to_string());
        item.message = Some(match coin {
            Some(coin) => format!("{} {}", action, coin_to_display_string(coin)),
            None => format!("{} nothing", action),
        });
        if let Some(coin) = coin {
            item.coins = vec![coin_to_display_string(coin)];
        }
        item
    }

    /// Create a session result
    pub fn session(message: impl Into<String>) -> Self {
        let mut item = Self::empty(Kind::Session);
        item.message = Some(message.into());
        item
    }

    /// Create a new error result
    pub fn error(issue: Issue) -> Self {
        let mut item = Self::empty(Kind::Error);
        item.errors.push(issue);
        item
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

fn display_coins(coins: &[Coin]) -> Vec<String> {
    coins.iter().map(coin_to_display_string).collect()
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
