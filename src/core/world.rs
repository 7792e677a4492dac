//! World model
//!
//! Geographic primitives plus the game entities: cells, coins, caches and
//! the player. Cells are shared through `Rc` so that the registry can hand
//! out a single instance per grid position.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::core::error::GeoError;

/// Cell key text form: `x,y` with optional surrounding whitespace
static CELL_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(-?\d+)\s*,\s*(-?\d+)\s*$").expect("Invalid CELL_KEY_RE regex"));

/// A geographic point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A rectangle given by its south-west and north-east corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

/// Structured grid key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub x: i64,
    pub y: i64,
}

impl CellKey {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for CellKey {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GeoError::InvalidCellKey {
            input: s.to_string(),
        };
        let caps = CELL_KEY_RE.captures(s).ok_or_else(invalid)?;
        let x = caps[1].parse().map_err(|_| invalid())?;
        let y = caps[2].parse().map_err(|_| invalid())?;
        Ok(CellKey { x, y })
    }
}

/// A grid square. Instances are canonical: obtain them from the registry.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub xindex: i64,
    pub yindex: i64,
}

impl Cell {
    pub fn key(&self) -> CellKey {
        CellKey::new(self.xindex, self.yindex)
    }
}

/// One collectible unit, identified by the cell that minted it and a serial
///
/// Equality is by value; the owning cell never changes when the coin moves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coin {
    pub cell: Rc<Cell>,
    pub serial: u32,
}

impl Coin {
    pub fn record(&self) -> CoinRecord {
        CoinRecord {
            i: self.cell.xindex,
            j: self.cell.yindex,
            serial: self.serial,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&coin_to_display_string(self))
    }
}

/// Format a coin as `ownerX:ownerY#serial` with two-decimal owner indices
pub fn coin_to_display_string(coin: &Coin) -> String {
    format!(
        "{:.2}:{:.2}#{}",
        coin.cell.xindex as f64, coin.cell.yindex as f64, coin.serial
    )
}

/// Persisted form of a coin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinRecord {
    pub i: i64,
    pub j: i64,
    pub serial: u32,
}

/// A cell's coin container; the last coin is the top of the stack
#[derive(Debug, Clone, PartialEq)]
pub struct Cache {
    pub key: CellKey,
    pub coins: Vec<Coin>,
}

impl Cache {
    pub fn new(key: CellKey) -> Self {
        Self {
            key,
            coins: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }
}

/// One step of the movement trail
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    pub from: LatLng,
    pub to: LatLng,
}

/// Everything the session knows about the player
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub position: LatLng,
    pub coins: Vec<Coin>,
    pub trail: Vec<PathSegment>,
}

impl PlayerState {
    pub fn at(position: LatLng) -> Self {
        Self {
            position,
            coins: Vec::new(),
            trail: Vec::new(),
        }
    }

    /// Move to `to`, recording the segment on the trail
    pub fn travel_to(&mut self, to: LatLng) {
        self.trail.push(PathSegment {
            from: self.position,
            to,
        });
        self.position = to;
    }
}
