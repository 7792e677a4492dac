//! Cell registry
//!
//! Converts between geographic points and grid cells and keeps exactly one
//! `Cell` instance per grid position, so cells can be compared by identity.

use std::collections::HashMap;
use std::rc::Rc;

use crate::core::luck::Luck;
use crate::core::world::{Bounds, Cell, CellKey, Coin, CoinRecord, LatLng};

/// Largest cell index a position may map to; every index up to here is an
/// exact `f64`
pub const MAX_CELL_INDEX: f64 = (1u64 << 52) as f64;

#[derive(Debug)]
pub struct CellRegistry {
    tile_width: f64,
    spawn_probability: f64,
    known_cells: HashMap<CellKey, Rc<Cell>>,
}

impl CellRegistry {
    pub fn new(tile_width: f64, spawn_probability: f64) -> Self {
        Self {
            tile_width,
            spawn_probability,
            known_cells: HashMap::new(),
        }
    }

    /// Number of distinct cells handed out so far
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.known_cells.len()
    }

    /// The unique cell for these indices, registered on first request
    pub fn canonical_cell(&mut self, xindex: i64, yindex: i64) -> Rc<Cell> {
        let key = CellKey::new(xindex, yindex);
        Rc::clone(
            self.known_cells
                .entry(key)
                .or_insert_with(|| Rc::new(Cell { xindex, yindex })),
        )
    }

    /// Whether `point` is finite and maps to a cell index within
    /// `MAX_CELL_INDEX` on both axes
    pub fn in_range(&self, point: LatLng) -> bool {
        [point.lat, point.lng]
            .iter()
            .all(|v| v.is_finite() && (v / self.tile_width).abs() <= MAX_CELL_INDEX)
    }

    /// The cell containing `point`
    pub fn cell_for_point(&mut self, point: LatLng) -> Rc<Cell> {
        let xindex = (point.lat / self.tile_width).floor() as i64;
        let yindex = (point.lng / self.tile_width).floor() as i64;
        self.canonical_cell(xindex, yindex)
    }

    /// Geographic rectangle covered by `cell`
    pub fn bounds_for_cell(&self, cell: &Cell) -> Bounds {
        let w = self.tile_width;
        Bounds {
            south_west: LatLng::new(cell.xindex as f64 * w, cell.yindex as f64 * w),
            north_east: LatLng::new(
                (cell.xindex as f64 + 1.0) * w,
                (cell.yindex as f64 + 1.0) * w,
            ),
        }
    }

    /// Cells around `point` that host a cache
    ///
    /// Offsets run over `[-radius, radius)` on both axes. Each candidate is
    /// gated by the luck of its own key, so placement is tied to absolute
    /// grid position rather than to where the player stands. Candidates whose
    /// index would overflow `i64` are skipped.
    pub fn cells_near(&mut self, point: LatLng, radius: i64, luck: &dyn Luck) -> Vec<Rc<Cell>> {
        let origin = self.cell_for_point(point);
        let mut result = Vec::new();

        for dx in -radius..radius {
            for dy in -radius..radius {
                let (Some(x), Some(y)) = (
                    origin.xindex.checked_add(dx),
                    origin.yindex.checked_add(dy),
                ) else {
                    continue;
                };
                let candidate = CellKey::new(x, y);
                if luck.value(&candidate.to_string()) < self.spawn_probability {
                    result.push(self.canonical_cell(candidate.x, candidate.y));
                }
            }
        }

        tracing::debug!(
            origin = %origin.key(),
            radius,
            found = result.len(),
            "computed visible cells"
        );
        result
    }

    /// Rebuild a coin from its persisted form, sharing the canonical owner cell
    pub fn resolve_coin(&mut self, record: CoinRecord) -> Coin {
        Coin {
            cell: self.canonical_cell(record.i, record.j),
            serial: record.serial,
        }
    }
}
