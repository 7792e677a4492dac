//! Domain errors
//!
//! Per-cache and per-field failures are recovered where they occur. Storage
//! I/O is reported through `anyhow` at the CLI boundary instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoError {
    /// A dormant cache snapshot could not be parsed
    #[error("malformed snapshot for cache {key}: {reason}")]
    MalformedSnapshot { key: String, reason: String },

    /// A persisted session field could not be parsed
    #[error("malformed session field `{field}`: {reason}")]
    MalformedSessionField { field: String, reason: String },

    /// A coin transfer named a cache that is not in view
    #[error("no cache in view at {key}")]
    UnknownCache { key: String },

    /// Text that is not a valid `x,y` cell key
    #[error("invalid cell key: {input:?}")]
    InvalidCellKey { input: String },

    /// A destination that is not finite or lies outside the grid
    #[error("position ({lat}, {lng}) is outside the map")]
    InvalidPosition { lat: f64, lng: f64 },
}

impl GeoError {
    /// Stable error code used in result output
    pub fn code(&self) -> &'static str {
        match self {
            GeoError::MalformedSnapshot { .. } => "MALFORMED_SNAPSHOT",
            GeoError::MalformedSessionField { .. } => "MALFORMED_SESSION_FIELD",
            GeoError::UnknownCache { .. } => "UNKNOWN_CACHE",
            GeoError::InvalidCellKey { .. } => "INVALID_CELL_KEY",
            GeoError::InvalidPosition { .. } => "INVALID_POSITION",
        }
    }
}
