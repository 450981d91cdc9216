//! Errors surfaced while loading levels and tuning
//!
//! The simulation itself never fails; everything here is rejected before the
//! first frame runs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GolfError {
    /// A physical constant or rule is non-finite, zero or negative
    #[error("invalid config value for `{field}`: {value}")]
    InvalidConfig { field: &'static str, value: f32 },
    /// Terrain provider produced two tiles for the same cell
    #[error("duplicate terrain tile at ({x}, {z})")]
    DuplicateTile { x: i32, z: i32 },
    /// Tee or hole references a cell with no tile
    #[error("no terrain tile at ({x}, {z})")]
    MissingTile { x: i32, z: i32 },
    #[error("club table is empty")]
    NoClubs,
    #[error("unknown club index {0}")]
    UnknownClub(usize),
    #[error("malformed tuning json: {0}")]
    Json(#[from] serde_json::Error),
}
