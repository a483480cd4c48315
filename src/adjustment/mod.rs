//! Adjustment History Engine
//!
//! Manual spatial offsets applied to a calculated path, with undo/redo.
//!
//! ## Submodules
//! - `history`: the append-and-pointer log (`AdjustmentHistory`)
//! - `store`: sled-backed persistence with optimistic locking per trajectory

pub mod history;
pub mod store;

pub use history::AdjustmentHistory;
pub use store::AdjustmentStore;

use thiserror::Error;

use crate::error::SurveyError;

#[derive(Error, Debug)]
pub enum AdjustmentError {
    #[error("Invalid md window [{start}, {end}]: start must be below end")]
    InvalidWindow { start: f64, end: f64 },

    #[error("Invalid offset ({x}, {y}, {z}): components must be finite")]
    InvalidOffset { x: f64, y: f64, z: f64 },

    #[error("Nothing to undo: already at the original path")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("Base path needs at least 2 stations, got {0}")]
    InsufficientStations(usize),

    #[error("Base path channel lengths differ: {0}")]
    LengthMismatch(String),

    #[error("Angle recalculation failed: {0}")]
    Recalculation(#[from] SurveyError),

    #[error("No adjustment history for trajectory '{0}'")]
    NotFound(String),

    #[error("Adjustment history for trajectory '{0}' already exists")]
    AlreadyExists(String),

    /// Another writer changed the history between our read and write.
    #[error("Trajectory '{0}' was modified concurrently; reload and retry")]
    ConcurrentModification(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
