//! wellpath: Directional Survey Engine
//!
//! Turns raw directional-survey stations (MD, inclination, azimuth) into
//! positioned well trajectories and works with them afterwards.
//!
//! ## Architecture
//!
//! - **Geometry Kernel**: minimum-curvature integration and its inverse
//! - **Trajectory Calculator**: tie-on handling, vertical section, closure, BHC refinement
//! - **Comparison**: two trajectories aligned on their common MD range, deltas and statistics
//! - **Interpolation / Extrapolation**: fixed-step resampling and trend projection
//! - **Adjustment History**: manual offsets with undo/redo, persisted per trajectory

pub mod config;
pub mod error;
pub mod types;

// Numeric core
pub mod geometry;
pub mod trajectory;
pub mod comparison;
pub mod interpolation;
pub mod extrapolation;
pub mod adjustment;

// Re-export configuration
pub use config::EngineConfig;

// Re-export errors
pub use error::{ErrorKind, SurveyError};

// Re-export commonly used types
pub use types::{
    AdjustmentState, CalculatedTrajectory, ComparisonResult, ExtrapolationMethod,
    ExtrapolationResult, InterpolatedTrajectory, Location, StationSeries, SurveyInput, TieOn,
    VsAzimuthSource,
};

// Re-export engine entry points
pub use comparison::compare;
pub use extrapolation::extrapolate;
pub use geometry::{angles_from_positions, minimum_curvature};
pub use interpolation::interpolate;
pub use trajectory::{calculate, calculate_bhc};

// Re-export adjustment history
pub use adjustment::{AdjustmentError, AdjustmentHistory, AdjustmentStore};
