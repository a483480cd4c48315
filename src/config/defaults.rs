//! System-wide default constants.
//!
//! Grouped by subsystem. Values a deployment may tune live in
//! `EngineConfig`; the fixed contract bounds live here.

// ============================================================================
// Geometry
// ============================================================================

/// Course length DLS, build and turn rates are normalised to.
pub const COURSE_LENGTH: f64 = 30.0;

/// Below this dogleg (radians) the ratio factor uses its limit 0.5.
pub const MIN_DOGLEG_RAD: f64 = 1e-9;

/// Horizontal displacement below which a bearing is undefined.
pub const MIN_HORIZONTAL_DISPLACEMENT: f64 = 1e-9;

/// Segment length below which two adjusted stations count as coincident.
pub const MIN_SEGMENT_LENGTH: f64 = 1e-9;

// ============================================================================
// Resampling
// ============================================================================

/// Smallest allowed interpolation resolution / comparison step.
pub const MIN_RESOLUTION: f64 = 1.0;

/// Largest allowed interpolation resolution / comparison step.
pub const MAX_RESOLUTION: f64 = 100.0;

/// Default interpolation resolution.
pub const DEFAULT_RESOLUTION: f64 = 10.0;

/// Default comparison grid step.
pub const DEFAULT_COMPARISON_STEP: f64 = 10.0;

/// Grid points closer than this to the range end are replaced by the end.
pub const GRID_SNAP_TOLERANCE: f64 = 1e-6;

/// Grid positions reported in comparison statistics.
pub const SNAPSHOT_PERCENTILES: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];

// ============================================================================
// Extrapolation
// ============================================================================

/// Default extrapolation step.
pub const DEFAULT_EXTRAPOLATION_STEP: f64 = 10.0;

/// Default projection length beyond the last station.
pub const DEFAULT_EXTRAPOLATION_LENGTH: f64 = 100.0;

/// Trailing points fitted by the linear trend model.
pub const LINEAR_TREND_WINDOW: usize = 5;

/// Trailing points fitted by the quadratic curve model.
pub const CURVE_FIT_WINDOW: usize = 10;

// ============================================================================
// Trajectory
// ============================================================================

/// Number of passes of the bottom-hole-closure refinement.
pub const BHC_PASSES: usize = 2;

// ============================================================================
// Adjustment
// ============================================================================

/// Default on-disk location of the adjustment store.
pub const DEFAULT_ADJUSTMENT_DB_PATH: &str = "wellpath_db";
