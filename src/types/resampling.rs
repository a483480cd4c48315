//! Interpolation and extrapolation result types

use serde::{Deserialize, Serialize};

use super::{RunMetadata, VsAzimuthSource};

// ============================================================================
// Interpolation
// ============================================================================

/// Trajectory resampled at a fixed MD resolution, positions re-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolatedTrajectory {
    pub resolution: f64,
    pub md: Vec<f64>,
    pub inc: Vec<f64>,
    pub azi: Vec<f64>,
    pub northing: Vec<f64>,
    pub easting: Vec<f64>,
    pub tvd: Vec<f64>,
    pub dls: Vec<f64>,
    pub vertical_section: Vec<f64>,
    pub closure_distance: Vec<f64>,
    pub closure_direction: Vec<f64>,
    pub vertical_section_azimuth: f64,
    pub azimuth_source: VsAzimuthSource,
    pub point_count: usize,
    pub metadata: RunMetadata,
}

// ============================================================================
// Extrapolation
// ============================================================================

/// Trend model used to project angles beyond the last station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrapolationMethod {
    /// Hold the last inclination and azimuth.
    #[default]
    Constant,
    /// Degree-1 fit over the trailing window.
    LinearTrend,
    /// Degree-2 fit over the trailing window.
    CurveFit,
}

impl ExtrapolationMethod {
    /// Polynomial degree fitted by this method (0 for constant).
    pub fn degree(self) -> usize {
        match self {
            ExtrapolationMethod::Constant => 0,
            ExtrapolationMethod::LinearTrend => 1,
            ExtrapolationMethod::CurveFit => 2,
        }
    }
}

impl std::str::FromStr for ExtrapolationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "constant" => Ok(ExtrapolationMethod::Constant),
            "linear_trend" | "linear" => Ok(ExtrapolationMethod::LinearTrend),
            "curve_fit" | "curve" | "polynomial" => Ok(ExtrapolationMethod::CurveFit),
            other => Err(format!(
                "unknown extrapolation method '{other}' (expected constant, linear_trend or curve_fit)"
            )),
        }
    }
}

/// Angle-only section of an extrapolation result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AngleSeries {
    pub md: Vec<f64>,
    pub inc: Vec<f64>,
    pub azi: Vec<f64>,
}

impl AngleSeries {
    pub fn len(&self) -> usize {
        self.md.len()
    }

    pub fn is_empty(&self) -> bool {
        self.md.is_empty()
    }
}

/// Angles plus re-derived positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionedSeries {
    pub md: Vec<f64>,
    pub inc: Vec<f64>,
    pub azi: Vec<f64>,
    pub northing: Vec<f64>,
    pub easting: Vec<f64>,
    pub tvd: Vec<f64>,
}

impl PositionedSeries {
    pub fn len(&self) -> usize {
        self.md.len()
    }

    pub fn is_empty(&self) -> bool {
        self.md.is_empty()
    }
}

/// Where the projected well ends up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalPointSummary {
    pub md: f64,
    pub tvd: f64,
    /// Horizontal distance from the first station.
    pub horizontal_displacement: f64,
    pub inc: f64,
    pub azi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrapolationResult {
    pub method: ExtrapolationMethod,
    pub length: f64,
    pub step: f64,
    pub original: AngleSeries,
    /// Uniform-step resampling of the original; includes every original station.
    pub interpolated: AngleSeries,
    pub extrapolated: PositionedSeries,
    /// Interpolated followed by extrapolated, increasing MD, positioned.
    pub combined: PositionedSeries,
    pub original_point_count: usize,
    pub interpolated_point_count: usize,
    pub extrapolated_point_count: usize,
    pub final_point: FinalPointSummary,
    pub metadata: RunMetadata,
}
