//! Calculated trajectory types produced by the trajectory calculator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Location, StationSeries, TieOn};

/// Run bookkeeping attached to every engine result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub computed_at: DateTime<Utc>,
    pub duration_ms: f64,
    pub point_count: usize,
}

impl RunMetadata {
    pub fn finish(started: std::time::Instant, point_count: usize) -> Self {
        Self {
            computed_at: Utc::now(),
            duration_ms: started.elapsed().as_secs_f64() * 1000.0,
            point_count,
        }
    }
}

/// Where the vertical-section azimuth of a trajectory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VsAzimuthSource {
    /// Defaulted to the tie-on azimuth.
    #[default]
    TieOn,
    /// Supplied by the caller.
    Explicit,
    /// Converged by the two-pass bottom-hole-closure refinement.
    BottomHoleClosure,
    /// Taken from the first resampled station's azimuth.
    FirstStation,
}

/// Per-course metrics as the kernel produces them: one entry per segment
/// between consecutive stations, so one fewer than the stations integrated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentMetrics {
    /// Dogleg angle of each course (degrees).
    pub dogleg: Vec<f64>,
    /// Dogleg severity (degrees per course length).
    pub dls: Vec<f64>,
    /// Inclination change per course length.
    pub build_rate: Vec<f64>,
    /// Shortest-path azimuth change per course length.
    pub turn_rate: Vec<f64>,
}

impl SegmentMetrics {
    pub fn len(&self) -> usize {
        self.dls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dls.is_empty()
    }
}

/// Positioned trajectory. Every per-station array has the station count.
///
/// Metric arrays (`dls`, `build_rate`, `turn_rate`) follow the padding rule:
/// station `i` carries the metric of the course ending at it, and a first
/// station coinciding with the tie-on carries 0.0 (a zero-length course).
/// The unpadded values are kept in `segments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedTrajectory {
    pub md: Vec<f64>,
    pub inc: Vec<f64>,
    /// Azimuth wrapped to [0, 360).
    pub azi: Vec<f64>,
    pub northing: Vec<f64>,
    pub easting: Vec<f64>,
    pub tvd: Vec<f64>,
    pub dls: Vec<f64>,
    pub build_rate: Vec<f64>,
    pub turn_rate: Vec<f64>,
    pub vertical_section: Vec<f64>,
    pub closure_distance: Vec<f64>,
    /// Bearing from the first station, degrees in [0, 360).
    pub closure_direction: Vec<f64>,
    pub vertical_section_azimuth: f64,
    pub azimuth_source: VsAzimuthSource,
    pub tie_on: TieOn,
    pub location: Location,
    pub segments: SegmentMetrics,
    pub metadata: RunMetadata,
}

impl CalculatedTrajectory {
    pub fn len(&self) -> usize {
        self.md.len()
    }

    pub fn is_empty(&self) -> bool {
        self.md.is_empty()
    }

    /// The angle channels this trajectory was computed from.
    pub fn stations(&self) -> StationSeries {
        StationSeries::new(self.md.clone(), self.inc.clone(), self.azi.clone())
    }

    pub fn last_md(&self) -> Option<f64> {
        self.md.last().copied()
    }

    /// Final-station closure direction, the BHC refinement input.
    pub fn bottom_hole_closure_direction(&self) -> Option<f64> {
        self.closure_direction.last().copied()
    }

    /// Lengths of every channel, for shape diagnostics.
    pub fn channel_lengths(&self) -> [(&'static str, usize); 6] {
        [
            ("md", self.md.len()),
            ("inc", self.inc.len()),
            ("azi", self.azi.len()),
            ("northing", self.northing.len()),
            ("easting", self.easting.len()),
            ("tvd", self.tvd.len()),
        ]
    }
}
