//! Comparison result types

use serde::{Deserialize, Serialize};

use super::RunMetadata;

/// Summary of one delta channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelStatistics {
    /// Largest absolute delta.
    pub max: f64,
    /// Mean absolute delta.
    pub avg: f64,
    /// Population standard deviation of the signed delta.
    pub std: f64,
}

/// Deltas sampled at one percentile position of the common grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileSnapshot {
    pub percentile: f64,
    pub index: usize,
    pub md: f64,
    pub delta_horizontal: f64,
    pub delta_total: f64,
    pub delta_inc: f64,
    pub delta_azi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaStatistics {
    pub delta_x: ChannelStatistics,
    pub delta_y: ChannelStatistics,
    pub delta_z: ChannelStatistics,
    pub delta_horizontal: ChannelStatistics,
    pub delta_total: ChannelStatistics,
    pub delta_inc: ChannelStatistics,
    pub delta_azi: ChannelStatistics,
    /// MD where |Δhorizontal| peaks.
    pub max_horizontal_md: f64,
    /// MD where |Δtotal| peaks.
    pub max_total_md: f64,
    pub snapshots: Vec<PercentileSnapshot>,
}

/// Two trajectories aligned on a common MD grid.
///
/// Every array has the grid length. `delta_*` is primary minus reference;
/// `delta_x` is easting, `delta_y` northing, `delta_z` TVD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub md: Vec<f64>,
    pub step: f64,

    pub primary_northing: Vec<f64>,
    pub primary_easting: Vec<f64>,
    pub primary_tvd: Vec<f64>,
    pub primary_inc: Vec<f64>,
    pub primary_azi: Vec<f64>,

    pub reference_northing: Vec<f64>,
    pub reference_easting: Vec<f64>,
    pub reference_tvd: Vec<f64>,
    pub reference_inc: Vec<f64>,
    pub reference_azi: Vec<f64>,

    pub delta_x: Vec<f64>,
    pub delta_y: Vec<f64>,
    pub delta_z: Vec<f64>,
    pub delta_horizontal: Vec<f64>,
    pub delta_total: Vec<f64>,
    pub delta_inc: Vec<f64>,
    /// Shortest-path azimuth difference `((primary - reference + 180) mod 360) - 180`,
    /// always in [-180, 180]. Positive when the primary azimuth lies clockwise
    /// of the reference: primary 355 vs reference 5 gives -10, the reverse +10.
    pub delta_azi: Vec<f64>,

    pub statistics: DeltaStatistics,
    pub metadata: RunMetadata,
}

impl ComparisonResult {
    pub fn len(&self) -> usize {
        self.md.len()
    }

    pub fn is_empty(&self) -> bool {
        self.md.is_empty()
    }
}
