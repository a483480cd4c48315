//! Manual spatial adjustment records and state responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive MD window an offset applies to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MdWindow {
    pub start: f64,
    pub end: f64,
}

impl MdWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, md: f64) -> bool {
        md >= self.start && md <= self.end
    }
}

/// Spatial offset: x = easting, y = northing, z = TVD.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Offset {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// The unadjusted path an adjustment history is anchored to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasePath {
    pub md: Vec<f64>,
    pub northing: Vec<f64>,
    pub easting: Vec<f64>,
    pub tvd: Vec<f64>,
    /// Original angles, used to seed angle recalculation when present.
    #[serde(default)]
    pub inc: Option<Vec<f64>>,
    #[serde(default)]
    pub azi: Option<Vec<f64>>,
}

/// One applied offset and the full path it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentRecord {
    pub sequence: u32,
    pub window: MdWindow,
    pub offset: Offset,
    pub north_adjusted: Vec<f64>,
    pub east_adjusted: Vec<f64>,
    pub tvd_adjusted: Vec<f64>,
    pub inc_recalculated: Option<Vec<f64>>,
    pub azi_recalculated: Option<Vec<f64>>,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
}

/// What callers get back after any history operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentState {
    /// Current sequence, 0 when no adjustment is active.
    pub sequence: u32,
    pub md_data: Vec<f64>,
    pub north_adjusted: Vec<f64>,
    pub east_adjusted: Vec<f64>,
    pub tvd_adjusted: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inc_recalculated: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azi_recalculated: Option<Vec<f64>>,
    pub has_adjustment: bool,
    pub message: String,
}
