//! Raw survey input: station series, tie-on point and well location

use serde::{Deserialize, Serialize};

use crate::error::SurveyError;

// ============================================================================
// Station Series
// ============================================================================

/// Parallel MD / inclination / azimuth channels of a directional survey.
///
/// Angles are in degrees. Azimuth is circular; values outside [0, 360) are
/// wrapped by the geometry kernel, never rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationSeries {
    pub md: Vec<f64>,
    pub inc: Vec<f64>,
    pub azi: Vec<f64>,
}

impl StationSeries {
    pub fn new(md: Vec<f64>, inc: Vec<f64>, azi: Vec<f64>) -> Self {
        Self { md, inc, azi }
    }

    /// Number of stations (MD channel length).
    pub fn len(&self) -> usize {
        self.md.len()
    }

    pub fn is_empty(&self) -> bool {
        self.md.is_empty()
    }

    pub fn first_md(&self) -> Option<f64> {
        self.md.first().copied()
    }

    pub fn last_md(&self) -> Option<f64> {
        self.md.last().copied()
    }

    /// Check the shape contract: equal channel lengths, at least 2 stations,
    /// finite values, MD strictly increasing and inclination in [0, 180].
    pub fn validate(&self) -> Result<(), SurveyError> {
        if self.md.len() != self.inc.len() || self.md.len() != self.azi.len() {
            return Err(SurveyError::Geometry(format!(
                "station channels differ in length: md={}, inc={}, azi={}",
                self.md.len(),
                self.inc.len(),
                self.azi.len()
            )));
        }
        if self.md.len() < 2 {
            return Err(SurveyError::InsufficientData(format!(
                "at least 2 stations required, got {}",
                self.md.len()
            )));
        }

        for (i, ((&md, &inc), &azi)) in self.md.iter().zip(&self.inc).zip(&self.azi).enumerate() {
            if !md.is_finite() || !inc.is_finite() || !azi.is_finite() {
                return Err(SurveyError::Geometry(format!(
                    "non-finite value at station {i} (md={md}, inc={inc}, azi={azi})"
                )));
            }
            if !(0.0..=180.0).contains(&inc) {
                return Err(SurveyError::Geometry(format!(
                    "inclination {inc:.3} at md {md:.2} outside [0, 180]"
                )));
            }
        }

        if let Some(i) = self.md.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SurveyError::Geometry(format!(
                "md must be strictly increasing: md[{}]={:.3} followed by md[{}]={:.3}",
                i,
                self.md[i],
                i + 1,
                self.md[i + 1]
            )));
        }

        Ok(())
    }

    /// Station at `index` as (md, inc, azi).
    pub fn station(&self, index: usize) -> Option<(f64, f64, f64)> {
        Some((
            *self.md.get(index)?,
            *self.inc.get(index)?,
            *self.azi.get(index)?,
        ))
    }
}

// ============================================================================
// Tie-On Point
// ============================================================================

/// Start of integration: the last known station with a fixed position.
///
/// Always supplied by the caller; the engine never invents one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TieOn {
    pub md: f64,
    pub inc: f64,
    pub azi: f64,
    pub tvd: f64,
    pub northing: f64,
    pub easting: f64,
}

impl TieOn {
    /// Tie-on at the surface (all zero) for a vertical start.
    pub fn surface() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), SurveyError> {
        let values = [self.md, self.inc, self.azi, self.tvd, self.northing, self.easting];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SurveyError::Geometry(format!("tie-on contains non-finite values: {self:?}")));
        }
        if !(0.0..=180.0).contains(&self.inc) {
            return Err(SurveyError::Geometry(format!(
                "tie-on inclination {:.3} outside [0, 180]",
                self.inc
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Location
// ============================================================================

/// Surface location metadata. Optional enrichment: carried through to results
/// but not used by the minimum-curvature math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default = "default_geodetic_system")]
    pub geodetic_system: String,
}

fn default_geodetic_system() -> String {
    "WGS84".to_string()
}

impl Default for Location {
    /// Neutral reference used when the caller has no location on record.
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            geodetic_system: default_geodetic_system(),
        }
    }
}

// ============================================================================
// Survey Input (collaborator mapping)
// ============================================================================

/// Everything a trajectory calculation consumes, in the shape upstream
/// collaborators hand it over: `{md, inc, azi, tie_on?, location?}`.
///
/// `tie_on` is optional here only so a missing tie-on can be reported as
/// `InsufficientData` instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyInput {
    #[serde(flatten)]
    pub stations: StationSeries,
    #[serde(default)]
    pub tie_on: Option<TieOn>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl SurveyInput {
    pub fn new(stations: StationSeries, tie_on: TieOn) -> Self {
        Self {
            stations,
            tie_on: Some(tie_on),
            location: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// The mandatory tie-on, or `InsufficientData` when absent.
    pub fn require_tie_on(&self) -> Result<TieOn, SurveyError> {
        self.tie_on.ok_or_else(|| {
            SurveyError::InsufficientData("tie-on point is required for trajectory calculation".to_string())
        })
    }
}
