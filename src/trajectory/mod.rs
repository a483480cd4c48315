//! Trajectory Calculator
//!
//! Turns a survey (stations + tie-on) into a positioned `CalculatedTrajectory`
//! via the geometry kernel, then derives the vertical section and closure.
//!
//! ## Entry points
//! - `calculate()` - one pass, vertical-section azimuth explicit or tie-on
//! - `calculate_bhc()` - bottom-hole-closure refinement (see `bhc`)
//!
//! ## Tie-on handling
//!
//! When the tie-on sits above the first station it is integrated as an
//! implicit leading station and dropped from the output, so the first
//! course already has real metrics. When it coincides with the first
//! station, the first station takes the tie-on position and its metrics are
//! padded with 0.0.

mod bhc;

pub use bhc::calculate_bhc;

use std::time::Instant;

use crate::config::defaults::{GRID_SNAP_TOLERANCE, MIN_HORIZONTAL_DISPLACEMENT};
use crate::error::SurveyError;
use crate::geometry::{minimum_curvature, wrap_azimuth, StartPoint};
use crate::types::{
    CalculatedTrajectory, Location, RunMetadata, StationSeries, SurveyInput, TieOn, VsAzimuthSource,
};

/// Calculate a trajectory.
///
/// `vertical_section_azimuth` defaults to the tie-on azimuth when omitted.
///
/// # Errors
/// - `InsufficientData` when the tie-on is missing or fewer than 2 stations
/// - `InvalidSurveyData` when the first station lies above the tie-on
/// - `Calculation` wrapping any geometry-kernel failure
pub fn calculate(
    input: &SurveyInput,
    vertical_section_azimuth: Option<f64>,
) -> Result<CalculatedTrajectory, SurveyError> {
    let tie_on = input.require_tie_on()?;
    let (azimuth, source) = match vertical_section_azimuth {
        Some(a) => (a, VsAzimuthSource::Explicit),
        None => (tie_on.azi, VsAzimuthSource::TieOn),
    };
    calculate_with_azimuth(
        &input.stations,
        &tie_on,
        input.location.clone().unwrap_or_default(),
        azimuth,
        source,
    )
}

/// Single calculation pass with a fixed vertical-section azimuth.
pub(crate) fn calculate_with_azimuth(
    stations: &StationSeries,
    tie_on: &TieOn,
    location: Location,
    vertical_section_azimuth: f64,
    azimuth_source: VsAzimuthSource,
) -> Result<CalculatedTrajectory, SurveyError> {
    let started = Instant::now();

    tie_on.validate().map_err(|e| e.with_context("tie-on"))?;
    if !vertical_section_azimuth.is_finite() {
        return Err(SurveyError::calculation(
            "vertical section",
            format!("azimuth must be finite, got {vertical_section_azimuth}"),
        ));
    }
    stations
        .validate()
        .map_err(|e| e.with_context("trajectory calculation"))?;

    let first_md = stations.md[0];
    if first_md < tie_on.md - GRID_SNAP_TOLERANCE {
        return Err(SurveyError::InvalidSurveyData(format!(
            "first station md {first_md:.2} lies above tie-on md {:.2}",
            tie_on.md
        )));
    }

    // Prepend the tie-on as an implicit station when it precedes the survey
    let lead = usize::from(first_md > tie_on.md + GRID_SNAP_TOLERANCE);
    let integration = if lead == 1 {
        let mut s = StationSeries::new(
            Vec::with_capacity(stations.len() + 1),
            Vec::with_capacity(stations.len() + 1),
            Vec::with_capacity(stations.len() + 1),
        );
        s.md.push(tie_on.md);
        s.inc.push(tie_on.inc);
        s.azi.push(tie_on.azi);
        s.md.extend_from_slice(&stations.md);
        s.inc.extend_from_slice(&stations.inc);
        s.azi.extend_from_slice(&stations.azi);
        s
    } else {
        stations.clone()
    };

    let start = StartPoint {
        northing: tie_on.northing,
        easting: tie_on.easting,
        tvd: tie_on.tvd,
    };
    let out = minimum_curvature(&integration, start)
        .map_err(|e| e.with_context("trajectory calculation"))?;

    let northing = out.northing[lead..].to_vec();
    let easting = out.easting[lead..].to_vec();
    let tvd = out.tvd[lead..].to_vec();

    let pad = |raw: &[f64]| -> Vec<f64> {
        if lead == 1 {
            raw.to_vec()
        } else {
            std::iter::once(0.0).chain(raw.iter().copied()).collect()
        }
    };
    let dls = pad(&out.segments.dls);
    let build_rate = pad(&out.segments.build_rate);
    let turn_rate = pad(&out.segments.turn_rate);

    let vsa = wrap_azimuth(vertical_section_azimuth);
    let (vertical_section, closure_distance, closure_direction) =
        section_and_closure(&northing, &easting, vsa);

    let n = stations.len();
    let trajectory = CalculatedTrajectory {
        md: stations.md.clone(),
        inc: stations.inc.clone(),
        azi: stations.azi.iter().map(|&a| wrap_azimuth(a)).collect(),
        northing,
        easting,
        tvd,
        dls,
        build_rate,
        turn_rate,
        vertical_section,
        closure_distance,
        closure_direction,
        vertical_section_azimuth: vsa,
        azimuth_source,
        tie_on: *tie_on,
        location,
        segments: out.segments,
        metadata: RunMetadata::finish(started, n),
    };

    tracing::debug!(
        stations = n,
        vsa = trajectory.vertical_section_azimuth,
        source = ?azimuth_source,
        duration_ms = trajectory.metadata.duration_ms,
        "trajectory calculated"
    );

    Ok(trajectory)
}

/// Vertical section along `vsa` plus closure distance and direction, all
/// measured from the first station.
pub fn section_and_closure(
    northing: &[f64],
    easting: &[f64],
    vsa: f64,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let (n0, e0) = match (northing.first(), easting.first()) {
        (Some(&n), Some(&e)) => (n, e),
        _ => return (Vec::new(), Vec::new(), Vec::new()),
    };
    let (sin_v, cos_v) = vsa.to_radians().sin_cos();

    let mut vs = Vec::with_capacity(northing.len());
    let mut dist = Vec::with_capacity(northing.len());
    let mut dir = Vec::with_capacity(northing.len());

    for (&n, &e) in northing.iter().zip(easting) {
        let (dn, de) = (n - n0, e - e0);
        vs.push(dn * cos_v + de * sin_v);
        let d = dn.hypot(de);
        dist.push(d);
        dir.push(if d < MIN_HORIZONTAL_DISPLACEMENT {
            0.0
        } else {
            wrap_azimuth(de.atan2(dn).to_degrees())
        });
    }

    (vs, dist, dir)
}
