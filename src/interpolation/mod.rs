//! Interpolation Engine
//!
//! Resamples a calculated trajectory at a fixed MD resolution. Only the
//! angles are interpolated (inclination linearly, azimuth circularly);
//! positions, DLS, vertical section and closure are re-derived through the
//! trajectory calculator so the result stays geometrically consistent.

pub mod linear;

pub use linear::{aligned_grid, interp, interp_azimuth, interp_many, merge_grids, snapped_grid};

use std::time::Instant;

use crate::config::defaults::{GRID_SNAP_TOLERANCE, MAX_RESOLUTION, MIN_RESOLUTION};
use crate::error::SurveyError;
use crate::trajectory::{calculate_with_azimuth, section_and_closure};
use crate::types::{
    CalculatedTrajectory, InterpolatedTrajectory, RunMetadata, StationSeries, VsAzimuthSource,
};

/// Check a resolution / step against the allowed [1, 100] range.
pub fn check_resolution(value: f64, context: &str) -> Result<(), SurveyError> {
    if (MIN_RESOLUTION..=MAX_RESOLUTION).contains(&value) {
        Ok(())
    } else {
        Err(SurveyError::calculation(
            context,
            format!("invalid resolution {value}: must lie in [{MIN_RESOLUTION}, {MAX_RESOLUTION}]"),
        ))
    }
}

/// Angle samples of a trajectory with the tie-on prepended when it sits
/// above the first station, so the grid can start at the tie-on MD.
fn angle_support(calc: &CalculatedTrajectory) -> StationSeries {
    let tie = calc.tie_on;
    let mut support = StationSeries::default();
    if calc.md[0] > tie.md + GRID_SNAP_TOLERANCE {
        support.md.push(tie.md);
        support.inc.push(tie.inc);
        support.azi.push(tie.azi);
    }
    support.md.extend_from_slice(&calc.md);
    support.inc.extend_from_slice(&calc.inc);
    support.azi.extend_from_slice(&calc.azi);
    support
}

/// Interpolate `calc` every `resolution` MD units over `[start_md, end_md]`.
///
/// The range defaults to `[tie-on MD, last MD]` and must satisfy
/// `tie_on_md <= start_md < end_md <= last_md`, with the window wider than
/// the grid snap tolerance. The grid is phased on the tie-on MD and its last
/// point is exactly `end_md`.
///
/// A supplied `vertical_section_azimuth` is used verbatim. Without one, a
/// BHC-converged azimuth on `calc` is reused; otherwise the azimuth of the
/// first interpolated station is taken.
pub fn interpolate(
    calc: &CalculatedTrajectory,
    resolution: f64,
    start_md: Option<f64>,
    end_md: Option<f64>,
    vertical_section_azimuth: Option<f64>,
) -> Result<InterpolatedTrajectory, SurveyError> {
    let started = Instant::now();
    check_resolution(resolution, "interpolation")?;

    if calc.len() < 2 {
        return Err(SurveyError::InsufficientData(format!(
            "interpolation needs at least 2 stations, got {}",
            calc.len()
        )));
    }
    let n = calc.len();
    if calc.channel_lengths().iter().any(|&(_, len)| len != n) {
        return Err(SurveyError::InvalidSurveyData(format!(
            "trajectory channel lengths differ: {:?}",
            calc.channel_lengths()
        )));
    }

    let tie_md = calc.tie_on.md;
    let last_md = calc.md[n - 1];
    let start = start_md.unwrap_or(tie_md);
    let end = end_md.unwrap_or(last_md);

    let in_range = start >= tie_md - GRID_SNAP_TOLERANCE
        && end <= last_md + GRID_SNAP_TOLERANCE
        && end - start > GRID_SNAP_TOLERANCE;
    if !in_range || !start.is_finite() || !end.is_finite() {
        return Err(SurveyError::calculation(
            "interpolation range",
            format!(
                "requested md [{start:.2}, {end:.2}] must satisfy tie-on md {tie_md:.2} <= start < end <= last md {last_md:.2} with end - start > {GRID_SNAP_TOLERANCE:e}"
            ),
        ));
    }

    // Full grid from the tie-on keeps the integration continuous when the
    // requested window starts deeper
    let mut grid = aligned_grid(tie_md, tie_md, end, resolution);
    if start > tie_md + GRID_SNAP_TOLERANCE {
        grid = merge_grids(&grid, &[start]);
    }

    let support = angle_support(calc);
    let inc = interp_many(&grid, &support.md, &support.inc);
    let azi = interp_azimuth(&grid, &support.md, &support.azi);

    let first = grid
        .iter()
        .position(|&md| md >= start - GRID_SNAP_TOLERANCE)
        .unwrap_or(0);

    let (vsa, source) = match vertical_section_azimuth {
        Some(v) => (v, VsAzimuthSource::Explicit),
        None if calc.azimuth_source == VsAzimuthSource::BottomHoleClosure => {
            (calc.vertical_section_azimuth, VsAzimuthSource::BottomHoleClosure)
        }
        None => (azi[first], VsAzimuthSource::FirstStation),
    };

    let stations = StationSeries::new(grid, inc, azi);
    let full = calculate_with_azimuth(&stations, &calc.tie_on, calc.location.clone(), vsa, source)
        .map_err(|e| e.with_context("interpolation"))?;

    let md = full.md[first..].to_vec();
    let northing = full.northing[first..].to_vec();
    let easting = full.easting[first..].to_vec();
    let (vertical_section, closure_distance, closure_direction) =
        section_and_closure(&northing, &easting, full.vertical_section_azimuth);

    let point_count = md.len();
    let result = InterpolatedTrajectory {
        resolution,
        inc: full.inc[first..].to_vec(),
        azi: full.azi[first..].to_vec(),
        tvd: full.tvd[first..].to_vec(),
        dls: full.dls[first..].to_vec(),
        md,
        northing,
        easting,
        vertical_section,
        closure_distance,
        closure_direction,
        vertical_section_azimuth: full.vertical_section_azimuth,
        azimuth_source: source,
        point_count,
        metadata: RunMetadata::finish(started, point_count),
    };

    tracing::debug!(
        resolution,
        start,
        end,
        points = point_count,
        duration_ms = result.metadata.duration_ms,
        "trajectory interpolated"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::{calculate, calculate_bhc};
    use crate::types::{SurveyInput, TieOn};

    fn well() -> CalculatedTrajectory {
        let input = SurveyInput::new(
            StationSeries::new(
                vec![0.0, 100.0, 200.0, 300.0, 400.0],
                vec![0.0, 3.0, 6.0, 9.0, 12.0],
                vec![340.0, 350.0, 0.0, 10.0, 20.0],
            ),
            TieOn { azi: 340.0, ..TieOn::default() },
        );
        calculate(&input, None).unwrap()
    }

    #[test]
    fn test_rejects_out_of_range_resolution() {
        let calc = well();
        for bad in [0.5, 100.5, f64::NAN] {
            let err = interpolate(&calc, bad, None, None, None).unwrap_err();
            assert!(err.to_string().contains("invalid resolution"), "{err}");
        }
        assert!(interpolate(&calc, 1.0, None, None, None).is_ok());
        assert!(interpolate(&calc, 100.0, None, None, None).is_ok());
    }

    #[test]
    fn test_grid_starts_at_tie_on_and_snaps_to_end() {
        let r = interpolate(&well(), 30.0, None, None, None).unwrap();
        assert_eq!(r.md[0], 0.0);
        assert_eq!(*r.md.last().unwrap(), 400.0);
        assert!(r.md.windows(2).all(|w| w[1] > w[0] && w[1] - w[0] <= 30.0 + 1e-9));
        assert_eq!(r.point_count, r.md.len());
        assert_eq!(r.md.len(), 15); // 0..390 by 30 plus 400
    }

    #[test]
    fn test_azimuth_crossing_north_stays_smooth() {
        let r = interpolate(&well(), 10.0, None, None, None).unwrap();
        for w in r.azi.windows(2) {
            let step = crate::geometry::azimuth_delta(w[1], w[0]).abs();
            assert!(step < 2.0, "azimuth jumped {step}° between grid points");
        }
        assert!(r.azi.iter().all(|a| (0.0..360.0).contains(a)));
    }

    #[test]
    fn test_range_validation() {
        let calc = well();
        assert!(interpolate(&calc, 10.0, Some(200.0), Some(100.0), None).is_err());
        assert!(interpolate(&calc, 10.0, Some(-10.0), None, None).is_err());
        assert!(interpolate(&calc, 10.0, None, Some(500.0), None).is_err());
    }

    #[test]
    fn test_sub_step_range_returns_endpoints() {
        let r = interpolate(&well(), 50.0, Some(120.0), Some(130.0), None).unwrap();
        assert_eq!(r.md, vec![120.0, 130.0]);
        assert_eq!(r.point_count, 2);
    }

    #[test]
    fn test_window_narrower_than_snap_tolerance_is_rejected() {
        let err = interpolate(&well(), 10.0, Some(100.0), Some(100.000_000_5), None).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Calculation);
        assert!(err.to_string().contains("interpolation range"), "{err}");

        // just above the tolerance still yields both endpoints
        let r = interpolate(&well(), 10.0, Some(100.0), Some(100.01), None).unwrap();
        assert_eq!(r.md, vec![100.0, 100.01]);
    }

    #[test]
    fn test_window_positions_match_full_run() {
        let calc = well();
        let full = interpolate(&calc, 10.0, None, None, Some(0.0)).unwrap();
        let window = interpolate(&calc, 10.0, Some(150.0), Some(250.0), Some(0.0)).unwrap();
        let i = full.md.iter().position(|&m| m == 150.0).unwrap();
        assert!((full.northing[i] - window.northing[0]).abs() < 1e-9);
        assert!((full.tvd[i] - window.tvd[0]).abs() < 1e-9);
        assert_eq!(window.vertical_section[0], 0.0);
    }

    #[test]
    fn test_explicit_azimuth_used_verbatim() {
        let r = interpolate(&well(), 10.0, None, None, Some(123.0)).unwrap();
        assert_eq!(r.vertical_section_azimuth, 123.0);
        assert_eq!(r.azimuth_source, VsAzimuthSource::Explicit);
    }

    #[test]
    fn test_bhc_azimuth_carried_through() {
        let calc = well();
        let bhc = calculate_bhc(&SurveyInput::new(calc.stations(), calc.tie_on)).unwrap();
        let r = interpolate(&bhc, 10.0, None, None, None).unwrap();
        assert_eq!(r.vertical_section_azimuth, bhc.vertical_section_azimuth);
        assert_eq!(r.azimuth_source, VsAzimuthSource::BottomHoleClosure);
    }

    #[test]
    fn test_default_azimuth_from_first_point() {
        let r = interpolate(&well(), 10.0, None, None, None).unwrap();
        assert!((r.vertical_section_azimuth - 340.0).abs() < 1e-9);
        assert_eq!(r.azimuth_source, VsAzimuthSource::FirstStation);
    }
}
