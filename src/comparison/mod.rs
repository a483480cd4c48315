//! Alignment & Delta Engine
//!
//! Aligns two calculated trajectories on a uniform grid over their common
//! MD range and reports per-point deltas plus summary statistics.
//!
//! Only `InsufficientOverlap` and `InvalidSurveyData` leave `compare`
//! unwrapped; every other failure surfaces as `DeltaCalculation`.

pub mod statistics;

pub use statistics::{channel_statistics, percentile_index, summarize, DeltaChannels};

use std::time::Instant;

use crate::config;
use crate::error::SurveyError;
use crate::geometry::azimuth_delta;
use crate::interpolation::{check_resolution, interp_azimuth, interp_many, snapped_grid};
use crate::types::{CalculatedTrajectory, ComparisonResult, RunMetadata};

/// One trajectory resampled onto the common grid.
struct Aligned {
    northing: Vec<f64>,
    easting: Vec<f64>,
    tvd: Vec<f64>,
    inc: Vec<f64>,
    azi: Vec<f64>,
}

impl Aligned {
    fn resample(calc: &CalculatedTrajectory, grid: &[f64]) -> Self {
        Self {
            northing: interp_many(grid, &calc.md, &calc.northing),
            easting: interp_many(grid, &calc.md, &calc.easting),
            tvd: interp_many(grid, &calc.md, &calc.tvd),
            inc: interp_many(grid, &calc.md, &calc.inc),
            azi: interp_azimuth(grid, &calc.md, &calc.azi),
        }
    }
}

fn check_channels(calc: &CalculatedTrajectory, role: &str) -> Result<(), SurveyError> {
    let lengths = calc.channel_lengths();
    let n = calc.md.len();
    if lengths.iter().any(|&(_, len)| len != n) {
        return Err(SurveyError::InvalidSurveyData(format!(
            "{role} trajectory channel lengths differ: {lengths:?}"
        )));
    }
    if n < 2 {
        return Err(SurveyError::InsufficientData(format!(
            "{role} trajectory needs at least 2 stations, got {n}"
        )));
    }
    Ok(())
}

/// Compare `primary` against `reference` every `step` MD units.
///
/// Deltas are primary minus reference. The grid spans the overlapping MD
/// range only, with both ends included.
pub fn compare(
    primary: &CalculatedTrajectory,
    reference: &CalculatedTrajectory,
    step: f64,
) -> Result<ComparisonResult, SurveyError> {
    compare_inner(primary, reference, step).map_err(SurveyError::into_delta_error)
}

fn compare_inner(
    primary: &CalculatedTrajectory,
    reference: &CalculatedTrajectory,
    step: f64,
) -> Result<ComparisonResult, SurveyError> {
    let started = Instant::now();
    check_channels(primary, "primary")?;
    check_channels(reference, "reference")?;
    check_resolution(step, "comparison step")?;

    let (p_min, p_max) = (primary.md[0], primary.md[primary.len() - 1]);
    let (r_min, r_max) = (reference.md[0], reference.md[reference.len() - 1]);
    let lo = p_min.max(r_min);
    let hi = p_max.min(r_max);
    if hi <= lo {
        return Err(SurveyError::InsufficientOverlap {
            primary_min: p_min,
            primary_max: p_max,
            reference_min: r_min,
            reference_max: r_max,
        });
    }

    let md = snapped_grid(lo, hi, step);
    let p = Aligned::resample(primary, &md);
    let r = Aligned::resample(reference, &md);

    let delta_x: Vec<f64> = p.easting.iter().zip(&r.easting).map(|(a, b)| a - b).collect();
    let delta_y: Vec<f64> = p.northing.iter().zip(&r.northing).map(|(a, b)| a - b).collect();
    let delta_z: Vec<f64> = p.tvd.iter().zip(&r.tvd).map(|(a, b)| a - b).collect();
    let delta_horizontal: Vec<f64> = delta_x
        .iter()
        .zip(&delta_y)
        .map(|(dx, dy)| dx.hypot(*dy))
        .collect();
    let delta_total: Vec<f64> = delta_horizontal
        .iter()
        .zip(&delta_z)
        .map(|(dh, dz)| dh.hypot(*dz))
        .collect();
    let delta_inc: Vec<f64> = p.inc.iter().zip(&r.inc).map(|(a, b)| a - b).collect();
    let delta_azi: Vec<f64> = p
        .azi
        .iter()
        .zip(&r.azi)
        .map(|(&a, &b)| azimuth_delta(a, b))
        .collect();

    let statistics = summarize(
        &DeltaChannels {
            md: &md,
            delta_x: &delta_x,
            delta_y: &delta_y,
            delta_z: &delta_z,
            delta_horizontal: &delta_horizontal,
            delta_total: &delta_total,
            delta_inc: &delta_inc,
            delta_azi: &delta_azi,
        },
        &config::get().comparison.snapshot_percentiles,
    );

    tracing::debug!(
        overlap_start = lo,
        overlap_end = hi,
        points = md.len(),
        max_horizontal = statistics.delta_horizontal.max,
        "trajectories compared"
    );

    let point_count = md.len();
    Ok(ComparisonResult {
        md,
        step,
        primary_northing: p.northing,
        primary_easting: p.easting,
        primary_tvd: p.tvd,
        primary_inc: p.inc,
        primary_azi: p.azi,
        reference_northing: r.northing,
        reference_easting: r.easting,
        reference_tvd: r.tvd,
        reference_inc: r.inc,
        reference_azi: r.azi,
        delta_x,
        delta_y,
        delta_z,
        delta_horizontal,
        delta_total,
        delta_inc,
        delta_azi,
        statistics,
        metadata: RunMetadata::finish(started, point_count),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::trajectory::calculate;
    use crate::types::{StationSeries, SurveyInput, TieOn};

    fn trajectory(md: Vec<f64>, inc: f64, azi: f64) -> CalculatedTrajectory {
        let n = md.len();
        let tie = TieOn { md: md[0], inc, azi, ..TieOn::default() };
        calculate(
            &SurveyInput::new(StationSeries::new(md, vec![inc; n], vec![azi; n]), tie),
            None,
        )
        .unwrap()
    }

    fn mds(start: f64, end: f64, step: f64) -> Vec<f64> {
        snapped_grid(start, end, step)
    }

    #[test]
    fn test_overlap_only() {
        let a = trajectory(mds(0.0, 300.0, 100.0), 10.0, 30.0);
        let b = trajectory(mds(200.0, 500.0, 100.0), 10.0, 30.0);
        let r = compare(&a, &b, 10.0).unwrap();
        assert_eq!(r.len(), 11);
        assert_eq!(r.md[0], 200.0);
        assert_eq!(*r.md.last().unwrap(), 300.0);
    }

    #[test]
    fn test_self_compare_is_zero() {
        let a = trajectory(mds(0.0, 1000.0, 100.0), 25.0, 120.0);
        let r = compare(&a, &a, 10.0).unwrap();
        for s in [
            r.statistics.delta_x,
            r.statistics.delta_y,
            r.statistics.delta_z,
            r.statistics.delta_total,
            r.statistics.delta_azi,
        ] {
            assert_eq!(s.max, 0.0);
            assert_eq!(s.avg, 0.0);
            assert_eq!(s.std, 0.0);
        }
    }

    #[test]
    fn test_delta_azi_wraps() {
        let a = trajectory(mds(0.0, 200.0, 100.0), 10.0, 355.0);
        let b = trajectory(mds(0.0, 200.0, 100.0), 10.0, 5.0);
        let r = compare(&a, &b, 50.0).unwrap();
        assert!(r.delta_azi.iter().all(|d| (d + 10.0).abs() < 1e-9));
        let r = compare(&b, &a, 50.0).unwrap();
        assert!(r.delta_azi.iter().all(|d| (d - 10.0).abs() < 1e-9));
    }

    #[test]
    fn test_disjoint_ranges() {
        let a = trajectory(mds(0.0, 100.0, 50.0), 0.0, 0.0);
        let b = trajectory(mds(200.0, 300.0, 50.0), 0.0, 0.0);
        let err = compare(&a, &b, 10.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientOverlap);
    }

    #[test]
    fn test_touching_ranges_have_no_overlap() {
        let a = trajectory(mds(0.0, 100.0, 50.0), 0.0, 0.0);
        let b = trajectory(mds(100.0, 300.0, 50.0), 0.0, 0.0);
        assert_eq!(
            compare(&a, &b, 10.0).unwrap_err().kind(),
            ErrorKind::InsufficientOverlap
        );
    }

    #[test]
    fn test_channel_mismatch_is_not_wrapped() {
        let mut a = trajectory(mds(0.0, 300.0, 100.0), 10.0, 30.0);
        let b = a.clone();
        a.tvd.pop();
        let err = compare(&a, &b, 10.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSurveyData);
    }

    #[test]
    fn test_bad_step_is_wrapped() {
        let a = trajectory(mds(0.0, 300.0, 100.0), 10.0, 30.0);
        let err = compare(&a, &a, 0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeltaCalculation);
    }

    #[test]
    fn test_snapshots_follow_config_percentiles() {
        let a = trajectory(mds(0.0, 300.0, 100.0), 10.0, 30.0);
        let r = compare(&a, &a, 10.0).unwrap();
        let idx: Vec<usize> = r.statistics.snapshots.iter().map(|s| s.index).collect();
        assert_eq!(idx, vec![0, 8, 15, 23, 30]);
    }
}
