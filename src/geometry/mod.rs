//! Geometry Kernel
//!
//! Deterministic minimum-curvature math. Pure functions, no I/O, no state.
//!
//! ## Functions
//! - `minimum_curvature()` - positions and per-course metrics from (MD, Inc, Azi)
//! - `dogleg()` / `ratio_factor()` - the two building blocks of one course
//! - `angles_from_positions()` - the inverse: Inc/Azi recovered from a path
//!
//! ## Method
//!
//! For each pair of consecutive stations the dogleg β comes from the
//! spherical law of cosines:
//!
//! cos β = cos(I₂ − I₁) − sin I₁ · sin I₂ · (1 − cos(A₂ − A₁))
//!
//! and the course displacement is the average of the two station tangents
//! bent onto the arc by the ratio factor RF = tan(β/2) / β (→ 0.5 as β → 0):
//!
//! ΔN = ΔMD · RF · (sin I₁ cos A₁ + sin I₂ cos A₂)
//! ΔE = ΔMD · RF · (sin I₁ sin A₁ + sin I₂ sin A₂)
//! ΔV = ΔMD · RF · (cos I₁ + cos I₂)

pub mod angles;
pub mod inverse;

pub use angles::{azimuth_delta, unwrap_azimuths, unwrap_radians, wrap_azimuth};
pub use inverse::angles_from_positions;

use serde::{Deserialize, Serialize};

use crate::config::defaults::MIN_DOGLEG_RAD;
use crate::error::SurveyError;
use crate::types::{SegmentMetrics, StationSeries};

/// Position of the first station handed to the kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StartPoint {
    pub northing: f64,
    pub easting: f64,
    pub tvd: f64,
}

/// Kernel output: one position per station, one metric entry per course.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelOutput {
    pub northing: Vec<f64>,
    pub easting: Vec<f64>,
    pub tvd: Vec<f64>,
    pub segments: SegmentMetrics,
}

/// Dogleg angle (radians) between two station tangents. Angles in degrees.
pub fn dogleg(inc1: f64, azi1: f64, inc2: f64, azi2: f64) -> f64 {
    let (i1, i2) = (inc1.to_radians(), inc2.to_radians());
    let delta_azi = (azi2 - azi1).to_radians();

    let cos_dl = (i2 - i1).cos() - i1.sin() * i2.sin() * (1.0 - delta_azi.cos());
    // Rounding can push the cosine a hair outside [-1, 1]
    cos_dl.clamp(-1.0, 1.0).acos()
}

/// Minimum-curvature ratio factor tan(β/2)/β, with its 0.5 limit for a
/// straight course.
pub fn ratio_factor(dogleg_rad: f64) -> f64 {
    if dogleg_rad < MIN_DOGLEG_RAD {
        0.5
    } else {
        (dogleg_rad / 2.0).tan() / dogleg_rad
    }
}

/// Integrate a station series from `start` with the minimum-curvature method.
///
/// Fails with `SurveyError::Geometry` when the channels differ in length,
/// MD is not strictly increasing or an inclination is out of range. Metrics
/// are normalised to the configured course length.
pub fn minimum_curvature(
    stations: &StationSeries,
    start: StartPoint,
) -> Result<KernelOutput, SurveyError> {
    stations.validate()?;
    let course_length = crate::config::get().geometry.course_length;

    let n = stations.len();
    let mut northing = Vec::with_capacity(n);
    let mut easting = Vec::with_capacity(n);
    let mut tvd = Vec::with_capacity(n);
    let mut segments = SegmentMetrics {
        dogleg: Vec::with_capacity(n - 1),
        dls: Vec::with_capacity(n - 1),
        build_rate: Vec::with_capacity(n - 1),
        turn_rate: Vec::with_capacity(n - 1),
    };

    northing.push(start.northing);
    easting.push(start.easting);
    tvd.push(start.tvd);

    for i in 1..n {
        let (md1, inc1, azi1) = (stations.md[i - 1], stations.inc[i - 1], wrap_azimuth(stations.azi[i - 1]));
        let (md2, inc2, azi2) = (stations.md[i], stations.inc[i], wrap_azimuth(stations.azi[i]));
        let course = md2 - md1;

        let dl = dogleg(inc1, azi1, inc2, azi2);
        let rf = ratio_factor(dl);

        let (i1, a1) = (inc1.to_radians(), azi1.to_radians());
        let (i2, a2) = (inc2.to_radians(), azi2.to_radians());

        let dn = course * rf * (i1.sin() * a1.cos() + i2.sin() * a2.cos());
        let de = course * rf * (i1.sin() * a1.sin() + i2.sin() * a2.sin());
        let dv = course * rf * (i1.cos() + i2.cos());

        northing.push(northing[i - 1] + dn);
        easting.push(easting[i - 1] + de);
        tvd.push(tvd[i - 1] + dv);

        let scale = course_length / course;
        segments.dogleg.push(dl.to_degrees());
        segments.dls.push(dl.to_degrees() * scale);
        segments.build_rate.push((inc2 - inc1) * scale);
        segments.turn_rate.push(azimuth_delta(azi2, azi1) * scale);
    }

    Ok(KernelOutput {
        northing,
        easting,
        tvd,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn series(md: &[f64], inc: &[f64], azi: &[f64]) -> StationSeries {
        StationSeries::new(md.to_vec(), inc.to_vec(), azi.to_vec())
    }

    #[test]
    fn test_ratio_factor_limit() {
        assert_eq!(ratio_factor(0.0), 0.5);
        assert!((ratio_factor(1e-6) - 0.5).abs() < 1e-9);
        // tan(45°)/(π/2) for a 90° dogleg
        assert!((ratio_factor(std::f64::consts::FRAC_PI_2) - 2.0 / std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_dogleg_pure_build() {
        let dl = dogleg(10.0, 45.0, 13.0, 45.0);
        assert!((dl.to_degrees() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_dogleg_ignores_azimuth_when_vertical() {
        assert!(dogleg(0.0, 0.0, 0.0, 270.0) < EPS);
    }

    #[test]
    fn test_vertical_hole_goes_straight_down() {
        let s = series(&[0.0, 500.0, 1000.0], &[0.0; 3], &[0.0, 90.0, 180.0]);
        let out = minimum_curvature(&s, StartPoint::default()).unwrap();
        assert!((out.tvd[2] - 1000.0).abs() < EPS);
        assert!(out.northing[2].abs() < EPS);
        assert!(out.easting[2].abs() < EPS);
        assert!(out.segments.dls.iter().all(|d| d.abs() < EPS));
    }

    #[test]
    fn test_horizontal_east_course() {
        let s = series(&[0.0, 100.0], &[90.0, 90.0], &[90.0, 90.0]);
        let start = StartPoint { northing: 10.0, easting: 20.0, tvd: 30.0 };
        let out = minimum_curvature(&s, start).unwrap();
        assert!((out.easting[1] - 120.0).abs() < 1e-9);
        assert!((out.northing[1] - 10.0).abs() < 1e-9);
        assert!((out.tvd[1] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_quarter_circle_build() {
        // 0° → 90° over a quarter circle of radius R: ΔMD = πR/2
        let radius = 1000.0;
        let course = std::f64::consts::PI * radius / 2.0;
        let s = series(&[0.0, course], &[0.0, 90.0], &[0.0, 0.0]);
        let out = minimum_curvature(&s, StartPoint::default()).unwrap();
        assert!((out.tvd[1] - radius).abs() < 1e-6);
        assert!((out.northing[1] - radius).abs() < 1e-6);
        assert!((out.segments.dogleg[0] - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_metrics_normalised_to_course_length() {
        let s = series(&[0.0, 100.0], &[10.0, 20.0], &[350.0, 10.0]);
        let out = minimum_curvature(&s, StartPoint::default()).unwrap();
        assert!((out.segments.build_rate[0] - 3.0).abs() < 1e-9);
        // 350° → 10° is a +20° turn, not -340°
        assert!((out.segments.turn_rate[0] - 6.0).abs() < 1e-9);
        assert_eq!(out.segments.len(), 1);
    }

    #[test]
    fn test_rejects_non_increasing_md() {
        let s = series(&[0.0, 100.0, 50.0], &[0.0; 3], &[0.0; 3]);
        assert!(matches!(
            minimum_curvature(&s, StartPoint::default()),
            Err(SurveyError::Geometry(_))
        ));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let s = series(&[0.0, 100.0], &[0.0], &[0.0, 0.0]);
        assert!(matches!(
            minimum_curvature(&s, StartPoint::default()),
            Err(SurveyError::Geometry(_))
        ));
    }
}
