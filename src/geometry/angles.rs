//! Circular angle helpers
//!
//! Azimuth is a circular quantity: 359° and 1° are 2° apart, not 358°.
//! Everything that subtracts, averages or interpolates azimuths goes
//! through here.

use std::f64::consts::{PI, TAU};

/// Wrap any finite azimuth into [0, 360).
pub fn wrap_azimuth(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Shortest signed rotation from `b` to `a`, in [-180, 180].
///
/// `((a - b + 180) mod 360) - 180`, with the ±180 tie broken by the sign of
/// the raw difference so that `azimuth_delta(a, b) == -azimuth_delta(b, a)`.
///
/// ```
/// use wellpath::geometry::azimuth_delta;
/// assert!((azimuth_delta(355.0, 5.0) + 10.0).abs() < 1e-12);
/// assert!((azimuth_delta(5.0, 355.0) - 10.0).abs() < 1e-12);
/// ```
pub fn azimuth_delta(a: f64, b: f64) -> f64 {
    let raw = a - b;
    let delta = (raw + 180.0).rem_euclid(360.0) - 180.0;
    if delta <= -180.0 && raw > 0.0 {
        180.0
    } else {
        delta
    }
}

/// Remove 2π discontinuities from a radian sequence.
///
/// Each jump larger than π between neighbours is corrected by a multiple of
/// 2π, so the result changes smoothly through north.
pub fn unwrap_radians(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut correction = 0.0;
    let mut prev: Option<f64> = None;

    for &v in values {
        if let Some(p) = prev {
            let jump = v - p;
            if jump.abs() > PI {
                correction -= TAU * (jump / TAU).round();
            }
        }
        out.push(v + correction);
        prev = Some(v);
    }
    out
}

/// Unwrap an azimuth sequence given in degrees (unwrapping done in radians).
pub fn unwrap_azimuths(degrees: &[f64]) -> Vec<f64> {
    let radians: Vec<f64> = degrees.iter().map(|d| d.to_radians()).collect();
    unwrap_radians(&radians)
        .into_iter()
        .map(f64::to_degrees)
        .collect()
}
