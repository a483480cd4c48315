//! Angle recovery from a positioned path
//!
//! The numeric inverse of the kernel, used after manual adjustments move
//! stations. A minimum-curvature chord bisects the tangents at its two ends,
//! so an interior tangent is estimated as the normalised sum of its
//! arriving and leaving unit chords, and an end tangent as the reflection of
//! its neighbour's tangent about the single chord it touches. Both are exact
//! for a constant-curvature, evenly spaced arc.
//!
//! Coincident consecutive points carry no direction: stations that cannot
//! be resolved inherit the previous station's angles (or the seed, for the
//! first station).

use crate::config::defaults::{MIN_HORIZONTAL_DISPLACEMENT, MIN_SEGMENT_LENGTH};
use crate::error::SurveyError;

use super::angles::wrap_azimuth;

type Vec3 = [f64; 3];

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

fn unit(a: Vec3) -> Option<Vec3> {
    let len = norm(a);
    (len > MIN_SEGMENT_LENGTH).then(|| [a[0] / len, a[1] / len, a[2] / len])
}

/// Reflect tangent `t` about chord direction `c`: 2(c·t)c − t.
fn reflect(t: Vec3, c: Vec3) -> Vec3 {
    let k = 2.0 * dot(c, t);
    [k * c[0] - t[0], k * c[1] - t[1], k * c[2] - t[2]]
}

/// Recover (inc, azi) per station, in degrees, from a north/east/TVD path.
///
/// `seed` supplies the angles for a first station that cannot be resolved
/// (for instance when the first two points coincide).
pub fn angles_from_positions(
    northing: &[f64],
    easting: &[f64],
    tvd: &[f64],
    seed: Option<(f64, f64)>,
) -> Result<(Vec<f64>, Vec<f64>), SurveyError> {
    let n = northing.len();
    if easting.len() != n || tvd.len() != n {
        return Err(SurveyError::InvalidSurveyData(format!(
            "position channels differ in length: northing={}, easting={}, tvd={}",
            n,
            easting.len(),
            tvd.len()
        )));
    }
    if n < 2 {
        return Err(SurveyError::InsufficientData(format!(
            "angle recalculation needs at least 2 positions, got {n}"
        )));
    }

    let points: Vec<Vec3> = (0..n).map(|i| [northing[i], easting[i], tvd[i]]).collect();
    let chords: Vec<Option<Vec3>> = points.windows(2).map(|w| unit(sub(w[1], w[0]))).collect();

    // Interior tangents: bisector of the two adjacent chords
    let mut tangents: Vec<Option<Vec3>> = vec![None; n];
    for i in 1..n - 1 {
        tangents[i] = match (chords[i - 1], chords[i]) {
            (Some(a), Some(b)) => unit(add(a, b)),
            (Some(c), None) | (None, Some(c)) => Some(c),
            (None, None) => None,
        };
    }

    // End tangents: reflect the neighbour about the end chord
    let end_tangent = |chord: Option<Vec3>, neighbour: Option<Vec3>| match (chord, neighbour) {
        (Some(c), Some(t)) => unit(reflect(t, c)),
        (Some(c), None) => Some(c),
        (None, t) => t,
    };
    tangents[0] = end_tangent(chords[0], if n > 2 { tangents[1] } else { None });
    tangents[n - 1] = end_tangent(chords[n - 2], if n > 2 { tangents[n - 2] } else { None });

    let mut inc = Vec::with_capacity(n);
    let mut azi = Vec::with_capacity(n);
    let (mut prev_inc, mut prev_azi) = seed.unwrap_or((0.0, 0.0));

    for (i, tangent) in tangents.iter().enumerate() {
        match tangent {
            Some(t) => {
                let horizontal = t[0].hypot(t[1]);
                let station_inc = horizontal.atan2(t[2]).to_degrees();
                let station_azi = if horizontal < MIN_HORIZONTAL_DISPLACEMENT {
                    // Vertical tangent: azimuth undefined, keep the last bearing
                    prev_azi
                } else {
                    wrap_azimuth(t[1].atan2(t[0]).to_degrees())
                };
                prev_inc = station_inc;
                prev_azi = station_azi;
            }
            None => {
                tracing::debug!(station = i, "coincident positions, carrying previous angles");
            }
        }
        inc.push(prev_inc);
        azi.push(prev_azi);
    }

    Ok((inc, azi))
}
