//! Linear and circular resampling primitives shared by the interpolation,
//! comparison and extrapolation engines.

use crate::config::defaults::GRID_SNAP_TOLERANCE;
use crate::geometry::{unwrap_azimuths, wrap_azimuth};

/// Piecewise-linear interpolation of `fp` (sampled at increasing `xp`) at `x`.
///
/// Outside the sampled range the nearest end value is held.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let n = xp.len().min(fp.len());
    if n == 0 {
        return f64::NAN;
    }
    let j = xp[..n].partition_point(|&v| v <= x);
    if j == 0 {
        return fp[0];
    }
    if j >= n {
        return fp[n - 1];
    }
    let (x0, x1) = (xp[j - 1], xp[j]);
    let t = (x - x0) / (x1 - x0);
    fp[j - 1] + t * (fp[j] - fp[j - 1])
}

/// `interp` over a whole grid.
pub fn interp_many(xs: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    xs.iter().map(|&x| interp(x, xp, fp)).collect()
}

/// Circular-safe azimuth interpolation: unwrap, interpolate, wrap to [0, 360).
pub fn interp_azimuth(xs: &[f64], xp: &[f64], azi: &[f64]) -> Vec<f64> {
    let unwrapped = unwrap_azimuths(azi);
    xs.iter()
        .map(|&x| wrap_azimuth(interp(x, xp, &unwrapped)))
        .collect()
}

/// Grid over `[start, end]` whose interior points sit on `origin + k·step`.
///
/// `start` and `end` are always the first and last points; interior points
/// closer than the snap tolerance to either end are dropped, so the grid
/// never overshoots and a range shorter than one step yields `[start, end]`.
/// Callers guarantee `start < end` and `step > 0`.
pub fn aligned_grid(origin: f64, start: f64, end: f64, step: f64) -> Vec<f64> {
    let mut grid = vec![start];
    let mut k = ((start - origin) / step).floor() as i64 + 1;
    loop {
        let p = origin + k as f64 * step;
        if p >= end - GRID_SNAP_TOLERANCE {
            break;
        }
        if p > start + GRID_SNAP_TOLERANCE {
            grid.push(p);
        }
        k += 1;
    }
    grid.push(end);
    grid
}

/// Uniform grid from `start` stepping by `step`, final point snapped to `end`.
pub fn snapped_grid(start: f64, end: f64, step: f64) -> Vec<f64> {
    aligned_grid(start, start, end, step)
}

/// Sorted union of two increasing MD sequences, near-duplicates merged.
pub fn merge_grids(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut merged: Vec<f64> = a.iter().chain(b).copied().collect();
    merged.sort_by(f64::total_cmp);
    merged.dedup_by(|next, kept| (*next - *kept).abs() <= GRID_SNAP_TOLERANCE);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interp_inside_and_outside() {
        let xp = [0.0, 10.0, 20.0];
        let fp = [0.0, 100.0, 0.0];
        assert_eq!(interp(5.0, &xp, &fp), 50.0);
        assert_eq!(interp(15.0, &xp, &fp), 50.0);
        assert_eq!(interp(-5.0, &xp, &fp), 0.0);
        assert_eq!(interp(25.0, &xp, &fp), 0.0);
        assert_eq!(interp(10.0, &xp, &fp), 100.0);
        assert_eq!(interp(20.0, &xp, &fp), 0.0);
    }

    #[test]
    fn test_interp_azimuth_takes_short_way_round() {
        let out = interp_azimuth(&[5.0], &[0.0, 10.0], &[350.0, 10.0]);
        assert!(out[0].abs() < 1e-9 || (out[0] - 360.0).abs() < 1e-9, "got {}", out[0]);
        let out = interp_azimuth(&[2.5], &[0.0, 10.0], &[350.0, 10.0]);
        assert!((out[0] - 355.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapped_grid_never_overshoots() {
        let grid = snapped_grid(0.0, 25.0, 10.0);
        assert_eq!(grid, vec![0.0, 10.0, 20.0, 25.0]);
        let grid = snapped_grid(200.0, 300.0, 10.0);
        assert_eq!(grid.len(), 11);
        assert_eq!(*grid.last().unwrap(), 300.0);
    }

    #[test]
    fn test_short_range_returns_endpoints() {
        assert_eq!(snapped_grid(100.0, 104.0, 10.0), vec![100.0, 104.0]);
    }

    #[test]
    fn test_aligned_grid_keeps_origin_phase() {
        let grid = aligned_grid(0.0, 15.0, 42.0, 10.0);
        assert_eq!(grid, vec![15.0, 20.0, 30.0, 40.0, 42.0]);
    }

    #[test]
    fn test_merge_grids_dedups() {
        let merged = merge_grids(&[0.0, 10.0, 20.0], &[5.0, 10.0, 25.0]);
        assert_eq!(merged, vec![0.0, 5.0, 10.0, 20.0, 25.0]);
    }
}
