//! Extrapolation Engine
//!
//! Projects a survey beyond its last station. The original stations are
//! first resampled at the extrapolation step (original MDs kept), then new
//! stations are appended every `step` up to `last_md + length` with angles
//! from the chosen trend model. Positions for the whole combined path come
//! from one minimum-curvature run from the tie-on.

pub mod trend;

pub use trend::PolynomialFit;

use std::time::Instant;

use crate::config;
use crate::error::SurveyError;
use crate::geometry::{unwrap_azimuths, wrap_azimuth};
use crate::interpolation::{
    check_resolution, interp_azimuth, interp_many, merge_grids, snapped_grid,
};
use crate::trajectory::calculate_with_azimuth;
use crate::types::{
    AngleSeries, ExtrapolationMethod, ExtrapolationResult, FinalPointSummary, PositionedSeries,
    RunMetadata, StationSeries, SurveyInput, VsAzimuthSource,
};

/// Extrapolate `input` by `length` MD units in increments of `step`.
///
/// A non-positive `length` returns the resampled input with no projected
/// stations.
pub fn extrapolate(
    input: &SurveyInput,
    length: f64,
    step: f64,
    method: ExtrapolationMethod,
) -> Result<ExtrapolationResult, SurveyError> {
    let started = Instant::now();
    let tie_on = input.require_tie_on()?;
    input
        .stations
        .validate()
        .map_err(|e| e.with_context("extrapolation input"))?;
    check_resolution(step, "extrapolation")?;
    if !length.is_finite() {
        return Err(SurveyError::calculation(
            "extrapolation",
            format!("invalid length {length}"),
        ));
    }

    let stations = &input.stations;
    let n = stations.len();
    let (first_md, last_md) = (stations.md[0], stations.md[n - 1]);

    let grid = merge_grids(&snapped_grid(first_md, last_md, step), &stations.md);
    let interpolated = AngleSeries {
        inc: interp_many(&grid, &stations.md, &stations.inc),
        azi: interp_azimuth(&grid, &stations.md, &stations.azi),
        md: grid,
    };

    let new_md: Vec<f64> = if length > 0.0 {
        snapped_grid(last_md, last_md + length, step)
            .into_iter()
            .skip(1)
            .collect()
    } else {
        Vec::new()
    };
    let (new_inc, new_azi) = project_angles(&interpolated, &new_md, method);

    let mut combined_stations = StationSeries::new(
        interpolated.md.clone(),
        interpolated.inc.clone(),
        interpolated.azi.clone(),
    );
    combined_stations.md.extend_from_slice(&new_md);
    combined_stations.inc.extend_from_slice(&new_inc);
    combined_stations.azi.extend_from_slice(&new_azi);

    let location = input.location.clone().unwrap_or_default();
    let positioned = calculate_with_azimuth(
        &combined_stations,
        &tie_on,
        location,
        tie_on.azi,
        VsAzimuthSource::TieOn,
    )
    .map_err(|e| e.with_context("extrapolation"))?;

    let combined = PositionedSeries {
        md: positioned.md,
        inc: positioned.inc,
        azi: positioned.azi,
        northing: positioned.northing,
        easting: positioned.easting,
        tvd: positioned.tvd,
    };
    let split = interpolated.len();
    let extrapolated = PositionedSeries {
        md: combined.md[split..].to_vec(),
        inc: combined.inc[split..].to_vec(),
        azi: combined.azi[split..].to_vec(),
        northing: combined.northing[split..].to_vec(),
        easting: combined.easting[split..].to_vec(),
        tvd: combined.tvd[split..].to_vec(),
    };

    let final_point = final_point(&combined).ok_or_else(|| {
        SurveyError::calculation("extrapolation", "combined trajectory is empty")
    })?;

    let result = ExtrapolationResult {
        method,
        length,
        step,
        original: AngleSeries {
            md: stations.md.clone(),
            inc: stations.inc.clone(),
            azi: stations.azi.clone(),
        },
        original_point_count: n,
        interpolated_point_count: interpolated.len(),
        extrapolated_point_count: extrapolated.len(),
        metadata: RunMetadata::finish(started, combined.len()),
        interpolated,
        extrapolated,
        combined,
        final_point,
    };

    tracing::debug!(
        ?method,
        length,
        step,
        projected = result.extrapolated_point_count,
        final_md = result.final_point.md,
        "survey extrapolated"
    );

    Ok(result)
}

/// Angles at `new_md` from a trend fitted over the tail of `series`.
///
/// Falls back to holding the last angles when the window is too short for
/// the requested degree or the fit is degenerate.
fn project_angles(
    series: &AngleSeries,
    new_md: &[f64],
    method: ExtrapolationMethod,
) -> (Vec<f64>, Vec<f64>) {
    let n = series.len();
    let last_inc = series.inc[n - 1];
    let last_azi = series.azi[n - 1];
    let hold = || (vec![last_inc; new_md.len()], vec![last_azi; new_md.len()]);

    if new_md.is_empty() || method == ExtrapolationMethod::Constant {
        return hold();
    }

    let cfg = &config::get().extrapolation;
    let window = match method {
        ExtrapolationMethod::LinearTrend => cfg.linear_trend_window,
        _ => cfg.curve_fit_window,
    };
    let tail = n.saturating_sub(window);
    let md = &series.md[tail..];
    let inc = &series.inc[tail..];
    let azi = unwrap_azimuths(&series.azi[tail..]);

    let degree = method.degree();
    let (inc_fit, azi_fit) = match (
        PolynomialFit::fit(md, inc, degree),
        PolynomialFit::fit(md, &azi, degree),
    ) {
        (Some(i), Some(a)) => (i, a),
        _ => {
            tracing::debug!(
                ?method,
                points = md.len(),
                "trend window too short, holding last angles"
            );
            return hold();
        }
    };

    new_md
        .iter()
        .map(|&m| {
            (
                inc_fit.eval(m).clamp(0.0, 180.0),
                wrap_azimuth(azi_fit.eval(m)),
            )
        })
        .unzip()
}

fn final_point(combined: &PositionedSeries) -> Option<FinalPointSummary> {
    let last = combined.len().checked_sub(1)?;
    let dn = combined.northing[last] - combined.northing[0];
    let de = combined.easting[last] - combined.easting[0];
    Some(FinalPointSummary {
        md: combined.md[last],
        tvd: combined.tvd[last],
        horizontal_displacement: dn.hypot(de),
        inc: combined.inc[last],
        azi: combined.azi[last],
    })
}
