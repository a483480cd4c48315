//! Bottom-hole-closure (BHC) vertical-section refinement
//!
//! Pass 1 computes the trajectory with a north (0°) vertical section, pass 2
//! recomputes it along the closure direction of the final station from
//! pass 1. The converged azimuth is stored on the result with source
//! `BottomHoleClosure` so interpolation reuses it unchanged.
//!
//! Closure direction does not depend on the vertical-section azimuth, so
//! further passes would reproduce the pass-2 azimuth exactly.

use crate::config::defaults::BHC_PASSES;
use crate::error::SurveyError;
use crate::types::{CalculatedTrajectory, SurveyInput, VsAzimuthSource};

use super::calculate_with_azimuth;

/// Calculate a trajectory with the two-pass BHC azimuth refinement.
pub fn calculate_bhc(input: &SurveyInput) -> Result<CalculatedTrajectory, SurveyError> {
    let tie_on = input.require_tie_on()?;
    let location = input.location.clone().unwrap_or_default();

    let mut trajectory = calculate_with_azimuth(
        &input.stations,
        &tie_on,
        location.clone(),
        0.0,
        VsAzimuthSource::Explicit,
    )?;

    for pass in 1..BHC_PASSES {
        let closure = trajectory.bottom_hole_closure_direction().ok_or_else(|| {
            SurveyError::calculation("bhc", "first pass produced no stations")
        })?;
        tracing::debug!(pass = pass + 1, azimuth = closure, "bhc refinement pass");

        trajectory = calculate_with_azimuth(
            &input.stations,
            &tie_on,
            location.clone(),
            closure,
            VsAzimuthSource::BottomHoleClosure,
        )?;
    }

    Ok(trajectory)
}
