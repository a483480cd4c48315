//! Error taxonomy for the survey engine
//!
//! Every failure is returned as a typed `SurveyError`; nothing is dropped or
//! truncated silently. Messages carry the array lengths and MD bounds needed
//! to diagnose the offending input.

use serde::Serialize;
use thiserror::Error;

/// Errors raised by the geometry, trajectory, comparison, interpolation and
/// extrapolation engines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurveyError {
    /// Malformed angle or MD input to the minimum-curvature kernel.
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// Missing tie-on or too few points to compute anything.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Two trajectories share no common MD range.
    #[error("Insufficient overlap: primary md [{primary_min:.2}, {primary_max:.2}] vs reference md [{reference_min:.2}, {reference_max:.2}]")]
    InsufficientOverlap {
        primary_min: f64,
        primary_max: f64,
        reference_min: f64,
        reference_max: f64,
    },

    /// Channel-length mismatch or out-of-range survey values.
    #[error("Invalid survey data: {0}")]
    InvalidSurveyData(String),

    /// Generic computation failure (bad resolution, unfit range, wrapped
    /// kernel failure).
    #[error("Calculation error: {context}: {message}")]
    Calculation { context: String, message: String },

    /// Catch-all wrapper at the comparison boundary.
    #[error("Delta calculation failed: {0}")]
    DeltaCalculation(#[source] Box<SurveyError>),
}

/// Payload-free discriminant, for callers that only need to branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Geometry,
    InsufficientData,
    InsufficientOverlap,
    InvalidSurveyData,
    Calculation,
    DeltaCalculation,
}

impl SurveyError {
    pub fn calculation(context: impl Into<String>, message: impl Into<String>) -> Self {
        SurveyError::Calculation {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SurveyError::Geometry(_) => ErrorKind::Geometry,
            SurveyError::InsufficientData(_) => ErrorKind::InsufficientData,
            SurveyError::InsufficientOverlap { .. } => ErrorKind::InsufficientOverlap,
            SurveyError::InvalidSurveyData(_) => ErrorKind::InvalidSurveyData,
            SurveyError::Calculation { .. } => ErrorKind::Calculation,
            SurveyError::DeltaCalculation(_) => ErrorKind::DeltaCalculation,
        }
    }

    /// Attach context to kernel failures. Errors already carrying the
    /// caller-facing kinds pass through unchanged.
    pub fn with_context(self, context: &str) -> Self {
        match self {
            SurveyError::Geometry(message) => SurveyError::Calculation {
                context: context.to_string(),
                message: format!("geometry kernel: {message}"),
            },
            other => other,
        }
    }

    /// Comparison boundary rule: overlap and bad-data errors stay distinct,
    /// everything else is wrapped.
    pub fn into_delta_error(self) -> Self {
        match self {
            e @ (SurveyError::InsufficientOverlap { .. }
            | SurveyError::InvalidSurveyData(_)
            | SurveyError::DeltaCalculation(_)) => e,
            other => SurveyError::DeltaCalculation(Box::new(other)),
        }
    }
}
