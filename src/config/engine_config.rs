//! Engine Configuration - tunable defaults as TOML values
//!
//! Each section implements `Default` with the built-in values, so a missing
//! file or a partial file behaves exactly like the defaults for the keys it
//! omits.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for the survey engine.
///
/// Load with `EngineConfig::load()` which searches:
/// 1. `$WELLPATH_CONFIG` env var
/// 2. `./wellpath.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum-curvature kernel settings
    #[serde(default)]
    pub geometry: GeometryConfig,

    /// Interpolation defaults
    #[serde(default)]
    pub interpolation: InterpolationConfig,

    /// Comparison grid and statistics
    #[serde(default)]
    pub comparison: ComparisonConfig,

    /// Extrapolation trend models
    #[serde(default)]
    pub extrapolation: ExtrapolationConfig,

    /// Adjustment history
    #[serde(default)]
    pub adjustment: AdjustmentConfig,
}

impl EngineConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("WELLPATH_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded engine config from WELLPATH_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from WELLPATH_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "WELLPATH_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("wellpath.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded engine config from ./wellpath.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./wellpath.toml, using defaults");
                }
            }
        }

        info!("No wellpath.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    ///
    /// Unknown keys are logged as warnings (with suggestions) and never fail
    /// the load; range violations do.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Saved engine config");
        Ok(())
    }

    /// Validate every section, collecting all violations.
    ///
    /// Rules:
    /// - Course length must be positive and finite
    /// - Resolutions and steps must lie in [1, 100]
    /// - Trend windows must hold enough points for their polynomial degree
    /// - Snapshot percentiles must lie in [0, 100] and ascend
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let g = &self.geometry;
        if !g.course_length.is_finite() || g.course_length <= 0.0 {
            errors.push(format!(
                "geometry.course_length must be a positive number, got {}",
                g.course_length
            ));
        }

        Self::check_resolution(
            self.interpolation.default_resolution,
            "interpolation.default_resolution",
            &mut errors,
        );
        Self::check_resolution(self.comparison.default_step, "comparison.default_step", &mut errors);
        Self::check_resolution(
            self.extrapolation.default_step,
            "extrapolation.default_step",
            &mut errors,
        );

        let p = &self.comparison.snapshot_percentiles;
        if p.is_empty() {
            errors.push("comparison.snapshot_percentiles must not be empty".to_string());
        }
        if p.iter().any(|v| !v.is_finite() || !(0.0..=100.0).contains(v)) {
            errors.push(format!(
                "comparison.snapshot_percentiles must lie in [0, 100], got {p:?}"
            ));
        }
        if p.windows(2).any(|w| w[1] < w[0]) {
            errors.push(format!(
                "comparison.snapshot_percentiles must be ascending, got {p:?}"
            ));
        }

        let e = &self.extrapolation;
        if !e.default_length.is_finite() || e.default_length < 0.0 {
            errors.push(format!(
                "extrapolation.default_length must be >= 0, got {}",
                e.default_length
            ));
        }
        if e.linear_trend_window < 2 {
            errors.push(format!(
                "extrapolation.linear_trend_window must be >= 2, got {}",
                e.linear_trend_window
            ));
        }
        if e.curve_fit_window < 3 {
            errors.push(format!(
                "extrapolation.curve_fit_window must be >= 3, got {}",
                e.curve_fit_window
            ));
        }

        if self.adjustment.db_path.trim().is_empty() {
            errors.push("adjustment.db_path must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_resolution(value: f64, name: &str, errors: &mut Vec<String>) {
        if !value.is_finite() {
            errors.push(format!("{name}: value must be finite (got {value})"));
            return;
        }
        if !(defaults::MIN_RESOLUTION..=defaults::MAX_RESOLUTION).contains(&value) {
            errors.push(format!(
                "{name} ({value:.3}) must lie in [{}, {}]",
                defaults::MIN_RESOLUTION,
                defaults::MAX_RESOLUTION
            ));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Course length DLS, build and turn rates are expressed per (30 = °/30 ft or °/30 m)
    #[serde(default = "default_course_length")]
    pub course_length: f64,
}

fn default_course_length() -> f64 {
    defaults::COURSE_LENGTH
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            course_length: default_course_length(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpolationConfig {
    #[serde(default = "default_resolution")]
    pub default_resolution: f64,
}

fn default_resolution() -> f64 {
    defaults::DEFAULT_RESOLUTION
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            default_resolution: default_resolution(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    #[serde(default = "default_comparison_step")]
    pub default_step: f64,

    /// Grid positions (percent of the grid) reported as statistics snapshots
    #[serde(default = "default_snapshot_percentiles")]
    pub snapshot_percentiles: Vec<f64>,
}

fn default_comparison_step() -> f64 {
    defaults::DEFAULT_COMPARISON_STEP
}
fn default_snapshot_percentiles() -> Vec<f64> {
    defaults::SNAPSHOT_PERCENTILES.to_vec()
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            default_step: default_comparison_step(),
            snapshot_percentiles: default_snapshot_percentiles(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtrapolationConfig {
    #[serde(default = "default_extrapolation_step")]
    pub default_step: f64,

    #[serde(default = "default_extrapolation_length")]
    pub default_length: f64,

    /// Trailing points used by the linear trend fit
    #[serde(default = "default_linear_trend_window")]
    pub linear_trend_window: usize,

    /// Trailing points used by the quadratic curve fit
    #[serde(default = "default_curve_fit_window")]
    pub curve_fit_window: usize,
}

fn default_extrapolation_step() -> f64 {
    defaults::DEFAULT_EXTRAPOLATION_STEP
}
fn default_extrapolation_length() -> f64 {
    defaults::DEFAULT_EXTRAPOLATION_LENGTH
}
fn default_linear_trend_window() -> usize {
    defaults::LINEAR_TREND_WINDOW
}
fn default_curve_fit_window() -> usize {
    defaults::CURVE_FIT_WINDOW
}

impl Default for ExtrapolationConfig {
    fn default() -> Self {
        Self {
            default_step: default_extrapolation_step(),
            default_length: default_extrapolation_length(),
            linear_trend_window: default_linear_trend_window(),
            curve_fit_window: default_curve_fit_window(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentConfig {
    /// Recalculate Inc/Azi from the adjusted path on every apply
    #[serde(default = "default_recalculate_angles")]
    pub recalculate_angles: bool,

    /// Location of the sled adjustment store
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_recalculate_angles() -> bool {
    true
}
fn default_db_path() -> String {
    defaults::DEFAULT_ADJUSTMENT_DB_PATH.to_string()
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            recalculate_angles: default_recalculate_angles(),
            db_path: default_db_path(),
        }
    }
}
