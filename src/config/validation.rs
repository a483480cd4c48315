//! Config validation: unknown-key detection with Levenshtein suggestions
//! and suspicious-value warnings.
//!
//! The raw TOML is first parsed into `toml::Value` and its key tree compared
//! against the known field names, then deserialized normally. Warnings never
//! break an existing config.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " — did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path of `EngineConfig`.
///
/// Kept in step with the section structs in engine_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [geometry]
        "geometry",
        "geometry.course_length",
        // [interpolation]
        "interpolation",
        "interpolation.default_resolution",
        // [comparison]
        "comparison",
        "comparison.default_step",
        "comparison.snapshot_percentiles",
        // [extrapolation]
        "extrapolation",
        "extrapolation.default_step",
        "extrapolation.default_length",
        "extrapolation.linear_trend_window",
        "extrapolation.curve_fit_window",
        // [adjustment]
        "adjustment",
        "adjustment.recalculate_angles",
        "adjustment.db_path",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Dotted paths of every key in a parsed config, tables before their fields.
pub fn config_key_paths(value: &toml::Value) -> Vec<String> {
    let mut paths = Vec::new();
    if let Some(table) = value.as_table() {
        push_key_paths(table, None, &mut paths);
    }
    paths
}

fn push_key_paths(table: &toml::value::Table, parent: Option<&str>, out: &mut Vec<String>) {
    for (name, child) in table {
        let path = parent.map_or_else(|| name.clone(), |p| format!("{p}.{name}"));
        out.push(path.clone());
        if let toml::Value::Table(inner) = child {
            push_key_paths(inner, Some(&path), out);
        }
    }
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Closest known key within edit distance 3, if any.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, dist)| dist <= 3)
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Warnings for every key in `raw_toml` that `EngineConfig` does not know.
///
/// Parse errors yield no warnings here; serde reports them afterwards.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };

    let known = known_config_keys();
    config_key_paths(&value)
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Suspicious Values
// ============================================================================

/// Values that are legal but unusual enough to deserve a warning.
pub fn validate_suspicious_values(config: &super::EngineConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let cl = config.geometry.course_length;
    if cl.is_finite() && (cl - 30.0).abs() > f64::EPSILON && (cl - 100.0).abs() > f64::EPSILON {
        warnings.push(ValidationWarning {
            field: "geometry.course_length".to_string(),
            message: format!(
                "geometry.course_length = {cl} is unusual (DLS is normally quoted per 30 or per 100 units)"
            ),
            suggestion: None,
        });
    }

    let e = &config.extrapolation;
    if e.curve_fit_window < e.linear_trend_window {
        warnings.push(ValidationWarning {
            field: "extrapolation.curve_fit_window".to_string(),
            message: format!(
                "extrapolation.curve_fit_window ({}) is smaller than linear_trend_window ({})",
                e.curve_fit_window, e.linear_trend_window
            ),
            suggestion: None,
        });
    }

    warnings
}
