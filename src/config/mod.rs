//! Engine Configuration Module
//!
//! Operator-tunable defaults for the survey engine loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `WELLPATH_CONFIG` environment variable (path to TOML file)
//! 2. `wellpath.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! ```ignore
//! // In main():
//! config::init(EngineConfig::load());
//!
//! // Anywhere in the codebase:
//! let course_length = config::get().geometry.course_length;
//! ```

mod engine_config;
pub mod defaults;
pub mod validation;

pub use engine_config::*;

use std::sync::OnceLock;

/// Global engine configuration, initialized once at startup.
static ENGINE_CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Initialize the global engine configuration.
///
/// Later calls are ignored with a warning; the first configuration wins.
pub fn init(config: EngineConfig) {
    if ENGINE_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// Get a reference to the global engine configuration.
///
/// Falls back to built-in defaults when `init()` was never called, so the
/// library works without any startup step.
pub fn get() -> &'static EngineConfig {
    ENGINE_CONFIG.get_or_init(EngineConfig::default)
}

/// Check whether the config has been set (explicitly or by fallback).
pub fn is_initialized() -> bool {
    ENGINE_CONFIG.get().is_some()
}
