//! wellpath - Directional Survey Engine CLI
//!
//! Thin command-line front end over the `wellpath` library. Inputs and
//! outputs are JSON.
//!
//! # Usage
//!
//! ```bash
//! # Position a survey, vertical section along the bottom-hole closure
//! wellpath calculate --input survey.json --bhc
//!
//! # Compare two surveys every 10 ft over their common MD range
//! wellpath compare --primary mwd.json --reference gyro.json --step 10
//!
//! # Project 200 ft ahead following the recent build/turn trend
//! wellpath extrapolate --input survey.json --length 200 --method linear-trend
//!
//! # Shift 1000-1500 ft 3 ft east, then undo it
//! wellpath adjust apply --trajectory W1 --start-md 1000 --end-md 1500 --dx 3
//! wellpath adjust undo --trajectory W1
//! ```
//!
//! # Environment Variables
//!
//! - `WELLPATH_CONFIG`: Path to the engine config TOML (default: ./wellpath.toml)
//! - `WELLPATH_DB`: Adjustment store directory (default from config)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use wellpath::config::{self, EngineConfig};
use wellpath::types::{MdWindow, Offset};
use wellpath::{
    AdjustmentHistory, AdjustmentStore, CalculatedTrajectory, ExtrapolationMethod, SurveyInput,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "wellpath")]
#[command(about = "Directional survey calculation, comparison and adjustment")]
#[command(version)]
struct CliArgs {
    /// Engine config TOML (overrides WELLPATH_CONFIG and ./wellpath.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Write the JSON result here instead of stdout
    #[arg(short, long, global = true, value_name = "PATH")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Position a survey with minimum curvature
    Calculate {
        #[arg(short, long)]
        input: PathBuf,
        /// Use the two-pass bottom-hole-closure vertical-section azimuth
        #[arg(long, conflicts_with = "vsa")]
        bhc: bool,
        /// Vertical-section azimuth in degrees (default: tie-on azimuth)
        #[arg(long)]
        vsa: Option<f64>,
    },

    /// Compare two surveys over their overlapping MD range
    Compare {
        #[arg(long)]
        primary: PathBuf,
        #[arg(long)]
        reference: PathBuf,
        /// Grid step in MD units (default from config)
        #[arg(long)]
        step: Option<f64>,
    },

    /// Resample a survey at a fixed MD resolution
    Interpolate {
        #[arg(short, long)]
        input: PathBuf,
        /// MD resolution (default from config)
        #[arg(long)]
        resolution: Option<f64>,
        #[arg(long)]
        start_md: Option<f64>,
        #[arg(long)]
        end_md: Option<f64>,
        /// Carry the bottom-hole-closure azimuth into the resampled path
        #[arg(long, conflicts_with = "vsa")]
        bhc: bool,
        #[arg(long)]
        vsa: Option<f64>,
    },

    /// Project a survey beyond its last station
    Extrapolate {
        #[arg(short, long)]
        input: PathBuf,
        /// Projection length (default from config)
        #[arg(long)]
        length: Option<f64>,
        /// Projection step (default from config)
        #[arg(long)]
        step: Option<f64>,
        /// constant, linear-trend or curve-fit
        #[arg(long, default_value = "constant")]
        method: ExtrapolationMethod,
    },

    /// Manual offsets with undo/redo
    Adjust {
        /// Adjustment store directory (default from config)
        #[arg(long, env = "WELLPATH_DB", global = true)]
        db: Option<PathBuf>,

        #[command(subcommand)]
        action: AdjustAction,
    },

    /// Configuration utilities
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum AdjustAction {
    /// Start a history for a trajectory from a survey file
    Init {
        #[arg(long)]
        trajectory: String,
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Offset stations in [start-md, end-md]
    Apply {
        #[arg(long)]
        trajectory: String,
        #[arg(long)]
        start_md: f64,
        #[arg(long)]
        end_md: f64,
        /// Easting offset
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dx: f64,
        /// Northing offset
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dy: f64,
        /// TVD offset
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        dz: f64,
        /// Skip inclination/azimuth recalculation
        #[arg(long)]
        no_angles: bool,
    },
    Undo {
        #[arg(long)]
        trajectory: String,
    },
    Redo {
        #[arg(long)]
        trajectory: String,
    },
    /// Discard every adjustment
    Reset {
        #[arg(long)]
        trajectory: String,
    },
    /// Print the active adjusted path
    Show {
        #[arg(long)]
        trajectory: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Validate a config file and report warnings
    Check {
        #[arg(long, default_value = "wellpath.toml")]
        path: PathBuf,
    },
    /// Print the built-in defaults as TOML
    Defaults,
}

// ============================================================================
// I/O helpers
// ============================================================================

fn read_survey(path: &Path) -> Result<SurveyInput> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read survey file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid survey JSON in {}", path.display()))
}

fn calculate_survey(path: &Path, bhc: bool, vsa: Option<f64>) -> Result<CalculatedTrajectory> {
    let input = read_survey(path)?;
    let calc = if bhc {
        wellpath::calculate_bhc(&input)
    } else {
        wellpath::calculate(&input, vsa)
    };
    calc.with_context(|| format!("Trajectory calculation failed for {}", path.display()))
}

fn emit<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Result written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => Ok(EngineConfig::load()),
    }
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_adjust(db: Option<PathBuf>, action: AdjustAction, output: Option<&Path>) -> Result<()> {
    let cfg = config::get();
    let db_path = db.unwrap_or_else(|| PathBuf::from(&cfg.adjustment.db_path));
    let store = AdjustmentStore::open(&db_path)
        .with_context(|| format!("Failed to open adjustment store {}", db_path.display()))?;

    let state = match action {
        AdjustAction::Init { trajectory, input } => {
            let calc = calculate_survey(&input, false, None)?;
            let history = AdjustmentHistory::from_trajectory(&calc)?;
            store.init(&trajectory, &history)?;
            info!(trajectory = %trajectory, stations = calc.len(), "Adjustment history created");
            history.current_state()
        }
        AdjustAction::Apply {
            trajectory,
            start_md,
            end_md,
            dx,
            dy,
            dz,
            no_angles,
        } => {
            let recalculate = cfg.adjustment.recalculate_angles && !no_angles;
            store.apply(
                &trajectory,
                MdWindow::new(start_md, end_md),
                Offset::new(dx, dy, dz),
                recalculate,
            )?
        }
        AdjustAction::Undo { trajectory } => store.undo(&trajectory)?,
        AdjustAction::Redo { trajectory } => store.redo(&trajectory)?,
        AdjustAction::Reset { trajectory } => store.reset(&trajectory)?,
        AdjustAction::Show { trajectory } => store.state(&trajectory)?,
    };

    store.flush()?;
    info!(sequence = state.sequence, "{}", state.message);
    emit(&state, output)
}

fn run_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Check { path } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let mut warnings = config::validation::validate_unknown_keys(&raw);
            let cfg = EngineConfig::load_from_file(&path)
                .with_context(|| format!("{} is invalid", path.display()))?;
            warnings.extend(config::validation::validate_suspicious_values(&cfg));

            if warnings.is_empty() {
                println!("{}: OK", path.display());
            } else {
                for w in &warnings {
                    println!("warning: {w}");
                }
                println!("{}: OK with {} warning(s)", path.display(), warnings.len());
            }
            Ok(())
        }
        ConfigAction::Defaults => {
            print!("{}", EngineConfig::default().to_toml()?);
            Ok(())
        }
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    if let Command::Config { action } = args.command {
        return run_config(action);
    }

    config::init(load_config(args.config.as_deref())?);
    let cfg = config::get();
    let output = args.output.as_deref();

    match args.command {
        Command::Calculate { input, bhc, vsa } => {
            let calc = calculate_survey(&input, bhc, vsa)?;
            info!(
                stations = calc.len(),
                vsa = calc.vertical_section_azimuth,
                "Trajectory calculated"
            );
            emit(&calc, output)
        }
        Command::Compare {
            primary,
            reference,
            step,
        } => {
            let a = calculate_survey(&primary, false, None)?;
            let b = calculate_survey(&reference, false, None)?;
            let result = wellpath::compare(&a, &b, step.unwrap_or(cfg.comparison.default_step))
                .context("Comparison failed")?;
            info!(
                points = result.len(),
                max_horizontal = result.statistics.delta_horizontal.max,
                "Comparison complete"
            );
            emit(&result, output)
        }
        Command::Interpolate {
            input,
            resolution,
            start_md,
            end_md,
            bhc,
            vsa,
        } => {
            let calc = calculate_survey(&input, bhc, None)?;
            let result = wellpath::interpolate(
                &calc,
                resolution.unwrap_or(cfg.interpolation.default_resolution),
                start_md,
                end_md,
                vsa,
            )
            .context("Interpolation failed")?;
            info!(points = result.point_count, "Interpolation complete");
            emit(&result, output)
        }
        Command::Extrapolate {
            input,
            length,
            step,
            method,
        } => {
            let survey = read_survey(&input)?;
            let result = wellpath::extrapolate(
                &survey,
                length.unwrap_or(cfg.extrapolation.default_length),
                step.unwrap_or(cfg.extrapolation.default_step),
                method,
            )
            .context("Extrapolation failed")?;
            info!(
                projected = result.extrapolated_point_count,
                final_md = result.final_point.md,
                "Extrapolation complete"
            );
            emit(&result, output)
        }
        Command::Adjust { db, action } => run_adjust(db, action, output),
        Command::Config { .. } => bail!("config subcommand already handled"),
    }
}
