//! Shared data structures for the directional survey engine
//!
//! - Survey input: StationSeries, TieOn, Location (consumed from collaborators)
//! - CalculatedTrajectory (trajectory calculator output)
//! - ComparisonResult (alignment & delta engine output)
//! - InterpolatedTrajectory, ExtrapolationResult (resampling outputs)
//! - AdjustmentRecord, AdjustmentState (adjustment history)

mod adjustment;
mod comparison;
mod resampling;
mod survey;
mod trajectory;

pub use adjustment::*;
pub use comparison::*;
pub use resampling::*;
pub use survey::*;
pub use trajectory::*;
