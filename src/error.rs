use std::path::PathBuf;

use thiserror::Error;

use crate::strategy_process::GREETING;

/// Failures that abort conversion of a single submission.
///
/// All of these are caught at the single-submission boundary by the batch
/// driver and turned into skip-and-log outcomes; none of them abort the
/// batch. Invalid answers and mid-grid crashes are not errors at this level:
/// they degrade individual cells to the default roll instead (see
/// [`crate::converter::ConversionOutcome`]).
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The submission could not be started at all.
    #[error("error occurred while loading {}: {reason}, skipping", .path.display())]
    Load {
        /// Path to the submission that failed to load.
        path: PathBuf,
        /// Spawn or filesystem error text.
        reason: String,
    },

    /// The submission started but never announced itself as a strategy.
    #[error("{} did not announce a strategy (expected greeting '{GREETING}'), skipping", .path.display())]
    MissingFunction {
        /// Path to the offending submission.
        path: PathBuf,
    },

    /// The whole-submission conversion budget elapsed before the grid was
    /// fully evaluated. No artifact is written.
    #[error("conversion timed out (> {secs} s) for {}", .path.display())]
    Timeout {
        /// Path to the offending submission.
        path: PathBuf,
        /// The budget that elapsed, in seconds.
        secs: u64,
    },

    /// The artifact file could not be written.
    #[error("could not write artifact for {}: {source}", .path.display())]
    Artifact {
        /// Path to the submission whose artifact failed to write.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
}
