//! # Hog Contest
//!
//! Batch tooling for running a classroom contest around the dice game Hog:
//! collect student-submitted strategy programs, convert each one into a
//! normalized lookup-table artifact, hand the artifacts to an external
//! tournament runner, and render the resulting rankings into an HTML page.
//!
//! It provides:
//! - Submission discovery and conversion (`BatchConverter`)
//! - Per-submission isolation: each strategy runs as its own OS process,
//!   under a wall-clock budget, and a broken submission never aborts the batch
//! - Artifact serialization in the runner's `.strat` matrix format, or as a
//!   ready-to-evaluate code stub
//! - Glue for invoking the tournament runner and rendering its results
//!   ([`tournament`], [`report`])
//!
//! # Documentation Overview
//!
//! - For the conversion pipeline and its failure modes, see the [`converter`]
//!   module.
//! - For configuring timeouts, output format, and degradation policy, see
//!   [`Configuration`](crate::configuration::Configuration).
//! - For what a submission must look like on disk and on the wire, see
//!   [`submissions`] and [`strategy_process`].
//!
//! # Usage Example
//!
//! ```no_run
//! use hog_contest::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Configuration::new().with_timeout(std::time::Duration::from_secs(45));
//!
//!     let batch = BatchConverter::new(config, "strat");
//!     let summary = batch.run(&["submissions".into()]);
//!
//!     println!("converted {} strategies", summary.converted);
//!     for team in &summary.unnamed {
//!         println!("WARNING: {team} did not declare a team name");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Example Submission
//!
//! A submission is any executable speaking the strategy protocol on
//! stdin/stdout. The host reads one greeting line, then sends one
//! `"<score> <opponent_score>"` query per game state and expects one integer
//! roll count per answer. A complete (if unambitious) submission:
//!
//! ```sh
//! #!/bin/sh
//! echo hog-strategy-1
//! while read score opponent_score; do
//!     echo 4
//! done
//! ```
//!
//! A sidecar `<name>.yaml` next to the executable may declare the team's
//! display name:
//!
//! ```yaml
//! player_name: "The Bacon Rollers"
//! ```
//!
//! ## Submission Requirements
//!
//! - The greeting line must be exactly [`strategy_process::GREETING`]
//! - Answers must be integers in `[MIN_ROLLS, MAX_ROLLS]`; anything else is
//!   replaced with [`ERROR_DEFAULT_ROLL`] and reported
//! - The whole conversion (startup plus all `GOAL`×`GOAL` queries) must fit
//!   in the configured time budget, 45 seconds by default
#![warn(missing_docs)]

pub mod artifact;
pub mod batch;
pub mod configuration;
pub mod converter;
mod error;
mod logger;
pub mod name_registry;
pub mod report;
pub mod strategy_process;
pub mod submissions;
pub mod tournament;

pub use error::ConvertError;

/// Goal score for Hog; bounds the (score, opponent score) state space.
pub const GOAL: usize = 100;

/// Smallest legal roll count a strategy may answer.
pub const MIN_ROLLS: i64 = 0;

/// Largest legal roll count a strategy may answer.
pub const MAX_ROLLS: i64 = 10;

/// Roll count substituted when a strategy errors or answers something invalid.
pub const ERROR_DEFAULT_ROLL: u8 = 5;

/// Commonly used types for quick access.
///
/// ```rust
/// use hog_contest::prelude::*;
/// ```
pub mod prelude {
    pub use crate::artifact::OutputFormat;
    pub use crate::batch::{BatchConverter, BatchSummary};
    pub use crate::configuration::Configuration;
    pub use crate::ConvertError;
    pub use crate::report::TournamentResults;
    pub use crate::tournament::TournamentRunner;
}
