//! Core conversion of one submission into one matrix artifact.
//!
//! The pipeline for a single submission: spawn the strategy process, check
//! its greeting, evaluate the decision function over the full
//! `GOAL`×`GOAL` grid of score pairs, resolve and disambiguate the display
//! name, and serialize the artifact. The spawn-and-evaluate part runs on a
//! worker thread so the whole conversion can be raced against a wall-clock
//! budget; when the budget elapses the strategy process is killed and the
//! worker's eventual result is discarded unseen.
//!
//! Failure handling follows one rule: a bad submission costs at most its
//! own artifact. Load failures, missing greetings, and timeouts skip the
//! submission; a strategy that answers garbage or dies mid-grid still
//! produces a complete artifact with the affected cells set to
//! [`ERROR_DEFAULT_ROLL`].

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use tracing::{error, info, warn};

use crate::artifact;
use crate::configuration::Configuration;
use crate::error::ConvertError;
use crate::name_registry::{self, NameRegistry};
use crate::strategy_process::{KillHandle, StrategyProcess, GREETING};
use crate::submissions::{derived_name, metadata};
use crate::{ERROR_DEFAULT_ROLL, GOAL, MAX_ROLLS, MIN_ROLLS};

/// What one successful conversion produced.
#[derive(Debug)]
pub struct ConversionOutcome {
    /// Path of the artifact that was written.
    pub artifact_path: PathBuf,
    /// Human-readable label carried in the artifact header.
    pub label: String,
    /// Number of cells defaulted because the process died mid-grid.
    pub runtime_errors: usize,
    /// Whether any answer was rejected as invalid output.
    pub invalid_output: bool,
}

struct EvaluatedGrid {
    cells: Vec<Vec<u8>>,
    runtime_errors: usize,
    last_error: Option<String>,
    invalid: Option<String>,
}

/// Convert the submission at `path` into an artifact under `out_dir`.
///
/// The registry must be the one shared across the whole batch; it is
/// updated exactly once, after name resolution and before the artifact is
/// written.
pub fn convert(
    path: &Path,
    config: &Configuration,
    registry: &mut NameRegistry,
    out_dir: &Path,
) -> Result<ConversionOutcome, ConvertError> {
    let grid = evaluate_with_deadline(path, config)?;

    let (stem, label) = resolve_names(path, config, registry);

    if let Some(reason) = &grid.invalid {
        warn!(
            "team {label}'s strategy {reason}; affected rolls default to {ERROR_DEFAULT_ROLL}. \
             Please notify the students!"
        );
    }
    if grid.runtime_errors > 0 {
        error!(
            "{} error(s) occurred while running the strategy for {label} ({}): {}",
            grid.runtime_errors,
            path.display(),
            grid.last_error.as_deref().unwrap_or("unknown error"),
        );
    }

    let artifact_path = artifact::write_artifact(
        out_dir,
        &stem,
        &label,
        &grid.cells,
        config.output_format,
    )
    .map_err(|source| ConvertError::Artifact {
        path: path.to_path_buf(),
        source,
    })?;

    info!("converted: {label} ({})", path.display());

    Ok(ConversionOutcome {
        artifact_path,
        label,
        runtime_errors: grid.runtime_errors,
        invalid_output: grid.invalid.is_some(),
    })
}

/// Run spawn + greeting + grid evaluation on a worker thread, racing it
/// against the configured budget.
///
/// At most one outcome is consumed per submission: either the worker's
/// result arrives in time, or the deadline fires, the process is killed,
/// and the late result is dropped with the channel.
fn evaluate_with_deadline(
    path: &Path,
    config: &Configuration,
) -> Result<EvaluatedGrid, ConvertError> {
    let (tx, rx) = mpsc::channel();
    let handle = KillHandle::new();

    let worker_handle = handle.clone();
    let worker_path = path.to_path_buf();
    let short_circuit = config.short_circuit_invalid;
    thread::spawn(move || {
        let result = load_and_evaluate(&worker_path, &worker_handle, short_circuit);
        worker_handle.kill();
        let _ = tx.send(result);
    });

    match rx.recv_timeout(config.timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            handle.kill();
            Err(ConvertError::Timeout {
                path: path.to_path_buf(),
                secs: config.timeout.as_secs(),
            })
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(ConvertError::Load {
            path: path.to_path_buf(),
            reason: "conversion worker died".to_owned(),
        }),
    }
}

fn load_and_evaluate(
    path: &Path,
    handle: &KillHandle,
    short_circuit: bool,
) -> Result<EvaluatedGrid, ConvertError> {
    let mut process = StrategyProcess::spawn(path, handle).map_err(|e| ConvertError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match process.read_greeting() {
        Ok(Some(line)) if line == GREETING => {}
        Ok(_) | Err(_) => {
            return Err(ConvertError::MissingFunction {
                path: path.to_path_buf(),
            })
        }
    }

    let mut grid = EvaluatedGrid {
        cells: vec![vec![ERROR_DEFAULT_ROLL; GOAL]; GOAL],
        runtime_errors: 0,
        last_error: None,
        invalid: None,
    };

    'rows: for i in 0..GOAL {
        for j in 0..GOAL {
            if short_circuit && grid.invalid.is_some() {
                // remaining cells keep the default roll
                break 'rows;
            }
            match process.query(i, j) {
                Ok(Some(answer)) => match parse_roll(&answer) {
                    Ok(rolls) => grid.cells[i][j] = rolls,
                    Err(reason) => {
                        if grid.invalid.is_none() {
                            grid.invalid =
                                Some(format!("{reason} for (score, opponent_score) = ({i}, {j})"));
                        }
                    }
                },
                Ok(None) => {
                    mark_dead(&mut grid, i, j, "strategy process exited");
                    break 'rows;
                }
                Err(e) => {
                    mark_dead(&mut grid, i, j, &e.to_string());
                    break 'rows;
                }
            }
        }
    }

    Ok(grid)
}

/// The process stopped answering at cell `(i, j)`: every cell from here on
/// keeps the default roll and counts as a runtime error.
fn mark_dead(grid: &mut EvaluatedGrid, i: usize, j: usize, reason: &str) {
    grid.runtime_errors = GOAL * GOAL - (i * GOAL + j);
    grid.last_error = Some(format!(
        "{reason} at (score, opponent_score) = ({i}, {j})"
    ));
}

fn parse_roll(answer: &str) -> Result<u8, String> {
    let Ok(rolls) = answer.parse::<i64>() else {
        return Err(format!(
            "answered something other than an integer: {answer:?}"
        ));
    };
    if !(MIN_ROLLS..=MAX_ROLLS).contains(&rolls) {
        return Err(format!("answered an invalid number of rolls: {rolls}"));
    }
    Ok(rolls as u8)
}

fn placeholder_name(initial: char) -> String {
    format!("<no name given, starts with {initial}>")
}

/// Resolve the display name (sidecar, else derived, else placeholder),
/// truncate and sanitize it, and register it for disambiguation.
/// Returns the final `(file_stem, label)`.
fn resolve_names(
    path: &Path,
    config: &Configuration,
    registry: &mut NameRegistry,
) -> (String, String) {
    let declared = match metadata::declared_name(path) {
        Ok(name) => name,
        Err(e) => {
            warn!("{e:#}; ignoring sidecar for {}", path.display());
            None
        }
    };

    let display = match declared {
        Some(name) => name,
        None => {
            warn!(
                "submission {} has no team name, using default name",
                path.display()
            );
            match derived_name(path) {
                Some(derived) => {
                    registry.record_unnamed(derived.clone());
                    derived
                }
                None => {
                    registry.record_unnamed(path.display().to_string());
                    let initial = path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .and_then(|n| n.chars().next())
                        .unwrap_or('?');
                    placeholder_name(initial)
                }
            }
        }
    };

    let display = match name_registry::truncate(&display, config.name_max_len) {
        Some(truncated) => {
            warn!(
                "{} has a team name longer than {} chars, truncating",
                path.display(),
                config.name_max_len
            );
            truncated
        }
        None => display,
    };

    let stem = match name_registry::sanitize(&display) {
        Some(stem) => stem,
        None => {
            let fallback = name_registry::random_fallback();
            let rejected = &display;
            warn!(
                "team name {rejected:?} cannot be made filesystem-safe, \
                 substituting random identifier {fallback}"
            );
            fallback
        }
    };

    registry.register(stem, display)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roll_accepts_the_legal_range() {
        assert_eq!(parse_roll("0"), Ok(0));
        assert_eq!(parse_roll("4"), Ok(4));
        assert_eq!(parse_roll("10"), Ok(10));
    }

    #[test]
    fn parse_roll_rejects_out_of_range() {
        assert!(parse_roll("11").is_err());
        assert!(parse_roll("-1").is_err());
    }

    #[test]
    fn parse_roll_rejects_non_integers() {
        assert!(parse_roll("4.0").is_err());
        assert!(parse_roll("four").is_err());
        assert!(parse_roll("").is_err());
    }

    #[test]
    fn mark_dead_counts_every_remaining_cell() {
        let mut grid = EvaluatedGrid {
            cells: vec![vec![ERROR_DEFAULT_ROLL; GOAL]; GOAL],
            runtime_errors: 0,
            last_error: None,
            invalid: None,
        };
        mark_dead(&mut grid, 0, 5, "gone");
        assert_eq!(grid.runtime_errors, GOAL * GOAL - 5);

        mark_dead(&mut grid, GOAL - 1, GOAL - 1, "gone");
        assert_eq!(grid.runtime_errors, 1);
    }
}
