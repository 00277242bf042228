//! Batch driver: converts many submissions, isolating their failures.
//!
//! The driver owns the [`NameRegistry`] shared across the batch (so
//! collisions are resolved in processing order), expands directory
//! arguments into eligible submission files, and guarantees that one broken
//! submission never aborts the rest of the run.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use tracing::error;

use crate::configuration::Configuration;
use crate::converter;
use crate::logger::init_logger;
use crate::name_registry::NameRegistry;
use crate::submissions;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// End-of-batch accounting returned by [`BatchConverter::run`].
#[derive(Debug)]
pub struct BatchSummary {
    /// Number of submissions successfully converted.
    pub converted: usize,
    /// Number of submissions attempted (converted + skipped).
    pub attempted: usize,
    /// Identifiers of submissions that declared no team name.
    pub unnamed: Vec<String>,
    /// Paths of all artifacts written, in processing order.
    pub artifacts: Vec<PathBuf>,
}

/// Converts a set of submissions into artifacts, one at a time.
pub struct BatchConverter {
    config: Configuration,
    out_dir: PathBuf,
    registry: NameRegistry,
}

impl BatchConverter {
    /// Create a driver writing artifacts into `out_dir` (created on first
    /// write if absent).
    pub fn new(config: Configuration, out_dir: impl Into<PathBuf>) -> Self {
        if config.log {
            init_logger();
        }
        BatchConverter {
            config,
            out_dir: out_dir.into(),
            registry: NameRegistry::new(),
        }
    }

    /// Convert every submission reachable from `paths`.
    ///
    /// File paths are attempted directly; directory paths are scanned
    /// non-recursively for eligible submissions. Every failure is logged
    /// and skipped; the batch always runs to completion.
    pub fn run(mut self, paths: &[PathBuf]) -> BatchSummary {
        let files = self.discover(paths);

        // at least 3 dots between name and status
        let longest_name = files
            .iter()
            .filter_map(|f| f.file_name())
            .fold(0, |acu, name| acu.max(name.len()))
            + 3;

        let mut converted = 0;
        let mut artifacts = Vec::new();

        for file in &files {
            if self.config.verbose {
                let name = file.file_name().and_then(|n| n.to_str()).unwrap_or("?");
                print!("Converting {name:·<longest_name$} ");
                let _ = std::io::stdout().flush();
            }

            match converter::convert(file, &self.config, &mut self.registry, &self.out_dir) {
                Ok(outcome) => {
                    converted += 1;
                    artifacts.push(outcome.artifact_path.clone());
                    if self.config.verbose {
                        if outcome.invalid_output || outcome.runtime_errors > 0 {
                            println!("{YELLOW}Ok (degraded cells){RESET}");
                        } else {
                            println!("{GREEN}Ok{RESET}");
                        }
                    }
                }
                Err(e) => {
                    error!("{e}");
                    if self.config.verbose {
                        println!("{RED}{e}{RESET}");
                    }
                }
            }
        }

        BatchSummary {
            converted,
            attempted: files.len(),
            unnamed: self.registry.into_unnamed(),
            artifacts,
        }
    }

    fn discover(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for path in paths {
            if path.is_dir() {
                match submissions::scan_directory(path) {
                    Ok(mut found) => files.append(&mut found),
                    Err(e) => error!("{e:#}, skipping"),
                }
            } else if path.is_file() {
                files.push(path.clone());
            } else {
                error!("can't access {}, skipping", path.display());
            }
        }
        files
    }

    /// Output directory artifacts are written into.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}
