//! Invocation of the external tournament runner.
//!
//! The runner (the course uses `bacon`) is an opaque binary: it imports
//! `.strat` artifacts, plays them against each other on a number of
//! threads, and writes a results text file. This module only builds its
//! command lines and checks its exit statuses; match simulation and
//! ranking stay entirely on the runner's side of the fence.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context};
use tracing::{debug, error, info, warn};

/// Handle on the external runner binary.
pub struct TournamentRunner {
    binary: PathBuf,
    threads: usize,
}

impl TournamentRunner {
    /// Use the runner at `binary`, defaulting the thread count to the
    /// number of physical CPUs.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        TournamentRunner {
            binary: binary.into(),
            threads: num_cpus::get_physical(),
        }
    }

    /// Override the number of worker threads the runner may use.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Import `artifacts` and run the tournament, writing results to
    /// `results_path`.
    ///
    /// Previously imported strategies are cleared first; that step is
    /// allowed to fail (nothing to clear on a fresh install).
    pub fn run(&self, artifacts: &[PathBuf], results_path: &Path) -> anyhow::Result<()> {
        if artifacts.is_empty() {
            bail!("no artifacts to import");
        }

        if let Err(e) = self.invoke(&clear_args()) {
            warn!("could not clear imported strategies: {e:#}");
        }
        self.invoke(&import_args(artifacts))
            .context("importing strategies")?;
        self.invoke(&tournament_args(self.threads, results_path))
            .context("running tournament")?;

        info!("tournament results written to {}", results_path.display());
        Ok(())
    }

    fn invoke(&self, args: &[OsString]) -> anyhow::Result<()> {
        debug!(runner = %self.binary.display(), ?args);
        let proc = Command::new(&self.binary)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("could not launch runner {}", self.binary.display()))?;

        let output = proc
            .wait_with_output()
            .context("failed to wait for runner")?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            error!("runner error: {stderr}");
            bail!(
                "runner exited with {}: {}",
                output.status,
                stderr.lines().next().unwrap_or_default(),
            );
        }
    }
}

fn clear_args() -> Vec<OsString> {
    vec!["-rm".into(), "all".into()]
}

fn import_args(artifacts: &[PathBuf]) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-i".into(), "-f".into()];
    args.extend(artifacts.iter().map(|p| p.as_os_str().to_owned()));
    args
}

fn tournament_args(threads: usize, results_path: &Path) -> Vec<OsString> {
    vec![
        "-t".into(),
        threads.to_string().into(),
        "-f".into(),
        results_path.as_os_str().to_owned(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_lists_every_artifact() {
        let artifacts = vec![PathBuf::from("strat/a.strat"), PathBuf::from("strat/b.strat")];
        let args = import_args(&artifacts);
        assert_eq!(
            args,
            ["-i", "-f", "strat/a.strat", "strat/b.strat"]
                .map(OsString::from)
                .to_vec()
        );
    }

    #[test]
    fn tournament_carries_threads_and_output() {
        let args = tournament_args(4, Path::new("results.txt"));
        assert_eq!(args, ["-t", "4", "-f", "results.txt"].map(OsString::from).to_vec());
    }
}
