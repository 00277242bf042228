//! The wire side of a submission.
//!
//! A strategy runs as a child process with piped stdio. On startup it must
//! print the fixed [`GREETING`] line; afterwards the host writes one
//! `"<score> <opponent_score>"` line per game state and reads back one line
//! containing the chosen roll count. Interpreting (and distrusting) the
//! answer is the converter's job; this module only moves lines across the
//! pipe and knows how to terminate the process.

use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::{Arc, Mutex};

use tracing::trace;

/// Greeting line every strategy must print before answering queries.
pub const GREETING: &str = "hog-strategy-1";

/// A running strategy and the two pipes used to talk to it.
pub struct StrategyProcess {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Shared handle used to terminate a running strategy from another thread.
///
/// The converter's worker thread installs the child here right after spawn;
/// the thread enforcing the deadline calls [`kill`](KillHandle::kill) when
/// the budget elapses. Killing before the install has happened is safe: the
/// child is terminated as soon as it is installed.
#[derive(Clone, Default)]
pub struct KillHandle {
    inner: Arc<Mutex<KillState>>,
}

#[derive(Default)]
struct KillState {
    child: Option<Child>,
    killed: bool,
}

impl KillHandle {
    /// Create a handle with no process attached yet.
    pub fn new() -> Self {
        Self::default()
    }

    fn install(&self, mut child: Child) {
        let mut state = self.inner.lock().expect("poisoned");
        if state.killed {
            // deadline already fired while we were spawning
            let _ = child.kill();
            let _ = child.wait();
        } else {
            state.child = Some(child);
        }
    }

    /// Kill and reap the attached process, if any. Idempotent.
    pub fn kill(&self) {
        let mut state = self.inner.lock().expect("poisoned");
        state.killed = true;
        if let Some(mut child) = state.child.take() {
            trace!("killing strategy process {}", child.id());
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl StrategyProcess {
    /// Spawn the executable at `path` with piped stdio and attach the child
    /// to `handle` for later termination.
    pub fn spawn(path: &Path, handle: &KillHandle) -> io::Result<StrategyProcess> {
        // `Command` would resolve a bare file name through PATH
        let path = if path.parent() == Some(Path::new("")) {
            Path::new(".").join(path)
        } else {
            path.to_path_buf()
        };

        let mut child = Command::new(&path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdin = child.stdin.take().expect("stdin was piped");
        let stdout = child.stdout.take().expect("stdout was piped");
        handle.install(child);

        Ok(StrategyProcess {
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    /// Read the greeting line. `Ok(None)` means the process closed stdout
    /// without announcing itself.
    pub fn read_greeting(&mut self) -> io::Result<Option<String>> {
        self.read_answer()
    }

    /// Send one `(score, opponent_score)` query and read the answer line.
    /// `Ok(None)` means the process is gone.
    pub fn query(&mut self, score: usize, opponent_score: usize) -> io::Result<Option<String>> {
        writeln!(self.stdin, "{score} {opponent_score}")?;
        self.read_answer()
    }

    fn read_answer(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let n = self.stdout.read_line(&mut line)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }
}
