//! Submission discovery.
//!
//! The converter accepts individual file paths and directory paths.
//! Directories are scanned non-recursively for eligible submission files;
//! recursing into subdirectories is the caller's concern. An eligible file
//! is a regular, executable, non-hidden file that is not a metadata sidecar
//! or a previously produced artifact.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

pub mod metadata;

/// Extensions that are never submissions: sidecars and converter output.
const SKIP_EXTENSIONS: &[&str] = &["yaml", "yml", "strat"];

/// Scan `dir` (non-recursively) for eligible submission files, sorted by
/// file name so batch processing order is reproducible.
pub fn scan_directory(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("can't read directory {}", dir.display()))?;

    let mut found: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_eligible(path))
        .collect();
    found.sort();

    debug!(directory = %dir.display(), submissions = found.len());
    Ok(found)
}

/// Whether `path` looks like a submission this converter should attempt.
pub fn is_eligible(path: &Path) -> bool {
    let Ok(meta) = path.metadata() else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') {
        return false;
    }
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        if SKIP_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)) {
            return false;
        }
    }
    is_executable(&meta)
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &std::fs::Metadata) -> bool {
    true
}

/// Name derived from the submission's location: its file stem, falling back
/// to the parent directory name. `None` when neither yields usable text.
pub fn derived_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            path.parent()
                .and_then(|p| p.file_name())
                .and_then(|s| s.to_str())
                .filter(|s| !s.is_empty())
        })
        .map(str::to_owned)
}
