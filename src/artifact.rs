//! Matrix artifact serialization.
//!
//! Two on-disk renditions of the same `GOAL`×`GOAL` roll table:
//!
//! - [`OutputFormat::Strat`] — the tournament runner's import format: a
//!   `strategy <label>` header line followed by one space-delimited row of
//!   integers per own-score value.
//! - [`OutputFormat::CodeStub`] — a self-contained source stub that wraps
//!   the table in a nested list literal behind a `final_strategy` function,
//!   suitable for handing back to the submission system.
//!
//! Artifacts are written once and never mutated.

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

/// Artifact rendition selected in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Space-delimited matrix with a `strategy <label>` header.
    Strat,
    /// Generated source stub embedding the matrix as a nested list literal.
    CodeStub,
}

impl OutputFormat {
    /// File extension for artifacts in this format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Strat => "strat",
            OutputFormat::CodeStub => "py",
        }
    }
}

/// Render and write one artifact, creating `out_dir` if needed.
/// Returns the artifact path.
pub fn write_artifact(
    out_dir: &Path,
    file_stem: &str,
    label: &str,
    grid: &[Vec<u8>],
    format: OutputFormat,
) -> io::Result<PathBuf> {
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("{file_stem}.{}", format.extension()));
    let body = match format {
        OutputFormat::Strat => render_strat(label, grid),
        OutputFormat::CodeStub => render_code_stub(label, grid),
    };
    std::fs::write(&path, body)?;
    Ok(path)
}

/// Render the runner's `.strat` import format.
pub fn render_strat(label: &str, grid: &[Vec<u8>]) -> String {
    let mut out = String::with_capacity(grid.len() * grid.len() * 3 + 32);
    let _ = writeln!(out, "strategy {label}");
    for row in grid {
        for (j, rolls) in row.iter().enumerate() {
            if j > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{rolls}");
        }
        out.push('\n');
    }
    out
}

/// Render the ready-to-evaluate code stub.
pub fn render_code_stub(label: &str, grid: &[Vec<u8>]) -> String {
    let mut out = String::with_capacity(grid.len() * grid.len() * 4 + 128);
    let _ = write!(
        out,
        "PLAYER_NAME = '{label}'\ndef final_strategy(score, opponent_score):\n    return ["
    );
    for (i, row) in grid.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        out.push('[');
        for (j, rolls) in row.iter().enumerate() {
            if j > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{rolls}");
        }
        out.push(']');
    }
    out.push_str("][score][opponent_score]\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Vec<u8>> {
        vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8]]
    }

    #[test]
    fn strat_format_has_header_and_rows() {
        let text = render_strat("Oski", &grid());
        assert_eq!(text, "strategy Oski\n0 1 2\n3 4 5\n6 7 8\n");
    }

    #[test]
    fn code_stub_format_matches_template() {
        let text = render_code_stub("Oski", &grid());
        assert_eq!(
            text,
            "PLAYER_NAME = 'Oski'\n\
             def final_strategy(score, opponent_score):\n    \
             return [[0, 1, 2],\n[3, 4, 5],\n[6, 7, 8]][score][opponent_score]\n"
        );
    }

    #[test]
    fn write_creates_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested/strat");
        let path =
            write_artifact(&out_dir, "Oski", "Oski", &grid(), OutputFormat::Strat).unwrap();
        assert_eq!(path, out_dir.join("Oski.strat"));
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("strategy Oski\n"));
    }

    #[test]
    fn extension_follows_format() {
        assert_eq!(OutputFormat::Strat.extension(), "strat");
        assert_eq!(OutputFormat::CodeStub.extension(), "py");
    }
}
