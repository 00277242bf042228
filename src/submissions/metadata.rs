//! Sidecar metadata declared next to a submission executable.
//!
//! A submission may ship a `<stem>.yaml` (or `.yml`) file declaring its
//! display name. Only a flat `key: value` subset of YAML is understood,
//! parsed by hand; comments are supported, but anchors, nesting, and
//! multi-line strings are not. Unknown keys are ignored so course staff can
//! stash extra fields without breaking conversion.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

/// Recognized display-name keys, in priority order. The first key with a
/// non-empty value wins.
pub const NAME_KEYS: &[&str] = &["player_name", "team_name"];

/// Locate the sidecar for a submission executable, if one exists.
pub fn sidecar_path(submission: &Path) -> Option<PathBuf> {
    for ext in ["yaml", "yml"] {
        let candidate = submission.with_extension(ext);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Read the declared display name for `submission`, if any.
///
/// `Ok(None)` covers both "no sidecar" and "sidecar has no non-empty name
/// key". A malformed sidecar is an error; the caller decides whether that
/// dooms the submission (it should not — the name falls back instead).
pub fn declared_name(submission: &Path) -> anyhow::Result<Option<String>> {
    let Some(sidecar) = sidecar_path(submission) else {
        return Ok(None);
    };
    let text = std::fs::read_to_string(&sidecar)
        .with_context(|| format!("can't read {}", sidecar.display()))?;
    let pairs = parse_sidecar(&text)
        .with_context(|| format!("malformed sidecar {}", sidecar.display()))?;
    Ok(pick_name(&pairs))
}

/// First non-empty value among [`NAME_KEYS`].
pub fn pick_name(pairs: &HashMap<String, String>) -> Option<String> {
    NAME_KEYS
        .iter()
        .filter_map(|key| pairs.get(*key))
        .find(|value| !value.is_empty())
        .cloned()
}

/// Parse the flat `key: value` sidecar format.
pub fn parse_sidecar(text: &str) -> anyhow::Result<HashMap<String, String>> {
    let mut pairs = HashMap::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some(colon_pos) = line.find(':') else {
            bail!("line {}: expected 'key: value'", i + 1);
        };
        let key = line[..colon_pos].trim();
        if key.is_empty() {
            bail!("line {}: missing key before ':'", i + 1);
        }
        let mut value = line[colon_pos + 1..].trim();

        // Values may be double-quoted; strip one matching pair of quotes
        if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            value = &value[1..value.len() - 1];
        }

        pairs.insert(key.to_owned(), value.to_owned());
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_pairs_with_comments() {
        let pairs = parse_sidecar(
            "# contest metadata\n\
             player_name: \"The Bacon Rollers\"\n\
             \n\
             section: 12\n",
        )
        .unwrap();
        assert_eq!(pairs["player_name"], "The Bacon Rollers");
        assert_eq!(pairs["section"], "12");
    }

    #[test]
    fn unquoted_values_are_fine() {
        let pairs = parse_sidecar("team_name: Oski\n").unwrap();
        assert_eq!(pairs["team_name"], "Oski");
    }

    #[test]
    fn player_name_outranks_team_name() {
        let pairs = parse_sidecar("team_name: \"B\"\nplayer_name: \"A\"\n").unwrap();
        assert_eq!(pick_name(&pairs), Some("A".to_owned()));
    }

    #[test]
    fn empty_player_name_falls_through_to_team_name() {
        let pairs = parse_sidecar("player_name: \"\"\nteam_name: \"B\"\n").unwrap();
        assert_eq!(pick_name(&pairs), Some("B".to_owned()));
    }

    #[test]
    fn no_recognized_key_means_no_name() {
        let pairs = parse_sidecar("email: oski@berkeley.edu\n").unwrap();
        assert_eq!(pick_name(&pairs), None);
    }

    #[test]
    fn rejects_lines_without_colon() {
        assert!(parse_sidecar("just some text\n").is_err());
    }

    #[test]
    fn sidecar_lookup_matches_stem() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("team_a");
        std::fs::write(&exe, "").unwrap();
        assert_eq!(sidecar_path(&exe), None);

        let yml = dir.path().join("team_a.yml");
        std::fs::write(&yml, "player_name: x\n").unwrap();
        assert_eq!(sidecar_path(&exe), Some(yml));
    }
}
