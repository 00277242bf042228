//! Display-name bookkeeping shared across one batch run.
//!
//! The registry is owned by the batch driver and handed to each conversion,
//! so the converter itself stays free of global state. It guarantees that
//! every artifact written in a batch gets a unique file stem: colliding
//! names receive a `_N` suffix, where `N` is the number of earlier
//! submissions that sanitized to the same stem. It also accumulates the
//! submissions that never declared a team name, for the end-of-batch
//! summary warning.

use std::collections::HashMap;

use rand::Rng;
use tracing::warn;

/// Characters that are unsafe in a file name and are stripped outright.
const UNSAFE_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|', '\r', '\n'];

/// Length of the random identifier substituted when sanitization fails.
const FALLBACK_LEN: usize = 12;

/// Map from sanitized file stem to occurrence count, plus the list of
/// submissions that fell back to a placeholder name.
#[derive(Debug, Default)]
pub struct NameRegistry {
    counts: HashMap<String, usize>,
    unnamed: Vec<String>,
}

impl NameRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sanitized file stem, disambiguating against earlier
    /// submissions. Returns the final `(file_stem, label)` pair; on a
    /// collision both carry a `_N` suffix.
    ///
    /// The lookup and the counter update happen together, so two
    /// submissions sanitizing to the same stem can never both believe they
    /// are first.
    pub fn register(&mut self, stem: String, label: String) -> (String, String) {
        match self.counts.get_mut(&stem) {
            Some(count) => {
                let suffixed_stem = format!("{stem}_{count}");
                let suffixed_label = format!("{label}_{count}");
                *count += 1;
                warn!(
                    "found multiple teams with name {stem}; writing to {suffixed_stem} \
                     instead to disambiguate"
                );
                (suffixed_stem, suffixed_label)
            }
            None => {
                self.counts.insert(stem.clone(), 1);
                (stem, label)
            }
        }
    }

    /// Remember a submission that did not declare a team name.
    pub fn record_unnamed(&mut self, ident: impl Into<String>) {
        self.unnamed.push(ident.into());
    }

    /// Submissions recorded so far as unnamed, in processing order.
    pub fn unnamed(&self) -> &[String] {
        &self.unnamed
    }

    /// Consume the registry, keeping only the unnamed list.
    pub fn into_unnamed(self) -> Vec<String> {
        self.unnamed
    }
}

/// Make a display name safe for use as a file stem.
///
/// Non-ASCII characters are dropped and [`UNSAFE_CHARS`] stripped. Returns
/// `None` when nothing survives, in which case the caller substitutes a
/// [`random_fallback`] identifier.
pub fn sanitize(name: &str) -> Option<String> {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii() && !UNSAFE_CHARS.contains(c))
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Truncate `name` to `max_len` characters with a `...` marker.
///
/// Returns `None` when no truncation is needed or the limit is disabled
/// (`max_len == 0`).
pub fn truncate(name: &str, max_len: usize) -> Option<String> {
    if max_len == 0 || name.chars().count() <= max_len {
        return None;
    }
    let mut cut: String = name.chars().take(max_len.saturating_sub(3)).collect();
    cut.push_str("...");
    Some(cut)
}

/// Random uppercase-alphanumeric identifier used when a name cannot be
/// sanitized at all.
pub fn random_fallback() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    (0..FALLBACK_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
