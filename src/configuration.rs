//! Config for the converter behaviors
//!
//! This module provides configuration options for controlling how submissions
//! are converted.
//!
//! Configuration can be created programmatically using [`Configuration::new()`]
//! or by reading environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! The following environment variables can be used to override configuration
//! values. All values are optional. Set flag values to `"true"` to enable.
//!
//! - `HOGCONV_VERBOSE` — Print per-submission progress to stdout (default: `true`)
//! - `HOGCONV_LOG` — Enable logging to a file (default: `false`)
//! - `HOGCONV_SHORT_CIRCUIT` — Stop querying a strategy after its first
//!   invalid answer and default the remaining cells (default: `false`)
//! - `HOGCONV_CODE_STUB` — Emit code-stub artifacts instead of `.strat`
//!   matrices (default: `false`)
//! - `HOGCONV_TIMEOUT_SECS` (u64) — Per-submission conversion budget in
//!   seconds (default: `45`)
//! - `HOGCONV_NAME_MAX_LEN` (usize) — Maximum display-name length, `0` to
//!   remove the limit (default: `100`)

use std::env;
use std::time::Duration;

use crate::artifact::OutputFormat;

/// Per-submission wall-clock budget applied by default.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(45);

/// Default maximum length for team display names (`0` disables the limit).
pub const DEFAULT_NAME_MAX_LEN: usize = 100;

/// Configuration for converter behaviors.
#[derive(Debug, Clone, Copy)]
pub struct Configuration {
    pub(crate) verbose: bool,
    pub(crate) log: bool,
    pub(crate) short_circuit_invalid: bool,
    pub(crate) output_format: OutputFormat,
    pub(crate) timeout: Duration,
    pub(crate) name_max_len: usize,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - Per-submission progress is printed to stdout.
    /// - Logging to file is disabled.
    /// - Every cell is queried even after an invalid answer.
    /// - Artifacts are written in the `.strat` matrix format.
    /// - Each submission gets 45 seconds of wall-clock time.
    /// - Display names longer than 100 characters are truncated.
    pub fn new() -> Self {
        Self {
            verbose: true,
            log: false,
            short_circuit_invalid: false,
            output_format: OutputFormat::Strat,
            timeout: DEFAULT_TIMEOUT,
            name_max_len: DEFAULT_NAME_MAX_LEN,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// See the module documentation for the recognized variables. Any other
    /// value (including unset) results in the default for that field.
    pub fn from_env() -> Self {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        fn parse_u64(var: &str) -> Option<u64> {
            env::var(var).ok()?.parse().ok()
        }

        let defaults = Self::new();
        let format = if get_env_flag("HOGCONV_CODE_STUB", false) {
            OutputFormat::CodeStub
        } else {
            OutputFormat::Strat
        };

        Self {
            verbose: get_env_flag("HOGCONV_VERBOSE", true),
            log: get_env_flag("HOGCONV_LOG", false),
            short_circuit_invalid: get_env_flag("HOGCONV_SHORT_CIRCUIT", false),
            output_format: format,
            timeout: parse_u64("HOGCONV_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            name_max_len: parse_u64("HOGCONV_NAME_MAX_LEN")
                .map(|n| n as usize)
                .unwrap_or(defaults.name_max_len),
        }
    }

    /// Enable or disable per-submission progress output.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Enable or disable the short-circuit degradation policy.
    ///
    /// When enabled, the first invalid answer from a strategy stops all
    /// further queries for that submission and defaults the remaining cells.
    /// When disabled, every cell is queried independently.
    pub fn with_short_circuit_invalid(mut self, value: bool) -> Self {
        self.short_circuit_invalid = value;
        self
    }

    /// Select the artifact output format.
    pub fn with_output_format(mut self, value: OutputFormat) -> Self {
        self.output_format = value;
        self
    }

    /// Set the wall-clock budget for one submission's whole conversion
    /// (process startup plus the full grid of queries).
    pub fn with_timeout(mut self, value: Duration) -> Self {
        self.timeout = value;
        self
    }

    /// Set the maximum display-name length. `0` removes the limit.
    pub fn with_name_max_len(mut self, value: usize) -> Self {
        self.name_max_len = value;
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
