//! Application types for CLI commands.

use std::path::PathBuf;

use crate::cli::{Dialect, Format};

/// Parameters for the check command.
///
/// Values left `None` fall back to the loaded configuration.
///
/// # Example
///
/// ```
/// use sql_review::{app::CheckParams, cli::Format};
///
/// let params = CheckParams {
///     file_path:     "migration.sql".into(),
///     dialect:       None,
///     policy_path:   Some("policy.yaml".into()),
///     catalog_path:  None,
///     timeout_ms:    None,
///     output_format: Format::Text,
///     verbose:       false,
///     no_color:      false
/// };
/// assert!(params.dialect.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct CheckParams {
    /// SQL file, or "-" for stdin
    pub file_path:     PathBuf,
    pub dialect:       Option<Dialect>,
    pub policy_path:   Option<PathBuf>,
    pub catalog_path:  Option<PathBuf>,
    pub timeout_ms:    Option<u64>,
    pub output_format: Format,
    pub verbose:       bool,
    pub no_color:      bool
}

/// Rendered outcome of a command.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub exit_code: i32,
    pub output:    String
}
