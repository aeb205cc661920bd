//! Helper functions for CLI operations.
//!
//! Reading input, picking the exit code and merging command-line values
//! with the loaded configuration.

use std::{
    fs::read_to_string,
    io::{self, Read},
    path::Path
};

use super::convert::{convert_dialect, convert_format};
use crate::{
    advisor::{Rule, Status},
    catalog::Catalog,
    cli::{self, Format},
    config::{Config, Policy},
    dialect::Dialect,
    error::{AppResult, catalog_parse_error, config_error, file_read_error},
    output::OutputOptions,
    review::ReviewResult
};

/// Exit code when the review accepts the input
pub const EXIT_ACCEPT: i32 = 0;
/// Exit code when at least one rule reported an error
pub const EXIT_REJECT: i32 = 1;
/// Exit code when the engine could not evaluate the policy
pub const EXIT_FAILURE: i32 = 2;

/// Calculates the process exit code of a completed review.
///
/// - `0` - Success or warnings only
/// - `1` - At least one error advice
/// - `2` - Some rule could not be evaluated
///
/// # Example
///
/// ```
/// use sql_review::{
///     advisor::Status,
///     app::calculate_exit_code,
///     review::ReviewResult
/// };
///
/// let result = ReviewResult {
///     advice:           Vec::new(),
///     status:           Status::Success,
///     rule_errors:      Vec::new(),
///     statements_count: 0,
///     rules_count:      0
/// };
/// assert_eq!(calculate_exit_code(&result), 0);
/// ```
pub fn calculate_exit_code(result: &ReviewResult) -> i32 {
    if !result.is_complete() {
        EXIT_FAILURE
    } else if result.status == Status::Error {
        EXIT_REJECT
    } else {
        EXIT_ACCEPT
    }
}

/// Read SQL from file or stdin ("-")
pub fn read_sql_input(path: &Path) -> AppResult<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| file_read_error("stdin", e))?;
        Ok(buffer)
    } else {
        let display = path.display().to_string();
        read_to_string(path).map_err(|e| file_read_error(&display, e))
    }
}

/// Load a catalog from DDL (`.sql`) or a serialized catalog (`.json`,
/// `.yaml`, `.yml`).
pub fn load_catalog(path: &Path, dialect: Dialect) -> AppResult<Catalog> {
    let display = path.display().to_string();
    let content = read_to_string(path).map_err(|e| file_read_error(&display, e))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .map_err(|e| catalog_parse_error(format!("{}: {}", display, e))),
        Some("yaml" | "yml") => serde_yaml::from_str(&content)
            .map_err(|e| catalog_parse_error(format!("{}: {}", display, e))),
        _ => Catalog::parse(&content, dialect)
    }
}

/// Command-line dialect, else configured dialect.
pub fn effective_dialect(dialect: Option<cli::Dialect>, config: &Config) -> AppResult<Dialect> {
    dialect
        .map(convert_dialect)
        .or(config.review.dialect)
        .ok_or_else(|| config_error("No dialect given (use --dialect or SQL_REVIEW_DIALECT)"))
}

/// Inline config rules followed by the policy file's rules.
pub fn collect_rules(policy_path: Option<&Path>, config: &Config) -> AppResult<Vec<Rule>> {
    let mut rules = config.review.rules.clone();
    let policy_path = policy_path.or(config.review.policy.as_deref());
    if let Some(path) = policy_path {
        rules.extend(Policy::load(path)?.rules);
    }
    if rules.is_empty() {
        return Err(config_error(
            "No rules configured (use --policy, SQL_REVIEW_POLICY or [[review.rules]])"
        ));
    }
    Ok(rules)
}

/// Create output options from parameters
pub fn create_output_options(format: Format, no_color: bool, verbose: bool) -> OutputOptions {
    OutputOptions {
        format: convert_format(format),
        colored: !no_color,
        verbose
    }
}
