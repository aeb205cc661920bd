//! Core review execution logic.
//!
//! `run_check` drives a full review from the command line: it resolves the
//! dialect and rule set, reads the SQL and optional catalog, runs a
//! [`ReviewSession`] and renders the result.

use std::time::Duration;

use super::{
    helpers::{
        EXIT_ACCEPT, calculate_exit_code, collect_rules, create_output_options,
        effective_dialect, load_catalog, read_sql_input
    },
    types::{CheckParams, CheckResult}
};
use crate::{
    advisor::AdvisorRegistry,
    cli,
    config::Config,
    error::{AppError, AppResult},
    output::{OutputOptions, format_review_result, format_rules_list},
    review::ReviewSession
};

/// Executes the complete review pipeline.
///
/// 1. **Resolve**: dialect and rules from the command line and config
/// 2. **Read**: SQL text (file or stdin) and the optional catalog
/// 3. **Review**: run the session against the registry
/// 4. **Render**: format the result and pick the exit code
///
/// # Errors
///
/// Returns an error if the input, policy or catalog cannot be read, no
/// dialect or rules are configured, or the SQL fails to parse. A review that
/// completes always returns `Ok`, whatever its findings.
///
/// # Example
///
/// ```no_run
/// use sql_review::{
///     advisor::AdvisorRegistry,
///     app::{CheckParams, run_check},
///     cli::{Dialect, Format},
///     config::Config
/// };
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let params = CheckParams {
///     file_path:     "migration.sql".into(),
///     dialect:       Some(Dialect::Mysql),
///     policy_path:   Some("policy.yaml".into()),
///     catalog_path:  None,
///     timeout_ms:    None,
///     output_format: Format::Text,
///     verbose:       false,
///     no_color:      false
/// };
///
/// let registry = AdvisorRegistry::builtin()?;
/// let result = run_check(params, &Config::default(), &registry)?;
/// println!("Exit code: {}", result.exit_code);
/// # Ok(())
/// # }
/// ```
pub fn run_check(
    params: CheckParams,
    config: &Config,
    registry: &AdvisorRegistry
) -> AppResult<CheckResult> {
    let dialect = effective_dialect(params.dialect, config)?;
    let rules = collect_rules(params.policy_path.as_deref(), config)?;
    let sql = read_sql_input(&params.file_path)?;
    let catalog = params
        .catalog_path
        .as_deref()
        .map(|path| load_catalog(path, dialect))
        .transpose()?;
    let output_opts = create_output_options(params.output_format, params.no_color, params.verbose);

    let mut session = ReviewSession::new(registry);
    if let Some(catalog) = &catalog {
        session = session.with_catalog(catalog);
    }
    if let Some(timeout_ms) = params.timeout_ms.or(config.review.timeout_ms) {
        session = session.with_deadline(Duration::from_millis(timeout_ms));
    }

    tracing::debug!(%dialect, rules = rules.len(), "starting review");
    let result = session.run(&sql, dialect, &rules).map_err(AppError::from)?;

    Ok(CheckResult {
        exit_code: calculate_exit_code(&result),
        output:    format_review_result(&result, &output_opts)
    })
}

/// List registered advisors.
pub fn run_rules(dialect: Option<cli::Dialect>, registry: &AdvisorRegistry) -> CheckResult {
    let opts = OutputOptions {
        colored: false,
        ..OutputOptions::default()
    };
    let dialect = dialect.map(super::convert::convert_dialect);
    CheckResult {
        exit_code: EXIT_ACCEPT,
        output:    format_rules_list(registry, dialect, &opts)
    }
}
