//! Review sessions and advice aggregation.
//!
//! A [`ReviewSession`] runs an ordered rule set against SQL text:
//!
//! ```text
//! Pending ─▶ Parsing ─▶ Evaluating ─▶ Aggregating ─▶ Completed
//!               │
//!               └──────▶ Failed (parse error, deadline)
//! ```
//!
//! All statements are parsed once, up front. Rule checks are pure functions
//! of `(statement, rule)` and run in parallel with [`rayon`]; the collected
//! output is put back in statement order, then rule-set order, so the result
//! never depends on scheduling.
//!
//! A configuration or structural failure of one rule is recorded as a
//! [`RuleError`] on the result and the remaining rules keep running. A parse
//! failure or an expired deadline fails the whole session.
//!
//! # Example
//!
//! ```
//! use sql_review::{
//!     advisor::{AdvisorRegistry, Level, Rule, RuleType, Status},
//!     dialect::Dialect,
//!     review::ReviewSession
//! };
//!
//! let registry = AdvisorRegistry::builtin().unwrap();
//! let rules = vec![
//!     Rule::new(RuleType::COLUMN_MAXIMUM_VARCHAR_LENGTH, Dialect::Mysql, Level::Warning)
//!         .with_payload(r#"{"number": 255}"#),
//! ];
//!
//! let result = ReviewSession::new(&registry)
//!     .run("CREATE TABLE t (a VARCHAR(300))", Dialect::Mysql, &rules)
//!     .unwrap();
//!
//! assert_eq!(result.status, Status::Warn);
//! assert_eq!(result.advice.len(), 1);
//! assert_eq!(result.advice[0].line, 1);
//! ```

use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::Serialize;

use crate::{
    advisor::{Advice, AdvisorRegistry, Context, Level, Rule, RuleType, Status},
    catalog::Catalog,
    dialect::Dialect,
    error::{ErrorKind, ReviewError},
    parser::{SyntaxTree, parse_statements}
};

/// A rule that could not be evaluated on one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleError {
    /// Zero-based index of the statement
    pub statement_index: usize,
    pub rule_type:       RuleType,
    pub dialect:         Dialect,
    pub kind:            ErrorKind,
    pub message:         String
}

/// Aggregated outcome of a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewResult {
    /// Advice in statement order, then rule-execution order
    pub advice:           Vec<Advice>,
    /// Overall status, see [`aggregate_status`]
    pub status:           Status,
    /// Rules the engine could not evaluate
    pub rule_errors:      Vec<RuleError>,
    /// Number of statements reviewed
    pub statements_count: usize,
    /// Number of enabled rules
    pub rules_count:      usize
}

impl ReviewResult {
    pub fn error_count(&self) -> usize {
        self.count(Status::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Status::Warn)
    }

    /// Whether every enabled rule was evaluated on every statement.
    pub fn is_complete(&self) -> bool {
        self.rule_errors.is_empty()
    }

    fn count(&self, status: Status) -> usize {
        self.advice.iter().filter(|a| a.status == status).count()
    }
}

/// Overall status of an advice list.
///
/// Error if any advice is an error, else Warn if any is a warning, else
/// Success.
pub fn aggregate_status(advice: &[Advice]) -> Status {
    advice
        .iter()
        .map(|a| a.status)
        .max()
        .unwrap_or(Status::Success)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Pending,
    Parsing,
    Evaluating,
    Aggregating,
    Completed,
    Failed
}

/// One execution of a rule set against SQL input.
///
/// Sessions borrow the registry read-only; any number of them may run at
/// the same time.
#[derive(Debug)]
pub struct ReviewSession<'a> {
    registry: &'a AdvisorRegistry,
    catalog:  Option<&'a Catalog>,
    deadline: Option<Duration>,
    state:    SessionState
}

impl<'a> ReviewSession<'a> {
    pub fn new(registry: &'a AdvisorRegistry) -> Self {
        Self {
            registry,
            catalog: None,
            deadline: None,
            state: SessionState::Pending
        }
    }

    pub fn with_catalog(mut self, catalog: &'a Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Fail the session when it runs longer than `deadline`.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Review `sql` against `rules`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Parse`] when any statement fails to parse, and
    /// [`ReviewError::DeadlineExceeded`] when the deadline expires. Rule-level
    /// failures are reported in [`ReviewResult::rule_errors`] instead.
    pub fn run(
        mut self,
        sql: &str,
        dialect: Dialect,
        rules: &[Rule]
    ) -> Result<ReviewResult, ReviewError> {
        let started = Instant::now();

        self.transition(SessionState::Parsing);
        let trees = match parse_statements(sql, dialect) {
            Ok(trees) => trees,
            Err(e) => {
                self.transition(SessionState::Failed);
                return Err(e);
            }
        };
        self.check_deadline(started)?;

        let enabled: Vec<&Rule> = rules
            .iter()
            .filter(|rule| rule.level != Level::Disabled)
            .collect();

        self.transition(SessionState::Evaluating);
        let outcomes: Vec<Vec<Result<Vec<Advice>, RuleError>>> = trees
            .par_iter()
            .map(|tree| {
                enabled
                    .par_iter()
                    .map(|rule| self.evaluate(tree, rule))
                    .collect()
            })
            .collect();
        self.check_deadline(started)?;

        self.transition(SessionState::Aggregating);
        let mut advice = Vec::new();
        let mut rule_errors = Vec::new();
        for outcome in outcomes.into_iter().flatten() {
            match outcome {
                Ok(found) => advice.extend(found),
                Err(e) => rule_errors.push(e)
            }
        }
        let result = ReviewResult {
            status: aggregate_status(&advice),
            advice,
            rule_errors,
            statements_count: trees.len(),
            rules_count: enabled.len()
        };

        self.transition(SessionState::Completed);
        tracing::debug!(
            status = %result.status,
            advice = result.advice.len(),
            rule_errors = result.rule_errors.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "review completed"
        );
        Ok(result)
    }

    fn evaluate(&self, tree: &SyntaxTree, rule: &Rule) -> Result<Vec<Advice>, RuleError> {
        let checked = self
            .registry
            .lookup(rule.dialect, &rule.rule_type)
            .and_then(|advisor| {
                tracing::debug!(
                    statement = tree.index,
                    rule = %rule.rule_type,
                    dialect = %rule.dialect,
                    "dispatching advisor"
                );
                advisor.check(&Context::new(tree, rule).with_catalog(self.catalog))
            });
        checked.map_err(|e| {
            let error = RuleError {
                statement_index: tree.index,
                rule_type:       rule.rule_type.clone(),
                dialect:         rule.dialect,
                kind:            e.kind(),
                message:         e.to_string()
            };
            tracing::warn!(
                statement = error.statement_index,
                rule = %error.rule_type,
                kind = %error.kind,
                "{}",
                error.message
            );
            error
        })
    }

    fn check_deadline(&mut self, started: Instant) -> Result<(), ReviewError> {
        match self.deadline {
            Some(limit) if started.elapsed() >= limit => {
                self.transition(SessionState::Failed);
                Err(ReviewError::DeadlineExceeded {
                    limit_ms: limit.as_millis()
                })
            }
            _ => Ok(())
        }
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(from = ?self.state, to = ?next, "review session state");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::AdviceCode;

    fn advice(status: Status) -> Advice {
        Advice {
            status,
            code: AdviceCode::Internal,
            title: String::new(),
            content: String::new(),
            line: 1
        }
    }

    #[test]
    fn test_aggregate_status() {
        assert_eq!(aggregate_status(&[]), Status::Success);
        assert_eq!(aggregate_status(&[Advice::ok(), advice(Status::Warn)]), Status::Warn);
        assert_eq!(
            aggregate_status(&[advice(Status::Error), advice(Status::Warn)]),
            Status::Error
        );
    }

    #[test]
    fn test_zero_deadline_fails() {
        let registry = AdvisorRegistry::builtin().unwrap();
        let err = ReviewSession::new(&registry)
            .with_deadline(Duration::ZERO)
            .run("SELECT 1", Dialect::Mysql, &[])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Deadline);
    }
}
