pub use masterror::{AppError, AppResult};
use serde::Serialize;

use crate::{advisor::RuleType, dialect::Dialect};

/// Failures raised while evaluating a review.
///
/// Lint findings are never errors: they travel as
/// [`Advice`](crate::advisor::Advice). Everything here means the engine could
/// not evaluate some part of the policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("no advisor registered for rule `{rule_type}` on {dialect}")]
    AdvisorNotFound {
        dialect:   Dialect,
        rule_type: RuleType
    },
    #[error("advisor for rule `{rule_type}` on {dialect} is already registered")]
    DuplicateAdvisor {
        dialect:   Dialect,
        rule_type: RuleType
    },
    #[error("invalid payload for rule `{rule_type}`: {message}")]
    InvalidPayload {
        rule_type: RuleType,
        message:   String
    },
    #[error("rule `{rule_type}` cannot be evaluated at level {level}")]
    InvalidLevel {
        rule_type: RuleType,
        level:     String
    },
    #[error("rule `{rule_type}` expects a {expected} syntax tree, got {actual}")]
    Structural {
        rule_type: RuleType,
        expected:  Dialect,
        actual:    Dialect
    },
    #[error("{}", format_sql_error("Parse error", .message, .position.as_ref()))]
    Parse {
        statement_index: Option<usize>,
        position:        Option<SqlPosition>,
        message:         String
    },
    #[error("review exceeded its deadline of {limit_ms} ms")]
    DeadlineExceeded { limit_ms: u128 }
}

/// Coarse classification of a [`ReviewError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Unknown rule, malformed payload, misused level
    Configuration,
    /// Syntax tree does not match the advisor
    Structural,
    /// SQL text could not be parsed
    Parse,
    /// Session ran past its deadline
    Deadline
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Structural => write!(f, "structural"),
            Self::Parse => write!(f, "parse"),
            Self::Deadline => write!(f, "deadline")
        }
    }
}

impl ReviewError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AdvisorNotFound {
                ..
            }
            | Self::DuplicateAdvisor {
                ..
            }
            | Self::InvalidPayload {
                ..
            }
            | Self::InvalidLevel {
                ..
            } => ErrorKind::Configuration,
            Self::Structural {
                ..
            } => ErrorKind::Structural,
            Self::Parse {
                ..
            } => ErrorKind::Parse,
            Self::DeadlineExceeded {
                ..
            } => ErrorKind::Deadline
        }
    }

    /// Build a parse error from a parser message, picking up its position.
    pub fn parse(statement_index: Option<usize>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Parse {
            statement_index,
            position: extract_position(&message),
            message
        }
    }
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err.kind() {
            ErrorKind::Parse | ErrorKind::Configuration => AppError::bad_request(err.to_string()),
            ErrorKind::Structural | ErrorKind::Deadline => AppError::internal(err.to_string())
        }
    }
}

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create policy parse error
pub fn policy_parse_error(path: &str, message: impl std::fmt::Display) -> AppError {
    AppError::bad_request(format!("Invalid policy file '{}': {}", path, message))
}

/// Create catalog parse error with optional position info
pub fn catalog_parse_error(message: impl Into<String>) -> AppError {
    let msg = message.into();
    let position = extract_position(&msg);
    AppError::bad_request(format_sql_error("Catalog parse error", &msg, position.as_ref()))
}

/// Format SQL error with position highlighting
fn format_sql_error(prefix: &str, message: &str, position: Option<&SqlPosition>) -> String {
    if let Some(pos) = position {
        format!(
            "{} at line {}, column {}:\n  {}",
            prefix, pos.line, pos.column, message
        )
    } else {
        format!("{}:\n  {}", prefix, message)
    }
}

/// Source position reported by the SQL parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SqlPosition {
    pub line:   usize,
    pub column: usize
}

/// Pull a position out of a `sqlparser` message.
///
/// sqlparser format: "... at Line: X, Column: Y" (older releases omit the
/// second colon).
pub fn extract_position(message: &str) -> Option<SqlPosition> {
    let line_marker = "Line: ";
    let col_marker = ", Column";

    let line_start = message.find(line_marker)?;
    let line_num_start = line_start + line_marker.len();
    let col_start = message[line_num_start..].find(col_marker)?;
    let line_str = &message[line_num_start..line_num_start + col_start];

    let rest = &message[line_num_start + col_start + col_marker.len()..];
    let rest = rest.trim_start_matches(':').trim_start();
    let col_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    match (line_str.trim().parse(), rest[..col_end].parse()) {
        (Ok(line), Ok(column)) => Some(SqlPosition {
            line,
            column
        }),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_position_with_colon() {
        let pos = extract_position("Expected: ), found: EOF at Line: 3, Column: 17").unwrap();
        assert_eq!(pos.line, 3);
        assert_eq!(pos.column, 17);
    }

    #[test]
    fn test_extract_position_without_colon() {
        let pos = extract_position("Unexpected token at Line: 12, Column 4 here").unwrap();
        assert_eq!(pos.line, 12);
        assert_eq!(pos.column, 4);
    }

    #[test]
    fn test_extract_position_missing() {
        assert!(extract_position("no position here").is_none());
        assert!(extract_position("Line: x, Column: 1").is_none());
    }

    #[test]
    fn test_error_kinds() {
        let err = ReviewError::InvalidPayload {
            rule_type: RuleType::NAMING_TABLE,
            message:   "bad".to_string()
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(
            ReviewError::parse(Some(0), "oops").kind(),
            ErrorKind::Parse
        );
    }

    #[test]
    fn test_parse_error_display_has_position() {
        let err = ReviewError::parse(Some(1), "Expected: ), found: EOF at Line: 2, Column: 9");
        let msg = err.to_string();
        assert!(msg.contains("line 2, column 9"));
    }
}
