//! Type definitions for the advisor system.
//!
//! - [`Level`] - Policy-configured severity of a rule
//! - [`Status`] - Severity carried by a reported [`Advice`]
//! - [`AdviceCode`] - Stable numeric finding codes
//! - [`RuleType`] - Dialect-independent rule identifier
//! - [`Rule`] - One configured rule as it arrives from policy

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{dialect::Dialect, error::ReviewError};

/// Severity a violation of a rule is reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[serde(alias = "DISABLED")]
    Disabled,
    #[serde(alias = "SUCCESS")]
    Success,
    #[serde(alias = "WARNING", alias = "warn")]
    Warning,
    #[serde(alias = "ERROR")]
    Error
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "DISABLED"),
            Self::Success => write!(f, "SUCCESS"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR")
        }
    }
}

/// Status of a single advice or of a whole review.
///
/// Ordered from lowest to highest severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Success,
    Warn,
    Error
}

impl Status {
    /// Map a rule level to the status its violations are reported with.
    ///
    /// # Errors
    ///
    /// [`Level::Disabled`] rules must never reach an advisor.
    pub fn from_rule_level(rule: &Rule) -> Result<Self, ReviewError> {
        match rule.level {
            Level::Success => Ok(Self::Success),
            Level::Warning => Ok(Self::Warn),
            Level::Error => Ok(Self::Error),
            Level::Disabled => Err(ReviewError::InvalidLevel {
                rule_type: rule.rule_type.clone(),
                level:     rule.level.to_string()
            })
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR")
        }
    }
}

/// Stable numeric code of an advice. Serialized as the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u32")]
pub enum AdviceCode {
    Ok,
    Internal,
    StatementSyntaxError,
    StatementSelectAll,
    NamingTableConventionMismatch,
    DisabledColumnType,
    VarcharLengthExceedsLimit,
    TableExists
}

impl AdviceCode {
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Ok => 0,
            Self::Internal => 1,
            Self::StatementSyntaxError => 201,
            Self::StatementSelectAll => 203,
            Self::NamingTableConventionMismatch => 301,
            Self::DisabledColumnType => 411,
            Self::VarcharLengthExceedsLimit => 415,
            Self::TableExists => 607
        }
    }
}

impl From<AdviceCode> for u32 {
    fn from(code: AdviceCode) -> Self {
        code.as_u32()
    }
}

impl std::fmt::Display for AdviceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

/// One reported finding, or the synthetic success finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advice {
    pub status:  Status,
    pub code:    AdviceCode,
    pub title:   String,
    pub content: String,
    /// 1-based source line, 0 for the success advice
    pub line:    usize
}

impl Advice {
    /// The advice reported when a rule finds nothing.
    pub fn ok() -> Self {
        Self {
            status:  Status::Success,
            code:    AdviceCode::Ok,
            title:   "OK".to_string(),
            content: String::new(),
            line:    0
        }
    }
}

/// Dialect-independent identifier of a rule's intent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleType(Cow<'static, str>);

impl RuleType {
    pub const COLUMN_MAXIMUM_VARCHAR_LENGTH: Self =
        Self(Cow::Borrowed("column.maximum-varchar-length"));
    pub const COLUMN_TYPE_DISALLOW_LIST: Self = Self(Cow::Borrowed("column.type-disallow-list"));
    pub const NAMING_TABLE: Self = Self(Cow::Borrowed("naming.table"));
    pub const STATEMENT_SELECT_NO_SELECT_ALL: Self =
        Self(Cow::Borrowed("statement.select.no-select-all"));
    pub const TABLE_NO_REDEFINITION: Self = Self(Cow::Borrowed("table.no-redefinition"));

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A configured rule, as consumed from policy.
///
/// ```
/// use sql_review::{
///     advisor::{Level, Rule, RuleType},
///     dialect::Dialect
/// };
///
/// let yaml = r#"
/// type: column.maximum-varchar-length
/// dialect: mssql
/// level: warning
/// payload:
///   number: 255
/// "#;
/// let rule: Rule = serde_yaml::from_str(yaml).unwrap();
///
/// assert_eq!(rule.rule_type, RuleType::COLUMN_MAXIMUM_VARCHAR_LENGTH);
/// assert_eq!(rule.dialect, Dialect::Mssql);
/// assert_eq!(rule.level, Level::Warning);
/// assert_eq!(rule.payload.as_deref(), Some(r#"{"number":255}"#));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub dialect:   Dialect,
    pub level:     Level,
    /// Raw JSON payload, opaque until decoded by the advisor
    #[serde(default, deserialize_with = "deserialize_payload")]
    pub payload:   Option<String>
}

impl Rule {
    pub fn new(rule_type: RuleType, dialect: Dialect, level: Level) -> Self {
        Self {
            rule_type,
            dialect,
            level,
            payload: None
        }
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

/// Accept the payload either as JSON text or as an inline structured value.
fn deserialize_payload<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(raw)) => Some(raw),
        Some(other) => Some(other.to_string())
    })
}
