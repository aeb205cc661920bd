//! Rule payload decoding.
//!
//! A payload stays opaque JSON text until the advisor that owns the rule
//! decodes it into its own shape. Decoding failures are configuration errors,
//! never silent defaults.

use regex::Regex;
use serde::{Deserialize, de::DeserializeOwned};

use super::types::Rule;
use crate::error::ReviewError;

/// Default table/column name length limit when a naming payload leaves it 0.
pub const DEFAULT_NAME_LENGTH_LIMIT: usize = 64;

/// Payload of numeric-threshold rules, e.g. `{"number": 255}`.
#[derive(Debug, Clone, Deserialize)]
pub struct NumberTypeRulePayload {
    pub number: i64
}

/// Payload of list rules, e.g. `{"list": ["BLOB", "TEXT"]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StringArrayTypeRulePayload {
    pub list: Vec<String>
}

/// Payload of naming rules, e.g. `{"format": "^[a-z_]+$", "maxLength": 64}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingRulePayload {
    pub format:     String,
    #[serde(default)]
    pub max_length: i64
}

/// Compiled naming payload.
#[derive(Debug, Clone)]
pub struct NamingFormat {
    pub format:     Regex,
    pub max_length: usize
}

/// Decode the rule payload into `T`.
///
/// # Errors
///
/// Returns [`ReviewError::InvalidPayload`] if the payload is missing or does
/// not match `T`.
pub fn decode<T: DeserializeOwned>(rule: &Rule) -> Result<T, ReviewError> {
    let raw = rule
        .payload
        .as_deref()
        .ok_or_else(|| invalid(rule, "payload is required"))?;
    serde_json::from_str(raw).map_err(|e| invalid(rule, e))
}

pub fn decode_number(rule: &Rule) -> Result<NumberTypeRulePayload, ReviewError> {
    decode(rule)
}

pub fn decode_string_array(rule: &Rule) -> Result<StringArrayTypeRulePayload, ReviewError> {
    decode(rule)
}

/// Decode a naming payload and compile its format.
pub fn decode_naming(rule: &Rule) -> Result<NamingFormat, ReviewError> {
    let payload: NamingRulePayload = decode(rule)?;
    let format = Regex::new(&payload.format).map_err(|e| invalid(rule, e))?;
    let max_length = match payload.max_length {
        0 => DEFAULT_NAME_LENGTH_LIMIT,
        n if n < 0 => return Err(invalid(rule, "maxLength must not be negative")),
        n => n as usize
    };
    Ok(NamingFormat {
        format,
        max_length
    })
}

fn invalid(rule: &Rule, message: impl std::fmt::Display) -> ReviewError {
    ReviewError::InvalidPayload {
        rule_type: rule.rule_type.clone(),
        message:   message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        advisor::{Level, RuleType},
        dialect::Dialect,
        error::ErrorKind
    };

    fn rule(payload: Option<&str>) -> Rule {
        let rule = Rule::new(RuleType::NAMING_TABLE, Dialect::Postgres, Level::Error);
        match payload {
            Some(p) => rule.with_payload(p),
            None => rule
        }
    }

    #[test]
    fn test_decode_number() {
        let payload = decode_number(&rule(Some(r#"{"number": 255}"#))).unwrap();
        assert_eq!(payload.number, 255);
    }

    #[test]
    fn test_missing_payload_is_configuration_error() {
        let err = decode_number(&rule(None)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        assert!(decode_number(&rule(Some(r#"{"number": "many"}"#))).is_err());
        assert!(decode_string_array(&rule(Some(r#"{"number": 1}"#))).is_err());
    }

    #[test]
    fn test_naming_defaults_length() {
        let naming = decode_naming(&rule(Some(r#"{"format": "^[a-z]+$"}"#))).unwrap();
        assert_eq!(naming.max_length, DEFAULT_NAME_LENGTH_LIMIT);
        assert!(naming.format.is_match("orders"));
    }

    #[test]
    fn test_naming_invalid_regex() {
        let err = decode_naming(&rule(Some(r#"{"format": "([a-z"}"#))).unwrap_err();
        assert!(matches!(err, ReviewError::InvalidPayload { .. }));
    }
}
