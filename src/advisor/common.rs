use sqlparser::ast::{CharacterLength, DataType, ObjectName, ObjectNamePart};

use super::{Advice, AdviceCode, Status, payload::NamingFormat};

/// Last identifier of a possibly qualified name and whether it was quoted.
pub(super) fn unqualified(name: &ObjectName) -> (String, bool) {
    match name.0.last().and_then(ObjectNamePart::as_ident) {
        Some(ident) => (ident.value.clone(), ident.quote_style.is_some()),
        None => (name.to_string(), false)
    }
}

/// Explicit integer length of a character type, `None` for `MAX`.
pub(super) fn integer_length(length: &CharacterLength) -> Option<i64> {
    match length {
        CharacterLength::IntegerLength {
            length,
            ..
        } => Some(i64::try_from(*length).unwrap_or(i64::MAX)),
        CharacterLength::Max => None
    }
}

/// Upper-case type name without its arguments, e.g. `VARCHAR(20)` → `VARCHAR`.
pub(super) fn type_name(data_type: &DataType) -> String {
    let rendered = data_type.to_string().to_uppercase();
    match rendered.find('(') {
        Some(idx) => rendered[..idx].trim_end().to_string(),
        None => rendered
    }
}

/// Check a table name against a naming format.
pub(super) fn naming_table_advice(
    name: &str,
    naming: &NamingFormat,
    status: Status,
    title: &str,
    line: usize
) -> Vec<Advice> {
    let mut advice = Vec::new();
    if !naming.format.is_match(name) {
        advice.push(Advice {
            status,
            code: AdviceCode::NamingTableConventionMismatch,
            title: title.to_string(),
            content: format!(
                "`{}` mismatches table naming convention, naming format should be {:?}",
                name,
                naming.format.as_str()
            ),
            line
        });
    }
    if name.chars().count() > naming.max_length {
        advice.push(Advice {
            status,
            code: AdviceCode::NamingTableConventionMismatch,
            title: title.to_string(),
            content: format!(
                "`{}` mismatches table naming convention, its length should be within {} characters",
                name, naming.max_length
            ),
            line
        });
    }
    advice
}
