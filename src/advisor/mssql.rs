//! Advisors for Microsoft SQL Server (T-SQL).

use sqlparser::ast::{CreateTable, DataType, ObjectName, SelectItem};

use super::{
    Advice, AdviceCode, Advisor, Context, Status,
    common::{integer_length, naming_table_advice, unqualified},
    finish_advice, payload
};
use crate::{
    dialect::Dialect,
    error::ReviewError,
    walker::{Listener, Position, walk}
};

/// Length `VARCHAR(MAX)`/`NVARCHAR(MAX)` stands for: 2^31 - 1 bytes.
///
/// <https://learn.microsoft.com/en-us/sql/t-sql/data-types/char-and-varchar-transact-sql>
pub const MAX_VARCHAR_LENGTH: i64 = i32::MAX as i64;

/// Normalize a T-SQL identifier: unquoted, case-folded.
fn normalize_identifier(name: &ObjectName) -> String {
    unqualified(name).0.to_lowercase()
}

/// Character columns must not exceed the configured length.
pub struct ColumnMaximumVarcharLength;

impl Advisor for ColumnMaximumVarcharLength {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, ReviewError> {
        ctx.expect_dialect(Dialect::Mssql)?;
        let level = Status::from_rule_level(ctx.rule)?;
        let payload = payload::decode_number(ctx.rule)?;

        let mut checker = VarcharLengthChecker {
            level,
            title: ctx.rule.rule_type.as_str(),
            maximum: payload.number,
            advice: Vec::new()
        };
        if checker.maximum > 0 {
            walk(&mut checker, &ctx.tree.statement, ctx.tree.line);
        }
        Ok(finish_advice(checker.advice))
    }
}

struct VarcharLengthChecker<'a> {
    level:   Status,
    title:   &'a str,
    maximum: i64,
    advice:  Vec<Advice>
}

impl VarcharLengthChecker<'_> {
    /// Length of a bracketed or otherwise non-native character type.
    fn custom_length(name: &ObjectName, modifiers: &[String]) -> Option<i64> {
        let type_name = normalize_identifier(name);
        if !matches!(type_name.as_str(), "varchar" | "nvarchar" | "char" | "nchar") {
            return None;
        }
        let Some(raw) = modifiers.first() else {
            return Some(0);
        };
        if raw.eq_ignore_ascii_case("max") {
            return match type_name.as_str() {
                "varchar" | "nvarchar" => Some(MAX_VARCHAR_LENGTH),
                _ => None
            };
        }
        match raw.trim().parse() {
            Ok(length) => Some(length),
            Err(e) => {
                tracing::error!(length = %raw, error = %e, "failed to convert length to int");
                Some(0)
            }
        }
    }
}

impl Listener for VarcharLengthChecker<'_> {
    fn enter_data_type(&mut self, data_type: &DataType, position: Position) {
        let length = match data_type {
            DataType::Varchar(length) | DataType::Nvarchar(length) => match length {
                Some(length) => integer_length(length).unwrap_or(MAX_VARCHAR_LENGTH),
                None => 0
            },
            DataType::Char(length) | DataType::Character(length) => match length {
                Some(length) => match integer_length(length) {
                    Some(length) => length,
                    None => return
                },
                None => 0
            },
            DataType::Custom(name, modifiers) => {
                match Self::custom_length(name, modifiers) {
                    Some(length) => length,
                    None => return
                }
            }
            _ => return
        };
        if length > self.maximum {
            self.advice.push(Advice {
                status:  self.level,
                code:    AdviceCode::VarcharLengthExceedsLimit,
                title:   self.title.to_string(),
                content: format!("The maximum varchar length is {}.", self.maximum),
                line:    position.line
            });
        }
    }
}

/// Table names must follow the configured naming format.
pub struct NamingTable;

impl Advisor for NamingTable {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, ReviewError> {
        ctx.expect_dialect(Dialect::Mssql)?;
        let level = Status::from_rule_level(ctx.rule)?;
        let naming = payload::decode_naming(ctx.rule)?;

        let mut checker = NamingTableChecker {
            level,
            title: ctx.rule.rule_type.as_str(),
            naming: &naming,
            advice: Vec::new()
        };
        walk(&mut checker, &ctx.tree.statement, ctx.tree.line);
        Ok(finish_advice(checker.advice))
    }
}

struct NamingTableChecker<'a> {
    level:  Status,
    title:  &'a str,
    naming: &'a payload::NamingFormat,
    advice: Vec<Advice>
}

impl Listener for NamingTableChecker<'_> {
    fn enter_create_table(&mut self, create: &CreateTable, position: Position) {
        let (name, _) = unqualified(&create.name);
        self.advice.extend(naming_table_advice(
            &name,
            self.naming,
            self.level,
            self.title,
            position.line
        ));
    }
}

/// `SELECT *` is not allowed.
pub struct StatementSelectAll;

impl Advisor for StatementSelectAll {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, ReviewError> {
        ctx.expect_dialect(Dialect::Mssql)?;
        let level = Status::from_rule_level(ctx.rule)?;

        let mut checker = SelectAllChecker {
            level,
            title: ctx.rule.rule_type.as_str(),
            text: &ctx.tree.text,
            advice: Vec::new()
        };
        walk(&mut checker, &ctx.tree.statement, ctx.tree.line);
        Ok(finish_advice(checker.advice))
    }
}

struct SelectAllChecker<'a> {
    level:  Status,
    title:  &'a str,
    text:   &'a str,
    advice: Vec<Advice>
}

impl Listener for SelectAllChecker<'_> {
    fn enter_select_item(&mut self, item: &SelectItem, position: Position) {
        if matches!(item, SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(..)) {
            self.advice.push(Advice {
                status:  self.level,
                code:    AdviceCode::StatementSelectAll,
                title:   self.title.to_string(),
                content: format!("\"{}\" uses SELECT all", self.text),
                line:    position.line
            });
        }
    }
}
