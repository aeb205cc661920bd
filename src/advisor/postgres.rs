//! Advisors for PostgreSQL.

use std::collections::BTreeSet;

use sqlparser::ast::{AlterTable, ColumnDef, CreateTable, DataType, ObjectName};

use super::{
    Advice, AdviceCode, Advisor, Context, Status,
    common::{integer_length, naming_table_advice, type_name, unqualified},
    finish_advice, payload
};
use crate::{
    dialect::Dialect,
    error::ReviewError,
    walker::{Listener, Position, walk}
};

/// Unquoted identifiers fold to lower case; quoted ones keep their case.
fn table_name(name: &ObjectName) -> String {
    match unqualified(name) {
        (name, true) => name,
        (name, false) => name.to_lowercase()
    }
}

/// `VARCHAR`/`CHARACTER VARYING` columns must not exceed the configured length.
pub struct ColumnMaximumVarcharLength;

impl Advisor for ColumnMaximumVarcharLength {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, ReviewError> {
        ctx.expect_dialect(Dialect::Postgres)?;
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

impl Listener for VarcharLengthChecker<'_> {
    fn enter_data_type(&mut self, data_type: &DataType, position: Position) {
        let Some(length) = (match data_type {
            DataType::Varchar(Some(length))
            | DataType::CharacterVarying(Some(length))
            | DataType::CharVarying(Some(length)) => integer_length(length),
            _ => None
        }) else {
            return;
        };
        if length > self.maximum {
            self.advice.push(Advice {
                status:  self.level,
                code:    AdviceCode::VarcharLengthExceedsLimit,
                title:   self.title.to_string(),
                content: format!("The length of the VARCHAR should be within {} characters", self.maximum),
                line:    position.line
            });
        }
    }
}

/// Column types on the configured list are not allowed.
pub struct ColumnTypeDisallowList;

impl Advisor for ColumnTypeDisallowList {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, ReviewError> {
        ctx.expect_dialect(Dialect::Postgres)?;
        let level = Status::from_rule_level(ctx.rule)?;
        let payload = payload::decode_string_array(ctx.rule)?;

        let mut checker = TypeDisallowChecker {
            level,
            title: ctx.rule.rule_type.as_str(),
            disallowed: payload.list.iter().map(|t| t.trim().to_uppercase()).collect(),
            table: String::new(),
            advice: Vec::new()
        };
        if !checker.disallowed.is_empty() {
            walk(&mut checker, &ctx.tree.statement, ctx.tree.line);
        }
        Ok(finish_advice(checker.advice))
    }
}

struct TypeDisallowChecker<'a> {
    level:      Status,
    title:      &'a str,
    disallowed: BTreeSet<String>,
    table:      String,
    advice:     Vec<Advice>
}

impl Listener for TypeDisallowChecker<'_> {
    fn enter_create_table(&mut self, create: &CreateTable, _position: Position) {
        self.table = table_name(&create.name);
    }

    fn enter_alter_table(&mut self, alter: &AlterTable, _position: Position) {
        self.table = table_name(&alter.name);
    }

    fn enter_column_def(&mut self, column: &ColumnDef, position: Position) {
        let column_type = type_name(&column.data_type);
        if self.disallowed.contains(&column_type) {
            self.advice.push(Advice {
                status:  self.level,
                code:    AdviceCode::DisabledColumnType,
                title:   self.title.to_string(),
                content: format!(
                    "Disallow column type {} but column \"{}\".\"{}\" is",
                    column_type, self.table, column.name.value
                ),
                line:    position.line
            });
        }
    }
}

/// Table names must follow the configured naming format.
pub struct NamingTable;

impl Advisor for NamingTable {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, ReviewError> {
        ctx.expect_dialect(Dialect::Postgres)?;
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
        self.advice.extend(naming_table_advice(
            &table_name(&create.name),
            self.naming,
            self.level,
            self.title,
            position.line
        ));
    }
}
