//! Advisors for MySQL.

use std::collections::BTreeSet;

use sqlparser::ast::{AlterTable, ColumnDef, CreateTable, DataType, ObjectName, SelectItem};

use super::{
    Advice, AdviceCode, Advisor, Context, Status,
    common::{integer_length, type_name, unqualified},
    finish_advice, payload
};
use crate::{
    dialect::Dialect,
    error::ReviewError,
    walker::{Listener, Position, walk}
};

fn table_name(name: &ObjectName) -> String {
    unqualified(name).0
}

/// `VARCHAR` columns must not exceed the configured length.
pub struct ColumnMaximumVarcharLength;

impl Advisor for ColumnMaximumVarcharLength {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, ReviewError> {
        ctx.expect_dialect(Dialect::Mysql)?;
        let level = Status::from_rule_level(ctx.rule)?;
        let payload = payload::decode_number(ctx.rule)?;

        let mut checker = VarcharLengthChecker {
            level,
            title: ctx.rule.rule_type.as_str(),
            maximum: payload.number,
            table: String::new(),
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
    table:   String,
    advice:  Vec<Advice>
}

impl Listener for VarcharLengthChecker<'_> {
    fn enter_create_table(&mut self, create: &CreateTable, _position: Position) {
        self.table = table_name(&create.name);
    }

    fn enter_alter_table(&mut self, alter: &AlterTable, _position: Position) {
        self.table = table_name(&alter.name);
    }

    fn enter_column_def(&mut self, column: &ColumnDef, position: Position) {
        let length = match &column.data_type {
            DataType::Varchar(Some(length))
            | DataType::CharVarying(Some(length))
            | DataType::CharacterVarying(Some(length)) => match integer_length(length) {
                Some(length) => length,
                None => return
            },
            _ => return
        };
        if length > self.maximum {
            self.advice.push(Advice {
                status:  self.level,
                code:    AdviceCode::VarcharLengthExceedsLimit,
                title:   self.title.to_string(),
                content: format!(
                    "The length of the VARCHAR column `{}.{}` is bigger than {}",
                    self.table, column.name.value, self.maximum
                ),
                line:    position.line
            });
        }
    }
}

/// Column types on the configured list are not allowed.
pub struct ColumnTypeDisallowList;

impl Advisor for ColumnTypeDisallowList {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, ReviewError> {
        ctx.expect_dialect(Dialect::Mysql)?;
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
                    "Disallow column type {} but column `{}`.`{}` is",
                    column_type, self.table, column.name.value
                ),
                line:    position.line
            });
        }
    }
}

/// `SELECT *` is not allowed.
pub struct StatementSelectAll;

impl Advisor for StatementSelectAll {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, ReviewError> {
        ctx.expect_dialect(Dialect::Mysql)?;
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

/// `CREATE TABLE` must not target a table the catalog already has.
pub struct TableNoRedefinition;

impl Advisor for TableNoRedefinition {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, ReviewError> {
        ctx.expect_dialect(Dialect::Mysql)?;
        let level = Status::from_rule_level(ctx.rule)?;
        let Some(catalog) = ctx.catalog else {
            return Ok(finish_advice(Vec::new()));
        };

        let mut checker = RedefinitionChecker {
            level,
            title: ctx.rule.rule_type.as_str(),
            catalog,
            advice: Vec::new()
        };
        walk(&mut checker, &ctx.tree.statement, ctx.tree.line);
        Ok(finish_advice(checker.advice))
    }
}

struct RedefinitionChecker<'a> {
    level:   Status,
    title:   &'a str,
    catalog: &'a crate::catalog::Catalog,
    advice:  Vec<Advice>
}

impl Listener for RedefinitionChecker<'_> {
    fn enter_create_table(&mut self, create: &CreateTable, position: Position) {
        if create.if_not_exists {
            return;
        }
        let name = table_name(&create.name);
        if self.catalog.has_table(&name) {
            self.advice.push(Advice {
                status:  self.level,
                code:    AdviceCode::TableExists,
                title:   self.title.to_string(),
                content: format!("Table `{}` already exists", name),
                line:    position.line
            });
        }
    }
}
