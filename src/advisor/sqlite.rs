//! Advisors for SQLite.

use sqlparser::ast::CreateTable;

use super::{
    Advice, Advisor, Context, Status,
    common::{naming_table_advice, unqualified},
    finish_advice, payload
};
use crate::{
    dialect::Dialect,
    error::ReviewError,
    walker::{Listener, Position, walk}
};

/// Table names must follow the configured naming format.
pub struct NamingTable;

impl Advisor for NamingTable {
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, ReviewError> {
        ctx.expect_dialect(Dialect::Sqlite)?;
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
