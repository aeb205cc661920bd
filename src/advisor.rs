//! Advisors: per-dialect rule checkers.
//!
//! An advisor is a stateless checking unit bound to exactly one
//! (dialect, rule type) pair. Sessions find it through the
//! [`AdvisorRegistry`], hand it a [`Context`] and collect the returned
//! [`Advice`] list.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────────┐   ┌────────────┐   ┌──────────┐
//! │ SyntaxTree │──▶│ Advisor::check   │──▶│ walker::   │──▶│  Advice  │
//! └────────────┘   │ (decode payload) │   │ Listener   │   └──────────┘
//!                  └──────────────────┘   └────────────┘
//! ```
//!
//! The same semantic rule on two dialects is two advisor types; tree shapes
//! and identifier rules differ per dialect.
//!
//! # Built-in Rules
//!
//! | Rule type | Dialects | Payload |
//! |-----------|----------|---------|
//! | `column.maximum-varchar-length` | mssql, mysql, postgres | `{"number": 255}` |
//! | `column.type-disallow-list` | mysql, postgres | `{"list": ["BLOB"]}` |
//! | `naming.table` | mssql, postgres, sqlite | `{"format": "^[a-z_]+$", "maxLength": 64}` |
//! | `statement.select.no-select-all` | mssql, mysql | none |
//! | `table.no-redefinition` | mysql | none (uses the catalog) |
//!
//! # Implementing Custom Advisors
//!
//! ```
//! use sql_review::{
//!     advisor::{Advice, Advisor, Context, RegistryBuilder, RuleType, finish_advice},
//!     dialect::Dialect,
//!     error::ReviewError
//! };
//!
//! struct AlwaysOk;
//!
//! impl Advisor for AlwaysOk {
//!     fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, ReviewError> {
//!         ctx.expect_dialect(Dialect::Sqlite)?;
//!         Ok(finish_advice(Vec::new()))
//!     }
//! }
//!
//! let registry = RegistryBuilder::new()
//!     .register(Dialect::Sqlite, RuleType::new("custom.ok"), AlwaysOk)
//!     .unwrap()
//!     .build();
//! assert_eq!(registry.len(), 1);
//! ```

mod common;
pub mod mssql;
pub mod mysql;
pub mod payload;
pub mod postgres;
mod registry;
pub mod sqlite;
mod types;

pub use registry::{AdvisorRegistry, RegistryBuilder};
pub use types::{Advice, AdviceCode, Level, Rule, RuleType, Status};

use crate::{catalog::Catalog, dialect::Dialect, error::ReviewError, parser::SyntaxTree};

/// Per-check input bundle.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Parsed statement under review
    pub tree:    &'a SyntaxTree,
    /// Rule being evaluated
    pub rule:    &'a Rule,
    /// Optional precomputed catalog
    pub catalog: Option<&'a Catalog>
}

impl<'a> Context<'a> {
    pub fn new(tree: &'a SyntaxTree, rule: &'a Rule) -> Self {
        Self {
            tree,
            rule,
            catalog: None
        }
    }

    pub fn with_catalog(mut self, catalog: Option<&'a Catalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Guard that the tree was produced for the advisor's dialect.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Structural`] on mismatch.
    pub fn expect_dialect(&self, dialect: Dialect) -> Result<(), ReviewError> {
        if self.tree.dialect == dialect {
            Ok(())
        } else {
            Err(ReviewError::Structural {
                rule_type: self.rule.rule_type.clone(),
                expected:  dialect,
                actual:    self.tree.dialect
            })
        }
    }
}

/// Stateless checking unit bound to one (dialect, rule type) pair.
///
/// Implementations keep no state between calls; everything accumulated
/// during a check lives in values local to that call. Identical input must
/// produce identical output.
pub trait Advisor: Send + Sync {
    /// Check one statement against one rule.
    ///
    /// Never returns an empty list: no violations yields one
    /// [`Advice::ok`].
    ///
    /// # Errors
    ///
    /// Only for structural problems (wrong tree) or configuration problems
    /// (payload, level). Violations are advice, not errors.
    fn check(&self, ctx: &Context<'_>) -> Result<Vec<Advice>, ReviewError>;
}

/// Return the advice list, or the single success advice when it is empty.
pub fn finish_advice(mut advice: Vec<Advice>) -> Vec<Advice> {
    if advice.is_empty() {
        advice.push(Advice::ok());
    }
    advice
}
