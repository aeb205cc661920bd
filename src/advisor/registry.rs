//! Advisor registry.
//!
//! Built once at startup through [`RegistryBuilder`], then frozen into an
//! [`AdvisorRegistry`] that is only ever read. Sessions borrow it; nothing
//! mutates it afterwards, so concurrent lookups need no synchronization.

use indexmap::IndexMap;

use super::{Advisor, RuleType, mssql, mysql, postgres, sqlite};
use crate::{dialect::Dialect, error::ReviewError};

type AdvisorKey = (Dialect, RuleType);

/// Mutable registration phase of the registry.
#[derive(Default)]
pub struct RegistryBuilder {
    advisors: IndexMap<AdvisorKey, Box<dyn Advisor>>
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an advisor to a (dialect, rule type) pair.
    ///
    /// # Errors
    ///
    /// A second registration for the same pair is a programming error and
    /// returns [`ReviewError::DuplicateAdvisor`].
    pub fn register(
        mut self,
        dialect: Dialect,
        rule_type: RuleType,
        advisor: impl Advisor + 'static
    ) -> Result<Self, ReviewError> {
        let key = (dialect, rule_type);
        if self.advisors.contains_key(&key) {
            let (dialect, rule_type) = key;
            return Err(ReviewError::DuplicateAdvisor {
                dialect,
                rule_type
            });
        }
        self.advisors.insert(key, Box::new(advisor));
        Ok(self)
    }

    pub fn build(self) -> AdvisorRegistry {
        tracing::debug!(advisors = self.advisors.len(), "advisor registry initialized");
        AdvisorRegistry {
            advisors: self.advisors
        }
    }
}

/// Immutable mapping from (dialect, rule type) to advisor.
pub struct AdvisorRegistry {
    advisors: IndexMap<AdvisorKey, Box<dyn Advisor>>
}

impl std::fmt::Debug for AdvisorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.advisors.keys()).finish()
    }
}

impl AdvisorRegistry {
    /// Registry holding every built-in advisor.
    ///
    /// # Errors
    ///
    /// Fails if two built-in advisors claim the same pair.
    pub fn builtin() -> Result<Self, ReviewError> {
        let builder = RegistryBuilder::new()
            .register(
                Dialect::Mssql,
                RuleType::COLUMN_MAXIMUM_VARCHAR_LENGTH,
                mssql::ColumnMaximumVarcharLength
            )?
            .register(Dialect::Mssql, RuleType::NAMING_TABLE, mssql::NamingTable)?
            .register(
                Dialect::Mssql,
                RuleType::STATEMENT_SELECT_NO_SELECT_ALL,
                mssql::StatementSelectAll
            )?
            .register(
                Dialect::Mysql,
                RuleType::COLUMN_MAXIMUM_VARCHAR_LENGTH,
                mysql::ColumnMaximumVarcharLength
            )?
            .register(
                Dialect::Mysql,
                RuleType::COLUMN_TYPE_DISALLOW_LIST,
                mysql::ColumnTypeDisallowList
            )?
            .register(
                Dialect::Mysql,
                RuleType::STATEMENT_SELECT_NO_SELECT_ALL,
                mysql::StatementSelectAll
            )?
            .register(
                Dialect::Mysql,
                RuleType::TABLE_NO_REDEFINITION,
                mysql::TableNoRedefinition
            )?
            .register(
                Dialect::Postgres,
                RuleType::COLUMN_MAXIMUM_VARCHAR_LENGTH,
                postgres::ColumnMaximumVarcharLength
            )?
            .register(
                Dialect::Postgres,
                RuleType::COLUMN_TYPE_DISALLOW_LIST,
                postgres::ColumnTypeDisallowList
            )?
            .register(Dialect::Postgres, RuleType::NAMING_TABLE, postgres::NamingTable)?
            .register(Dialect::Sqlite, RuleType::NAMING_TABLE, sqlite::NamingTable)?;
        Ok(builder.build())
    }

    /// Find the advisor for a (dialect, rule type) pair.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::AdvisorNotFound`] for unregistered pairs.
    pub fn lookup(&self, dialect: Dialect, rule_type: &RuleType) -> Result<&dyn Advisor, ReviewError> {
        self.advisors
            .get(&(dialect, rule_type.clone()))
            .map(|advisor| &**advisor)
            .ok_or_else(|| ReviewError::AdvisorNotFound {
                dialect,
                rule_type: rule_type.clone()
            })
    }

    /// Registered pairs, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = (Dialect, &RuleType)> {
        self.advisors.keys().map(|(dialect, rule_type)| (*dialect, rule_type))
    }

    pub fn len(&self) -> usize {
        self.advisors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.advisors.is_empty()
    }
}
