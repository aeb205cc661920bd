//! Precomputed database catalog.
//!
//! A catalog describes the tables that already exist before the reviewed
//! statements run. Advisors such as `table.no-redefinition` consult it; a
//! session without a catalog simply skips those checks.
//!
//! # Example
//!
//! ```
//! use sql_review::{catalog::Catalog, dialect::Dialect};
//!
//! let sql = r#"
//!     CREATE TABLE users (
//!         id INT NOT NULL,
//!         email VARCHAR(255)
//!     );
//! "#;
//!
//! let catalog = Catalog::parse(sql, Dialect::Mysql).unwrap();
//!
//! assert!(catalog.has_table("USERS"));
//! let users = catalog.table("users").unwrap();
//! assert_eq!(users.columns.len(), 2);
//! assert!(!users.columns[0].is_nullable);
//! ```

use std::collections::BTreeMap;

use compact_str::CompactString;
use serde::{Deserialize, Deserializer, Serialize};
use sqlparser::{
    ast::{ColumnOption, ObjectName, ObjectNamePart, Statement},
    parser::Parser
};

use crate::{
    dialect::Dialect,
    error::{AppResult, catalog_parse_error}
};

/// Table metadata extracted from `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Table name as written, without schema qualifier or quotes
    pub name:    CompactString,
    /// Ordered list of columns
    pub columns: Vec<ColumnInfo>
}

impl TableInfo {
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name:        CompactString,
    /// Rendered SQL type, e.g. `VARCHAR(255)`
    pub data_type:   CompactString,
    pub is_nullable: bool
}

/// Tables known to exist, keyed by lower-cased name.
///
/// Stored in a `BTreeMap` for deterministic iteration order. Deserialized
/// catalogs are re-keyed by the lower-cased table name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(deserialize_with = "deserialize_tables")]
    pub tables: BTreeMap<CompactString, TableInfo>
}

impl Catalog {
    /// Build a catalog from DDL text.
    ///
    /// Statements other than `CREATE TABLE` are ignored.
    ///
    /// # Errors
    ///
    /// Returns error if the DDL does not parse under `dialect`.
    pub fn parse(sql: &str, dialect: Dialect) -> AppResult<Self> {
        let parser_dialect = dialect.into_parser_dialect();
        let statements = Parser::parse_sql(parser_dialect.as_ref(), sql)
            .map_err(|e| catalog_parse_error(e.to_string()))?;
        let mut catalog = Self::default();
        for stmt in statements {
            catalog.process_statement(stmt);
        }
        tracing::debug!(tables = catalog.tables.len(), %dialect, "catalog loaded");
        Ok(catalog)
    }

    fn process_statement(&mut self, stmt: Statement) {
        let Statement::CreateTable(create) = stmt else {
            return;
        };
        let name = bare_name(&create.name);
        let columns = create
            .columns
            .iter()
            .map(|column| ColumnInfo {
                name:        CompactString::from(column.name.value.as_str()),
                data_type:   CompactString::from(column.data_type.to_string()),
                is_nullable: !column
                    .options
                    .iter()
                    .any(|opt| matches!(opt.option, ColumnOption::NotNull))
            })
            .collect();
        self.insert(TableInfo {
            name,
            columns
        });
    }

    /// Add or replace a table.
    pub fn insert(&mut self, table: TableInfo) {
        self.tables.insert(table.name.to_lowercase().into(), table);
    }

    /// Case-insensitive lookup by unqualified table name.
    pub fn table(&self, name: &str) -> Option<&TableInfo> {
        self.tables.get(name.to_lowercase().as_str())
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn deserialize_tables<'de, D>(
    deserializer: D
) -> Result<BTreeMap<CompactString, TableInfo>, D::Error>
where
    D: Deserializer<'de>
{
    let raw = BTreeMap::<CompactString, TableInfo>::deserialize(deserializer)?;
    let mut catalog = Catalog::default();
    for table in raw.into_values() {
        catalog.insert(table);
    }
    Ok(catalog.tables)
}

/// Last identifier of a possibly qualified name, unquoted.
fn bare_name(name: &ObjectName) -> CompactString {
    match name.0.last().and_then(ObjectNamePart::as_ident) {
        Some(ident) => CompactString::from(ident.value.as_str()),
        None => CompactString::from(name.to_string())
    }
}
