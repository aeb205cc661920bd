//! Type conversion functions for CLI to internal types.
//!
//! This module provides conversion functions that translate CLI-facing
//! types (from the `cli` module) to internal domain types used by the
//! review engine.

use crate::{
    cli::{Dialect as CliDialect, Format},
    dialect::Dialect,
    output::OutputFormat
};

/// Converts a CLI dialect enum to the engine's dialect.
///
/// # Example
///
/// ```
/// use sql_review::{app::convert_dialect, cli, dialect::Dialect};
///
/// assert_eq!(convert_dialect(cli::Dialect::Mssql), Dialect::Mssql);
/// ```
pub fn convert_dialect(dialect: CliDialect) -> Dialect {
    match dialect {
        CliDialect::Mysql => Dialect::Mysql,
        CliDialect::Postgres => Dialect::Postgres,
        CliDialect::Mssql => Dialect::Mssql,
        CliDialect::Sqlite => Dialect::Sqlite
    }
}

/// Converts a CLI format enum to the internal output format type.
///
/// # Example
///
/// ```
/// use sql_review::{app::convert_format, cli::Format, output::OutputFormat};
///
/// let format = convert_format(Format::Json);
/// assert!(matches!(format, OutputFormat::Json));
/// ```
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}
