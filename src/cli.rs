use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// SQL Review - Gate SQL changes against a per-dialect review policy
#[derive(Parser, Debug)]
#[command(name = "sql-review")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Review SQL statements against a policy
    Check {
        /// Path to SQL file (use - for stdin)
        #[arg(short, long)]
        file: PathBuf,

        /// SQL dialect for parsing and advisor lookup
        #[arg(short, long, value_enum)]
        dialect: Option<Dialect>,

        /// Policy file with the rule set (.yaml, .yml, .json or .toml)
        #[arg(short, long)]
        policy: Option<PathBuf>,

        /// Existing schema: DDL (.sql) or a serialized catalog (.json, .yaml)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Fail the review when it takes longer than this
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Also show rules that passed
        #[arg(short, long)]
        verbose: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    },
    /// List registered advisors
    Rules {
        /// Only list advisors for this dialect
        #[arg(short, long, value_enum)]
        dialect: Option<Dialect>
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Dialect {
    Mysql,
    #[value(alias = "postgresql")]
    Postgres,
    #[value(alias = "tsql")]
    Mssql,
    Sqlite
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
