//! # SQL Review
//!
//! Policy-driven review of SQL changes before they reach a database.
//!
//! A review takes SQL text, a target [`dialect::Dialect`] and an ordered set
//! of configured [`advisor::Rule`]s. Every statement is parsed once, every
//! enabled rule is dispatched to the advisor registered for its
//! (dialect, rule type) pair, and the resulting advice is aggregated into a
//! single [`review::ReviewResult`] with an overall status.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────────────┐   ┌──────────────┐
//! │ SQL text │──▶│  parser  │──▶│ ReviewSession    │──▶│ ReviewResult │
//! └──────────┘   └──────────┘   │  registry lookup │   └──────────────┘
//!                               │  advisors (par.) │
//!                               └──────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```bash
//! # Review a migration against a policy
//! sql-review check -f migration.sql -d mysql -p policy.yaml
//!
//! # Check table redefinitions against an existing schema
//! sql-review check -f migration.sql -d mysql -p policy.yaml -c schema.sql
//!
//! # Stream SQL from stdin, JSON output
//! cat migration.sql | sql-review check -f - -d postgres -p policy.json -o json
//!
//! # List built-in advisors
//! sql-review rules --dialect mssql
//! ```
//!
//! # Policy
//!
//! ```yaml
//! rules:
//!   - type: column.maximum-varchar-length
//!     dialect: mysql
//!     level: warning
//!     payload:
//!       number: 255
//!   - type: naming.table
//!     dialect: mysql
//!     level: disabled
//! ```
//!
//! Rules with level `disabled` never reach an advisor.
//!
//! # Exit Codes
//!
//! - `0` - Accepted: no findings, or warnings only
//! - `1` - Rejected: at least one error finding
//! - `2` - The engine could not evaluate the policy (parse failure, unknown
//!   rule, bad payload, unreadable input)
//!
//! # Modules
//!
//! - [`advisor`] - Advisor trait, registry and built-in advisors
//! - [`review`] - Review sessions and aggregation
//! - [`parser`] - Parsing the input into one syntax tree per statement
//! - [`walker`] - Pre-order syntax tree traversal
//! - [`catalog`] - Optional existing-schema catalog
//! - [`config`] - Configuration and policy loading
//! - [`output`] - Result formatting
//! - [`error`] - Error types and constructors

pub mod advisor;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod dialect;
pub mod error;
pub mod output;
pub mod parser;
pub mod review;
pub mod walker;
