//! Application logic for the SQL Review CLI.
//!
//! This module contains the core application logic separated from the main
//! entry point to enable testing.

mod check;
mod convert;
mod helpers;
mod types;

pub use check::{run_check, run_rules};
pub use convert::{convert_dialect, convert_format};
pub use helpers::{
    EXIT_ACCEPT, EXIT_FAILURE, EXIT_REJECT, calculate_exit_code, collect_rules,
    create_output_options, effective_dialect, load_catalog, read_sql_input
};
pub use types::{CheckParams, CheckResult};
