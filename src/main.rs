use std::process;

use clap::Parser;
use sql_review::{
    advisor::AdvisorRegistry,
    app::{CheckParams, EXIT_FAILURE, run_check, run_rules},
    cli::{Cli, Commands},
    config::Config,
    error::AppResult
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_FAILURE);
        }
    }
}

fn run() -> AppResult<i32> {
    let cli = Cli::parse();
    let registry = AdvisorRegistry::builtin()?;

    let result = match cli.command {
        Commands::Check {
            file,
            dialect,
            policy,
            catalog,
            timeout_ms,
            output_format,
            verbose,
            no_color
        } => {
            let config = Config::load()?;
            let params = CheckParams {
                file_path: file,
                dialect,
                policy_path: policy,
                catalog_path: catalog,
                timeout_ms,
                output_format,
                verbose,
                no_color
            };
            run_check(params, &config, &registry)?
        }
        Commands::Rules {
            dialect
        } => run_rules(dialect, &registry)
    };

    print!("{}", result.output);
    if !result.output.ends_with('\n') {
        println!();
    }
    Ok(result.exit_code)
}
