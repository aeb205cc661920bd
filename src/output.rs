use colored::Colorize;
use serde::Serialize;

use crate::{
    advisor::{Advice, AdvisorRegistry, Status},
    dialect::Dialect,
    review::ReviewResult
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

/// Registered advisor, for serialization
#[derive(Debug, Serialize)]
pub struct AdvisorEntry<'a> {
    pub dialect:   Dialect,
    pub rule_type: &'a str
}

/// Format a review result based on output options
pub fn format_review_result(result: &ReviewResult, opts: &OutputOptions) -> String {
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(result).unwrap_or_default(),
        OutputFormat::Text => format_text_result(result, opts)
    }
}

/// Format registered advisors, optionally for one dialect only
pub fn format_rules_list(
    registry: &AdvisorRegistry,
    dialect: Option<Dialect>,
    opts: &OutputOptions
) -> String {
    let entries: Vec<AdvisorEntry<'_>> = registry
        .keys()
        .filter(|(d, _)| dialect.is_none_or(|wanted| wanted == *d))
        .map(|(dialect, rule_type)| AdvisorEntry {
            dialect,
            rule_type: rule_type.as_str()
        })
        .collect();
    match opts.format {
        OutputFormat::Json => serde_json::to_string_pretty(&entries).unwrap_or_default(),
        OutputFormat::Yaml => serde_yaml::to_string(&entries).unwrap_or_default(),
        OutputFormat::Text => {
            let mut output = String::new();
            for entry in &entries {
                let dialect = format!("{:<8}", entry.dialect.as_str());
                if opts.colored {
                    output.push_str(&format!("{} {}\n", dialect.cyan(), entry.rule_type));
                } else {
                    output.push_str(&format!("{} {}\n", dialect, entry.rule_type));
                }
            }
            output
        }
    }
}

fn format_text_result(result: &ReviewResult, opts: &OutputOptions) -> String {
    let mut output = String::new();
    let header = "=== SQL Review ===";
    if opts.colored {
        output.push_str(&header.bold().to_string());
    } else {
        output.push_str(header);
    }
    output.push_str("\n\n");

    for advice in &result.advice {
        if advice.status == Status::Success && !opts.verbose {
            continue;
        }
        output.push_str(&format_advice(advice, opts));
    }

    if !result.rule_errors.is_empty() {
        output.push_str("Rules not evaluated:\n");
        for error in &result.rule_errors {
            let line = format!(
                "  statement #{} {} ({}, {}): {}\n",
                error.statement_index + 1,
                error.rule_type,
                error.dialect,
                error.kind,
                error.message
            );
            if opts.colored {
                output.push_str(&line.magenta().to_string());
            } else {
                output.push_str(&line);
            }
        }
        output.push('\n');
    }

    let status = status_label(result.status, opts.colored);
    output.push_str(&format!(
        "Status: {} ({} statements, {} rules, {} errors, {} warnings)\n",
        status,
        result.statements_count,
        result.rules_count,
        result.error_count(),
        result.warning_count()
    ));
    output
}

fn format_advice(advice: &Advice, opts: &OutputOptions) -> String {
    let status = status_label(advice.status, opts.colored);
    let mut line = format!("[{}] {} (code {})", status, advice.title, advice.code);
    if advice.line > 0 {
        line.push_str(&format!(" at line {}", advice.line));
    }
    line.push('\n');
    if !advice.content.is_empty() {
        line.push_str(&format!("  {}\n", advice.content));
    }
    line
}

fn status_label(status: Status, colored: bool) -> String {
    let label = status.to_string();
    if !colored {
        return label;
    }
    match status {
        Status::Success => label.green().to_string(),
        Status::Warn => label.yellow().to_string(),
        Status::Error => label.red().bold().to_string()
    }
}
