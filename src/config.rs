//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.sql-review.toml` in current directory
//! 4. `~/.config/sql-review/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [review]
//! dialect = "mysql"
//! policy = "policy.yaml"        # rules file: .yaml, .yml, .json or .toml
//! timeout_ms = 5000
//!
//! [[review.rules]]
//! type = "column.maximum-varchar-length"
//! dialect = "mysql"
//! level = "warning"
//! payload = { number = 255 }
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SQL_REVIEW_DIALECT` | Default dialect |
//! | `SQL_REVIEW_POLICY` | Path to the policy file |
//! | `SQL_REVIEW_TIMEOUT_MS` | Session deadline in milliseconds |

use std::{
    env, fs,
    path::{Path, PathBuf}
};

use serde::Deserialize;

use crate::{
    advisor::Rule,
    dialect::Dialect,
    error::{AppResult, config_error, file_read_error, policy_parse_error}
};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub review: ReviewConfig
}

/// Review defaults
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ReviewConfig {
    pub dialect:    Option<Dialect>,
    /// Policy file with the rule set
    pub policy:     Option<PathBuf>,
    /// Deadline applied around a whole session
    pub timeout_ms: Option<u64>,
    /// Rules declared inline, run before the policy file's rules
    #[serde(default)]
    pub rules:      Vec<Rule>
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.sql-review.toml)
    /// 3. Config file in home directory (~/.config/sql-review/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sql-review")
                .join("config.toml");

            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        let local_config = PathBuf::from(".sql-review.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        config.apply_env()?;
        Ok(config)
    }

    /// Parse a TOML configuration file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        toml::from_str(&content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(dialect) = env::var("SQL_REVIEW_DIALECT") {
            self.review.dialect = Some(
                dialect
                    .parse()
                    .map_err(|e| config_error(format!("SQL_REVIEW_DIALECT: {}", e)))?
            );
        }

        if let Ok(policy) = env::var("SQL_REVIEW_POLICY") {
            self.review.policy = Some(PathBuf::from(policy));
        }

        if let Ok(timeout) = env::var("SQL_REVIEW_TIMEOUT_MS") {
            self.review.timeout_ms = Some(timeout.trim().parse().map_err(|e| {
                config_error(format!("SQL_REVIEW_TIMEOUT_MS must be an integer: {}", e))
            })?);
        }
        Ok(())
    }
}

/// Ordered rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Policy {
    #[serde(default)]
    pub rules: Vec<Rule>
}

impl Policy {
    /// Load a policy, picking the format from the file extension.
    ///
    /// `.yaml`/`.yml` and `.json` are accepted; anything else is read as
    /// TOML.
    pub fn load(path: &Path) -> AppResult<Self> {
        let shown = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| file_read_error(&shown, e))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let policy: Self = match extension.as_deref() {
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&content).map_err(|e| policy_parse_error(&shown, e))?
            }
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| policy_parse_error(&shown, e))?
            }
            _ => toml::from_str(&content).map_err(|e| policy_parse_error(&shown, e))?
        };
        tracing::debug!(path = %shown, rules = policy.rules.len(), "policy loaded");
        Ok(policy)
    }
}
