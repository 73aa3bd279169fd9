//! Command line configuration for the `esearch` binary.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ESEARCH_CONFIG` | - | Compiler configuration file (JSON) |
//! | `ESEARCH_LOG_LEVEL` | warn | Log level |
//! | `ESEARCH_INDEX` | entries | Target index (`entries` or `users`) |
//! | `ESEARCH_PRETTY` | false | Pretty-print the query body |
//! | `ESEARCH_MAX_DEPTH` | - | Overrides the configured tree depth limit |

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use esearch_compiler::CompilerConfig;

/// Index the compiled query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TargetIndex {
    /// Entry documents: entry, caption, metadata and category items.
    #[default]
    Entries,
    /// User documents: user items only.
    Users,
}

/// Configuration for the `esearch` command.
#[derive(Debug, Clone, Parser)]
#[command(name = "esearch")]
#[command(about = "Compiles search criteria into an Elasticsearch query body")]
pub struct CliConfig {
    /// Criteria file (JSON). Reads standard input when omitted or `-`.
    pub input: Option<PathBuf>,

    /// Compiler configuration file.
    #[arg(short, long, env = "ESEARCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "ESEARCH_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Target index.
    #[arg(long, env = "ESEARCH_INDEX", value_enum, default_value_t = TargetIndex::Entries)]
    pub index: TargetIndex,

    /// Pretty-print the query body.
    #[arg(long, env = "ESEARCH_PRETTY", default_value = "false")]
    pub pretty: bool,

    /// Overrides the maximum criteria tree depth.
    #[arg(long, env = "ESEARCH_MAX_DEPTH")]
    pub max_depth: Option<usize>,

    /// Only validate the criteria; print nothing on success.
    #[arg(long)]
    pub check: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            input: None,
            config: None,
            log_level: "warn".to_string(),
            index: TargetIndex::Entries,
            pretty: false,
            max_depth: None,
            check: false,
        }
    }
}

impl CliConfig {
    /// Returns the criteria file, or `None` for standard input.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input
            .as_ref()
            .filter(|path| path.as_os_str() != "-")
    }

    /// Applies the command line overrides to a compiler configuration.
    pub fn compiler_config(&self, base: CompilerConfig) -> CompilerConfig {
        let mut config = match self.index {
            TargetIndex::Entries => base,
            TargetIndex::Users => CompilerConfig {
                categories: CompilerConfig::for_users().categories,
                ..base
            },
        };
        if let Some(max_depth) = self.max_depth {
            config = config.with_max_depth(max_depth);
        }
        config
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.max_depth == Some(0) {
            errors.push("max_depth must be greater than 0".to_string());
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log level '{}'. Must be one of: {:?}",
                self.log_level, valid_levels
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esearch_compiler::types::Category;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.index, TargetIndex::Entries);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_args() {
        let config = CliConfig::parse_from([
            "esearch",
            "criteria.json",
            "--index",
            "users",
            "--pretty",
            "--max-depth",
            "8",
        ]);
        assert_eq!(config.input_path(), Some(&PathBuf::from("criteria.json")));
        assert_eq!(config.index, TargetIndex::Users);
        assert!(config.pretty);
        assert_eq!(config.max_depth, Some(8));
    }

    #[test]
    fn test_dash_reads_stdin() {
        let config = CliConfig::parse_from(["esearch", "-"]);
        assert!(config.input_path().is_none());
    }

    #[test]
    fn test_compiler_config_overrides() {
        let config = CliConfig {
            index: TargetIndex::Users,
            max_depth: Some(4),
            ..Default::default()
        };
        let compiler = config.compiler_config(CompilerConfig::default());
        assert_eq!(compiler.max_depth, 4);
        assert!(compiler.supports(Category::User));
        assert!(!compiler.supports(Category::Entry));
        assert_eq!(compiler.inner_hits_size, 10);
    }

    #[test]
    fn test_validation() {
        let config = CliConfig {
            log_level: "loud".to_string(),
            max_depth: Some(0),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
