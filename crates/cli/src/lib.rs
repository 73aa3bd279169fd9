//! Command line front end for the search criteria compiler.
//!
//! Reads a criteria tree as JSON, compiles it with
//! [`QueryManager`](esearch_compiler::QueryManager) and prints the search
//! request body.

pub mod config;

use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use esearch_compiler::{EsearchConfig, QueryManager, SearchNode};
use tracing::{debug, info};

pub use config::{CliConfig, TargetIndex};

/// Initializes logging to standard error.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("esearch_cli={level},esearch_compiler={level}"))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Reads the criteria document from the configured file or standard input.
pub fn read_input(config: &CliConfig) -> anyhow::Result<String> {
    match config.input_path() {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read criteria from {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read criteria from standard input")?;
            Ok(input)
        }
    }
}

/// Builds the query manager from the configuration file and overrides.
pub fn build_manager(config: &CliConfig) -> anyhow::Result<QueryManager> {
    let file_config = match &config.config {
        Some(path) => {
            info!(path = %path.display(), "Loading compiler configuration");
            EsearchConfig::from_file(path)?
        }
        None => EsearchConfig::default(),
    };

    let registry = file_config
        .build_registry()
        .context("Invalid dynamic field configuration")?;
    debug!(
        static_fields = registry.static_len(),
        dynamic_fields = registry.dynamic_len(),
        "Field mapping registry ready"
    );

    let compiler = config.compiler_config(file_config.compiler);
    Ok(QueryManager::new(Arc::new(registry), compiler))
}

/// Compiles a criteria document and renders the output.
///
/// Returns the search body, or an empty string in check mode.
pub fn run(config: &CliConfig, input: &str) -> anyhow::Result<String> {
    let tree: SearchNode =
        serde_json::from_str(input).context("Criteria document is not a valid search tree")?;
    let manager = build_manager(config)?;

    if config.check {
        manager.validate(&tree)?;
        return Ok(String::new());
    }

    let compiled = manager.compile(&tree)?;
    if !compiled.is_complete() {
        info!(
            skipped = compiled.diagnostics.len(),
            index = ?config.index,
            "Some items do not apply to the target index"
        );
    }

    let body = compiled.to_search_body();
    let output = if config.pretty {
        serde_json::to_string_pretty(&body)?
    } else {
        serde_json::to_string(&body)?
    };
    Ok(output)
}
