//! esearch
//!
//! Compiles a search criteria tree into an Elasticsearch query body.

use clap::Parser;
use esearch_cli::{CliConfig, init_logging, read_input, run};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(2);
    }

    let input = read_input(&config)?;
    let output = run(&config, &input)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
