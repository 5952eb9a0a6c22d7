//! schemata: validate entity models against a schema definition.
//!
//! Usage:
//!   schemata dump --schema schema.json
//!   schemata check --schema schema.json --model model.json
//!
//! Exits non-zero and prints the first error when validation fails.

use anyhow::Result;
use clap::{Parser, Subcommand};
use schemata_cli::{Config, DEFAULT_CONFIG_FILE};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "schemata")]
#[command(about = "Validate entity models against a schema definition")]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the schema with every include flattened
    Dump {
        /// Schema definition file (JSON)
        #[arg(short, long)]
        schema: PathBuf,
    },
    /// Validate a model file and print the normalized entities
    Check {
        /// Schema definition file (JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Model file: JSON array of {"type": ..., "attributes": {...}}
        #[arg(short, long)]
        model: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = Config::load_from(&args.config)?;
    debug!("Using config {:?}", config);

    let output = match &args.command {
        Command::Dump { schema } => schemata_cli::dump(schema, &config)?,
        Command::Check { schema, model } => schemata_cli::check(schema, model, &config)?,
    };
    println!("{output}");
    Ok(())
}
