//! Command implementations for the `schemata` binary.
//!
//! The binary only parses arguments and sets up logging; everything that
//! touches files or the validation engine lives here so it can be tested.

pub mod config;
pub mod loader;

use anyhow::{Context, Result};
use schemata_model::{Entity, ModelValidator};
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub use config::{Config, OutputConfig, DEFAULT_CONFIG_FILE};
pub use loader::{load_model, load_schema, EntityRecord};

/// Loads a schema and returns its flattened definition as JSON text.
pub fn dump(schema_path: &Path, config: &Config) -> Result<String> {
    let schema = load_schema(schema_path)?;
    render(&schema.dump(), config)
}

/// Loads a schema and a model, validates the model and returns the
/// normalized entities as JSON text.
pub fn check(schema_path: &Path, model_path: &Path, config: &Config) -> Result<String> {
    let schema = load_schema(schema_path)?;
    let records = load_model(model_path)?;
    let entities: Vec<Entity<'_>> = records.iter().map(|r| r.to_entity(&schema)).collect();

    let normalized = ModelValidator::new(&schema)
        .with_options(config.validation)
        .validate(&entities)
        .with_context(|| format!("model {} is invalid", model_path.display()))?;
    info!("Model {:?} is valid ({} entities)", model_path, normalized.len());

    render(&normalized, config)
}

fn render<T: Serialize>(value: &T, config: &Config) -> Result<String> {
    let text = if config.output.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
