//! Reading schema definitions and model files from disk.

use anyhow::{Context, Result};
use schemata_model::{Entity, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

/// One entry of a model file: `{"type": "listener", "attributes": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityRecord {
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntityRecord {
    /// Binds this record to `schema` for validation.
    pub fn to_entity<'s>(&self, schema: &'s Schema) -> Entity<'s> {
        Entity::new(self.entity_type.clone(), self.attributes.clone(), schema)
    }
}

/// Loads and resolves a JSON schema definition file.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file {}", path.display()))?;
    let schema = Schema::from_json_str(&text)
        .with_context(|| format!("invalid schema file {}", path.display()))?;
    debug!(
        "Loaded schema from {:?} ({} entity types)",
        path,
        schema.entity_types().len()
    );
    Ok(schema)
}

/// Loads a model file: a JSON array of [`EntityRecord`]s.
pub fn load_model(path: &Path) -> Result<Vec<EntityRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read model file {}", path.display()))?;
    let records: Vec<EntityRecord> = serde_json::from_str(&text)
        .with_context(|| format!("invalid model file {}", path.display()))?;
    debug!("Loaded {} entities from {:?}", records.len(), path);
    Ok(records)
}
