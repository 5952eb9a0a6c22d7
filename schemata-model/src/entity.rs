use serde_json::{Map, Value};

use crate::schema::Schema;

/// An entity instance awaiting validation: a type name and raw attributes,
/// bound to the schema it is meant for.
///
/// Entities are plain data; validation happens in
/// [`EntityType::validate`](crate::EntityType::validate) and
/// [`Schema::validate`].
#[derive(Debug, Clone)]
pub struct Entity<'s> {
    entity_type: String,
    attributes: Map<String, Value>,
    schema: &'s Schema,
}

impl<'s> Entity<'s> {
    pub fn new(
        entity_type: impl Into<String>,
        attributes: Map<String, Value>,
        schema: &'s Schema,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            attributes,
            schema,
        }
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Raw value of one attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }
}
