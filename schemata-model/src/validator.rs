//! Whole-model validation.
//!
//! Runs in two passes:
//! 1. every entity is normalized against its entity type, in input order;
//! 2. the normalized model is walked again, in input order, checking the
//!    singleton rule for each entity and then each of its unique attributes
//!    in resolved attribute order.
//!
//! The first violation found aborts the call, so error reporting is stable
//! for a given input.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

use crate::entity::Entity;
use crate::entity_type::EntityType;
use crate::error::{Result, SchemaViolation};
use crate::options::ValidateOptions;
use crate::schema::Schema;

/// An entity after normalization: short type name plus canonical attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedEntity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub attributes: Map<String, Value>,
}

/// Validates entity collections against one schema.
///
/// Holds no state between calls and keeps no reference to the entities it
/// was given.
pub struct ModelValidator<'a> {
    schema: &'a Schema,
    options: ValidateOptions,
}

impl<'a> ModelValidator<'a> {
    /// Creates a validator with default options.
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            options: ValidateOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ValidateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ValidateOptions {
        &self.options
    }

    /// Validates `entities` as one model and returns them normalized, in
    /// input order.
    ///
    /// # Errors
    ///
    /// - `TypeCoercionError` if an attribute value does not fit its type
    /// - `SchemaViolation` for unknown entity types or attributes, missing
    ///   required attributes, duplicate unique values and repeated singletons
    pub fn validate(&self, entities: &[Entity<'_>]) -> Result<Vec<NormalizedEntity>> {
        let mut resolved: Vec<(&EntityType, Map<String, Value>)> =
            Vec::with_capacity(entities.len());
        for entity in entities {
            let entity_type = self.schema.require_entity_type(entity.entity_type())?;
            trace!("Validating {} entity", entity_type.name());
            let attributes = entity_type.validate_with(entity.attributes(), &self.options)?;
            resolved.push((entity_type, attributes));
        }

        self.check_model(&resolved)?;

        debug!("Validated model of {} entities", resolved.len());
        Ok(resolved
            .into_iter()
            .map(|(entity_type, attributes)| NormalizedEntity {
                entity_type: entity_type.name().to_string(),
                attributes,
            })
            .collect())
    }

    fn check_model(&self, resolved: &[(&EntityType, Map<String, Value>)]) -> Result<()> {
        let mut singletons_seen: HashSet<&str> = HashSet::new();
        // (entity type, attribute) -> canonical JSON of values seen so far
        let mut unique_seen: HashMap<(&str, &str), HashSet<String>> = HashMap::new();

        for (entity_type, attributes) in resolved {
            if self.options.check_singleton
                && entity_type.is_singleton()
                && !singletons_seen.insert(entity_type.name())
            {
                let name = entity_type.name().to_string();
                return Err(SchemaViolation::DuplicateSingleton(name).into());
            }

            if !self.options.check_unique {
                continue;
            }
            for attr in entity_type.unique_attributes() {
                let Some(value) = attributes.get(attr.name()) else {
                    continue;
                };
                let key = value.to_string();
                let seen = unique_seen
                    .entry((entity_type.name(), attr.name()))
                    .or_default();
                if !seen.insert(key.clone()) {
                    return Err(SchemaViolation::DuplicateUnique {
                        entity_type: entity_type.name().to_string(),
                        attribute: attr.name().to_string(),
                        value: key,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}
