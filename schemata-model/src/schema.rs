//! The schema: include groups plus fully resolved entity types.

use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::attribute::AttributeDef;
use crate::definition::{AttributeSpec, OrderedMap, SchemaDefinition};
use crate::entity::Entity;
use crate::entity_type::EntityType;
use crate::error::{Error, Result, SchemaViolation};
use crate::options::ValidateOptions;
use crate::validator::ModelValidator;

/// A named, reusable bundle of attribute definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeGroup {
    name: String,
    attributes: Vec<AttributeDef>,
}

impl IncludeGroup {
    pub fn new(name: impl Into<String>, attributes: Vec<AttributeDef>) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[AttributeDef] {
        &self.attributes
    }
}

/// A resolved, immutable schema.
///
/// Built once from a [`SchemaDefinition`]; every entity type's include
/// references are flattened at that point. A `Schema` can be shared across
/// threads and validated against concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    prefix: String,
    includes: Vec<IncludeGroup>,
    include_definitions: OrderedMap<OrderedMap<Value>>,
    entity_types: Vec<EntityType>,
    by_name: HashMap<String, usize>,
}

impl Schema {
    /// Builds a schema from a definition, resolving all includes.
    pub fn new(definition: SchemaDefinition) -> Result<Self> {
        let mut includes: Vec<IncludeGroup> = Vec::with_capacity(definition.includes.len());
        for (group_name, attrs) in definition.includes.iter() {
            let attributes = attrs
                .iter()
                .map(|(name, raw)| {
                    let spec: AttributeSpec = serde_json::from_value(raw.clone())
                        .map_err(|e| SchemaViolation::invalid_definition(name, e.to_string()))?;
                    AttributeDef::from_spec(name, &spec)
                })
                .collect::<Result<Vec<_>>>()?;
            includes.push(IncludeGroup::new(group_name, attributes));
        }

        let mut entity_types = Vec::with_capacity(definition.entity_types.len());
        let mut by_name = HashMap::with_capacity(definition.entity_types.len());
        for (type_name, spec) in definition.entity_types.iter() {
            let entity_type = EntityType::from_spec(type_name, spec, &includes)?;
            by_name.insert(type_name.to_string(), entity_types.len());
            entity_types.push(entity_type);
        }

        debug!(
            "Built schema '{}' with {} include groups and {} entity types",
            definition.prefix,
            includes.len(),
            entity_types.len()
        );

        Ok(Self {
            prefix: definition.prefix,
            includes,
            include_definitions: definition.includes,
            entity_types,
            by_name,
        })
    }

    /// Parses a JSON definition document and builds the schema.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let definition: SchemaDefinition = serde_json::from_str(json)?;
        Self::new(definition)
    }

    /// Builds the schema from an already parsed JSON definition.
    pub fn from_value(value: Value) -> Result<Self> {
        let definition: SchemaDefinition = serde_json::from_value(value)?;
        Self::new(definition)
    }

    /// The definition this schema is equivalent to, with every entity type
    /// flattened (no `include` lists remain).
    ///
    /// Include groups are returned exactly as they were given. Flattened
    /// attributes keep their `unique` flag, so `Schema::new(s.dump())` always
    /// rebuilds an equal dump.
    pub fn dump(&self) -> SchemaDefinition {
        SchemaDefinition {
            prefix: self.prefix.clone(),
            includes: self.include_definitions.clone(),
            entity_types: self
                .entity_types
                .iter()
                .map(|t| (t.name(), t.to_spec()))
                .collect(),
        }
    }

    /// [`dump`](Self::dump) as a JSON value.
    pub fn dump_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.dump())?)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn include_groups(&self) -> &[IncludeGroup] {
        &self.includes
    }

    pub fn include_group(&self, name: &str) -> Option<&IncludeGroup> {
        self.includes.iter().find(|g| g.name() == name)
    }

    pub fn entity_types(&self) -> &[EntityType] {
        &self.entity_types
    }

    /// Looks up an entity type by short name or by prefixed long name.
    pub fn entity_type(&self, name: &str) -> Option<&EntityType> {
        self.by_name
            .get(name)
            .or_else(|| self.by_name.get(self.short_name(name)))
            .map(|&i| &self.entity_types[i])
    }

    /// Like [`entity_type`](Self::entity_type) but an unknown name is a
    /// schema violation.
    pub fn require_entity_type(&self, name: &str) -> Result<&EntityType> {
        self.entity_type(name)
            .ok_or_else(|| Error::from(SchemaViolation::UnknownEntityType(name.to_string())))
    }

    /// `listener` → `org.example.listener`. Names that already carry the
    /// prefix, and all names when the prefix is empty, are returned as is.
    pub fn long_name(&self, name: &str) -> String {
        if self.prefix.is_empty() || name.starts_with(&format!("{}.", self.prefix)) {
            name.to_string()
        } else {
            format!("{}.{}", self.prefix, name)
        }
    }

    /// `org.example.listener` → `listener`. Names without the prefix are
    /// returned as is.
    pub fn short_name<'a>(&self, name: &'a str) -> &'a str {
        if self.prefix.is_empty() {
            return name;
        }
        name.strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(name)
    }

    /// Validates a whole model with default options.
    ///
    /// Each entity is normalized against its entity type, then the model is
    /// checked for duplicate unique values and repeated singletons.
    pub fn validate(&self, entities: &[Entity<'_>]) -> Result<()> {
        ModelValidator::new(self).validate(entities).map(|_| ())
    }

    /// Validates a whole model with the given options.
    pub fn validate_with(&self, entities: &[Entity<'_>], options: ValidateOptions) -> Result<()> {
        ModelValidator::new(self)
            .with_options(options)
            .validate(entities)
            .map(|_| ())
    }
}
