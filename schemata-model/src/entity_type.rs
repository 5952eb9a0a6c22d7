use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::attribute::AttributeDef;
use crate::definition::{EntityTypeSpec, OrderedMap};
use crate::error::{Error, Result, SchemaViolation};
use crate::options::ValidateOptions;
use crate::schema::{IncludeGroup, Schema};

/// A named entity shape: a flat, ordered attribute list and a singleton flag.
///
/// Include groups are copied in when the type is built, so validation never
/// looks back at the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityType {
    name: String,
    attributes: Vec<AttributeDef>,
    index: HashMap<String, usize>,
    singleton: bool,
}

impl EntityType {
    /// Builds an entity type whose attributes are the attributes of each
    /// group in `include` (in listed order) followed by `attributes`.
    ///
    /// Fails if an include group is not defined on `schema` or if two
    /// attributes end up with the same name.
    pub fn new(
        name: impl Into<String>,
        schema: &Schema,
        attributes: Vec<AttributeDef>,
        include: &[&str],
        singleton: bool,
    ) -> Result<Self> {
        Self::resolve(name.into(), schema.include_groups(), attributes, include, singleton)
    }

    pub(crate) fn resolve<S: AsRef<str>>(
        name: String,
        groups: &[IncludeGroup],
        own: Vec<AttributeDef>,
        include: &[S],
        singleton: bool,
    ) -> Result<Self> {
        let mut merged = Vec::new();
        for group_name in include {
            let group_name = group_name.as_ref();
            let group = groups
                .iter()
                .find(|g| g.name() == group_name)
                .ok_or_else(|| SchemaViolation::UnknownInclude {
                    entity_type: name.clone(),
                    include: group_name.to_string(),
                })?;
            merged.extend(group.attributes().iter().cloned());
        }
        merged.extend(own);

        let mut index = HashMap::with_capacity(merged.len());
        for (i, attr) in merged.iter().enumerate() {
            if index.insert(attr.name().to_string(), i).is_some() {
                return Err(SchemaViolation::DuplicateAttribute {
                    entity_type: name,
                    attribute: attr.name().to_string(),
                }
                .into());
            }
        }

        Ok(Self {
            name,
            attributes: merged,
            index,
            singleton,
        })
    }

    pub(crate) fn from_spec(
        name: &str,
        spec: &EntityTypeSpec,
        groups: &[IncludeGroup],
    ) -> Result<Self> {
        let own = spec
            .attributes
            .iter()
            .map(|(attr_name, attr_spec)| AttributeDef::from_spec(attr_name, attr_spec))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| e.in_entity_type(name))?;
        Self::resolve(name.to_string(), groups, own, spec.include.as_slice(), spec.singleton)
    }

    /// The flattened definition entry: no includes, every attribute inline.
    pub fn to_spec(&self) -> EntityTypeSpec {
        EntityTypeSpec {
            singleton: self.singleton,
            include: Vec::new(),
            attributes: self
                .attributes
                .iter()
                .map(|a| (a.name(), a.to_spec()))
                .collect::<OrderedMap<_>>(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    /// Resolved attributes, include-contributed first.
    pub fn attributes(&self) -> &[AttributeDef] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.index.get(name).map(|&i| &self.attributes[i])
    }

    /// Attributes marked unique, in resolved order.
    pub fn unique_attributes(&self) -> impl Iterator<Item = &AttributeDef> {
        self.attributes.iter().filter(|a| a.is_unique())
    }

    /// Normalizes a raw attribute map with default options.
    pub fn validate(&self, raw: &Map<String, Value>) -> Result<Map<String, Value>> {
        self.validate_with(raw, &ValidateOptions::default())
    }

    /// Normalizes a raw attribute map.
    ///
    /// Every declared attribute is validated; attributes that come out
    /// absent are left out of the result. Undeclared input attributes are
    /// rejected.
    pub fn validate_with(
        &self,
        raw: &Map<String, Value>,
        options: &ValidateOptions,
    ) -> Result<Map<String, Value>> {
        if let Some(extra) = raw.keys().find(|k| !self.index.contains_key(k.as_str())) {
            return Err(SchemaViolation::UnknownAttribute {
                entity_type: self.name.clone(),
                attribute: extra.clone(),
            }
            .into());
        }

        let mut normalized = Map::new();
        for attr in &self.attributes {
            let value = attr
                .validate_with(raw.get(attr.name()), options)
                .map_err(|e: Error| e.in_entity_type(&self.name))?;
            if let Some(value) = value {
                normalized.insert(attr.name().to_string(), value);
            }
        }
        Ok(normalized)
    }
}
