//! The external definition shape a [`Schema`](crate::Schema) is built from
//! and dumped back to.
//!
//! ```json
//! {
//!   "prefix": "org.example",
//!   "includes": { "entity-id": { "name": {"type": "String", "required": true} } },
//!   "entity_types": {
//!     "listener": { "include": ["entity-id"], "attributes": { "addr": {"type": "String"} } }
//!   }
//! }
//! ```
//!
//! Attribute maps keep document order, which is the order attributes are
//! resolved in. Include groups hold each attribute declaration as raw JSON so
//! a schema can hand them back exactly as written.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;

/// Top-level schema definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDefinition {
    #[serde(default)]
    pub prefix: String,
    /// Group name → attribute name → attribute declaration, parsed as an
    /// [`AttributeSpec`] when the schema is built.
    #[serde(default)]
    pub includes: OrderedMap<OrderedMap<Value>>,
    #[serde(default)]
    pub entity_types: OrderedMap<EntityTypeSpec>,
}

impl SchemaDefinition {
    /// Adds (or replaces) an include group built from typed specs.
    #[must_use]
    pub fn with_include(
        mut self,
        name: impl Into<String>,
        attributes: OrderedMap<AttributeSpec>,
    ) -> Self {
        let raw = attributes
            .into_iter()
            .map(|(attr, spec)| (attr, spec.to_value()))
            .collect();
        self.includes.insert(name, raw);
        self
    }
}

/// Declaration of one entity type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityTypeSpec {
    #[serde(default, skip_serializing_if = "is_false")]
    pub singleton: bool,
    /// Include groups, resolved in listed order ahead of `attributes`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(default)]
    pub attributes: OrderedMap<AttributeSpec>,
}

/// Declaration of one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeSpec {
    #[serde(rename = "type")]
    pub ty: TypeSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub unique: bool,
}

impl AttributeSpec {
    pub fn new(ty: TypeSpec) -> Self {
        Self {
            ty,
            default: None,
            required: false,
            unique: false,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// The JSON form of this declaration, omitting unset fields.
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        let ty = match &self.ty {
            TypeSpec::Named(name) => Value::from(name.as_str()),
            TypeSpec::Enum(tags) => Value::from(tags.clone()),
        };
        obj.insert("type".into(), ty);
        if let Some(default) = &self.default {
            obj.insert("default".into(), default.clone());
        }
        if self.required {
            obj.insert("required".into(), Value::Bool(true));
        }
        if self.unique {
            obj.insert("unique".into(), Value::Bool(true));
        }
        Value::Object(obj)
    }
}

/// A primitive type reference: a type name or an inline list of enum tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    Named(String),
    Enum(Vec<String>),
}

impl TypeSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(tags.into_iter().map(Into::into).collect())
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A string-keyed map that remembers insertion order and serializes as a
/// JSON object. Duplicate keys are rejected when deserializing.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Inserts or replaces `key`. A replaced entry keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map with string keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, V)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    if entries.iter().any(|(k, _)| *k == key) {
                        return Err(serde::de::Error::custom(format!("duplicate key '{key}'")));
                    }
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ordered_map_keeps_document_order() {
        let map: OrderedMap<u32> = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn ordered_map_rejects_duplicate_keys() {
        let result: Result<OrderedMap<u32>, _> = serde_json::from_str(r#"{"a": 1, "a": 2}"#);
        assert!(result.unwrap_err().to_string().contains("duplicate key 'a'"));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut map = OrderedMap::new().with("a", 1).with("b", 2);
        assert_eq!(map.insert("a", 10), Some(1));
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![("a", &10), ("b", &2)]);
    }

    #[test]
    fn type_spec_is_name_or_tag_list() {
        let named: TypeSpec = serde_json::from_value(json!("Integer")).unwrap();
        assert_eq!(named, TypeSpec::named("Integer"));
        let tags: TypeSpec = serde_json::from_value(json!(["x", "y"])).unwrap();
        assert_eq!(tags, TypeSpec::tags(["x", "y"]));
    }

    #[test]
    fn attribute_spec_omits_false_flags() {
        let spec = AttributeSpec::new(TypeSpec::named("String")).required();
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({"type": "String", "required": true})
        );
    }

    #[test]
    fn to_value_matches_serialized_form() {
        let spec = AttributeSpec::new(TypeSpec::tags(["a", "b"]))
            .with_default("a")
            .unique();
        assert_eq!(spec.to_value(), serde_json::to_value(&spec).unwrap());
    }

    #[test]
    fn with_include_stores_declarations_as_json() {
        let def = SchemaDefinition::default().with_include(
            "entity-id",
            OrderedMap::new()
                .with("name", AttributeSpec::new(TypeSpec::named("String")).required()),
        );
        assert_eq!(
            def.includes.get("entity-id").unwrap().get("name"),
            Some(&json!({"type": "String", "required": true}))
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<AttributeSpec, _> =
            serde_json::from_value(json!({"type": "String", "requird": true}));
        assert!(result.is_err());
    }
}
