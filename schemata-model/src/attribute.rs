use serde_json::Value;

use crate::definition::AttributeSpec;
use crate::error::{Error, Result, SchemaViolation};
use crate::options::ValidateOptions;
use crate::types::PrimitiveType;

/// A named, typed attribute with an optional default and constraint flags.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDef {
    name: String,
    ty: PrimitiveType,
    default: Option<Value>,
    required: bool,
    unique: bool,
}

impl AttributeDef {
    /// Creates an optional, non-unique attribute with no default.
    pub fn new(name: impl Into<String>, ty: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            required: false,
            unique: false,
        }
    }

    /// Sets the default. The value is coerced through the attribute's type
    /// here, so a default is always a canonical value of that type.
    pub fn with_default(mut self, default: Value) -> Result<Self> {
        if default.is_null() {
            self.default = None;
            return Ok(self);
        }
        let coerced = self.ty.validate(&default).map_err(|e| {
            SchemaViolation::invalid_definition(&self.name, format!("bad default: {e}"))
        })?;
        self.default = Some(coerced);
        Ok(self)
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Builds an attribute from its definition entry.
    pub fn from_spec(name: &str, spec: &AttributeSpec) -> Result<Self> {
        let ty = PrimitiveType::from_spec(name, &spec.ty)?;
        let attr = Self::new(name, ty)
            .required(spec.required)
            .unique(spec.unique);
        match &spec.default {
            Some(default) => attr.with_default(default.clone()),
            None => Ok(attr),
        }
    }

    /// The definition entry for this attribute.
    pub fn to_spec(&self) -> AttributeSpec {
        AttributeSpec {
            ty: self.ty.to_spec(),
            default: self.default.clone(),
            required: self.required,
            unique: self.unique,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &PrimitiveType {
        &self.ty
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Validates a supplied (or missing) value with default options.
    pub fn validate(&self, raw: Option<&Value>) -> Result<Option<Value>> {
        self.validate_with(raw, &ValidateOptions::default())
    }

    /// Validates a supplied (or missing) value.
    ///
    /// `None` and JSON `null` both mean "not supplied". A missing value yields
    /// the default when `add_default` is on. Otherwise it fails if the
    /// attribute is required and `check_required` is on, or stays absent.
    pub fn validate_with(
        &self,
        raw: Option<&Value>,
        options: &ValidateOptions,
    ) -> Result<Option<Value>> {
        match raw.filter(|v| !v.is_null()) {
            Some(value) => self
                .ty
                .validate_with(value, options)
                .map(Some)
                .map_err(|e| Error::from(e.for_attribute(&self.name))),
            None => match &self.default {
                Some(default) if options.add_default => Ok(Some(default.clone())),
                _ if self.required && options.check_required => {
                    Err(SchemaViolation::MissingRequired {
                        attribute: self.name.clone(),
                        entity_type: None,
                    }
                    .into())
                }
                _ => Ok(None),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::TypeSpec;
    use serde_json::json;

    #[test]
    fn default_is_coerced_once_at_construction() {
        let a = AttributeDef::new("port", PrimitiveType::Integer)
            .with_default(json!("5672"))
            .unwrap();
        assert_eq!(a.default_value(), Some(&json!(5672)));
    }

    #[test]
    fn bad_default_is_a_definition_error() {
        let err = AttributeDef::new("enabled", PrimitiveType::Boolean)
            .with_default(json!("maybe"))
            .unwrap_err();
        assert!(matches!(
            err.as_violation(),
            Some(SchemaViolation::InvalidDefinition { name, .. }) if name == "enabled"
        ));
    }

    #[test]
    fn add_default_off_leaves_value_absent() {
        let a = AttributeDef::new("foo", PrimitiveType::String)
            .with_default(json!("FOO"))
            .unwrap();
        let opts = ValidateOptions {
            add_default: false,
            ..ValidateOptions::default()
        };
        assert_eq!(a.validate_with(None, &opts).unwrap(), None);
    }

    #[test]
    fn check_required_off_allows_missing() {
        let a = AttributeDef::new("req", PrimitiveType::Integer).required(true);
        let opts = ValidateOptions {
            check_required: false,
            ..ValidateOptions::default()
        };
        assert_eq!(a.validate_with(None, &opts).unwrap(), None);
    }

    #[test]
    fn spec_roundtrip() {
        let spec = AttributeSpec::new(TypeSpec::tags(["a", "b"]))
            .with_default("b")
            .unique();
        let a = AttributeDef::from_spec("mode", &spec).unwrap();
        assert_eq!(a.to_spec(), spec);
    }
}
