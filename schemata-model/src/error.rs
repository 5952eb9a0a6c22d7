//! Error types for schema construction and model validation.
//!
//! Two kinds never mix: [`TypeCoercionError`] means a value could not be read
//! as its declared primitive type, [`SchemaViolation`] means the schema or the
//! model breaks a structural rule. [`Error`] wraps both for callers that do
//! not care which one they got.

use serde_json::Value;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// A supplied value cannot be interpreted as the declared primitive type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot coerce {value} to {expected}{}{}", attribute_ctx(.attribute), entity_ctx(.entity_type))]
pub struct TypeCoercionError {
    /// Name of the declared type, e.g. `Boolean` or `Enum[a, b]`.
    pub expected: String,
    /// The offending raw value.
    pub value: Value,
    pub attribute: Option<String>,
    pub entity_type: Option<String>,
}

impl TypeCoercionError {
    pub(crate) fn new(expected: impl Into<String>, value: &Value) -> Self {
        Self {
            expected: expected.into(),
            value: value.clone(),
            attribute: None,
            entity_type: None,
        }
    }

    pub(crate) fn for_attribute(mut self, attribute: &str) -> Self {
        self.attribute.get_or_insert_with(|| attribute.to_string());
        self
    }
}

/// A structural or invariant violation at the schema or model level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("missing required attribute '{attribute}' with no default{}", entity_ctx(.entity_type))]
    MissingRequired {
        attribute: String,
        entity_type: Option<String>,
    },

    #[error("entity type '{entity_type}' includes unknown group '{include}'")]
    UnknownInclude { entity_type: String, include: String },

    #[error("attribute '{attribute}' is defined more than once in entity type '{entity_type}'")]
    DuplicateAttribute {
        entity_type: String,
        attribute: String,
    },

    #[error("unknown entity type '{0}'")]
    UnknownEntityType(String),

    #[error("attribute '{attribute}' is not declared on entity type '{entity_type}'")]
    UnknownAttribute {
        entity_type: String,
        attribute: String,
    },

    #[error("duplicate value {value} for unique attribute '{attribute}' of entity type '{entity_type}'")]
    DuplicateUnique {
        entity_type: String,
        attribute: String,
        value: String,
    },

    #[error("more than one instance of singleton entity type '{0}'")]
    DuplicateSingleton(String),

    #[error("invalid definition of '{name}': {reason}")]
    InvalidDefinition { name: String, reason: String },
}

impl SchemaViolation {
    pub(crate) fn invalid_definition(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Coercion(#[from] TypeCoercionError),

    #[error(transparent)]
    Violation(#[from] SchemaViolation),

    /// The definition document itself could not be parsed.
    #[error("malformed schema definition: {0}")]
    Definition(#[from] serde_json::Error),
}

impl Error {
    /// Returns the coercion error, if this is one.
    pub fn as_coercion(&self) -> Option<&TypeCoercionError> {
        match self {
            Error::Coercion(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the schema violation, if this is one.
    pub fn as_violation(&self) -> Option<&SchemaViolation> {
        match self {
            Error::Violation(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_coercion(&self) -> bool {
        matches!(self, Error::Coercion(_))
    }

    pub fn is_violation(&self) -> bool {
        matches!(self, Error::Violation(_))
    }

    /// Attaches the entity type name to errors that were raised below the
    /// entity type level and do not know it yet.
    pub(crate) fn in_entity_type(self, name: &str) -> Self {
        match self {
            Error::Coercion(mut e) => {
                e.entity_type.get_or_insert_with(|| name.to_string());
                Error::Coercion(e)
            }
            Error::Violation(SchemaViolation::MissingRequired {
                attribute,
                entity_type,
            }) => Error::Violation(SchemaViolation::MissingRequired {
                attribute,
                entity_type: entity_type.or_else(|| Some(name.to_string())),
            }),
            other => other,
        }
    }
}

fn attribute_ctx(attribute: &Option<String>) -> String {
    attribute
        .as_deref()
        .map(|a| format!(" for attribute '{a}'"))
        .unwrap_or_default()
}

fn entity_ctx(entity_type: &Option<String>) -> String {
    entity_type
        .as_deref()
        .map(|t| format!(" in entity type '{t}'"))
        .unwrap_or_default()
}
