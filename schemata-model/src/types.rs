//! Primitive attribute types and their coercion rules.

use serde_json::Value;
use std::fmt;

use crate::definition::TypeSpec;
use crate::error::{SchemaViolation, TypeCoercionError};
use crate::options::ValidateOptions;

const TRUE_WORDS: [&str; 3] = ["on", "yes", "true"];
const FALSE_WORDS: [&str; 3] = ["off", "no", "false"];

/// The closed set of value types an attribute can declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveType {
    Boolean,
    Enum(EnumType),
    String,
    Integer,
}

impl PrimitiveType {
    /// Looks up a named type (`Boolean`, `String`, `Integer`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Boolean" => Some(Self::Boolean),
            "String" => Some(Self::String),
            "Integer" => Some(Self::Integer),
            _ => None,
        }
    }

    /// Builds the type described by a definition entry. `owner` names the
    /// attribute in the error.
    pub fn from_spec(owner: &str, spec: &TypeSpec) -> Result<Self, SchemaViolation> {
        match spec {
            TypeSpec::Named(name) => Self::from_name(name).ok_or_else(|| {
                SchemaViolation::invalid_definition(owner, format!("unknown type '{name}'"))
            }),
            TypeSpec::Enum(tags) => EnumType::new(tags.clone())
                .map(Self::Enum)
                .map_err(|reason| SchemaViolation::invalid_definition(owner, reason)),
        }
    }

    /// The definition form of this type, the inverse of [`from_spec`](Self::from_spec).
    pub fn to_spec(&self) -> TypeSpec {
        match self {
            Self::Enum(e) => TypeSpec::Enum(e.tags.clone()),
            other => TypeSpec::Named(other.name().to_string()),
        }
    }

    /// Short type name used in definitions and messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Enum(_) => "Enum",
            Self::String => "String",
            Self::Integer => "Integer",
        }
    }

    /// Coerces `raw` with default options.
    pub fn validate(&self, raw: &Value) -> Result<Value, TypeCoercionError> {
        self.validate_with(raw, &ValidateOptions::default())
    }

    /// Coerces `raw` into the canonical value of this type.
    pub fn validate_with(
        &self,
        raw: &Value,
        options: &ValidateOptions,
    ) -> Result<Value, TypeCoercionError> {
        match self {
            Self::Boolean => coerce_bool(raw).map(Value::Bool),
            Self::Enum(e) => e.validate(raw, options.enum_as_int),
            Self::String => match raw {
                Value::String(_) => Ok(raw.clone()),
                _ => Err(TypeCoercionError::new(self.to_string(), raw)),
            },
            Self::Integer => coerce_int(raw)
                .map(Value::from)
                .ok_or_else(|| TypeCoercionError::new(self.to_string(), raw)),
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum(e) => write!(f, "Enum[{}]", e.tags.join(", ")),
            other => f.write_str(other.name()),
        }
    }
}

fn coerce_bool(raw: &Value) -> Result<bool, TypeCoercionError> {
    match raw {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => {
            let word = s.to_ascii_lowercase();
            if TRUE_WORDS.contains(&word.as_str()) {
                Ok(true)
            } else if FALSE_WORDS.contains(&word.as_str()) {
                Ok(false)
            } else {
                Err(TypeCoercionError::new("Boolean", raw))
            }
        }
        _ => Err(TypeCoercionError::new("Boolean", raw)),
    }
}

fn coerce_int(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// An enumerated type: an ordered list of distinct tags.
///
/// Values may be given as a tag or as the tag's index. The canonical form is
/// the tag unless `enum_as_int` is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    tags: Vec<String>,
}

impl EnumType {
    /// Creates an enum type. Fails if `tags` is empty or has repeats.
    pub fn new<I, S>(tags: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        if tags.is_empty() {
            return Err("enum type needs at least one tag".into());
        }
        for (i, tag) in tags.iter().enumerate() {
            if tags[..i].contains(tag) {
                return Err(format!("enum tag '{tag}' is repeated"));
            }
        }
        Ok(Self { tags })
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Index of `tag`, if it is one of ours.
    pub fn position(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|t| t == tag)
    }

    pub fn validate(&self, raw: &Value, enum_as_int: bool) -> Result<Value, TypeCoercionError> {
        let index = match raw {
            Value::String(s) => self.position(s),
            Value::Number(n) => n
                .as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .filter(|&i| i < self.tags.len()),
            _ => None,
        };
        let index = index.ok_or_else(|| {
            TypeCoercionError::new(PrimitiveType::Enum(self.clone()).to_string(), raw)
        })?;

        if enum_as_int {
            Ok(Value::from(index))
        } else {
            Ok(Value::String(self.tags[index].clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bool_words_are_case_insensitive() {
        let b = PrimitiveType::Boolean;
        assert_eq!(b.validate(&json!("ON")).unwrap(), json!(true));
        assert_eq!(b.validate(&json!("False")).unwrap(), json!(false));
        assert!(b.validate(&json!(1)).is_err());
    }

    #[test]
    fn integer_accepts_numeric_strings() {
        let i = PrimitiveType::Integer;
        assert_eq!(i.validate(&json!(" 42 ")).unwrap(), json!(42));
        assert_eq!(i.validate(&json!(-7)).unwrap(), json!(-7));
        assert!(i.validate(&json!(1.5)).is_err());
        assert!(i.validate(&json!("4x")).is_err());
        assert!(i.validate(&json!(true)).is_err());
    }

    #[test]
    fn string_rejects_other_shapes() {
        let s = PrimitiveType::String;
        assert_eq!(s.validate(&json!("amqp")).unwrap(), json!("amqp"));
        assert!(s.validate(&json!(5)).is_err());
        assert!(s.validate(&json!(["a"])).is_err());
    }

    #[test]
    fn enum_rejects_empty_and_repeated_tags() {
        assert!(EnumType::new(Vec::<String>::new()).is_err());
        assert!(EnumType::new(["a", "b", "a"]).is_err());
    }

    #[test]
    fn enum_rejects_negative_index() {
        let e = EnumType::new(["a", "b"]).unwrap();
        assert!(e.validate(&json!(-1), false).is_err());
        assert!(e.validate(&json!(true), false).is_err());
    }

    #[test]
    fn display_names_enum_tags() {
        let e = PrimitiveType::Enum(EnumType::new(["x", "y"]).unwrap());
        assert_eq!(e.to_string(), "Enum[x, y]");
        assert_eq!(PrimitiveType::Integer.to_string(), "Integer");
    }

    #[test]
    fn unknown_type_name_is_a_definition_error() {
        let err = PrimitiveType::from_spec("port", &TypeSpec::Named("Float".into())).unwrap_err();
        assert!(matches!(err, SchemaViolation::InvalidDefinition { .. }));
    }
}
