//! Schema-driven validation for declarative entity models.
//!
//! A [`Schema`] describes the entity types a model may contain:
//! - [`PrimitiveType`]: the value types (`Boolean`, `Enum`, `String`, `Integer`) and their coercions
//! - [`AttributeDef`]: a typed attribute with an optional default, `required` and `unique` flags
//! - [`EntityType`]: a flat attribute list built from include groups plus its own attributes
//! - [`Entity`]: a raw instance bound to a schema, the unit of validation
//! - [`ModelValidator`]: checks a whole model, including uniqueness and singleton rules
//!
//! Schemas are built from a [`SchemaDefinition`] (usually parsed from JSON)
//! and dump back to one. Loading definitions from disk is left to callers.

mod attribute;
mod definition;
mod entity;
mod entity_type;
mod error;
mod options;
mod schema;
mod types;
mod validator;

pub use attribute::AttributeDef;
pub use definition::{AttributeSpec, EntityTypeSpec, OrderedMap, SchemaDefinition, TypeSpec};
pub use entity::Entity;
pub use entity_type::EntityType;
pub use error::{Error, Result, SchemaViolation, TypeCoercionError};
pub use options::ValidateOptions;
pub use schema::{IncludeGroup, Schema};
pub use types::{EnumType, PrimitiveType};
pub use validator::{ModelValidator, NormalizedEntity};
