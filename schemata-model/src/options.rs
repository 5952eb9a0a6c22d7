use serde::{Deserialize, Serialize};

/// Per-call switches for attribute, entity and model validation.
///
/// The defaults give full checking with enum values reported as tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateOptions {
    /// Report enum values as their zero-based index instead of the tag.
    pub enum_as_int: bool,
    /// Fail when a required attribute without a default is missing.
    pub check_required: bool,
    /// Fill in defaults for missing attributes.
    pub add_default: bool,
    /// Enforce distinct values for unique attributes across a model.
    pub check_unique: bool,
    /// Enforce at most one instance of each singleton entity type.
    pub check_singleton: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            enum_as_int: false,
            check_required: true,
            add_default: true,
            check_unique: true,
            check_singleton: true,
        }
    }
}

impl ValidateOptions {
    /// Default options with enum values reported as indices.
    #[must_use]
    pub fn enum_as_int() -> Self {
        Self {
            enum_as_int: true,
            ..Self::default()
        }
    }
}
