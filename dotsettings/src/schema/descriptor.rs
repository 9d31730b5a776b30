//! Field declarations.

use serde_json::Value;

use super::{Constraint, FieldKind};

/// One declared field of a [`super::Schema`].
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    default: Option<Value>,
    required: bool,
    env_name: Option<String>,
    flatten: bool,
    sensitive: bool,
}

impl FieldDescriptor {
    /// Declare a required field without a default.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let sensitive = matches!(kind.unwrap_optional(), FieldKind::Constrained(c) if c.is_sensitive());
        Self {
            name: name.into(),
            kind,
            default: None,
            required: true,
            env_name: None,
            flatten: false,
            sensitive,
        }
    }

    /// Use `value` verbatim when no source provides the field.
    #[must_use]
    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Whether resolution fails when no source provides the field.
    ///
    /// Non-required fields without a default are omitted from the coerced
    /// mapping, leaving the decision to the structural decoder.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Read the field from exactly this env-name instead of a derived one.
    #[must_use]
    pub fn env_name(mut self, env_name: impl Into<String>) -> Self {
        self.env_name = Some(env_name.into());
        self
    }

    /// Resolve a nested field's sub-schema from its own field names instead
    /// of delimiter-joined keys.
    #[must_use]
    pub const fn flatten(mut self) -> Self {
        self.flatten = true;
        self
    }

    /// Mask the raw value of this field in diagnostics.
    #[must_use]
    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Field name as it appears in the coerced mapping.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Default value, if declared.
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether absence is an error: required, no default, and not optional.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required && self.default.is_none() && !self.kind.is_optional()
    }

    /// Explicit env-name override, if declared.
    #[must_use]
    pub fn env_name_override(&self) -> Option<&str> {
        self.env_name.as_deref()
    }

    /// Whether a nested sub-schema resolves without delimiter-joined keys.
    #[must_use]
    pub const fn is_flattened(&self) -> bool {
        self.flatten
    }

    /// Whether raw values are masked in diagnostics.
    #[must_use]
    pub const fn is_sensitive(&self) -> bool {
        self.sensitive
    }
}

impl From<Constraint> for FieldKind {
    fn from(constraint: Constraint) -> Self {
        Self::Constrained(constraint)
    }
}
