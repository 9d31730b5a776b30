//! Per-field resolution strategies.

use serde_json::Value;

use crate::names::NameRules;
use crate::schema::{FieldDescriptor, FieldKind, Schema};

/// How a planned field obtains its value.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Strategy {
    /// Coerce the raw value found under the field's env-name.
    Scalar,
    /// Resolve a sub-schema field by field, optionally on top of a JSON
    /// object found under the field's own env-name.
    Nested(Vec<FieldPlan>),
}

/// Precomputed lookup and conversion strategy for one schema field.
#[derive(Debug, Clone)]
pub struct FieldPlan {
    name: String,
    path: String,
    candidates: Vec<String>,
    kind: FieldKind,
    strategy: Strategy,
    default: Option<Value>,
    required: bool,
    sensitive: bool,
}

impl FieldPlan {
    /// Field name as it appears in the coerced mapping.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted path from the root schema, for example `database.port`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Env-names consulted, in lookup order.
    #[must_use]
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Declared type.
    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Resolution strategy.
    #[must_use]
    pub const fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Default used verbatim when nothing is present.
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether absence fails resolution.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the declared type admits absence.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.kind.is_optional()
    }

    /// Whether raw values are masked in diagnostics.
    #[must_use]
    pub const fn is_sensitive(&self) -> bool {
        self.sensitive
    }
}

/// Plan every field of `schema` found under `name_path` and `field_path`.
///
/// `name_path` drives env-name derivation and restarts at a flattened
/// nested field; `field_path` always tracks the full dotted location.
pub(super) fn plan_fields(
    schema: &Schema,
    rules: NameRules<'_>,
    name_path: &[&str],
    field_path: &[&str],
) -> Vec<FieldPlan> {
    schema
        .fields()
        .iter()
        .map(|field| plan_field(field, rules, name_path, field_path))
        .collect()
}

fn plan_field(
    field: &FieldDescriptor,
    rules: NameRules<'_>,
    name_path: &[&str],
    field_path: &[&str],
) -> FieldPlan {
    let own_names: Vec<&str> = name_path.iter().copied().chain([field.name()]).collect();
    let own_path: Vec<&str> = field_path.iter().copied().chain([field.name()]).collect();
    let candidates = rules.candidates(&own_names, field.env_name_override());

    let strategy = match field.kind().unwrap_optional() {
        FieldKind::Nested(sub) => {
            let child_names: &[&str] = if field.is_flattened() { &[] } else { &own_names };
            Strategy::Nested(plan_fields(sub, rules, child_names, &own_path))
        }
        _ => Strategy::Scalar,
    };

    FieldPlan {
        name: field.name().to_owned(),
        path: own_path.join("."),
        candidates,
        kind: field.kind().clone(),
        strategy,
        default: field.default_value().cloned(),
        required: field.is_required(),
        sensitive: field.is_sensitive(),
    }
}
