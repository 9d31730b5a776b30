//! Application of a resolution plan to a merged raw mapping.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::overlay::overlay;
use crate::coerce::coerce;
use crate::dotenv::RawMapping;
use crate::plan::{FieldPlan, ResolutionPlan, Strategy};
use crate::schema::Diagnostics;
use crate::{SettingsError, SettingsResult};

/// Field name to coerced value, in declaration order.
pub type CoercedMapping = Map<String, Value>;

/// Walks a plan, collecting field errors according to the diagnostics mode.
pub(super) struct Resolver<'a> {
    merged: &'a RawMapping,
    mode: Diagnostics,
    errors: Vec<Arc<SettingsError>>,
}

impl<'a> Resolver<'a> {
    pub(super) const fn new(merged: &'a RawMapping, mode: Diagnostics) -> Self {
        Self {
            merged,
            mode,
            errors: Vec::new(),
        }
    }

    /// Resolve every top-level field. Entries in `overrides` replace the
    /// field's resolution outright; unknown override keys follow the
    /// declared fields.
    pub(super) fn resolve_root(
        mut self,
        plan: &ResolutionPlan,
        overrides: &CoercedMapping,
    ) -> SettingsResult<CoercedMapping> {
        let mut values = CoercedMapping::new();
        for field in plan.fields() {
            if let Some(value) = overrides.get(field.name()) {
                values.insert(field.name().to_owned(), value.clone());
            } else if let Some(value) = self.resolve_field(field, None)? {
                values.insert(field.name().to_owned(), value);
            }
        }
        for (key, value) in overrides {
            if !values.contains_key(key) {
                values.insert(key.clone(), value.clone());
            }
        }
        match SettingsError::collect(self.errors) {
            Some(err) => Err(err),
            None => Ok(values),
        }
    }

    fn resolve_fields(
        &mut self,
        fields: &[FieldPlan],
        base: Option<&CoercedMapping>,
    ) -> SettingsResult<CoercedMapping> {
        let mut values = CoercedMapping::new();
        for field in fields {
            let inherited = base.and_then(|entries| entries.get(field.name()));
            if let Some(value) = self.resolve_field(field, inherited)? {
                values.insert(field.name().to_owned(), value);
            }
        }
        Ok(values)
    }

    /// `inherited` is the field's value in an enclosing JSON object, used
    /// when no env-name for the field is present.
    fn resolve_field(
        &mut self,
        field: &FieldPlan,
        inherited: Option<&Value>,
    ) -> SettingsResult<Option<Value>> {
        let found = self.lookup(field);
        match field.strategy() {
            Strategy::Scalar => match found {
                Some((env_name, raw)) => self.coerce_field(field, env_name, raw),
                None if inherited.is_some() => Ok(inherited.cloned()),
                None => self.absent(field),
            },
            Strategy::Nested(children) => self.resolve_nested(field, children, found, inherited),
        }
    }

    fn resolve_nested(
        &mut self,
        field: &FieldPlan,
        children: &[FieldPlan],
        found: Option<(&str, &str)>,
        inherited: Option<&Value>,
    ) -> SettingsResult<Option<Value>> {
        let base = match found {
            Some((env_name, raw)) => match self.coerce_field(field, env_name, raw)? {
                Some(value) => Some(value),
                // The rejected object is the only error reported for this subtree.
                None => return Ok(None),
            },
            None => inherited.cloned(),
        };
        if base.as_ref().is_some_and(Value::is_null) {
            return Ok(base);
        }
        if base.is_none() && !any_present(children, self.merged) {
            if let Some(default) = field.default_value() {
                return Ok(Some(default.clone()));
            }
            if field.is_optional() {
                return Ok(Some(Value::Null));
            }
            if !field.is_required() {
                return Ok(None);
            }
        }

        let resolved = self.resolve_fields(children, base.as_ref().and_then(Value::as_object))?;
        let mut value = base.unwrap_or_else(|| Value::Object(Map::new()));
        overlay(&mut value, Value::Object(resolved));
        Ok(Some(value))
    }

    fn lookup(&self, field: &FieldPlan) -> Option<(&'a str, &'a str)> {
        let merged = self.merged;
        field.candidates().iter().find_map(|candidate| {
            merged
                .get_key_value(candidate.as_str())
                .map(|(name, raw)| (name.as_str(), raw.as_str()))
        })
    }

    fn coerce_field(
        &mut self,
        field: &FieldPlan,
        env_name: &str,
        raw: &str,
    ) -> SettingsResult<Option<Value>> {
        match coerce(raw, field.kind()) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                let error =
                    SettingsError::coercion(field.path(), env_name, raw, field.is_sensitive(), err);
                self.record(error)?;
                Ok(None)
            }
        }
    }

    fn absent(&mut self, field: &FieldPlan) -> SettingsResult<Option<Value>> {
        if let Some(default) = field.default_value() {
            return Ok(Some(default.clone()));
        }
        if field.is_optional() {
            return Ok(Some(Value::Null));
        }
        if field.is_required() {
            self.record(SettingsError::missing_field(field.path(), field.candidates()))?;
        }
        Ok(None)
    }

    /// Fail immediately in first-error mode; otherwise keep going.
    fn record(&mut self, error: Arc<SettingsError>) -> SettingsResult<()> {
        match self.mode {
            Diagnostics::FirstError => Err(error),
            Diagnostics::Full => {
                self.errors.push(error);
                Ok(())
            }
        }
    }
}

/// Whether any env-name in the field tree is present in `merged`.
fn any_present(fields: &[FieldPlan], merged: &RawMapping) -> bool {
    fields.iter().any(|field| {
        field
            .candidates()
            .iter()
            .any(|candidate| merged.contains_key(candidate.as_str()))
            || matches!(field.strategy(), Strategy::Nested(children) if any_present(children, merged))
    })
}
