//! Orchestration: sources, plan, coercion, and hand-off to the decoder.
//!
//! ```
//! use dotsettings::{EnvSnapshot, FieldDescriptor, FieldKind, Schema, SettingsBuilder};
//! use serde_json::json;
//!
//! let database = Schema::builder("Database")
//!     .field(FieldDescriptor::new("port", FieldKind::Int))
//!     .build();
//! let schema = Schema::builder("App")
//!     .field(FieldDescriptor::new("debug", FieldKind::Bool).default(json!(false)))
//!     .field(FieldDescriptor::new("database", FieldKind::nested(database)))
//!     .build();
//!
//! let env = EnvSnapshot::from_pairs([("DATABASE__PORT", "5432")]);
//! let resolved = SettingsBuilder::new()
//!     .build_with(&schema, schema.options(), &env)
//!     .expect("settings resolve");
//! assert_eq!(resolved.get("database"), Some(&json!({"port": 5432})));
//! assert_eq!(resolved.get("debug"), Some(&json!(false)));
//! ```

mod overlay;
mod resolve;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

pub use resolve::CoercedMapping;

use self::resolve::Resolver;
use crate::file_cache::FileCache;
use crate::plan::ResolutionCache;
use crate::provider::SettingsProvider;
use crate::result_ext::SettingsResultExt;
use crate::schema::{Schema, SettingsOptions};
use crate::sources::{EnvSnapshot, load_env_files, merge_sources};
use crate::{SettingsError, SettingsResult};

/// Output of a successful resolution.
#[derive(Debug, Clone, Default)]
pub struct Resolved {
    values: CoercedMapping,
    warnings: Vec<Arc<SettingsError>>,
}

impl Resolved {
    /// Coerced values in field declaration order.
    #[must_use]
    pub const fn values(&self) -> &CoercedMapping {
        &self.values
    }

    /// Take ownership of the coerced values.
    #[must_use]
    pub fn into_values(self) -> CoercedMapping {
        self.values
    }

    /// Value resolved for the top-level field `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Non-fatal problems, such as an optional env file that could not be
    /// read.
    #[must_use]
    pub fn warnings(&self) -> &[Arc<SettingsError>] {
        &self.warnings
    }

    /// Decode the coerced values into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Decode`] when `T` rejects the values.
    pub fn decode<T: DeserializeOwned>(&self) -> SettingsResult<T> {
        serde_json::from_value(Value::Object(self.values.clone())).into_settings()
    }

    /// Expose the coerced values as a [`figment::Provider`].
    #[must_use]
    pub fn into_provider(self) -> SettingsProvider {
        SettingsProvider::new(self.values)
    }
}

/// Entry point resolving schemas against env files and the environment.
///
/// The builder owns its caches; clones share them. Build one per process, or
/// one per test for isolation.
#[derive(Debug, Clone, Default)]
pub struct SettingsBuilder {
    files: Arc<FileCache>,
    plans: Arc<ResolutionCache>,
}

impl SettingsBuilder {
    /// A builder with fresh, empty caches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder sharing existing caches.
    #[must_use]
    pub const fn with_caches(files: Arc<FileCache>, plans: Arc<ResolutionCache>) -> Self {
        Self { files, plans }
    }

    /// The env file cache.
    #[must_use]
    pub fn file_cache(&self) -> &FileCache {
        &self.files
    }

    /// The resolution plan cache.
    #[must_use]
    pub fn resolution_cache(&self) -> &ResolutionCache {
        &self.plans
    }

    /// Resolve `schema` with its own options against the current process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns the first field error, or all of them aggregated under
    /// [`crate::Diagnostics::Full`], plus any fatal file error.
    pub fn build(&self, schema: &Schema) -> SettingsResult<Resolved> {
        self.resolve(
            schema,
            schema.options(),
            &EnvSnapshot::from_process(),
            &CoercedMapping::new(),
        )
    }

    /// Resolve `schema` with explicit options and environment.
    ///
    /// # Errors
    ///
    /// As for [`SettingsBuilder::build`].
    pub fn build_with(
        &self,
        schema: &Schema,
        options: &SettingsOptions,
        env: &EnvSnapshot,
    ) -> SettingsResult<Resolved> {
        self.resolve(schema, options, env, &CoercedMapping::new())
    }

    /// Resolve `schema` against the process environment with explicit
    /// top-level values that take precedence over every source.
    ///
    /// Overrides are used verbatim, without coercion.
    ///
    /// # Errors
    ///
    /// As for [`SettingsBuilder::build`].
    pub fn build_with_overrides(
        &self,
        schema: &Schema,
        overrides: &CoercedMapping,
    ) -> SettingsResult<Resolved> {
        self.resolve(
            schema,
            schema.options(),
            &EnvSnapshot::from_process(),
            overrides,
        )
    }

    /// Resolve `schema` and decode the result into `T`.
    ///
    /// # Errors
    ///
    /// Returns resolution errors as for [`SettingsBuilder::build`], or
    /// [`SettingsError::Decode`] when `T` rejects the coerced values.
    pub fn load<T: DeserializeOwned>(&self, schema: &Schema) -> SettingsResult<T> {
        self.build(schema)?.decode()
    }

    /// Resolve with every input explicit.
    ///
    /// # Errors
    ///
    /// As for [`SettingsBuilder::build`].
    pub fn resolve(
        &self,
        schema: &Schema,
        options: &SettingsOptions,
        env: &EnvSnapshot,
        overrides: &CoercedMapping,
    ) -> SettingsResult<Resolved> {
        let files = load_env_files(&self.files, options)?;
        let merged = merge_sources(&files.mappings, env, options.is_case_sensitive());
        let plan = self.plans.plan_for(schema, options);
        let values =
            Resolver::new(&merged, options.diagnostics_mode()).resolve_root(&plan, overrides)?;
        debug!(
            schema = schema.name(),
            fields = values.len(),
            warnings = files.warnings.len(),
            "resolved settings"
        );
        Ok(Resolved {
            values,
            warnings: files.warnings,
        })
    }
}
