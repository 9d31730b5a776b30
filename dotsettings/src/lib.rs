//! Typed settings resolved from environment variables and `.env` files.
//!
//! A [`Schema`] declares the fields of a settings shape. The
//! [`SettingsBuilder`] reads the configured `.env` files through a
//! [`FileCache`], merges them under the process environment, finds each
//! field's env-name via a cached [`ResolutionPlan`], and coerces the raw
//! strings into JSON values matching the declared [`FieldKind`]s. The
//! resulting mapping is decoded with `serde` or layered into `figment`.
//!
//! ```
//! use std::sync::LazyLock;
//!
//! use dotsettings::{
//!     EnvSnapshot, FieldDescriptor, FieldKind, Schema, Settings, SettingsBuilder, SettingsOptions,
//! };
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Debug, Deserialize)]
//! struct AppSettings {
//!     port: u16,
//!     features: Vec<String>,
//!     debug: bool,
//! }
//!
//! static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
//!     Schema::builder("AppSettings")
//!         .options(SettingsOptions::new().prefix("APP_"))
//!         .field(FieldDescriptor::new("port", FieldKind::Int))
//!         .field(FieldDescriptor::new("features", FieldKind::list(FieldKind::Str)))
//!         .field(FieldDescriptor::new("debug", FieldKind::Bool).default(json!(false)))
//!         .build()
//! });
//!
//! impl Settings for AppSettings {
//!     fn schema() -> &'static Schema {
//!         &SCHEMA
//!     }
//! }
//!
//! let env = EnvSnapshot::from_pairs([
//!     ("APP_PORT", "9000"),
//!     ("APP_FEATURES", r#"["auth","api"]"#),
//! ]);
//! let settings = AppSettings::load_from(&SettingsBuilder::new(), &env)?;
//! assert_eq!(settings.port, 9000);
//! assert_eq!(settings.features, ["auth", "api"]);
//! assert!(!settings.debug);
//! # Ok::<_, std::sync::Arc<dotsettings::SettingsError>>(())
//! ```

use std::sync::Arc;

mod builder;
mod coerce;
mod dotenv;
mod error;
mod file_cache;
mod names;
mod plan;
mod provider;
mod result_ext;
mod schema;
mod sources;

pub use builder::{CoercedMapping, Resolved, SettingsBuilder};
pub use coerce::{CoercionError, coerce};
pub use dotenv::{FileEncoding, ParseError, RawMapping, parse_env_text};
pub use error::{AggregatedErrors, SettingsError};
pub use file_cache::{FileCache, FileCacheStats, FileLookup};
pub use names::{NameRules, normalize_key};
pub use plan::{FieldPlan, ResolutionCache, ResolutionCacheStats, ResolutionPlan, Strategy};
pub use provider::SettingsProvider;
pub use result_ext::SettingsResultExt;
pub use schema::{
    Constraint, Diagnostics, EnvFile, FieldDescriptor, FieldKind, OverridePrefix, Schema,
    SchemaBuilder, SchemaId, SettingsOptions,
};
pub use sources::{EnvSnapshot, merge_sources};

/// Result type used throughout the crate.
pub type SettingsResult<T> = Result<T, Arc<SettingsError>>;

/// Implemented by settings structs that declare their schema.
///
/// Keep the schema in a `static` so every load reuses one [`SchemaId`] and
/// therefore one cached plan.
pub trait Settings: Sized + serde::de::DeserializeOwned {
    /// The schema describing this type.
    fn schema() -> &'static Schema;

    /// Resolve and decode using the schema's options and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error when resolution or decoding fails.
    fn load(builder: &SettingsBuilder) -> SettingsResult<Self> {
        builder.load(Self::schema())
    }

    /// Resolve and decode against an explicit environment snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when resolution or decoding fails.
    fn load_from(builder: &SettingsBuilder, env: &EnvSnapshot) -> SettingsResult<Self> {
        let schema = Self::schema();
        builder.build_with(schema, schema.options(), env)?.decode()
    }
}
