//! Schema declarations consumed by the resolver.
//!
//! A [`Schema`] is an ordered list of [`FieldDescriptor`]s plus the
//! [`SettingsOptions`] used when resolving it. Schemas are immutable once
//! built and cheap to share behind an [`Arc`].
//!
//! ```
//! use dotsettings::{FieldDescriptor, FieldKind, Schema, SettingsOptions};
//! use serde_json::json;
//!
//! let database = Schema::builder("Database")
//!     .field(FieldDescriptor::new("host", FieldKind::Str).default(json!("localhost")))
//!     .field(FieldDescriptor::new("port", FieldKind::Int))
//!     .build();
//!
//! let app = Schema::builder("App")
//!     .options(SettingsOptions::new().prefix("APP_"))
//!     .field(FieldDescriptor::new("name", FieldKind::Str))
//!     .field(FieldDescriptor::new("database", FieldKind::nested(database)))
//!     .build();
//!
//! assert_eq!(app.fields().len(), 2);
//! ```

mod descriptor;
mod kind;
mod options;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub use descriptor::FieldDescriptor;
pub use kind::{Constraint, FieldKind};
pub use options::{Diagnostics, EnvFile, OverridePrefix, SettingsOptions};

static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a built [`Schema`].
///
/// Clones of a schema share its identity; two independently built schemas
/// never do, even when their fields are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(u64);

/// Ordered field declarations plus resolution options for one settings shape.
#[derive(Debug, Clone)]
pub struct Schema {
    id: SchemaId,
    name: String,
    fields: Vec<FieldDescriptor>,
    options: SettingsOptions,
}

impl Schema {
    /// Start declaring a schema called `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            options: SettingsOptions::default(),
        }
    }

    /// Identity used to key cached resolution plans.
    #[must_use]
    pub const fn id(&self) -> SchemaId {
        self.id
    }

    /// Display name of the schema.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Options applied when this schema is resolved as the root.
    ///
    /// Options of schemas reached through nested fields are ignored; the
    /// root's options govern the whole tree.
    #[must_use]
    pub const fn options(&self) -> &SettingsOptions {
        &self.options
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Clone)]
#[must_use]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    options: SettingsOptions,
}

impl SchemaBuilder {
    /// Append a field. Declaration order is preserved in resolved output.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Append several fields in order.
    pub fn fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = FieldDescriptor>,
    {
        self.fields.extend(fields);
        self
    }

    /// Replace the schema-level resolution options.
    pub fn options(mut self, options: SettingsOptions) -> Self {
        self.options = options;
        self
    }

    /// Freeze the declaration and assign it a fresh [`SchemaId`].
    #[must_use]
    pub fn build(self) -> Schema {
        Schema {
            id: SchemaId(NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed)),
            name: self.name,
            fields: self.fields,
            options: self.options,
        }
    }

    /// Build the schema behind an [`Arc`] for use as a nested field type.
    #[must_use]
    pub fn build_shared(self) -> Arc<Schema> {
        Arc::new(self.build())
    }
}
