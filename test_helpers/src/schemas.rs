//! Sample schemas used across the integration tests.

use std::sync::Arc;

use dotsettings::{FieldDescriptor, FieldKind, Schema, SettingsOptions};
use serde_json::json;

/// `Database { host: str = "localhost", port: int }`.
#[must_use]
pub fn database() -> Arc<Schema> {
    Schema::builder("Database")
        .field(FieldDescriptor::new("host", FieldKind::Str).default(json!("localhost")))
        .field(FieldDescriptor::new("port", FieldKind::Int))
        .build_shared()
}

/// An application schema with scalar, list, and nested fields.
///
/// | field      | type         | default |
/// |------------|--------------|---------|
/// | `name`     | `str`        |         |
/// | `port`     | `int`        | `8000`  |
/// | `debug`    | `bool`       | `false` |
/// | `features` | `list[str]`  | `[]`    |
/// | `database` | [`database`] |         |
#[must_use]
pub fn app(options: SettingsOptions) -> Schema {
    Schema::builder("App")
        .options(options)
        .field(FieldDescriptor::new("name", FieldKind::Str))
        .field(FieldDescriptor::new("port", FieldKind::Int).default(json!(8000)))
        .field(FieldDescriptor::new("debug", FieldKind::Bool).default(json!(false)))
        .field(FieldDescriptor::new("features", FieldKind::list(FieldKind::Str)).default(json!([])))
        .field(FieldDescriptor::new("database", FieldKind::nested(database())))
        .build()
}
