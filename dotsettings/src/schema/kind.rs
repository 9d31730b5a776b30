//! Declared field types.

use std::fmt;
use std::sync::Arc;

use super::Schema;

/// Declared type of a schema field.
///
/// The tag is inspected once when a resolution plan is built; coercion then
/// follows the stored strategy instead of re-examining the type per call.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum FieldKind {
    /// Text, passed through unchanged.
    Str,
    /// Boolean from `true/1/yes/on` or `false/0/no/off`, ignoring case.
    Bool,
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float.
    Float,
    /// JSON array whose elements match the inner kind.
    List(Box<FieldKind>),
    /// JSON object with string keys whose values match the inner kind.
    Map(Box<FieldKind>),
    /// Any JSON document.
    Json,
    /// A sub-schema resolved from the same merged sources.
    Nested(Arc<Schema>),
    /// The inner kind, or `null` when no source provides a value.
    Optional(Box<FieldKind>),
    /// A refined scalar validated during coercion.
    Constrained(Constraint),
}

impl FieldKind {
    /// `list[inner]`.
    #[must_use]
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    /// `dict[str, inner]`.
    #[must_use]
    pub fn map(inner: Self) -> Self {
        Self::Map(Box::new(inner))
    }

    /// `inner | None`.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// A nested sub-schema.
    #[must_use]
    pub fn nested(schema: impl Into<Arc<Schema>>) -> Self {
        Self::Nested(schema.into())
    }

    /// Whether the kind admits absence.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// The kind with any `Optional` wrappers removed.
    #[must_use]
    pub fn unwrap_optional(&self) -> &Self {
        match self {
            Self::Optional(inner) => inner.unwrap_optional(),
            other => other,
        }
    }

    /// Short tag naming the type in error messages, for example `list[int]`.
    #[must_use]
    pub fn type_tag(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => f.write_str("str"),
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::List(inner) => write!(f, "list[{inner}]"),
            Self::Map(inner) => write!(f, "dict[str, {inner}]"),
            Self::Json => f.write_str("json"),
            Self::Nested(schema) => f.write_str(schema.name()),
            Self::Optional(inner) => write!(f, "{inner} | None"),
            Self::Constrained(constraint) => f.write_str(constraint.name()),
        }
    }
}

/// Refined scalar types validated while coercing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Constraint {
    /// Integer greater than zero.
    PositiveInt,
    /// Integer less than zero.
    NegativeInt,
    /// Integer greater than or equal to zero.
    NonNegativeInt,
    /// Integer less than or equal to zero.
    NonPositiveInt,
    /// Float greater than zero.
    PositiveFloat,
    /// Float less than zero.
    NegativeFloat,
    /// Float greater than or equal to zero.
    NonNegativeFloat,
    /// Float less than or equal to zero.
    NonPositiveFloat,
    /// E-mail address.
    Email,
    /// URL with an `http` or `https` scheme.
    HttpUrl,
    /// URL with any scheme.
    AnyUrl,
    /// Sensitive text; the raw value never appears in error messages.
    Secret,
    /// `postgres://` or `postgresql://` connection string.
    PostgresDsn,
    /// `redis://` or `rediss://` connection string.
    RedisDsn,
    /// Luhn-valid payment card number.
    PaymentCard,
    /// Path to an existing regular file.
    FilePath,
    /// Path to an existing directory.
    DirectoryPath,
}

impl Constraint {
    /// Name used as the type tag.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PositiveInt => "PositiveInt",
            Self::NegativeInt => "NegativeInt",
            Self::NonNegativeInt => "NonNegativeInt",
            Self::NonPositiveInt => "NonPositiveInt",
            Self::PositiveFloat => "PositiveFloat",
            Self::NegativeFloat => "NegativeFloat",
            Self::NonNegativeFloat => "NonNegativeFloat",
            Self::NonPositiveFloat => "NonPositiveFloat",
            Self::Email => "EmailStr",
            Self::HttpUrl => "HttpUrl",
            Self::AnyUrl => "AnyUrl",
            Self::Secret => "SecretStr",
            Self::PostgresDsn => "PostgresDsn",
            Self::RedisDsn => "RedisDsn",
            Self::PaymentCard => "PaymentCardNumber",
            Self::FilePath => "FilePath",
            Self::DirectoryPath => "DirectoryPath",
        }
    }

    /// Whether raw values of this type must be masked in diagnostics.
    #[must_use]
    pub const fn is_sensitive(self) -> bool {
        matches!(self, Self::Secret | Self::PaymentCard)
    }
}
