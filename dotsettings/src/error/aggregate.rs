//! Field errors collected by a full-diagnostics resolution.

use std::{error::Error, fmt, sync::Arc};

use super::SettingsError;

/// Every field error found by one resolution, in declaration order.
///
/// Produced only under [`Diagnostics::Full`](crate::Diagnostics::Full) and
/// only when two or more fields fail; a lone failure is reported as itself.
///
/// # Examples
///
/// ```
/// use dotsettings::{
///     EnvSnapshot, FieldDescriptor, FieldKind, Schema, SettingsBuilder, SettingsError,
///     SettingsOptions,
/// };
///
/// let schema = Schema::builder("Server")
///     .field(FieldDescriptor::new("host", FieldKind::Str))
///     .field(FieldDescriptor::new("port", FieldKind::Int))
///     .build();
/// let options = SettingsOptions::new().full_diagnostics();
/// let env = EnvSnapshot::from_pairs([("PORT", "eighty")]);
/// let err = SettingsBuilder::new()
///     .build_with(&schema, &options, &env)
///     .expect_err("both fields fail");
/// let SettingsError::Aggregate(errors) = err.as_ref() else {
///     panic!("expected every field error");
/// };
/// assert_eq!(errors.missing().collect::<Vec<_>>(), ["host"]);
/// assert_eq!(errors.invalid().collect::<Vec<_>>(), ["port"]);
/// ```
#[derive(Debug, Default)]
pub struct AggregatedErrors(Vec<Arc<SettingsError>>);

impl AggregatedErrors {
    pub(crate) const fn new(errors: Vec<Arc<SettingsError>>) -> Self {
        Self(errors)
    }

    /// Iterate over the collected errors.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn iter(&self) -> impl Iterator<Item = &SettingsError> {
        self.0.iter().map(Arc::as_ref)
    }

    /// Number of collected errors.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was collected.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Dotted paths of the failing fields.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.iter().filter_map(SettingsError::field)
    }

    /// Errors reported against the field at `path`.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn for_field<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a SettingsError> {
        self.iter().filter(move |err| err.field() == Some(path))
    }

    /// Fields that no source supplied.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.iter().filter_map(|err| match err {
            SettingsError::MissingRequiredField { field, .. } => Some(field.as_str()),
            _ => None,
        })
    }

    /// Fields whose raw value was rejected.
    #[must_use = "iterators should be consumed to inspect errors"]
    pub fn invalid(&self) -> impl Iterator<Item = &str> {
        self.iter().filter_map(|err| match err {
            SettingsError::TypeCoercion { field, .. } => Some(field.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for AggregatedErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = self.iter();
        if let Some(first) = lines.next() {
            write!(f, "  - {first}")?;
        }
        for err in lines {
            write!(f, "\n  - {err}")?;
        }
        Ok(())
    }
}

impl Error for AggregatedErrors {}

impl IntoIterator for AggregatedErrors {
    type Item = Arc<SettingsError>;
    type IntoIter = std::vec::IntoIter<Arc<SettingsError>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
