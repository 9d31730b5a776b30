//! Constructors and aggregation helpers for `SettingsError`.

use std::sync::Arc;

use camino::Utf8Path;

use super::{AggregatedErrors, SettingsError};
use crate::coerce::CoercionError;

const MASK: &str = "**********";

impl SettingsError {
    /// Collapse the field errors of one resolution: `None` for none, the
    /// error itself for one, and [`Self::Aggregate`] for several.
    pub(crate) fn collect(mut errors: Vec<Arc<Self>>) -> Option<Arc<Self>> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Arc::new(Self::Aggregate(Box::new(AggregatedErrors::new(errors))))),
        }
    }

    /// Whether this error concerns a single schema field rather than a file.
    ///
    /// Field-level errors are the ones collected when full diagnostics are
    /// requested.
    #[must_use]
    pub const fn is_field_error(&self) -> bool {
        matches!(
            self,
            Self::TypeCoercion { .. } | Self::MissingRequiredField { .. }
        )
    }

    /// The dotted schema field path this error refers to, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::TypeCoercion { field, .. } | Self::MissingRequiredField { field, .. } => {
                Some(field)
            }
            _ => None,
        }
    }

    pub(crate) fn file_read(path: &Utf8Path, source: std::io::Error) -> Arc<Self> {
        Arc::new(Self::FileRead {
            path: path.to_owned(),
            source,
        })
    }

    /// Sensitive fields report neither the raw value nor a reason derived
    /// from it.
    pub(crate) fn coercion(
        field: &str,
        env_name: &str,
        raw: &str,
        sensitive: bool,
        error: CoercionError,
    ) -> Arc<Self> {
        let (raw, reason) = if sensitive {
            (MASK.to_owned(), format!("not a valid {}", error.expected))
        } else {
            (raw.to_owned(), error.reason)
        };
        Arc::new(Self::TypeCoercion {
            field: field.to_owned(),
            env_name: env_name.to_owned(),
            expected: error.expected,
            raw,
            reason,
        })
    }

    pub(crate) fn missing_field(field: impl Into<String>, candidates: &[String]) -> Arc<Self> {
        Arc::new(Self::MissingRequiredField {
            field: field.into(),
            candidates: candidates.to_vec(),
        })
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e)
    }
}
