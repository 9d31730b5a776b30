//! Primary error enum for settings resolution.

use camino::Utf8PathBuf;
use thiserror::Error;

use super::aggregate::AggregatedErrors;

/// Errors that can occur while resolving settings.
///
/// File-level variants ([`Self::MalformedLine`], [`Self::Encoding`],
/// [`Self::UnsupportedEncoding`], [`Self::MissingEnvFile`]) abort a
/// resolution outright. [`Self::FileRead`] aborts only when the file was
/// declared as required; otherwise it is reported as a warning on the
/// resolved output. Field-level variants identify the schema field, the
/// env-name that was consulted, and the offending raw value.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    /// A `.env` line could not be parsed.
    #[error("malformed line {line} in '{path}': {message}")]
    MalformedLine {
        /// Absolute path of the offending file.
        path: Utf8PathBuf,
        /// One-based line number where the bad entry starts.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// An existing `.env` file could not be read.
    #[error("failed to read env file '{path}': {source}")]
    FileRead {
        /// Absolute path of the file.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The bytes of an env file are invalid in the configured encoding.
    #[error("env file '{path}' is not valid {encoding}: {message}")]
    Encoding {
        /// Absolute path of the file.
        path: Utf8PathBuf,
        /// Canonical name of the configured encoding.
        encoding: &'static str,
        /// Description of the first invalid byte sequence.
        message: String,
    },

    /// The configured encoding name is not recognised.
    #[error("unsupported env file encoding '{encoding}'")]
    UnsupportedEncoding {
        /// Encoding name as supplied in the options.
        encoding: String,
    },

    /// A file declared as required does not exist.
    #[error("required env file '{path}' does not exist")]
    MissingEnvFile {
        /// Absolute path that was checked.
        path: Utf8PathBuf,
    },

    /// A raw value is incompatible with the field's declared type.
    #[error("field '{field}' expects {expected} but env var '{env_name}' holds {raw:?}: {reason}")]
    TypeCoercion {
        /// Dotted path of the schema field.
        field: String,
        /// Env-name the raw value was read from.
        env_name: String,
        /// Type tag of the declared type, for example `int` or `list[str]`.
        expected: String,
        /// Offending raw value, masked for secret fields.
        raw: String,
        /// Why the conversion failed.
        reason: String,
    },

    /// No env-name candidate was present and the field has no default.
    #[error("missing required field '{field}' ({})", describe_candidates(.candidates))]
    MissingRequiredField {
        /// Dotted path of the schema field.
        field: String,
        /// Env-names that were consulted, in lookup order.
        candidates: Vec<String>,
    },

    /// The structural decoder rejected the coerced mapping.
    #[error("failed to decode settings: {0}")]
    Decode(#[source] serde_json::Error),

    /// Two or more field errors collected during one resolution.
    #[error("{count} settings fields failed to resolve:\n{0}", count = .0.len())]
    Aggregate(Box<AggregatedErrors>),
}

fn describe_candidates(candidates: &[String]) -> String {
    if candidates.is_empty() {
        String::from("no env-name candidates")
    } else {
        format!("looked for {}", candidates.join(", "))
    }
}
