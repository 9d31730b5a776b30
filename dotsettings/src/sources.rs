//! Source gathering and precedence merging.
//!
//! Env files are merged in the order they are configured, later files
//! overriding earlier ones, and the process environment overrides them all.
//! Keys are normalised before merging so case-insensitive lookups compare
//! like with like.

use std::ffi::OsString;
use std::sync::Arc;

use tracing::warn;

use crate::dotenv::{FileEncoding, RawMapping};
use crate::file_cache::{FileCache, FileLookup};
use crate::names::normalize_key;
use crate::schema::SettingsOptions;
use crate::{SettingsError, SettingsResult};

/// Process environment captured once per resolution.
///
/// Later changes to the environment are not observed by a resolution that
/// already holds a snapshot.
///
/// # Examples
///
/// ```
/// use dotsettings::EnvSnapshot;
///
/// let env = EnvSnapshot::from_pairs([("PORT", "9000")]);
/// assert_eq!(env.get("PORT"), Some("9000"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot(RawMapping);

impl EnvSnapshot {
    /// Capture the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    #[must_use]
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((into_utf8(key)?, into_utf8(value)?)))
            .collect()
    }

    /// Build a snapshot from explicit pairs.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect()
    }

    /// Value of `key` exactly as captured.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of captured variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The captured variables in capture order.
    #[must_use]
    pub const fn as_mapping(&self) -> &RawMapping {
        &self.0
    }
}

impl FromIterator<(String, String)> for EnvSnapshot {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn into_utf8(value: OsString) -> Option<String> {
    value.into_string().ok()
}

/// Merge env-file mappings and the process environment into one mapping.
///
/// `files` are applied in order, then `env`. A key supplied again by a later
/// source takes that source's value and moves to the end, so the output
/// order reflects precedence. When `case_sensitive` is false every key is
/// upper-cased first.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use dotsettings::{EnvSnapshot, RawMapping, merge_sources};
///
/// let file: RawMapping = [("port".to_owned(), "3000".to_owned())].into_iter().collect();
/// let env = EnvSnapshot::from_pairs([("PORT", "9000")]);
/// let merged = merge_sources(&[Arc::new(file)], &env, false);
/// assert_eq!(merged.get("PORT").map(String::as_str), Some("9000"));
/// ```
#[must_use]
pub fn merge_sources(
    files: &[Arc<RawMapping>],
    env: &EnvSnapshot,
    case_sensitive: bool,
) -> RawMapping {
    let mut merged = RawMapping::new();
    let sources = files
        .iter()
        .map(|mapping| &**mapping)
        .chain(std::iter::once(env.as_mapping()));
    for source in sources {
        for (key, value) in source {
            let normalised = normalize_key(key, case_sensitive).into_owned();
            merged.shift_remove(&normalised);
            merged.insert(normalised, value.clone());
        }
    }
    merged
}

/// Env-file mappings loaded for one resolution, plus non-fatal problems.
#[derive(Debug, Default)]
pub(crate) struct LoadedFiles {
    pub(crate) mappings: Vec<Arc<RawMapping>>,
    pub(crate) warnings: Vec<Arc<SettingsError>>,
}

/// Read every configured env file through `cache`.
///
/// A read failure on an optional file is logged, recorded as a warning and
/// contributes no entries. Parse and encoding failures are always fatal, as
/// are the absence or read failure of a required file.
pub(crate) fn load_env_files(
    cache: &FileCache,
    options: &SettingsOptions,
) -> SettingsResult<LoadedFiles> {
    let mut loaded = LoadedFiles::default();
    if options.env_files().is_empty() {
        return Ok(loaded);
    }
    let encoding = FileEncoding::from_name(options.encoding_name())?;
    for file in options.env_files() {
        match cache.lookup(&file.path, encoding) {
            Ok(FileLookup::Present(mapping)) => loaded.mappings.push(mapping),
            Ok(FileLookup::Absent) if file.required => {
                return Err(Arc::new(SettingsError::MissingEnvFile {
                    path: file.path.clone(),
                }));
            }
            Ok(FileLookup::Absent) => {}
            Err(err) if !file.required && matches!(*err, SettingsError::FileRead { .. }) => {
                warn!(path = %file.path, error = %err, "ignoring unreadable env file");
                loaded.warnings.push(err);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(loaded)
}
