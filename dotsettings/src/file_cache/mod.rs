//! Process-lifetime memoisation of parsed `.env` files.
//!
//! Entries are keyed by absolute path and reused while the file's
//! fingerprint (modification time and length) still matches the file on
//! disk. A missing file is recorded as absent, but existence is re-checked on
//! every lookup so a file created later is picked up. Parse failures are never
//! cached. A relative path is made absolute on its first lookup and the result
//! is reused for the lifetime of the cache.

mod read;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::RwLock;
use tracing::debug;

use self::read::Fingerprint;
use crate::dotenv::{FileEncoding, RawMapping, parse_env_text};
use crate::{SettingsError, SettingsResult};

/// Outcome of a [`FileCache::lookup`].
#[derive(Debug, Clone)]
pub enum FileLookup {
    /// The file exists and parsed cleanly.
    Present(Arc<RawMapping>),
    /// Nothing exists at the path.
    Absent,
}

impl FileLookup {
    /// The parsed mapping, or an empty one for an absent file.
    #[must_use]
    pub fn into_mapping(self) -> Arc<RawMapping> {
        match self {
            Self::Present(mapping) => mapping,
            Self::Absent => Arc::default(),
        }
    }

    /// Whether the file exists.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

/// Counters describing cache activity since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileCacheStats {
    /// Lookups answered from a cached entry whose fingerprint matched.
    pub hits: u64,
    /// Lookups of an existing file that had no usable entry.
    pub misses: u64,
    /// Successful parses stored in the cache.
    pub parses: u64,
    /// Lookups that found no file.
    pub absences: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    parses: AtomicU64,
    absences: AtomicU64,
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug)]
enum Entry {
    Parsed {
        fingerprint: Fingerprint,
        encoding: FileEncoding,
        mapping: Arc<RawMapping>,
    },
    Absent,
}

/// Shared cache of parsed env files.
///
/// Safe to use from many threads. Two threads missing on the same path at
/// once may both parse it; the last writer's entry is kept, and both
/// observe a complete mapping.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use dotsettings::{FileCache, FileEncoding};
///
/// let cache = FileCache::new();
/// let mapping = cache
///     .resolve(Utf8Path::new("/definitely/not/here/.env"), FileEncoding::Utf8)
///     .expect("absence is not an error");
/// assert!(mapping.is_empty());
/// assert_eq!(cache.stats().absences, 1);
/// ```
#[derive(Debug, Default)]
pub struct FileCache {
    entries: RwLock<HashMap<Utf8PathBuf, Entry>>,
    anchors: RwLock<HashMap<Utf8PathBuf, Utf8PathBuf>>,
    counters: Counters,
}

impl FileCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed contents of the env file at `path`, empty when it is absent.
    ///
    /// # Errors
    ///
    /// See [`FileCache::lookup`].
    pub fn resolve(&self, path: &Utf8Path, encoding: FileEncoding) -> SettingsResult<Arc<RawMapping>> {
        self.lookup(path, encoding).map(FileLookup::into_mapping)
    }

    /// Look up the env file at `path`, parsing it when no cached entry with
    /// a matching fingerprint and encoding exists.
    ///
    /// A relative path resolves against the working directory at its first
    /// lookup through this cache; later lookups reuse that absolute path.
    /// A cache hit costs one stat and nothing else.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::FileRead`] when the file exists but cannot
    /// be read, [`SettingsError::Encoding`] when its bytes are invalid in
    /// `encoding`, and [`SettingsError::MalformedLine`] when it does not
    /// parse.
    pub fn lookup(&self, path: &Utf8Path, encoding: FileEncoding) -> SettingsResult<FileLookup> {
        let absolute = self.absolute(path)?;
        let fingerprint =
            read::fingerprint(&absolute).map_err(|err| SettingsError::file_read(&absolute, err))?;
        let Some(fingerprint) = fingerprint else {
            return Ok(self.record_absent(absolute));
        };

        if let Some(mapping) = self.cached(&absolute, fingerprint, encoding) {
            bump(&self.counters.hits);
            debug!(path = %absolute, "env file cache hit");
            return Ok(FileLookup::Present(mapping));
        }
        bump(&self.counters.misses);
        debug!(path = %absolute, "env file cache miss");

        let bytes = read::read(&absolute).map_err(|err| SettingsError::file_read(&absolute, err))?;
        let Some(bytes) = bytes else {
            return Ok(self.record_absent(absolute));
        };
        let mapping = Arc::new(decode_and_parse(&absolute, &bytes, encoding)?);
        bump(&self.counters.parses);
        debug!(path = %absolute, entries = mapping.len(), encoding = encoding.name(), "parsed env file");
        self.entries.write().insert(
            absolute,
            Entry::Parsed {
                fingerprint,
                encoding,
                mapping: Arc::clone(&mapping),
            },
        );
        Ok(FileLookup::Present(mapping))
    }

    /// Activity counters.
    #[must_use]
    pub fn stats(&self) -> FileCacheStats {
        FileCacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            parses: self.counters.parses.load(Ordering::Relaxed),
            absences: self.counters.absences.load(Ordering::Relaxed),
        }
    }

    /// Number of paths with a recorded entry, present or absent.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether no path has been looked up yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn cached(
        &self,
        path: &Utf8Path,
        fingerprint: Fingerprint,
        encoding: FileEncoding,
    ) -> Option<Arc<RawMapping>> {
        match self.entries.read().get(path)? {
            Entry::Parsed {
                fingerprint: stored,
                encoding: stored_encoding,
                mapping,
            } if *stored == fingerprint && *stored_encoding == encoding => Some(Arc::clone(mapping)),
            _ => None,
        }
    }

    fn absolute(&self, path: &Utf8Path) -> SettingsResult<Utf8PathBuf> {
        if path.is_absolute() {
            return Ok(path.to_owned());
        }
        if let Some(anchored) = self.anchors.read().get(path) {
            return Ok(anchored.clone());
        }
        let absolute = absolutize(path)?;
        Ok(self
            .anchors
            .write()
            .entry(path.to_owned())
            .or_insert(absolute)
            .clone())
    }

    fn record_absent(&self, path: Utf8PathBuf) -> FileLookup {
        bump(&self.counters.absences);
        debug!(path = %path, "env file absent");
        self.entries.write().insert(path, Entry::Absent);
        FileLookup::Absent
    }
}

fn absolutize(path: &Utf8Path) -> SettingsResult<Utf8PathBuf> {
    std::path::absolute(path)
        .and_then(|absolute| Utf8PathBuf::try_from(absolute).map_err(|err| err.into_io_error()))
        .map_err(|err| SettingsError::file_read(path, err))
}

fn decode_and_parse(
    path: &Utf8Path,
    bytes: &[u8],
    encoding: FileEncoding,
) -> SettingsResult<RawMapping> {
    let text = encoding.decode(bytes).map_err(|message| {
        Arc::new(SettingsError::Encoding {
            path: path.to_owned(),
            encoding: encoding.name(),
            message,
        })
    })?;
    parse_env_text(&text).map_err(|err| {
        Arc::new(SettingsError::MalformedLine {
            path: path.to_owned(),
            line: err.line,
            message: err.message,
        })
    })
}

#[cfg(test)]
mod tests;
