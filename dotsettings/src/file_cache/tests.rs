//! Unit tests for fingerprint-based env file caching.
#![allow(
    unfulfilled_lint_expectations,
    reason = "clippy::expect_used is denied globally; tests may not hit those branches"
)]
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface configuration mistakes"
)]

use std::fs;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;

struct Scratch {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Scratch {
    fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> Utf8PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).expect("write env file");
        path
    }
}

#[fixture]
fn scratch() -> Scratch {
    let dir = tempfile::tempdir().expect("create temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    Scratch { _dir: dir, root }
}

fn resolve(cache: &FileCache, path: &Utf8Path) -> Arc<RawMapping> {
    cache.resolve(path, FileEncoding::Utf8).expect("env file resolves")
}

#[rstest]
fn unchanged_file_is_parsed_once(scratch: Scratch) {
    let path = scratch.write(".env", "PORT=3000\nNAME=demo\n");
    let cache = FileCache::new();

    let first = resolve(&cache, &path);
    let second = resolve(&cache, &path);

    assert_eq!(first, second);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.get("PORT").map(String::as_str), Some("3000"));
    assert_eq!(
        cache.stats(),
        FileCacheStats {
            hits: 1,
            misses: 1,
            parses: 1,
            absences: 0,
        }
    );
}

#[rstest]
fn hit_consults_only_the_fingerprint(scratch: Scratch) {
    let path = scratch.write(".env", "PORT=1\n");
    let cache = FileCache::new();
    assert_eq!(resolve(&cache, &path).get("PORT").map(String::as_str), Some("1"));

    let modified = fs::metadata(&path)
        .and_then(|metadata| metadata.modified())
        .expect("modification time");
    scratch.write(".env", "PORT=2\n");
    fs::File::options()
        .write(true)
        .open(&path)
        .and_then(|file| file.set_modified(modified))
        .expect("restore modification time");

    assert_eq!(resolve(&cache, &path).get("PORT").map(String::as_str), Some("1"));
    assert_eq!(cache.stats().hits, 1);
    assert_eq!(cache.stats().parses, 1);
}

#[rstest]
fn changed_file_is_reparsed(scratch: Scratch) {
    let path = scratch.write(".env", "PORT=3000\n");
    let cache = FileCache::new();
    assert_eq!(resolve(&cache, &path).get("PORT").map(String::as_str), Some("3000"));

    scratch.write(".env", "PORT=30001\nEXTRA=1\n");
    let updated = resolve(&cache, &path);

    assert_eq!(updated.get("PORT").map(String::as_str), Some("30001"));
    assert_eq!(updated.get("EXTRA").map(String::as_str), Some("1"));
    assert_eq!(cache.stats().parses, 2);
    assert_eq!(cache.len(), 1);
}

#[rstest]
fn missing_file_yields_empty_mapping_and_is_rechecked(scratch: Scratch) {
    let path = scratch.path(".env");
    let cache = FileCache::new();

    let lookup = cache.lookup(&path, FileEncoding::Utf8).expect("absent lookup");
    assert!(!lookup.is_present());
    assert!(resolve(&cache, &path).is_empty());
    assert_eq!(cache.stats().absences, 2);
    assert_eq!(cache.len(), 1);

    scratch.write(".env", "LATE=1\n");
    assert_eq!(resolve(&cache, &path).get("LATE").map(String::as_str), Some("1"));
}

#[rstest]
fn deleted_file_replaces_entry_with_absence(scratch: Scratch) {
    let path = scratch.write(".env", "A=1\n");
    let cache = FileCache::new();
    assert_eq!(resolve(&cache, &path).len(), 1);

    fs::remove_file(&path).expect("remove env file");

    assert!(resolve(&cache, &path).is_empty());
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().absences, 1);
}

#[rstest]
fn missing_parent_directory_counts_as_absent(scratch: Scratch) {
    let cache = FileCache::new();
    let path = scratch.path("nowhere/.env");
    assert!(resolve(&cache, &path).is_empty());
}

#[rstest]
fn malformed_file_fails_with_path_and_line_and_is_not_cached(scratch: Scratch) {
    let path = scratch.write(".env", "GOOD=1\nBROKEN LINE\n");
    let cache = FileCache::new();

    for _ in 0..2 {
        let err = cache
            .resolve(&path, FileEncoding::Utf8)
            .expect_err("malformed file is rejected");
        match err.as_ref() {
            SettingsError::MalformedLine { path: reported, line, .. } => {
                assert_eq!(reported, &path);
                assert_eq!(*line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(cache.stats().parses, 0);
    assert_eq!(cache.stats().misses, 2);
}

#[rstest]
fn directories_are_read_errors(scratch: Scratch) {
    let cache = FileCache::new();
    let err = cache
        .resolve(&scratch.root, FileEncoding::Utf8)
        .expect_err("a directory is not an env file");
    assert!(matches!(err.as_ref(), SettingsError::FileRead { .. }));
}

#[rstest]
fn encodings_decode_file_bytes(scratch: Scratch) {
    let path = scratch.write("latin.env", b"CITY=M\xfcnchen\n");
    let cache = FileCache::new();

    let utf8 = cache
        .resolve(&path, FileEncoding::Utf8)
        .expect_err("latin-1 bytes are not utf-8");
    assert!(matches!(
        utf8.as_ref(),
        SettingsError::Encoding { encoding: "utf-8", .. }
    ));

    let latin = cache
        .resolve(&path, FileEncoding::Latin1)
        .expect("latin-1 decodes");
    assert_eq!(latin.get("CITY").map(String::as_str), Some("München"));
}

#[rstest]
fn changing_encoding_forces_a_reparse(scratch: Scratch) {
    let path = scratch.write(".env", "\u{feff}A=1\n");
    let cache = FileCache::new();

    resolve(&cache, &path);
    cache
        .resolve(&path, FileEncoding::Utf8Sig)
        .expect("utf-8-sig decodes");

    assert_eq!(cache.stats().parses, 2);
    assert_eq!(cache.stats().hits, 0);
}

#[rstest]
fn concurrent_lookups_share_a_complete_mapping(scratch: Scratch) {
    let path = scratch.write(".env", "A=1\nB=2\nC=3\n");
    let cache = FileCache::new();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let mapping = resolve(&cache, &path);
                assert_eq!(mapping.len(), 3);
            });
        }
    });

    let stats = cache.stats();
    assert_eq!(stats.hits + stats.misses, 8);
    assert!(stats.parses >= 1);
}
