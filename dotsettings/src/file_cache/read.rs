//! Filesystem access for env files.
//!
//! A lookup only stats the path. The parent directory is opened as a
//! capability handle when the contents actually have to be read.

use std::io;
use std::time::SystemTime;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};

const MAX_ATTEMPTS: usize = 3;

/// Cheap proxy for "has this file changed": modification time plus length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

/// Stat the file at `path`. `Ok(None)` means nothing exists there.
pub(super) fn fingerprint(path: &Utf8Path) -> io::Result<Option<Fingerprint>> {
    let Some(metadata) = absent_when_missing(retry(|| path.metadata()))? else {
        return Ok(None);
    };
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "env file path is not a regular file",
        ));
    }
    Ok(Some(Fingerprint {
        modified: metadata.modified().ok(),
        len: metadata.len(),
    }))
}

/// Read the file through a handle on its parent directory.
///
/// `Ok(None)` means the file disappeared after it was last stat'd.
pub(super) fn read(path: &Utf8Path) -> io::Result<Option<Vec<u8>>> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other("cannot determine file name for env file path"))?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let opened = retry(|| Dir::open_ambient_dir(parent, ambient_authority()));
    let Some(dir) = absent_when_missing(opened)? else {
        return Ok(None);
    };
    absent_when_missing(retry(|| dir.read(name)))
}

fn absent_when_missing<T>(outcome: io::Result<T>) -> io::Result<Option<T>> {
    match outcome {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Run `op`, retrying a bounded number of times when a signal interrupts it.
fn retry<T>(mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    let mut attempt = 1;
    loop {
        match op() {
            Err(err) if err.kind() == io::ErrorKind::Interrupted && attempt < MAX_ATTEMPTS => {
                attempt += 1;
            }
            outcome => return outcome,
        }
    }
}
