// SPDX-License-Identifier: Apache-2.0

//! Environment discovery — check a directory, scan one level, ascend.
//!
//! Public API:
//!   - `probe(path)`  → why `path` is or isn't a venv
//!   - `is_venv(path)` → `probe(path).is_venv()`
//!   - `scan(dir)`    → venvs among the direct children of `dir`
//!   - `search(start)` / `Ascent` → scan `start`, then its parents, until found
//!
//! Only depth-1 children are ever checked. Ascending widens the scan root,
//! never its depth, so an environment two levels below every scanned
//! directory is not found.

use crate::types::{Candidate, ScanOutcome, SearchOutcome, VenvProbe};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

// =============================================================================
// VENV CHECK
// =============================================================================

/// Checks `path/bin/activate`, following symlinks.
pub fn probe(path: impl AsRef<Path>) -> VenvProbe {
    let activate = path.as_ref().join("bin").join("activate");
    let result = match std::fs::metadata(&activate) {
        Ok(meta) if meta.is_dir() => VenvProbe::ActivateIsDir,
        Ok(_) => VenvProbe::Valid,
        Err(e) if e.kind() == io::ErrorKind::NotFound => VenvProbe::MissingActivate,
        Err(e) => VenvProbe::Unreadable(e.kind()),
    };
    trace!(path = %path.as_ref().display(), ?result, "checked");
    result
}

/// True iff `path/bin/activate` exists and is not a directory.
pub fn is_venv(path: impl AsRef<Path>) -> bool {
    probe(path).is_venv()
}

// =============================================================================
// ONE LEVEL
// =============================================================================

/// Returns the direct subdirectories of `dir` that are venvs.
///
/// Symlinked children are not followed. Entries that fail to read are
/// skipped; a directory that cannot be listed at all is `Unreadable`.
pub fn scan(dir: impl AsRef<Path>) -> ScanOutcome {
    let dir = dir.as_ref();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "cannot list directory");
            return ScanOutcome::Unreadable(e.kind());
        }
    };

    let found: Vec<Candidate> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| is_venv(path))
        .map(Candidate::new)
        .collect();

    if found.is_empty() {
        ScanOutcome::Empty
    } else {
        ScanOutcome::Found(found)
    }
}

// =============================================================================
// ASCENT
// =============================================================================

/// Upward search from a starting directory.
///
/// Stops at the first level with any venv, at the filesystem root, or after
/// scanning the ceiling directory if one is set.
#[derive(Debug, Clone)]
pub struct Ascent {
    start: PathBuf,
    ceiling: Option<PathBuf>,
}

impl Ascent {
    pub fn new(start: impl Into<PathBuf>) -> Self {
        Self {
            start: start.into(),
            ceiling: None,
        }
    }

    /// Do not ascend past `dir`. It is still scanned.
    pub fn ceiling(mut self, dir: Option<PathBuf>) -> Self {
        self.ceiling = dir;
        self
    }

    pub fn run(self) -> SearchOutcome {
        let mut dir = self.start;
        let mut levels = 0;

        loop {
            levels += 1;
            let mut found = scan(&dir).into_candidates();
            debug!(dir = %dir.display(), found = found.len(), "scanned level");

            match found.len() {
                0 => {}
                1 => return SearchOutcome::Single(found.remove(0)),
                _ => return SearchOutcome::Multiple(found),
            }

            if self.ceiling.as_deref() == Some(dir.as_path()) {
                debug!(dir = %dir.display(), "reached ceiling");
                return SearchOutcome::NotFound { levels };
            }

            match dir.parent() {
                Some(parent) if !parent.as_os_str().is_empty() && parent != dir => {
                    dir = parent.to_path_buf();
                }
                _ => return SearchOutcome::NotFound { levels },
            }
        }
    }
}

/// Upward search from `start` with no ceiling.
pub fn search(start: impl Into<PathBuf>) -> SearchOutcome {
    Ascent::new(start).run()
}
