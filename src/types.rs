// SPDX-License-Identifier: Apache-2.0

//! Core types for venv-pick.
//!
//! Filesystem probing never fails outward: every lookup is folded into an
//! outcome enum that still says *why* nothing was found, so the boundary
//! between "absent" and "unreadable" stays visible in tests and trace logs.

use std::fmt;
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};

// =============================================================================
// Candidate — a directory that passed the venv check
// =============================================================================

/// A directory believed to be a virtual environment.
///
/// Carries nothing but its path. Derefs to `Path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Candidate(PathBuf);

impl Candidate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Last path segment, shown as the row title in the picker.
    pub fn display_name(&self) -> String {
        self.0
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.0.to_string_lossy().into_owned())
    }

    /// Full path, shown as the row description and matched by the filter.
    pub fn description(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    pub fn into_inner(self) -> PathBuf {
        self.0
    }
}

impl Deref for Candidate {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for Candidate {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

// =============================================================================
// Probe / scan / search outcomes
// =============================================================================

/// Result of checking one directory for `bin/activate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenvProbe {
    /// `bin/activate` exists and is not a directory.
    Valid,
    /// Nothing at `bin/activate` (or the directory itself is missing).
    MissingActivate,
    /// `bin/activate` exists but is a directory.
    ActivateIsDir,
    /// The stat failed for another reason, e.g. permission denied.
    Unreadable(io::ErrorKind),
}

impl VenvProbe {
    pub fn is_venv(self) -> bool {
        self == Self::Valid
    }
}

/// Result of scanning the direct children of one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// At least one child is a venv, in directory-listing order.
    Found(Vec<Candidate>),
    /// The listing succeeded but no child is a venv.
    Empty,
    /// The directory could not be listed. Treated as "no entries here".
    Unreadable(io::ErrorKind),
}

impl ScanOutcome {
    /// Candidates found at this level; empty for both `Empty` and `Unreadable`.
    pub fn into_candidates(self) -> Vec<Candidate> {
        match self {
            Self::Found(found) => found,
            Self::Empty | Self::Unreadable(_) => Vec::new(),
        }
    }
}

/// Where the upward search ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Exactly one venv at the first level that had any.
    Single(Candidate),
    /// Several venvs at the first level that had any; the user must choose.
    Multiple(Vec<Candidate>),
    /// Reached the root (or the ceiling) without finding anything.
    NotFound {
        /// Number of directories scanned.
        levels: usize,
    },
}

// =============================================================================
// PickError — the failures a user actually sees
// =============================================================================

/// Errors that end the program with a non-zero exit status.
#[derive(Debug)]
pub enum PickError {
    /// The direct-path argument has no usable `bin/activate`.
    NotAVenv(PathBuf),
    /// The search reached the top without finding an environment.
    NotFound,
    /// The working directory could not be determined.
    CurrentDir(io::Error),
    /// The interactive picker could not talk to the terminal.
    Picker(io::Error),
    /// `--hook` was given a shell we have no integration for.
    UnsupportedShell(String),
    /// stdout went away before the command was written.
    Output(io::Error),
}

impl fmt::Display for PickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAVenv(path) => write!(
                f,
                "Directory '{}' is not a valid virtual environment.",
                path.display()
            ),
            Self::NotFound => write!(
                f,
                "No virtual environment found in this directory or parent directories."
            ),
            Self::CurrentDir(e) => write!(f, "cannot determine current directory: {}", e),
            Self::Picker(e) => write!(f, "selection UI failed: {}", e),
            Self::UnsupportedShell(shell) => write!(
                f,
                "Unsupported shell '{}' (supported: bash, zsh)",
                shell
            ),
            Self::Output(e) => write!(f, "cannot write to stdout: {}", e),
        }
    }
}

impl std::error::Error for PickError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CurrentDir(e) | Self::Picker(e) | Self::Output(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_names() {
        let c = Candidate::new("/home/me/project/.venv");
        assert_eq!(c.display_name(), ".venv");
        assert_eq!(c.description(), "/home/me/project/.venv");
        assert_eq!(c.to_string(), "/home/me/project/.venv");
    }

    #[test]
    fn test_candidate_deref() {
        let c = Candidate::new("envs/py312");
        assert!(c.ends_with("py312"));
        assert_eq!(c.path(), Path::new("envs/py312"));
    }

    #[test]
    fn test_only_valid_layout_is_venv() {
        assert!(VenvProbe::Valid.is_venv());
        assert!(!VenvProbe::MissingActivate.is_venv());
        assert!(!VenvProbe::ActivateIsDir.is_venv());
        assert!(!VenvProbe::Unreadable(io::ErrorKind::PermissionDenied).is_venv());
    }

    #[test]
    fn test_scan_outcome_candidates() {
        let found = ScanOutcome::Found(vec![Candidate::new("/a/venv")]);
        assert_eq!(found.into_candidates().len(), 1);
        assert!(ScanOutcome::Empty.into_candidates().is_empty());
        assert!(
            ScanOutcome::Unreadable(io::ErrorKind::NotFound)
                .into_candidates()
                .is_empty()
        );
    }

    #[test]
    fn test_error_messages() {
        let e = PickError::NotAVenv(PathBuf::from("nope"));
        assert_eq!(
            e.to_string(),
            "Directory 'nope' is not a valid virtual environment."
        );
        assert!(PickError::NotFound.to_string().contains("No virtual environment found"));

        let io_err = io::Error::other("no tty");
        let e = PickError::Picker(io_err);
        assert!(e.to_string().contains("no tty"));
        assert!(std::error::Error::source(&e).is_some());
    }
}
