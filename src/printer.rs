// SPDX-License-Identifier: Apache-2.0

//! Output control for venv-pick.
//!
//! stdout carries exactly one thing: the activation command, so that
//! `eval "$(venv-pick)"` works. Everything a human reads goes to stderr
//! through the `Printer`, which can quiet the status line.

use colored::Colorize;
use std::io::{self, Write};

/// Controls all venv-pick terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Printer {
    /// Status line and errors on stderr.
    Default,
    /// Errors only (`--quiet`).
    Quiet,
}

impl Printer {
    pub fn new(quiet: bool) -> Self {
        if quiet { Self::Quiet } else { Self::Default }
    }

    /// Print a status line to stderr.
    pub fn status(&self, msg: &str) {
        if *self == Self::Default {
            eprintln!("{}", msg);
        }
    }

    /// Print a failure without a prefix to stderr. Never quieted.
    pub fn notice(&self, msg: &str) {
        eprintln!("{}", msg);
    }

    /// Print an error message (red `Error:` prefix) to stderr. Never quieted.
    pub fn error(&self, msg: &str) {
        eprintln!("{} {}", "Error:".red().bold(), msg);
    }

    /// Write text for the calling shell to stdout, exactly as given.
    pub fn command(&self, cmd: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(cmd.as_bytes())?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_flag() {
        assert_eq!(Printer::new(true), Printer::Quiet);
        assert_eq!(Printer::new(false), Printer::Default);
    }
}
