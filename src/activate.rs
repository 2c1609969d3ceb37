// SPDX-License-Identifier: Apache-2.0

//! The activation command handed back to the calling shell.

use crate::printer::Printer;
use std::io;
use std::path::Path;

/// `source <path>/bin/activate`, with the path exactly as given.
pub fn activation_command(path: impl AsRef<Path>) -> String {
    let script = path.as_ref().join("bin").join("activate");
    format!("source {}", script.display())
}

/// Announces the environment on stderr and writes the command to stdout.
pub fn emit(path: impl AsRef<Path>, printer: Printer) -> io::Result<()> {
    let path = path.as_ref();
    printer.status(&format!("Activating environment {}...", path.display()));
    printer.command(&activation_command(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_command() {
        assert_eq!(
            activation_command("/home/me/app/.venv"),
            "source /home/me/app/.venv/bin/activate"
        );
    }

    #[test]
    fn test_relative_path_kept_as_given() {
        assert_eq!(activation_command("venv"), "source venv/bin/activate");
        assert_eq!(activation_command("./venv/"), "source ./venv/bin/activate");
    }

    #[test]
    fn test_no_trailing_newline() {
        assert!(!activation_command("/x").ends_with('\n'));
    }
}
