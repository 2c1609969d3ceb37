// SPDX-License-Identifier: Apache-2.0

use clap::{CommandFactory, Parser};
use dialoguer::console;
use std::io::IsTerminal as _;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use venv_pick::discover::{self, Ascent};
use venv_pick::picker::{self, TermFrontend};
use venv_pick::printer::Printer;
use venv_pick::types::{PickError, SearchOutcome};
use venv_pick::{activate, hooks};

#[derive(Parser)]
#[command(name = "venv-pick")]
#[command(version)]
#[command(
    about = "Find the nearest Python virtual environment and print the command to activate it",
    long_about = "Searches the current directory, then each parent, for subdirectories \
                  containing bin/activate. Prints `source <env>/bin/activate` on stdout; \
                  when several environments sit side by side, asks which one.\n\n\
                  Use it through the shell hook: eval \"$(venv-pick --hook zsh)\""
)]
struct Cli {
    /// Validate this environment directory instead of searching
    path: Option<PathBuf>,

    /// Stop the upward search after scanning this directory
    #[arg(long, env = "VENV_PICK_CEILING", value_name = "DIR")]
    ceiling: Option<PathBuf>,

    /// Do not print the "Activating environment" status line
    #[arg(short, long)]
    quiet: bool,

    /// Print shell integration for bash or zsh and exit
    #[arg(long, value_name = "SHELL", conflicts_with = "path")]
    hook: Option<String>,

    /// Generate shell completion scripts
    #[arg(long, value_enum, value_name = "SHELL", hide = true)]
    completions: Option<clap_complete::Shell>,
}

/// Logs go to stderr, filtered by `VENV_PICK_LOG`; off when unset.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("VENV_PICK_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    // The picker and diagnostics are always coloured, even when piped.
    colored::control::set_override(true);
    console::set_colors_enabled_stderr(true);

    let printer = Printer::new(cli.quiet);
    match run(cli, printer) {
        Ok(()) => ExitCode::SUCCESS,
        // An exhausted search reads as a plain message, not an `Error:`.
        Err(e @ PickError::NotFound) => {
            printer.notice(&e.to_string());
            ExitCode::FAILURE
        }
        Err(e) => {
            printer.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, printer: Printer) -> Result<(), PickError> {
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let bin_name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        return Ok(());
    }

    if let Some(shell) = cli.hook {
        let hook = hooks::generate_hook(&shell).ok_or(PickError::UnsupportedShell(shell))?;
        return printer.command(&hook).map_err(PickError::Output);
    }

    if let Some(path) = cli.path {
        if !discover::is_venv(&path) {
            return Err(PickError::NotAVenv(path));
        }
        return activate::emit(&path, printer).map_err(PickError::Output);
    }

    let start = std::env::current_dir().map_err(PickError::CurrentDir)?;
    let ceiling = cli.ceiling.map(|dir| dir.canonicalize().unwrap_or(dir));
    debug!(start = %start.display(), ?ceiling, "searching");

    match Ascent::new(start).ceiling(ceiling).run() {
        SearchOutcome::Single(found) => activate::emit(&found, printer).map_err(PickError::Output),
        SearchOutcome::Multiple(found) => {
            let mut frontend = TermFrontend::stderr().map_err(PickError::Picker)?;
            match picker::pick(found, &mut frontend).map_err(PickError::Picker)? {
                Some(chosen) => activate::emit(&chosen, printer).map_err(PickError::Output),
                None => Ok(()),
            }
        }
        SearchOutcome::NotFound { levels } => {
            debug!(levels, "search exhausted");
            Err(PickError::NotFound)
        }
    }
}
