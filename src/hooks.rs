// SPDX-License-Identifier: Apache-2.0

//! Shell integration hooks for venv-pick.
//!
//! A child process cannot change its parent shell, so the binary only prints
//! `source …/bin/activate`. The hook wraps it in a shell function that runs
//! the binary in a command substitution and evaluates what comes back.
//! The picker draws on stderr, so the substitution captures only the command.

/// Shells with a POSIX `activate` script.
pub const SUPPORTED_SHELLS: &[&str] = &["bash", "zsh"];

/// Generates the `venv_pick` function (and the `vp` shortcut) for `shell`.
///
/// Usage: `eval "$(venv-pick --hook zsh)"`. Returns `None` for shells
/// without a POSIX activation script.
pub fn generate_hook(shell: &str) -> Option<String> {
    if !SUPPORTED_SHELLS.contains(&shell) {
        return None;
    }

    Some(format!(
        r#"
# venv-pick shell integration ({shell})

__VENV_PICK_BIN="$(command -v venv-pick 2>/dev/null)"

venv_pick() {{
    local cmd
    cmd="$("$__VENV_PICK_BIN" "$@")"
    local rc=$?

    if [ $rc -ne 0 ]; then
        return $rc
    fi
    if [ -n "$cmd" ]; then
        eval "$cmd"
    fi
}}

# Shortcut: 'vp' = 'venv_pick'
vp() {{
    venv_pick "$@"
}}
"#
    ))
}
