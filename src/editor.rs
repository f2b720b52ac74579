//! Launching the user's editor on a scratch file.
//!
//! The editor runs as a child of the user's shell, so `EDITOR` values that
//! carry arguments (`"code --wait"`) keep working. Whether the user actually
//! saved is decided by comparing the file's modification timestamp before
//! and after the editor exits: quitting without saving is how the user says
//! no, and an empty save still counts as an answer.

use std::env;
use std::fs;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use crate::{Error, Result};

#[cfg(unix)]
const DEFAULT_EDITOR: &str = "vim";
#[cfg(windows)]
const DEFAULT_EDITOR: &str = "notepad";

/// Resolve the editor command from `$EDITOR`, falling back to the platform
/// default.
fn editor_command() -> String {
    env::var("EDITOR")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

/// Open `path` in the user's editor and report whether the file was
/// modified.
///
/// Returns `Ok(false)` when the editor exits successfully but the file's
/// modification timestamp is unchanged. Failure to spawn the editor, or a
/// non-success exit status, yields [`Error::Editor`].
pub(crate) fn edit_interactively(path: &Path) -> Result<bool> {
    let editor = editor_command();
    let mod_before = fs::metadata(path)?.modified()?;

    let status = spawn_editor(&editor, path).map_err(|err| Error::Editor {
        command: editor.clone(),
        reason: err.to_string(),
    })?;
    if !status.success() {
        return Err(Error::Editor {
            command: editor,
            reason: format!("exited with {status}"),
        });
    }

    let mod_after = fs::metadata(path)?.modified()?;
    Ok(mod_after != mod_before)
}

/// Spawn the editor as `$SHELL -c "<editor> <path>"` with inherited stdio
/// and wait for it.
#[cfg(unix)]
fn spawn_editor(editor: &str, path: &Path) -> std::io::Result<ExitStatus> {
    let shell = env::var("SHELL")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "/bin/sh".to_string());

    Command::new(shell)
        .arg("-c")
        .arg(format!("{} {}", editor, path.display()))
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
}

/// Spawn the editor as `%COMSPEC% /c <editor> <path>` and wait for it.
///
/// Standard input is bound to the console device (`CONIN$`) so interactive
/// editors work even when the caller's stdin is redirected.
#[cfg(windows)]
fn spawn_editor(editor: &str, path: &Path) -> std::io::Result<ExitStatus> {
    let shell = env::var("COMSPEC")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "cmd".to_string());
    let conin = fs::File::open("CONIN$")?;

    Command::new(shell)
        .arg("/c")
        .arg(editor)
        .arg(path)
        .stdin(Stdio::from(conin))
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
}
