use crate::error::{JournalError, Result};
use std::io::Write;
use std::process::{Command, Stdio};

/// A program that takes clipboard text on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

/// Clipboard programs for this platform, in the order they are tried.
/// - macOS: pbcopy
/// - Linux: xclip, then xsel
/// - Windows: clip.exe
pub fn candidates() -> &'static [ClipboardCommand] {
    #[cfg(target_os = "macos")]
    {
        &[ClipboardCommand {
            program: "pbcopy",
            args: &[],
        }]
    }

    #[cfg(target_os = "linux")]
    {
        &[
            ClipboardCommand {
                program: "xclip",
                args: &["-selection", "clipboard"],
            },
            ClipboardCommand {
                program: "xsel",
                args: &["--clipboard", "--input"],
            },
        ]
    }

    #[cfg(target_os = "windows")]
    {
        &[ClipboardCommand {
            program: "clip",
            args: &[],
        }]
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        &[]
    }
}

/// Copies text to the system clipboard with the first clipboard program that starts.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let commands = candidates();
    if commands.is_empty() {
        return Err(JournalError::Api(
            "Clipboard not supported on this platform".to_string(),
        ));
    }

    let mut last_error = None;
    for command in commands {
        match pipe_to(command, text) {
            Ok(()) => return Ok(()),
            Err(err) => {
                tracing::debug!(program = command.program, error = %err, "clipboard program failed");
                last_error = Some(err);
            }
        }
    }

    let tried: Vec<&str> = commands.iter().map(|c| c.program).collect();
    Err(JournalError::Api(format!(
        "Copy not supported: could not run {} ({})",
        tried.join(" or "),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
}

fn pipe_to(command: &ClipboardCommand, text: &str) -> Result<()> {
    let mut child = Command::new(command.program)
        .args(command.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .map_err(|e| JournalError::Api(format!("Failed to spawn {}: {}", command.program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes()).map_err(|e| {
            JournalError::Api(format!("Failed to write to {}: {}", command.program, e))
        })?;
    }

    let status = child
        .wait()
        .map_err(|e| JournalError::Api(format!("Failed to wait for {}: {}", command.program, e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(JournalError::Api(format!(
            "{} exited with error",
            command.program
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(any(target_os = "macos", target_os = "linux", target_os = "windows"))]
    fn platform_has_a_clipboard_program() {
        assert!(!candidates().is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn pipes_text_into_the_program() {
        let cat = ClipboardCommand {
            program: "cat",
            args: &[],
        };
        assert!(pipe_to(&cat, "Adam fell that men might be").is_ok());
    }

    #[test]
    fn missing_program_is_an_error() {
        let missing = ClipboardCommand {
            program: "definitely-not-a-clipboard-program",
            args: &[],
        };
        assert!(matches!(
            pipe_to(&missing, "x"),
            Err(JournalError::Api(_))
        ));
    }
}
