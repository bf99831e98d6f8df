//! Clipboard copy for prompt text and exported plans.
//!
//! Tries a clipboard command first (the configured one, or the first of the
//! well-known tools found on `PATH`), then falls back to an OSC 52 escape
//! sequence written to the terminal. If both fail the caller tells the user
//! to copy by hand.

use std::io::{IsTerminal, Write};
use std::process::{Command, Stdio};

use base64::Engine;

use crate::config::Config;
use crate::{ylog_debug, ylog_warn, Error, Result};

/// Clipboard tools probed in order when no command is configured.
const CANDIDATES: &[&[&str]] = &[
    &["wl-copy"],
    &["pbcopy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
];

/// How a copy was delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyMethod {
    Command(String),
    Osc52,
}

/// Copy `text` using the configured command, a detected tool, or OSC 52.
pub fn copy(text: &str, config: &Config) -> Result<CopyMethod> {
    let command = match config.clipboard_command.as_deref() {
        Some(cmd) => Some(cmd.to_string()),
        None => detect_command(),
    };

    if let Some(cmd) = command {
        match copy_with_command(text, &cmd) {
            Ok(()) => return Ok(CopyMethod::Command(cmd)),
            Err(e) => ylog_warn!("Clipboard command '{}' failed: {}", cmd, e),
        }
    }

    let mut stdout = std::io::stdout();
    if !stdout.is_terminal() {
        return Err(Error::Clipboard(
            "no clipboard tool found and stdout is not a terminal".to_string(),
        ));
    }
    write_osc52(text, &mut stdout)?;
    Ok(CopyMethod::Osc52)
}

/// First clipboard tool available on `PATH`, as a command line.
pub fn detect_command() -> Option<String> {
    CANDIDATES
        .iter()
        .find(|argv| which::which(argv[0]).is_ok())
        .map(|argv| argv.join(" "))
}

/// Pipe `text` into a command line (split on whitespace).
pub fn copy_with_command(text: &str, command: &str) -> Result<()> {
    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| Error::Clipboard("empty clipboard command".to_string()))?;

    ylog_debug!("Clipboard: piping {} bytes into '{}'", text.len(), command);
    let mut child = Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        // A tool that exits early closes the pipe; its exit status decides.
        if let Err(e) = stdin.write_all(text.as_bytes()) {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }
    }

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::Clipboard(format!("'{}' exited with {}", command, status)))
    }
}

/// OSC 52 "set clipboard" sequence for `text`.
pub fn osc52_sequence(text: &str) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{}\x07", payload)
}

pub fn write_osc52(text: &str, out: &mut impl Write) -> Result<()> {
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()?;
    Ok(())
}
