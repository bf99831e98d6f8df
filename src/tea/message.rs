//! Messages for the TEA (The Elm Architecture) pattern.
//!
//! Messages are inputs to the update function: keyboard events, and the
//! outcomes of commands the runtime executed.

use crossterm::event::KeyEvent;

/// Input messages to the update function.
#[derive(Debug)]
pub enum Message {
    // Keyboard/terminal events
    Key(KeyEvent),
    Resize(u16, u16),

    // Command completion callbacks
    /// Clipboard copy landed; carries the acknowledgment to show.
    Copied(String),
    CopyFailed(String),
}
