//! Commands for the TEA (The Elm Architecture) pattern.
//!
//! Commands are outputs from the update function - they represent side effects
//! to be executed by the runtime.

/// Output commands from the update function.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Put text on the system clipboard; `ack` is shown on success.
    Copy { text: String, ack: String },

    // App lifecycle
    Quit,
}
