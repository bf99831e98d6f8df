//! The Elm Architecture (TEA) implementation for the yit TUI.
//!
//! This module provides a clean separation of concerns:
//! - `Model`: The workflow store plus UI state
//! - `Message`: Inputs to the update function
//! - `Command`: Outputs (side effects) from the update function
//! - `update`: Transforms the model; store mutations persist synchronously

pub mod command;
pub mod message;
pub mod model;
pub mod update;

pub use command::Command;
pub use message::Message;
pub use model::{ConfirmKind, EditTarget, InputKind, Mode, Model, Notification, NotificationLevel};
pub use update::update;
