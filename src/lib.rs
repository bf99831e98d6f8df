pub mod clipboard;
pub mod config;
pub mod error;
pub mod log;
pub mod storage;
pub mod templates;
pub mod workflow;

// Decoupled game loop architecture
pub mod app;
pub mod render;
pub mod tea;
pub mod ui;

pub use error::{Error, Result};
pub use workflow::{Step, StepId, StepPatch, StepStatus, Workflow, WorkflowStore};
