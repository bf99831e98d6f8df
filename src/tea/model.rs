//! Model for the TEA (The Elm Architecture) pattern.
//!
//! The Model owns the workflow store plus transient UI state (mode, input
//! buffer, pending edits). It holds no channels or thread handles.

use crate::config::Config;
use crate::render::{next_version, RenderState, StepView};
use crate::workflow::{StepId, StepPatch, WorkflowStore};

/// Level of a notification message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Error notification - displayed in red with "Error:" prefix
    Error,
    /// Informational notification - displayed in green
    Info,
}

/// A notification message to display to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Application UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    List,
    Input(InputKind),
    Templates,
    Confirm(ConfirmKind),
}

/// Types of input prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Title,
    Tab,
    Instructions,
    Notes,
    Name,
}

impl InputKind {
    pub fn label(&self) -> &'static str {
        match self {
            InputKind::Title => "Title",
            InputKind::Tab => "Tab",
            InputKind::Instructions => "Prompt",
            InputKind::Notes => "Notes",
            InputKind::Name => "Workflow name",
        }
    }

    /// Cycle to next input field (Tab behavior).
    /// Returns None for Name since it is a single field.
    pub fn next(&self) -> Option<InputKind> {
        match self {
            InputKind::Title => Some(InputKind::Tab),
            InputKind::Tab => Some(InputKind::Instructions),
            InputKind::Instructions => Some(InputKind::Notes),
            InputKind::Notes => Some(InputKind::Title),
            InputKind::Name => None,
        }
    }
}

/// Destructive actions waiting for a yes/no.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
    DeleteStep(StepId),
    ClearAll,
}

impl ConfirmKind {
    pub fn label(&self) -> &'static str {
        match self {
            ConfirmKind::DeleteStep(_) => "Delete this step?",
            ConfirmKind::ClearAll => "Clear all steps and restart?",
        }
    }
}

/// Which step the step-field editor writes to on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    New,
    Existing(StepId),
}

/// Application state - the single source of truth for the TUI.
pub struct Model {
    pub store: WorkflowStore,
    pub mode: Mode,

    // Input state
    pub input_buffer: String,
    pub draft: StepPatch,
    pub edit_target: Option<EditTarget>,
    pub template_selected: usize,
    pub notification: Option<Notification>,

    /// Whether the keymap legend is expanded (toggled by '?')
    pub show_keymap: bool,

    // Dirty flag - set when state changes and render is needed
    pub dirty: bool,

    pub config: Config,
}

impl Model {
    pub fn new(store: WorkflowStore, config: Config) -> Self {
        Self {
            store,
            mode: Mode::default(),
            input_buffer: String::new(),
            draft: StepPatch::default(),
            edit_target: None,
            template_selected: 0,
            notification: None,
            show_keymap: false,
            dirty: true,
            config,
        }
    }

    /// Create an immutable snapshot for the render thread.
    ///
    /// Each snapshot gets a monotonically increasing version number so the
    /// render thread can skip redundant draws.
    pub fn snapshot(&self) -> RenderState {
        let workflow = self.store.workflow();
        RenderState {
            version: next_version(),
            name: workflow.name().to_string(),
            steps: workflow
                .steps()
                .iter()
                .enumerate()
                .map(|(i, step)| StepView::new(i + 1, step))
                .collect(),
            current: workflow.current_index(),
            progress: workflow.progress(),
            mode: self.mode,
            input_buffer: self.input_buffer.clone(),
            template_selected: self.template_selected,
            notification: self.notification.clone(),
            show_keymap: self.show_keymap,
        }
    }
}
