use crate::tea::{Mode, Notification};
use crate::workflow::{Progress, Step, StepId, StepStatus};
use std::sync::atomic::{AtomicU64, Ordering};

/// Shown in place of empty step fields.
pub const TITLE_PLACEHOLDER: &str = "Untitled step";
pub const TAB_PLACEHOLDER: &str = "Add the tool you need to open.";
pub const PROMPT_PLACEHOLDER: &str = "Add or paste the instructions you want to reuse.";
pub const NOTES_PLACEHOLDER: &str = "Add reminders for yourself or the next teammate.";
pub const EMPTY_WORKFLOW: &str = "No steps yet. Press 'a' to add one or 't' to pick a template.";

/// View struct for one step in the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub id: StepId,
    /// 1-based position.
    pub number: usize,
    pub title: String,
    pub tab: String,
    pub instructions: String,
    pub notes: String,
    pub status: StepStatus,
}

impl StepView {
    pub fn new(number: usize, step: &Step) -> Self {
        Self {
            id: step.id,
            number,
            title: step.title.clone(),
            tab: step.tab.clone(),
            instructions: step.instructions.clone(),
            notes: step.notes.clone(),
            status: step.status,
        }
    }

    pub fn display_title(&self) -> &str {
        or_placeholder(&self.title, TITLE_PLACEHOLDER)
    }

    pub fn display_tab(&self) -> &str {
        or_placeholder(&self.tab, TAB_PLACEHOLDER)
    }

    pub fn display_instructions(&self) -> &str {
        or_placeholder(&self.instructions, PROMPT_PLACEHOLDER)
    }

    pub fn display_notes(&self) -> &str {
        or_placeholder(&self.notes, NOTES_PLACEHOLDER)
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

static VERSION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Monotonically increasing snapshot version, starting at 1.
pub fn next_version() -> u64 {
    VERSION_COUNTER.fetch_add(1, Ordering::Relaxed) + 1
}

#[derive(Debug, Clone)]
pub struct RenderState {
    pub version: u64,
    pub name: String,
    pub steps: Vec<StepView>,
    pub current: Option<usize>,
    pub progress: Progress,
    pub mode: Mode,
    pub input_buffer: String,
    /// Highlighted row in the template picker.
    pub template_selected: usize,
    pub notification: Option<Notification>,
    /// Whether the keymap legend is expanded (toggled by '?')
    pub show_keymap: bool,
}

impl RenderState {
    pub fn current_step(&self) -> Option<&StepView> {
        self.current.and_then(|i| self.steps.get(i))
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            version: 0,
            name: String::new(),
            steps: Vec::new(),
            current: None,
            progress: Progress::default(),
            mode: Mode::List,
            input_buffer: String::new(),
            template_selected: 0,
            notification: None,
            show_keymap: false,
        }
    }
}
