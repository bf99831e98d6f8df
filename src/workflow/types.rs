//! Core step type definitions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a step.
///
/// Uses UUID v4 for generation and provides a short form display
/// for human-readable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(pub Uuid);

impl StepId {
    /// Create a new unique step identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return first 8 characters of the UUID for display.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for StepId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for StepId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Completion status of a step.
///
/// At most one step in a workflow is `Active` at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    #[default]
    Pending,
    Active,
    Done,
}

impl StepStatus {
    /// Human-facing label used in the run view and the export summary.
    pub fn label(&self) -> &'static str {
        match self {
            StepStatus::Pending => "Pending",
            StepStatus::Active => "In progress",
            StepStatus::Done => "Done",
        }
    }

    /// Lenient parse; anything unrecognized is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(StepStatus::Pending),
            "active" | "in-progress" | "in_progress" => Some(StepStatus::Active),
            "done" => Some(StepStatus::Done),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, StepStatus::Done)
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepStatus::Pending => write!(f, "pending"),
            StepStatus::Active => write!(f, "active"),
            StepStatus::Done => write!(f, "done"),
        }
    }
}

impl std::str::FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown status '{s}' (expected pending, active or done)"))
    }
}

/// One unit of a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub title: String,
    /// The tool or browser tab the step happens in.
    pub tab: String,
    pub instructions: String,
    pub notes: String,
    pub status: StepStatus,
}

impl Step {
    /// A blank pending step with a fresh id.
    pub fn blank() -> Self {
        Self {
            id: StepId::new(),
            title: String::new(),
            tab: String::new(),
            instructions: String::new(),
            notes: String::new(),
            status: StepStatus::Pending,
        }
    }

    /// Title, or a placeholder when it is empty.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled step"
        } else {
            &self.title
        }
    }

    /// Apply the set fields of a patch. Returns whether anything changed.
    pub fn apply(&mut self, patch: &StepPatch) -> bool {
        let mut changed = false;
        for (field, value) in [
            (&mut self.title, &patch.title),
            (&mut self.tab, &patch.tab),
            (&mut self.instructions, &patch.instructions),
            (&mut self.notes, &patch.notes),
        ] {
            if let Some(value) = value {
                if *field != *value {
                    *field = value.clone();
                    changed = true;
                }
            }
        }
        changed
    }
}

/// Partial field update for a step. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepPatch {
    pub title: Option<String>,
    pub tab: Option<String>,
    pub instructions: Option<String>,
    pub notes: Option<String>,
}

impl StepPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn tab(mut self, tab: impl Into<String>) -> Self {
        self.tab = Some(tab.into());
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.tab.is_none()
            && self.instructions.is_none()
            && self.notes.is_none()
    }
}

/// Reference to a step, either by id or by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepRef {
    Id(StepId),
    Index(usize),
}

impl From<StepId> for StepRef {
    fn from(id: StepId) -> Self {
        StepRef::Id(id)
    }
}

impl From<usize> for StepRef {
    fn from(index: usize) -> Self {
        StepRef::Index(index)
    }
}
