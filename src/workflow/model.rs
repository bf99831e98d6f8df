//! The step-sequence state machine.
//!
//! `Workflow` is plain in-memory state: an ordered list of steps, a name, and
//! the current-step pointer. Every operation is total. References that no
//! longer resolve are ignored, and pointer moves clamp at the boundaries.
//!
//! Invariants held after every operation:
//! - `current` is `Some(i)` with `i < steps.len()` when there are steps, and
//!   `None` when there are none.
//! - At most one step is `StepStatus::Active`.

use std::fmt;

use crate::templates::PromptTemplate;

use super::types::{Step, StepId, StepPatch, StepRef, StepStatus};

/// Name given to new and cleared workflows.
pub const DEFAULT_NAME: &str = "Untitled workflow";

/// Status counts across a workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub pending: usize,
    pub active: usize,
    pub done: usize,
    pub total: usize,
}

impl Progress {
    /// Completion percentage (0-100).
    pub fn percentage(&self) -> u16 {
        if self.total == 0 {
            return 0;
        }
        ((self.done * 100) / self.total) as u16
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} done · {} in progress · {} waiting",
            self.done, self.total, self.active, self.pending
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workflow {
    name: String,
    steps: Vec<Step>,
    current: Option<usize>,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow {
    /// An empty workflow with the default name.
    pub fn new() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            steps: Vec::new(),
            current: None,
        }
    }

    /// Build a workflow from loaded parts, restoring the invariants.
    ///
    /// An out-of-range pointer is clamped, a missing one falls back to the
    /// first step. Only the first `Active` step keeps its status.
    pub fn from_parts(name: String, steps: Vec<Step>, current: Option<usize>) -> Self {
        let mut workflow = Self {
            name,
            steps,
            current,
        };
        workflow.normalize();
        workflow
    }

    fn normalize(&mut self) {
        self.current = if self.steps.is_empty() {
            None
        } else {
            Some(self.current.unwrap_or(0).min(self.steps.len() - 1))
        };

        let mut seen_active = false;
        for step in &mut self.steps {
            if step.status == StepStatus::Active {
                if seen_active {
                    step.status = StepStatus::Pending;
                }
                seen_active = true;
            }
        }
    }

    // Queries

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.current.and_then(|i| self.steps.get(i))
    }

    /// Resolve a reference to a position, if the step still exists.
    pub fn resolve(&self, step: impl Into<StepRef>) -> Option<usize> {
        match step.into() {
            StepRef::Id(id) => self.steps.iter().position(|s| s.id == id),
            StepRef::Index(index) => (index < self.steps.len()).then_some(index),
        }
    }

    pub fn step(&self, step: impl Into<StepRef>) -> Option<&Step> {
        self.resolve(step).map(|i| &self.steps[i])
    }

    /// The step currently marked in progress, if any.
    pub fn active_step(&self) -> Option<&Step> {
        self.steps.iter().find(|s| s.status == StepStatus::Active)
    }

    pub fn progress(&self) -> Progress {
        self.steps.iter().fold(
            Progress {
                total: self.steps.len(),
                ..Progress::default()
            },
            |mut acc, step| {
                match step.status {
                    StepStatus::Pending => acc.pending += 1,
                    StepStatus::Active => acc.active += 1,
                    StepStatus::Done => acc.done += 1,
                }
                acc
            },
        )
    }

    /// Instructions to copy for a step; `None` when there is nothing to copy.
    pub fn prompt_payload(&self, step: impl Into<StepRef>) -> Option<&str> {
        self.step(step)
            .map(|s| s.instructions.as_str())
            .filter(|text| !text.trim().is_empty())
    }

    // Mutations

    /// Append a blank or template-prefilled step and point at it.
    pub fn create_step(&mut self, template: Option<&PromptTemplate>) -> StepId {
        let fields = match template {
            Some(t) => StepPatch::default()
                .title(t.title)
                .tab(t.suggested_tool)
                .instructions(t.body),
            None => StepPatch::default(),
        };
        self.create_step_with(fields)
    }

    /// Append a step prefilled from arbitrary fields and point at it.
    pub fn create_step_with(&mut self, fields: StepPatch) -> StepId {
        let mut step = Step::blank();
        step.apply(&fields);
        let id = step.id;
        self.steps.push(step);
        self.current = Some(self.steps.len() - 1);
        id
    }

    /// Apply partial field updates.
    ///
    /// Returns `None` if the step is gone, otherwise whether any field changed.
    pub fn update_step(&mut self, step: impl Into<StepRef>, patch: &StepPatch) -> Option<bool> {
        let index = self.resolve(step)?;
        Some(self.steps[index].apply(patch))
    }

    /// Change a step's status. Returns `false` if the step is gone.
    ///
    /// Marking a step `Active` demotes any other active step to `Pending`
    /// and moves the pointer to it.
    pub fn set_step_status(&mut self, step: impl Into<StepRef>, status: StepStatus) -> bool {
        let Some(index) = self.resolve(step) else {
            return false;
        };

        if status == StepStatus::Active {
            for (i, other) in self.steps.iter_mut().enumerate() {
                if i != index && other.status == StepStatus::Active {
                    other.status = StepStatus::Pending;
                }
            }
            self.current = Some(index);
        }

        self.steps[index].status = status;
        true
    }

    /// Delete a step and repair the pointer.
    ///
    /// Removing the current step moves the pointer to the step that slides
    /// into its place, else the previous one, else `None`. Removing a step
    /// before the current one keeps the pointer on the same step.
    pub fn remove_step(&mut self, step: impl Into<StepRef>) -> Option<Step> {
        let index = self.resolve(step)?;
        let removed = self.steps.remove(index);

        self.current = match self.current {
            _ if self.steps.is_empty() => None,
            Some(current) if current == index => Some(index.min(self.steps.len() - 1)),
            Some(current) if current > index => Some(current - 1),
            other => other,
        };

        Some(removed)
    }

    /// Replace everything with a fresh empty workflow.
    pub fn clear_all(&mut self) {
        *self = Self::new();
    }

    /// Every step back to `Pending`, pointer back to the first step.
    pub fn reset_all_statuses(&mut self) {
        for step in &mut self.steps {
            step.status = StepStatus::Pending;
        }
        self.current = if self.steps.is_empty() { None } else { Some(0) };
    }

    /// Move the pointer forward one step. Returns whether it moved.
    pub fn advance(&mut self) -> bool {
        match self.current {
            Some(current) if current + 1 < self.steps.len() => {
                self.current = Some(current + 1);
                true
            }
            _ => false,
        }
    }

    /// Move the pointer back one step. Returns whether it moved.
    pub fn retreat(&mut self) -> bool {
        match self.current {
            Some(current) if current > 0 => {
                self.current = Some(current - 1);
                true
            }
            _ => false,
        }
    }

    /// Point at a specific step. Returns `false` if the step is gone.
    pub fn select(&mut self, step: impl Into<StepRef>) -> bool {
        let Some(index) = self.resolve(step) else {
            return false;
        };
        self.current = Some(index);
        true
    }

    /// Flip the current step between done and pending.
    ///
    /// On the transition to done the pointer moves to the next step after
    /// the current one that is not done; if every later step is done it
    /// advances one position when possible. Undoing never moves the pointer.
    /// Returns `false` on an empty workflow.
    pub fn toggle_current_done(&mut self) -> bool {
        let Some(current) = self.current else {
            return false;
        };

        if self.steps[current].status.is_done() {
            self.steps[current].status = StepStatus::Pending;
            return true;
        }

        self.steps[current].status = StepStatus::Done;

        let next_open = self
            .steps
            .iter()
            .enumerate()
            .skip(current + 1)
            .find(|(_, s)| !s.status.is_done())
            .map(|(i, _)| i);

        match next_open {
            Some(next) => self.current = Some(next),
            None => {
                self.advance();
            }
        }
        true
    }

    /// Run-view "mark done" button; same semantics as `toggle_current_done`.
    pub fn mark_current_done(&mut self) -> bool {
        self.toggle_current_done()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.name == name {
            return false;
        }
        self.name = name;
        true
    }
}
