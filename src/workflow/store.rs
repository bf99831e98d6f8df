//! WorkflowStore - the persisted, single source of truth for a workflow.

use crate::storage::KeyValueStore;
use crate::templates::PromptTemplate;
use crate::{ylog, ylog_debug, ylog_error, ylog_trace, ylog_warn};

use super::model::{Progress, Workflow};
use super::schema;
use super::summary;
use super::types::{Step, StepId, StepPatch, StepRef, StepStatus};

/// Owns a workflow and writes it back to storage after every mutation.
///
/// Writes are synchronous and never fail the mutation: a storage error is
/// logged, remembered for the presenter, and the in-memory state stays
/// authoritative until the next successful write.
pub struct WorkflowStore {
    workflow: Workflow,
    storage: Box<dyn KeyValueStore>,
    key: String,
    revision: u64,
    persist_error: Option<String>,
}

impl WorkflowStore {
    /// Load the workflow stored under `key`, or start empty.
    pub fn open(storage: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let raw = match storage.get(&key) {
            Ok(raw) => raw,
            Err(e) => {
                ylog_warn!("Could not read workflow '{}': {}", key, e);
                None
            }
        };
        let workflow = schema::load(raw.as_deref());
        ylog_debug!(
            "WorkflowStore::open key={} steps={} current={:?}",
            key,
            workflow.len(),
            workflow.current_index()
        );

        Self {
            workflow,
            storage,
            key,
            revision: 0,
            persist_error: None,
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Incremented after every accepted mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The most recent write failure, cleared once taken.
    pub fn take_persist_error(&mut self) -> Option<String> {
        self.persist_error.take()
    }

    pub fn export_summary(&self) -> String {
        summary::export_summary(&self.workflow)
    }

    pub fn progress(&self) -> Progress {
        self.workflow.progress()
    }

    /// Serialize the whole workflow and write it under the store key.
    ///
    /// Returns whether the write landed.
    pub fn persist(&mut self) -> bool {
        let result = schema::encode(&self.workflow)
            .and_then(|payload| {
                ylog_trace!("Persisting '{}' ({} bytes)", self.key, payload.len());
                self.storage.set(&self.key, &payload)
            });

        match result {
            Ok(()) => {
                self.persist_error = None;
                true
            }
            Err(e) => {
                ylog_error!("Failed to persist workflow '{}': {}", self.key, e);
                self.persist_error = Some(e.to_string());
                false
            }
        }
    }

    fn commit(&mut self, op: &str) {
        self.revision += 1;
        ylog_debug!(
            "{} -> steps={} current={:?} rev={}",
            op,
            self.workflow.len(),
            self.workflow.current_index(),
            self.revision
        );
        self.persist();
    }

    pub fn create_step(&mut self, template: Option<&PromptTemplate>) -> StepId {
        let id = self.workflow.create_step(template);
        self.commit("create_step");
        id
    }

    pub fn create_step_with(&mut self, fields: StepPatch) -> StepId {
        let id = self.workflow.create_step_with(fields);
        self.commit("create_step_with");
        id
    }

    /// Returns `true` only when a field actually changed.
    pub fn update_step(&mut self, step: impl Into<StepRef>, patch: &StepPatch) -> bool {
        let step = step.into();
        match self.workflow.update_step(step, patch) {
            None => {
                ylog_debug!("update_step ignored: {:?} not found", step);
                false
            }
            Some(false) => {
                ylog_debug!("update_step ignored: {:?} unchanged", step);
                false
            }
            Some(true) => {
                self.commit("update_step");
                true
            }
        }
    }

    pub fn set_step_status(&mut self, step: impl Into<StepRef>, status: StepStatus) -> bool {
        let step = step.into();
        if !self.workflow.set_step_status(step, status) {
            ylog_debug!("set_step_status ignored: {:?} not found", step);
            return false;
        }
        self.commit("set_step_status");
        true
    }

    pub fn remove_step(&mut self, step: impl Into<StepRef>) -> Option<Step> {
        let step = step.into();
        let removed = self.workflow.remove_step(step);
        match &removed {
            Some(_) => self.commit("remove_step"),
            None => ylog_debug!("remove_step ignored: {:?} not found", step),
        }
        removed
    }

    pub fn clear_all(&mut self) {
        ylog!("Clearing workflow '{}' ({} steps)", self.key, self.workflow.len());
        self.workflow.clear_all();
        self.commit("clear_all");
    }

    pub fn reset_all_statuses(&mut self) {
        self.workflow.reset_all_statuses();
        self.commit("reset_all_statuses");
    }

    pub fn advance(&mut self) -> bool {
        let moved = self.workflow.advance();
        if moved {
            self.commit("advance");
        }
        moved
    }

    pub fn retreat(&mut self) -> bool {
        let moved = self.workflow.retreat();
        if moved {
            self.commit("retreat");
        }
        moved
    }

    pub fn select(&mut self, step: impl Into<StepRef>) -> bool {
        let moved = self.workflow.select(step);
        if moved {
            self.commit("select");
        }
        moved
    }

    pub fn toggle_current_done(&mut self) -> bool {
        let changed = self.workflow.toggle_current_done();
        if changed {
            self.commit("toggle_current_done");
        }
        changed
    }

    pub fn mark_current_done(&mut self) -> bool {
        self.toggle_current_done()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        let changed = self.workflow.set_name(name);
        if changed {
            self.commit("set_name");
        }
        changed
    }
}
