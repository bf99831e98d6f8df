//! Persisted workflow record and the validation boundary in front of it.
//!
//! Writes always produce the canonical camelCase record:
//!
//! ```json
//! { "name": "...", "steps": [...], "currentStepIndex": 0, "activeStepId": "..." }
//! ```
//!
//! Reads accept anything. A record is rejected as a whole only when it is not
//! JSON, not an object, or its `steps` is not an array; everything below that
//! is defaulted field by field. Older field names (`app`, `prompt`,
//! `activeRunStep`) are read as aliases.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{ylog_debug, ylog_warn, Error, Result};

use super::model::{Workflow, DEFAULT_NAME};
use super::types::{Step, StepId, StepStatus};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedWorkflow<'a> {
    name: &'a str,
    steps: &'a [Step],
    current_step_index: Option<usize>,
    active_step_id: Option<StepId>,
}

/// Serialize the full workflow state.
pub fn encode(workflow: &Workflow) -> Result<String> {
    let record = PersistedWorkflow {
        name: workflow.name(),
        steps: workflow.steps(),
        current_step_index: workflow.current_index(),
        active_step_id: workflow.current_step().map(|s| s.id),
    };
    Ok(serde_json::to_string_pretty(&record)?)
}

/// Validate a raw record into a workflow, or reject it.
pub fn decode(raw: &str) -> Result<Workflow> {
    let root: Value = serde_json::from_str(raw)?;
    let Value::Object(root) = root else {
        return Err(Error::Validation("workflow record is not an object".to_string()));
    };
    let Some(Value::Array(entries)) = root.get("steps") else {
        return Err(Error::Validation("'steps' is missing or not a list".to_string()));
    };

    let mut seen = HashSet::new();
    let mut raw_ids = Vec::with_capacity(entries.len());
    let steps: Vec<Step> = entries
        .iter()
        .map(|entry| {
            raw_ids.push(entry.get("id").and_then(Value::as_str).map(str::to_string));
            decode_step(entry, &mut seen)
        })
        .collect();

    let by_id = first_of(&root, &["activeStepId", "activeRunStep"])
        .and_then(|wanted| raw_ids.iter().position(|id| id.as_deref() == Some(wanted)));
    let by_index = root
        .get("currentStepIndex")
        .and_then(Value::as_u64)
        .map(|i| usize::try_from(i).unwrap_or(usize::MAX));

    let name = root
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(DEFAULT_NAME)
        .to_string();

    Ok(Workflow::from_parts(name, steps, by_id.or(by_index)))
}

/// Load boundary: absent or rejected records become an empty workflow.
pub fn load(raw: Option<&str>) -> Workflow {
    let Some(raw) = raw else {
        ylog_debug!("No persisted workflow, starting empty");
        return Workflow::new();
    };

    match decode(raw) {
        Ok(workflow) => {
            ylog_debug!(
                "Loaded workflow '{}' with {} steps",
                workflow.name(),
                workflow.len()
            );
            workflow
        }
        Err(e) => {
            ylog_warn!("Discarding malformed workflow record: {}", e);
            Workflow::new()
        }
    }
}

/// First string value among `keys`; `null` or non-string entries fall through
/// to the next alias.
fn first_of<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
}

fn decode_step(entry: &Value, seen: &mut HashSet<StepId>) -> Step {
    let Value::Object(fields) = entry else {
        let step = Step::blank();
        seen.insert(step.id);
        return step;
    };

    let text = |keys: &[&str]| {
        first_of(fields, keys)
            .map(str::to_string)
            .unwrap_or_default()
    };

    let id = fields
        .get("id")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<StepId>().ok())
        .filter(|id| !seen.contains(id))
        .unwrap_or_else(StepId::new);
    seen.insert(id);

    Step {
        id,
        title: text(&["title"]),
        tab: text(&["tab", "app"]),
        instructions: text(&["instructions", "prompt"]),
        notes: text(&["notes"]),
        status: fields
            .get("status")
            .and_then(Value::as_str)
            .and_then(StepStatus::parse)
            .unwrap_or_default(),
    }
}
