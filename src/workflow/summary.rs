//! Plain-text export of a workflow for the clipboard.

use super::model::Workflow;

/// Returned instead of a summary when there are no steps.
pub const EMPTY_SUMMARY: &str = "Workflow is empty. Add steps first.";

/// Render every step as a numbered block, blocks separated by a blank line.
pub fn export_summary(workflow: &Workflow) -> String {
    if workflow.is_empty() {
        return EMPTY_SUMMARY.to_string();
    }

    workflow
        .steps()
        .iter()
        .enumerate()
        .map(|(index, step)| {
            [
                format!("Step {}: {}", index + 1, or_placeholder(&step.title, "(untitled)")),
                format!("  Tab: {}", or_placeholder(&step.tab, "(not set)")),
                format!("  Status: {}", step.status.label()),
                format!("  Prompt: {}", or_placeholder(&flatten(&step.instructions), "(none)")),
                format!("  Notes: {}", or_placeholder(&flatten(&step.notes), "(none)")),
            ]
            .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Collapse line breaks (`\r\n`, `\n`, `\r`) to single spaces.
pub fn flatten(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}
