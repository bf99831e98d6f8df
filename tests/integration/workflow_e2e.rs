//! End-to-end workflow integration tests.
//!
//! Each test drives a `WorkflowStore` over a `FileStore` in a temporary
//! directory, then reopens the store to verify the persisted state matches
//! what the first session saw.

use yit::templates;
use yit::workflow::{StepPatch, StepStatus, DEFAULT_NAME, EMPTY_SUMMARY};

use crate::fixtures::{seed, titles, TestHome, KEY};

/// Test: First step on an empty workflow
/// Given an empty store
/// When a titled step with instructions is created
/// Then the workflow has one step, the pointer is on it, and it survives reopen
#[test]
fn test_first_step_is_current_and_persisted() {
    let home = TestHome::new();
    let mut store = home.open(KEY);
    assert!(store.workflow().is_empty());
    assert_eq!(store.workflow().current_index(), None);

    store.create_step_with(
        StepPatch::default()
            .title("Support triage")
            .instructions("Summarize the ticket and propose a reply"),
    );
    assert_eq!(store.workflow().len(), 1);
    assert_eq!(store.workflow().current_index(), Some(0));
    assert!(store.take_persist_error().is_none());

    let reopened = home.open(KEY);
    assert_eq!(reopened.workflow(), store.workflow());
}

/// Test: Working through a plan
/// Given three pending steps with the pointer on the first
/// When the user marks each current step done in turn
/// Then the pointer follows the next open step and progress reaches 100%
#[test]
fn test_walk_through_plan() {
    let home = TestHome::new();
    let mut store = home.open(KEY);
    seed(&mut store, &["A", "B", "C"]);

    assert!(store.mark_current_done());
    assert_eq!(store.workflow().current_index(), Some(1));
    assert_eq!(store.workflow().steps()[0].status, StepStatus::Done);

    assert!(store.mark_current_done());
    assert_eq!(store.workflow().current_index(), Some(2));

    assert!(store.mark_current_done());
    assert_eq!(store.progress().done, 3);
    assert_eq!(store.progress().percentage(), 100);

    let reopened = home.open(KEY);
    assert_eq!(reopened.progress().done, 3);
    assert_eq!(reopened.workflow().current_index(), Some(2));
}

/// Test: Undo completion
/// Given two done steps with the pointer on the first
/// When the current step is toggled
/// Then it becomes pending and the pointer stays put
#[test]
fn test_toggle_undo_keeps_pointer() {
    let home = TestHome::new();
    let mut store = home.open(KEY);
    seed(&mut store, &["A", "B"]);
    store.set_step_status(0usize, StepStatus::Done);
    store.set_step_status(1usize, StepStatus::Done);
    store.select(0usize);

    store.toggle_current_done();
    assert_eq!(store.workflow().steps()[0].status, StepStatus::Pending);
    assert_eq!(store.workflow().current_index(), Some(0));

    let reopened = home.open(KEY);
    assert_eq!(reopened.workflow().steps()[0].status, StepStatus::Pending);
    assert_eq!(reopened.workflow().current_index(), Some(0));
}

/// Test: Single in-progress step
/// Given steps A and B
/// When A then B are marked active
/// Then only B is active, and that holds after reopen
#[test]
fn test_single_active_step_survives_reopen() {
    let home = TestHome::new();
    let mut store = home.open(KEY);
    seed(&mut store, &["A", "B"]);

    store.set_step_status(0usize, StepStatus::Active);
    store.set_step_status(1usize, StepStatus::Active);

    let reopened = home.open(KEY);
    let statuses: Vec<_> = reopened.workflow().steps().iter().map(|s| s.status).collect();
    assert_eq!(statuses, vec![StepStatus::Pending, StepStatus::Active]);
    assert_eq!(reopened.workflow().active_step().unwrap().title, "B");
}

/// Test: Removing the last current step
/// Given [A, B] with the pointer on B
/// When B is removed, then A is removed
/// Then the pointer moves to A, then becomes None
#[test]
fn test_remove_current_last_step() {
    let home = TestHome::new();
    let mut store = home.open(KEY);
    seed(&mut store, &["A", "B"]);
    store.select(1usize);

    let removed = store.remove_step(1usize).unwrap();
    assert_eq!(removed.title, "B");
    assert_eq!(store.workflow().current_index(), Some(0));

    store.remove_step(0usize);
    assert_eq!(store.workflow().current_index(), None);

    let reopened = home.open(KEY);
    assert!(reopened.workflow().is_empty());
    assert_eq!(reopened.workflow().current_index(), None);
}

/// Test: Stable references across edits
/// Given a step referenced by id
/// When earlier steps are removed
/// Then updates through the id still land on the same step
#[test]
fn test_id_reference_survives_reordering() {
    let home = TestHome::new();
    let mut store = home.open(KEY);
    seed(&mut store, &["A", "B", "C"]);
    let c = store.workflow().steps()[2].id;

    store.remove_step(0usize);
    assert!(store.update_step(c, &StepPatch::default().notes("Check SLA")));
    assert_eq!(store.workflow().step(c).unwrap().notes, "Check SLA");

    let reopened = home.open(KEY);
    assert_eq!(reopened.workflow().step(c).unwrap().title, "C");
    assert_eq!(reopened.workflow().step(c).unwrap().notes, "Check SLA");
}

/// Test: Missing references are ignored
/// Given a step id that was removed
/// When it is updated, selected or removed again
/// Then nothing changes and nothing is written
#[test]
fn test_stale_reference_is_noop() {
    let home = TestHome::new();
    let mut store = home.open(KEY);
    seed(&mut store, &["A", "B"]);
    let a = store.workflow().steps()[0].id;
    store.remove_step(a);
    let revision = store.revision();

    assert!(!store.update_step(a, &StepPatch::default().title("ghost")));
    assert!(!store.set_step_status(a, StepStatus::Done));
    assert!(!store.select(a));
    assert!(store.remove_step(a).is_none());
    assert_eq!(store.revision(), revision);
    assert_eq!(titles(&store), vec!["B"]);
}

/// Test: Template prefill
/// Given the template catalog
/// When a step is created from each template
/// Then title, tab and prompt come from the template and the step is pending
#[test]
fn test_create_from_every_template() {
    let home = TestHome::new();
    let mut store = home.open(KEY);

    for template in templates::all() {
        let id = store.create_step(Some(template));
        let step = store.workflow().step(id).unwrap();
        assert_eq!(step.title, template.title);
        assert_eq!(step.tab, template.suggested_tool);
        assert_eq!(step.instructions, template.body);
        assert_eq!(step.status, StepStatus::Pending);
        assert_eq!(store.workflow().current_step().unwrap().id, id);
    }

    let reopened = home.open(KEY);
    assert_eq!(reopened.workflow().len(), templates::all().len());
}

/// Test: Export summary
/// Given an empty workflow, then a two-step workflow
/// When the summary is exported
/// Then the empty placeholder is returned, then one block per step
#[test]
fn test_export_summary_blocks() {
    let home = TestHome::new();
    let mut store = home.open(KEY);
    assert_eq!(store.export_summary(), EMPTY_SUMMARY);

    store.create_step_with(
        StepPatch::default()
            .title("Review")
            .tab("Figma")
            .instructions("Check spacing\nand colors"),
    );
    store.create_step(None);
    store.set_step_status(0usize, StepStatus::Done);

    let summary = store.export_summary();
    let blocks: Vec<&str> = summary.split("\n\n").collect();
    assert_eq!(blocks.len(), 2);
    assert_eq!(
        blocks[0],
        "Step 1: Review\n  Tab: Figma\n  Status: Done\n  Prompt: Check spacing and colors\n  Notes: (none)"
    );
    assert!(blocks[1].starts_with("Step 2: (untitled)\n  Tab: (not set)\n  Status: Pending"));
}

/// Test: Reset and clear
/// Given a named workflow with progress
/// When statuses are reset twice, then everything is cleared
/// Then reset is idempotent and clear restores a fresh workflow
#[test]
fn test_reset_then_clear() {
    let home = TestHome::new();
    let mut store = home.open(KEY);
    store.set_name("Launch day");
    seed(&mut store, &["A", "B"]);
    store.mark_current_done();
    store.set_step_status(1usize, StepStatus::Active);

    store.reset_all_statuses();
    let once = store.workflow().clone();
    store.reset_all_statuses();
    assert_eq!(store.workflow(), &once);
    assert_eq!(store.progress().pending, 2);

    store.clear_all();
    let reopened = home.open(KEY);
    assert!(reopened.workflow().is_empty());
    assert_eq!(reopened.workflow().name(), DEFAULT_NAME);
}

/// Test: Independent keys
/// Given two storage keys in the same directory
/// When each gets its own steps
/// Then neither sees the other's
#[test]
fn test_keys_are_independent() {
    let home = TestHome::new();
    let mut onboarding = home.open("onboarding");
    let mut launch = home.open("launch");
    seed(&mut onboarding, &["Welcome email"]);
    seed(&mut launch, &["Announce", "Monitor"]);

    assert_eq!(titles(&home.open("onboarding")), vec!["Welcome email"]);
    assert_eq!(titles(&home.open("launch")), vec!["Announce", "Monitor"]);
}

/// Test: Persisted record shape
/// Given a saved workflow
/// When the raw file is read
/// Then it uses the camelCase field names and lowercase statuses
#[test]
fn test_persisted_record_shape() {
    let home = TestHome::new();
    let mut store = home.open(KEY);
    seed(&mut store, &["A"]);
    store.set_step_status(0usize, StepStatus::Active);

    let raw = home.read_raw(KEY).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["name"], DEFAULT_NAME);
    assert_eq!(value["currentStepIndex"], 0);
    assert_eq!(value["activeStepId"], store.workflow().steps()[0].id.to_string());
    assert_eq!(value["steps"][0]["status"], "active");
    assert_eq!(value["steps"][0]["title"], "A");
}
