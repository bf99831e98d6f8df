//! Recovery integration tests.
//!
//! These tests verify that a store opened over damaged, foreign or legacy
//! persisted state always comes up usable, and that write failures never
//! corrupt in-memory state.

use std::fs;

use yit::storage::{FileStore, KeyValueStore};
use yit::workflow::{StepPatch, StepStatus, WorkflowStore, DEFAULT_NAME};
use yit::Error;

use crate::fixtures::{seed, titles, SharedMemory, TestHome, KEY};

/// Test: Malformed JSON
/// Given a persisted file that is not JSON
/// When the store opens
/// Then it starts empty and the next mutation overwrites the file
#[test]
fn test_malformed_file_starts_empty() {
    let home = TestHome::new();
    home.write_raw(KEY, "{ this is not json");

    let mut store = home.open(KEY);
    assert!(store.workflow().is_empty());
    assert_eq!(store.workflow().current_index(), None);

    store.create_step_with(StepPatch::default().title("Fresh start"));
    assert_eq!(titles(&home.open(KEY)), vec!["Fresh start"]);
}

/// Test: Wrong shapes
/// Given records whose root or `steps` has the wrong type
/// When the store opens
/// Then each is discarded as a whole
#[test]
fn test_wrong_shapes_are_discarded() {
    let home = TestHome::new();
    for raw in ["[]", "42", "null", r#"{"steps": "nope"}"#, r#"{"name": "x"}"#] {
        home.write_raw(KEY, raw);
        let store = home.open(KEY);
        assert!(store.workflow().is_empty(), "record {raw} should be discarded");
        assert_eq!(store.workflow().name(), DEFAULT_NAME);
    }
}

/// Test: Field-level defaults
/// Given a record with a minimal step
/// When the store opens
/// Then missing fields take their defaults
#[test]
fn test_minimal_step_gets_defaults() {
    let home = TestHome::new();
    home.write_raw(KEY, r#"{"steps":[{"title":"X"}]}"#);

    let store = home.open(KEY);
    let step = &store.workflow().steps()[0];
    assert_eq!(step.title, "X");
    assert_eq!(step.tab, "");
    assert_eq!(step.instructions, "");
    assert_eq!(step.notes, "");
    assert_eq!(step.status, StepStatus::Pending);
    assert_eq!(store.workflow().current_index(), Some(0));
}

/// Test: Legacy record
/// Given a record using the older field names
/// When the store opens
/// Then aliases are mapped and the pointer follows the legacy active id
#[test]
fn test_legacy_record_is_migrated() {
    let home = TestHome::new();
    home.write_raw(
        KEY,
        r#"{
            "name": "Support rotation",
            "steps": [
                {"id": "a", "title": "Inbox", "app": "Zendesk", "prompt": "Triage", "status": "done"},
                {"id": "b", "title": "Reply", "app": "Gmail", "prompt": "Draft", "status": "active"},
                {"id": "c", "title": "Log", "status": "blocked"}
            ],
            "activeRunStep": "b"
        }"#,
    );

    let mut store = home.open(KEY);
    let workflow = store.workflow();
    assert_eq!(workflow.name(), "Support rotation");
    assert_eq!(workflow.current_index(), Some(1));
    assert_eq!(workflow.steps()[0].tab, "Zendesk");
    assert_eq!(workflow.steps()[0].instructions, "Triage");
    assert_eq!(workflow.steps()[1].status, StepStatus::Active);
    // Unknown statuses fall back to pending
    assert_eq!(workflow.steps()[2].status, StepStatus::Pending);

    // The next write is in the canonical shape
    store.advance();
    let raw = home.read_raw(KEY).unwrap();
    assert!(raw.contains("\"instructions\""));
    assert!(raw.contains("\"currentStepIndex\""));
    assert!(!raw.contains("\"activeRunStep\""));
}

/// Test: Out-of-range pointer
/// Given a record whose pointer is past the end
/// When the store opens
/// Then the pointer is clamped to the last step
#[test]
fn test_out_of_range_pointer_is_clamped() {
    let home = TestHome::new();
    home.write_raw(
        KEY,
        r#"{"steps":[{"title":"A"},{"title":"B"}],"currentStepIndex":9}"#,
    );

    let store = home.open(KEY);
    assert_eq!(store.workflow().current_index(), Some(1));
}

/// Test: Several active steps on disk
/// Given a hand-edited record with two active steps
/// When the store opens
/// Then at most one stays active
#[test]
fn test_multiple_active_steps_are_demoted() {
    let home = TestHome::new();
    home.write_raw(
        KEY,
        r#"{"steps":[{"title":"A","status":"active"},{"title":"B","status":"active"}]}"#,
    );

    let store = home.open(KEY);
    assert_eq!(store.progress().active, 1);
}

/// Test: Duplicate ids
/// Given two steps sharing an id
/// When the store opens
/// Then ids are made unique so id references stay unambiguous
#[test]
fn test_duplicate_ids_are_replaced() {
    let home = TestHome::new();
    let id = "5b0e4d1e-8a55-4cf3-9a43-6a0f3c0b9c11";
    home.write_raw(
        KEY,
        &format!(r#"{{"steps":[{{"id":"{id}","title":"A"}},{{"id":"{id}","title":"B"}}]}}"#),
    );

    let store = home.open(KEY);
    let steps = store.workflow().steps();
    assert_eq!(steps[0].id.to_string(), id);
    assert_ne!(steps[0].id, steps[1].id);
}

/// Test: Backup on overwrite
/// Given an existing persisted workflow
/// When it is saved again
/// Then the previous version is kept next to it as a backup
#[test]
fn test_overwrite_keeps_backup() {
    let home = TestHome::new();
    let mut store = home.open(KEY);
    seed(&mut store, &["A"]);
    store.create_step_with(StepPatch::default().title("B"));

    let backup = fs::read_to_string(home.path.join(format!("{KEY}.json.bak"))).unwrap();
    assert!(backup.contains("\"A\""));
    assert!(!backup.contains("\"B\""));
    assert!(!home.path.join(format!("{KEY}.json.tmp")).exists());
}

/// Test: Quota exceeded
/// Given storage with a small quota
/// When a mutation produces a record larger than the quota
/// Then memory keeps the change, the error is reported once, and the last
///      good record stays on storage
#[test]
fn test_quota_failure_keeps_memory_and_reports_once() {
    let memory = SharedMemory::with_quota(100_000);
    let mut store = memory.open(KEY);
    seed(&mut store, &["A"]);
    let saved = memory.raw(KEY).unwrap();

    memory.set_quota(Some(saved.len() + KEY.len()));
    store.create_step_with(StepPatch::default().instructions("x".repeat(1_000)));

    assert_eq!(store.workflow().len(), 2);
    let err = store.take_persist_error().expect("write should have failed");
    assert!(err.contains("quota"), "unexpected error: {err}");
    assert!(store.take_persist_error().is_none());
    assert_eq!(memory.raw(KEY).unwrap(), saved);

    // Once space is available the next mutation writes everything
    memory.set_quota(None);
    store.select(0usize);
    assert_eq!(memory.open(KEY).workflow().len(), 2);
}

/// Test: Unwritable directory
/// Given a storage directory path that is a regular file
/// When the store persists
/// Then the error is surfaced and no operation panics
#[test]
fn test_unwritable_directory_is_reported() {
    let home = TestHome::new();
    let blocker = home.path.join("not-a-dir");
    fs::write(&blocker, "file").unwrap();

    let mut store = WorkflowStore::open(Box::new(FileStore::new(&blocker)), KEY);
    store.create_step_with(StepPatch::default().title("A"));

    assert_eq!(store.workflow().len(), 1);
    assert!(store.take_persist_error().is_some());
    assert!(!store.persist());
}

/// Test: Invalid storage key
/// Given a key that would escape the data directory
/// When storage is used directly
/// Then it is rejected before touching the filesystem
#[test]
fn test_invalid_key_is_rejected() {
    let home = TestHome::new();
    let mut storage = FileStore::new(&home.path);
    assert!(matches!(
        storage.set("../escape", "{}"),
        Err(Error::InvalidKey(_))
    ));
    assert!(matches!(storage.get(""), Err(Error::InvalidKey(_))));
}
