//! Performance tests for yit.
//!
//! These tests verify that the system meets performance requirements:
//! - 60 FPS TUI rendering (snapshot + draw well under 16.67ms)
//! - Synchronous persistence stays interactive on large workflows
//! - Loading a large record is fast
//!
//! # CI Integration
//!
//! Thresholds are generous enough for debug builds on shared CI runners.
//! Use `cargo test --test integration performance -- --nocapture` to see metrics.

use std::time::Instant;

use ratatui::{backend::TestBackend, Terminal};

use yit::config::Config;
use yit::storage::MemoryStore;
use yit::tea::Model;
use yit::ui;
use yit::workflow::{StepPatch, StepStatus, WorkflowStore};

use crate::fixtures::{TestHome, KEY};

/// Performance thresholds
const MAX_FRAME_TIME_MS: u128 = 17; // 60 FPS = 16.67ms per frame, allow slight margin
const MAX_MUTATION_MS: u128 = 50;
const MAX_LOAD_MS: u128 = 200;

const LARGE_WORKFLOW: usize = 200;

fn large_store(store: &mut WorkflowStore) {
    for i in 0..LARGE_WORKFLOW {
        store.create_step_with(
            StepPatch::default()
                .title(format!("Step {i}"))
                .tab("Browser")
                .instructions("Summarize the thread and list open questions. ".repeat(10))
                .notes("Check with the team before sending."),
        );
    }
}

/// Test: Snapshot and draw within a frame
/// Given a workflow of 200 steps
/// When a snapshot is taken and drawn to an in-memory terminal
/// Then the combined time fits in one 60 FPS frame
#[test]
fn test_snapshot_and_draw_within_frame_budget() {
    let mut store = WorkflowStore::open(Box::new(MemoryStore::new()), KEY);
    large_store(&mut store);
    store.select(LARGE_WORKFLOW / 2);
    let model = Model::new(store, Config::default());
    let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();

    // Warm up
    let state = model.snapshot();
    terminal.draw(|f| ui::draw(f, &state)).unwrap();

    let frames = 20;
    let start = Instant::now();
    for _ in 0..frames {
        let state = model.snapshot();
        terminal.draw(|f| ui::draw(f, &state)).unwrap();
    }
    let avg_ms = start.elapsed().as_millis() / frames;

    println!("snapshot+draw avg: {}ms", avg_ms);
    assert!(
        avg_ms < MAX_FRAME_TIME_MS,
        "snapshot+draw averaged {}ms - should be < {}ms",
        avg_ms,
        MAX_FRAME_TIME_MS
    );
}

/// Test: Persist-on-write latency
/// Given a 200-step workflow on disk
/// When a status changes
/// Then the synchronous write completes within an interactive budget
#[test]
fn test_mutation_with_disk_write_is_interactive() {
    let home = TestHome::new();
    let mut store = home.open(KEY);
    large_store(&mut store);

    let rounds = 20;
    let start = Instant::now();
    for i in 0..rounds {
        let status = if i % 2 == 0 {
            StepStatus::Done
        } else {
            StepStatus::Pending
        };
        store.set_step_status(i, status);
    }
    let avg_ms = start.elapsed().as_millis() / rounds as u128;

    println!("mutation+persist avg: {}ms", avg_ms);
    assert!(store.take_persist_error().is_none());
    assert!(
        avg_ms < MAX_MUTATION_MS,
        "mutation+persist averaged {}ms - should be < {}ms",
        avg_ms,
        MAX_MUTATION_MS
    );
}

/// Test: Load latency
/// Given a persisted 200-step workflow
/// When the store is reopened
/// Then validation and decoding finish quickly
#[test]
fn test_load_large_record() {
    let home = TestHome::new();
    {
        let mut store = home.open(KEY);
        large_store(&mut store);
    }

    let start = Instant::now();
    let store = home.open(KEY);
    let elapsed = start.elapsed().as_millis();

    println!("load: {}ms", elapsed);
    assert_eq!(store.workflow().len(), LARGE_WORKFLOW);
    assert!(
        elapsed < MAX_LOAD_MS,
        "loading took {}ms - should be < {}ms",
        elapsed,
        MAX_LOAD_MS
    );
}
