//! Integration test suite for yit.
//!
//! These tests drive the public store API against real on-disk storage in a
//! temporary directory and verify that what one session writes, the next
//! session reads back.
//!
//! # Test Categories
//!
//! - `workflow_e2e`: Multi-step user journeys through the store
//! - `recovery`: Malformed, legacy and unwritable persisted state
//! - `performance`: Persistence and snapshot cost on large workflows

mod fixtures;

mod workflow_e2e;
mod recovery;
mod performance;
