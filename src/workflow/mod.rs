//! Step-sequence workflow state and its persistence.
//!
//! - `types`: steps, statuses, references and patches
//! - `model`: the in-memory state machine (`Workflow`)
//! - `schema`: the persisted record and load-time validation
//! - `summary`: plain-text export
//! - `store`: `WorkflowStore`, which persists after every mutation

mod model;
mod schema;
mod store;
mod summary;
mod types;

pub use model::{Progress, Workflow, DEFAULT_NAME};
pub use schema::{decode, encode, load};
pub use store::WorkflowStore;
pub use summary::{export_summary, flatten, EMPTY_SUMMARY};
pub use types::{Step, StepId, StepPatch, StepRef, StepStatus};
