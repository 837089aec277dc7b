//! Workflow driven by the command line

pub mod orchestration;

pub use orchestration::{plan_release, publish, push_release, write_changelog, ReleaseArgs, ReleasePlan, WorkflowResult};
