//! User interface module.
//!
//! The tool runs unattended (typically in CI), so there are no prompts;
//! everything here is output formatting.

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_error, display_plan, display_retry_instruction,
    display_status, display_success, format_proposed_release, format_release_summary,
};
