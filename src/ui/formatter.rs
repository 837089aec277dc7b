//! Formatting functions for terminal output.
//!
//! Status lines go to stderr so that stdout carries only what a command
//! prints on purpose (a version number, a changelog section).

use crate::boundary::BoundaryWarning;
use crate::cli::orchestration::{ReleasePlan, WorkflowResult};
use crate::error::ReleaseStep;
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Describe the planned version change.
///
/// Shows either `From: <old> -> To: <new>` or the initial tag.
pub fn format_proposed_release(plan: &ReleasePlan) -> String {
    let level = plan.decision.level;
    match &plan.current_tag {
        Some(old) => format!(
            "{} release ({} commit(s)): {} -> {}",
            level,
            plan.commit_count,
            style(old).red(),
            style(&plan.tag_name).green()
        ),
        None => format!(
            "Initial {} release ({} commit(s)): {}",
            level,
            plan.commit_count,
            style(&plan.tag_name).green()
        ),
    }
}

/// Print the planned release and its warnings.
pub fn display_plan(plan: &ReleasePlan) {
    for warning in &plan.warnings {
        display_boundary_warning(warning);
    }
    if plan.is_release() {
        display_status(&format_proposed_release(plan));
    }
}

/// Summarize a publish run.
pub fn format_release_summary(result: &WorkflowResult) -> String {
    if result.pushed {
        format!(
            "Released {} and pushed {} with branch {}",
            result.version, result.tag, result.branch
        )
    } else if result.completed.contains(&ReleaseStep::Tag) {
        format!("Released {} locally as {}", result.version, result.tag)
    } else {
        format!("Nothing published for {}", result.version)
    }
}

/// Display how to finish a release whose push failed.
///
/// # Arguments
/// * `completed` - Steps that succeeded before the failure
pub fn display_retry_instruction(completed: &[ReleaseStep]) {
    if completed.contains(&ReleaseStep::Tag) {
        eprintln!(
            "\n{} Commit and tag exist locally. To push them, run:\n  {}",
            style("→").yellow(),
            style("semrel push").cyan()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SemanticVersion;

    fn result(completed: Vec<ReleaseStep>, pushed: bool) -> WorkflowResult {
        WorkflowResult {
            version: SemanticVersion::new(1, 2, 0),
            tag: "v1.2.0".to_string(),
            branch: "main".to_string(),
            completed,
            pushed,
        }
    }

    #[test]
    fn test_release_summary() {
        console::set_colors_enabled(false);
        let all = vec![
            ReleaseStep::PatchFiles,
            ReleaseStep::Changelog,
            ReleaseStep::Commit,
            ReleaseStep::Tag,
            ReleaseStep::Push,
        ];
        assert_eq!(
            format_release_summary(&result(all.clone(), true)),
            "Released 1.2.0 and pushed v1.2.0 with branch main"
        );
        assert_eq!(
            format_release_summary(&result(all[..4].to_vec(), false)),
            "Released 1.2.0 locally as v1.2.0"
        );
        assert_eq!(
            format_release_summary(&result(Vec::new(), false)),
            "Nothing published for 1.2.0"
        );
    }

    #[test]
    fn test_display_functions() {
        // Output goes to stderr; these only check nothing panics
        display_error("test error");
        display_success("test success");
        display_status("test status");
        display_retry_instruction(&[ReleaseStep::Commit, ReleaseStep::Tag]);
    }
}
