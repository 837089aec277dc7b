use crate::domain::{CommitRecord, CommitType, SemanticVersion};
use chrono::NaiveDate;
use std::borrow::Borrow;

/// Bullets rendered under one heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogGroup {
    pub commit_type: CommitType,
    pub bullets: Vec<String>,
}

/// Changelog entry for one release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogSection {
    pub version: SemanticVersion,
    /// Release title, normally the tag name (`v2.0.0`)
    pub title: String,
    pub release_date: NaiveDate,
    /// Non-empty groups, in display order
    pub groups: Vec<ChangelogGroup>,
}

impl ChangelogSection {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Rendered groups, without the release heading
    pub fn body(&self) -> String {
        let mut lines = Vec::new();
        for group in &self.groups {
            lines.push(format!("### {}", group.commit_type.heading()));
            lines.extend(group.bullets.iter().cloned());
        }
        lines.join("\n")
    }

    /// Full markdown for the release: `## <title> (<date>)` followed by the body
    ///
    /// The result has no trailing newline; splicing takes care of spacing.
    pub fn to_markdown(&self) -> String {
        let heading = format!("## {} ({})", self.title, self.release_date.format("%Y-%m-%d"));
        if self.is_empty() {
            heading
        } else {
            format!("{}\n{}", heading, self.body())
        }
    }
}

/// Bullet line for one commit, `None` when it has no usable summary
pub fn bullet(commit: &CommitRecord) -> Option<String> {
    let summary = commit.summary.as_deref()?.trim();
    if summary.is_empty() {
        return None;
    }

    Some(match &commit.scope {
        Some(scope) => format!("* **{}:** {} ({})", scope, summary, commit.short_id()),
        None => format!("* {} ({})", summary, commit.short_id()),
    })
}

/// Group commits under fixed headings
///
/// # Arguments
/// * `version` - Version being released
/// * `title` - Heading text for the release, usually the tag name
/// * `release_date` - Date printed next to the title
/// * `commits` - Classified commits, newest first
/// * `sections` - Headings to render, in display order; other types are left out
pub fn render<I>(
    version: &SemanticVersion,
    title: impl Into<String>,
    release_date: NaiveDate,
    commits: I,
    sections: &[CommitType],
) -> ChangelogSection
where
    I: IntoIterator,
    I::Item: Borrow<CommitRecord>,
{
    let mut groups: Vec<ChangelogGroup> = sections
        .iter()
        .map(|commit_type| ChangelogGroup {
            commit_type: *commit_type,
            bullets: Vec::new(),
        })
        .collect();

    for commit in commits {
        let commit = commit.borrow();
        let Some(group) = groups.iter_mut().find(|g| g.commit_type == commit.r#type) else {
            continue;
        };
        if let Some(line) = bullet(commit) {
            group.bullets.push(line);
        }
    }

    groups.retain(|group| !group.bullets.is_empty());

    ChangelogSection {
        version: version.clone(),
        title: title.into(),
        release_date,
        groups,
    }
}
