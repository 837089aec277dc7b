use crate::domain::ReleaseLevel;
use std::fmt;

/// Conditions found while planning a release that do not stop the run.
/// These are reported to the user next to the outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No new commits since the latest tag
    NoNewCommits {
        latest_tag: String,
        current_commit_hash: String,
    },
    /// There are new commits, but none of them calls for a release
    NoReleaseWarranted { commits: usize },
    /// The requested level was lower than what the commits call for
    ForceLevelIgnored {
        requested: ReleaseLevel,
        computed: ReleaseLevel,
    },
    /// Tags were present but none matched the tag format
    NoMatchingTags { tags: usize, format: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoNewCommits {
                latest_tag,
                current_commit_hash,
            } => {
                let short_hash = current_commit_hash
                    .get(..7)
                    .unwrap_or(current_commit_hash.as_str());
                write!(
                    f,
                    "No new commits since tag '{}' (current: {})",
                    latest_tag, short_hash
                )
            }
            BoundaryWarning::NoReleaseWarranted { commits } => {
                write!(
                    f,
                    "None of the {} new commit(s) calls for a release",
                    commits
                )
            }
            BoundaryWarning::ForceLevelIgnored {
                requested,
                computed,
            } => write!(
                f,
                "Requested {} release ignored: commits call for a {} release",
                requested, computed
            ),
            BoundaryWarning::NoMatchingTags { tags, format } => write!(
                f,
                "None of the {} tag(s) match '{}', treating this as the first release",
                tags, format
            ),
        }
    }
}
