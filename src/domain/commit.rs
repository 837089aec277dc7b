use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Commit as delivered by the VCS layer, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    /// Full commit id
    pub id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Number of parents; zero marks a root commit
    pub parent_count: usize,
}

impl RawCommit {
    pub fn new(
        id: impl Into<String>,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
        parent_count: usize,
    ) -> Self {
        RawCommit {
            id: id.into(),
            message: message.into(),
            timestamp,
            parent_count,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_count == 0
    }
}

/// Category a commit falls into after classification
///
/// Also used as the changelog heading, so the serde names double as
/// `[changelog] sections` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Breaking,
    Feature,
    Fix,
    Performance,
    Other,
}

impl CommitType {
    /// Heading used in the rendered changelog
    pub fn heading(&self) -> &'static str {
        match self {
            CommitType::Breaking => "Breaking",
            CommitType::Feature => "Feature",
            CommitType::Fix => "Fix",
            CommitType::Performance => "Performance",
            CommitType::Other => "Other",
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

/// Structured view of one commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: String,
    /// Raw message, untouched
    pub message: String,
    pub r#type: CommitType,
    pub scope: Option<String>,
    /// Summary line after the colon; `None` when the message did not parse
    pub summary: Option<String>,
    /// Text after the summary line, or the whole raw message when unparsed
    pub body: String,
    pub is_breaking: bool,
}

impl CommitRecord {
    /// Record for a message that did not match the commit grammar
    pub fn unparsed(raw: &RawCommit) -> Self {
        CommitRecord {
            id: raw.id.clone(),
            message: raw.message.clone(),
            r#type: CommitType::Other,
            scope: None,
            summary: None,
            body: raw.message.clone(),
            is_breaking: false,
        }
    }

    /// First seven characters of the commit id
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }
}
