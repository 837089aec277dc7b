use crate::domain::{RawCommit, Tag};
use crate::error::{Result, SemrelError};
use crate::git::Repository;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Side effect recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Checkout(String),
    Add(PathBuf),
    Commit { message: String, author: String },
    Tag { name: String, message: String },
    Push { remote: String, branch: String, tags: bool },
}

/// In-memory repository for tests
///
/// Reads come from the fixtures given to the builder methods; writes are
/// recorded in order and can be inspected with [MockRepository::calls].
pub struct MockRepository {
    workdir: PathBuf,
    /// Newest first
    commits: Vec<RawCommit>,
    tags: Mutex<Vec<Tag>>,
    changed: Vec<PathBuf>,
    remotes: HashMap<String, String>,
    push_failure: Option<String>,
    tag_push_failure: Option<String>,
    calls: Mutex<Vec<GitCall>>,
}

impl MockRepository {
    /// Create an empty mock repository rooted at `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        MockRepository {
            workdir: workdir.into(),
            commits: Vec::new(),
            tags: Mutex::new(Vec::new()),
            changed: Vec::new(),
            remotes: HashMap::new(),
            push_failure: None,
            tag_push_failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the history, newest commit first
    pub fn with_commits(mut self, commits: Vec<RawCommit>) -> Self {
        self.commits = commits;
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        if let Ok(tags) = self.tags.get_mut() {
            tags.push(tag);
        }
        self
    }

    pub fn with_changed_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.changed.push(path.into());
        self
    }

    pub fn with_remote(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.remotes.insert(name.into(), url.into());
        self
    }

    /// Make every push fail; the message is reported unredacted, like git would
    pub fn failing_push(mut self, message: impl Into<String>) -> Self {
        self.push_failure = Some(message.into());
        self
    }

    /// Let the branch push succeed but fail the tag push
    pub fn failing_tag_push(mut self, message: impl Into<String>) -> Self {
        self.tag_push_failure = Some(message.into());
        self
    }

    /// Side effects so far, oldest first
    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Tags including the ones created through [Repository::tag]
    pub fn tags(&self) -> Vec<Tag> {
        self.tags.lock().map(|tags| tags.clone()).unwrap_or_default()
    }

    fn record(&self, call: GitCall) -> Result<()> {
        self.calls_guard()?.push(call);
        Ok(())
    }

    fn calls_guard(&self) -> Result<MutexGuard<'_, Vec<GitCall>>> {
        self.calls
            .lock()
            .map_err(|e| SemrelError::vcs("record", e.to_string(), None))
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.commits
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| SemrelError::vcs("log", format!("unknown commit {}", id), None))
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> Result<PathBuf> {
        Ok(self.workdir.clone())
    }

    fn list_tags(&self) -> Result<Vec<Tag>> {
        Ok(self.tags())
    }

    fn commits_between(&self, newer: Option<&str>, older: Option<&str>) -> Result<Vec<RawCommit>> {
        let start = match newer {
            Some(id) => self.position(id)?,
            None => 0,
        };
        let end = match older {
            Some(id) => self.position(id)?,
            None => self.commits.len(),
        };
        if start >= end {
            return Ok(Vec::new());
        }
        Ok(self.commits[start..end].to_vec())
    }

    fn current_head_id(&self) -> Result<String> {
        self.commits
            .first()
            .map(|c| c.id.clone())
            .ok_or_else(|| SemrelError::vcs("rev-parse", "HEAD has no commits", None))
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.record(GitCall::Checkout(branch.to_string()))
    }

    fn add(&self, path: &Path) -> Result<()> {
        self.record(GitCall::Add(path.to_path_buf()))
    }

    fn changed_files(&self) -> Result<Vec<PathBuf>> {
        Ok(self.changed.clone())
    }

    fn commit(&self, message: &str, author: &str) -> Result<String> {
        let mut calls = self.calls_guard()?;
        calls.push(GitCall::Commit {
            message: message.to_string(),
            author: author.to_string(),
        });
        let commits = calls
            .iter()
            .filter(|c| matches!(c, GitCall::Commit { .. }))
            .count();
        Ok(format!("mock-commit-{}", commits))
    }

    fn tag(&self, name: &str, message: &str) -> Result<()> {
        let target = self.current_head_id().unwrap_or_else(|_| "HEAD".to_string());
        let now = Utc::now();
        self.tags
            .lock()
            .map_err(|e| SemrelError::vcs("tag", e.to_string(), None))?
            .push(Tag::annotated(name, target, now, now));
        self.record(GitCall::Tag {
            name: name.to_string(),
            message: message.to_string(),
        })
    }

    fn push(&self, remote: &str, branch: &str, tags: bool) -> Result<()> {
        self.record(GitCall::Push {
            remote: remote.to_string(),
            branch: branch.to_string(),
            tags,
        })?;

        let failure = if tags {
            self.push_failure.as_ref().or(self.tag_push_failure.as_ref())
        } else {
            self.push_failure.as_ref()
        };
        match failure {
            Some(message) => Err(SemrelError::vcs(
                "push",
                format!("{}: {}", remote, message),
                None,
            )),
            None => Ok(()),
        }
    }

    fn remote_url(&self, name: &str) -> Result<Option<String>> {
        Ok(self.remotes.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn commit(id: &str, parents: usize) -> RawCommit {
        RawCommit::new(id, format!("fix: {}", id), Utc.timestamp_opt(0, 0).unwrap(), parents)
    }

    fn history() -> MockRepository {
        MockRepository::new("/tmp/mock")
            .with_commits(vec![commit("c", 1), commit("b", 1), commit("a", 0)])
    }

    #[test]
    fn test_commits_between() {
        let repo = history();
        let ids = |commits: Vec<RawCommit>| commits.into_iter().map(|c| c.id).collect::<Vec<_>>();

        assert_eq!(ids(repo.commits_between(None, None).unwrap()), vec!["c", "b", "a"]);
        assert_eq!(ids(repo.commits_between(None, Some("a")).unwrap()), vec!["c", "b"]);
        assert_eq!(ids(repo.commits_between(Some("b"), None).unwrap()), vec!["b", "a"]);
        assert!(repo.commits_between(None, Some("c")).unwrap().is_empty());
        assert!(repo.commits_between(None, Some("zzz")).is_err());
    }

    #[test]
    fn test_head_is_newest_commit() {
        assert_eq!(history().current_head_id().unwrap(), "c");
        assert!(MockRepository::new("/tmp").current_head_id().is_err());
    }

    #[test]
    fn test_calls_are_recorded_in_order() {
        let repo = history();
        repo.add(Path::new("CHANGELOG.md")).unwrap();
        assert_eq!(repo.commit("1.0.0", "me <me>").unwrap(), "mock-commit-1");
        repo.tag("v1.0.0", "v1.0.0").unwrap();
        repo.push("origin", "main", false).unwrap();

        let calls = repo.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], GitCall::Add(PathBuf::from("CHANGELOG.md")));
        assert!(matches!(calls[2], GitCall::Tag { ref name, .. } if name == "v1.0.0"));
        assert_eq!(repo.tags().len(), 1);
        assert!(repo.tags()[0].is_annotated());
    }

    #[test]
    fn test_failing_tag_push() {
        let repo = history().failing_tag_push("rejected");
        assert!(repo.push("origin", "main", false).is_ok());
        assert!(repo.push("origin", "main", true).is_err());
    }
}
