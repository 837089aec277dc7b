//! Version-control collaborator
//!
//! The release engine only talks to version control through the
//! [Repository] trait, so the whole pipeline can run against
//! [mock::MockRepository] in tests.
//!
//! - [repository::Git2Repository]: real repository through the `git2` crate
//! - [mock::MockRepository]: in-memory repository that records every side effect
//! - [remote]: repository identity and authenticated push targets
//!
//! ```rust
//! # use semrel::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> semrel::error::Result<()> {
//! let tags = repo.list_tags()?;
//! let head = repo.current_head_id()?;
//! let commits = repo.commits_between(Some(&head), None)?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod remote;
pub mod repository;

pub use mock::{GitCall, MockRepository};
pub use remote::{push_target, CiEnv, RepositoryIdentity};
pub use repository::Git2Repository;

use crate::domain::{RawCommit, Tag};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Version-control operations needed for a release
///
/// All implementors must be `Send + Sync`. Errors from the underlying
/// library are mapped to [crate::error::SemrelError]; implementations that
/// see an authentication token must not leak it into error messages.
pub trait Repository: Send + Sync {
    /// Root of the working tree; relative paths in configuration resolve against it
    fn workdir(&self) -> Result<PathBuf>;

    /// Every tag in the repository, in no particular order
    ///
    /// Annotated tags carry their tagging time; all tags carry the commit
    /// date of their target.
    fn list_tags(&self) -> Result<Vec<Tag>>;

    /// Commits reachable from `newer` but not from `older`, newest first
    ///
    /// # Arguments
    /// * `newer` - Upper bound (inclusive); `None` means the current head
    /// * `older` - Lower bound (exclusive); `None` walks back to the root
    fn commits_between(&self, newer: Option<&str>, older: Option<&str>) -> Result<Vec<RawCommit>>;

    /// Full id of the commit checked out at HEAD
    fn current_head_id(&self) -> Result<String>;

    /// Switch the working tree to a local branch
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Stage a path relative to [Repository::workdir]
    fn add(&self, path: &Path) -> Result<()>;

    /// Paths with uncommitted changes, relative to [Repository::workdir]
    fn changed_files(&self) -> Result<Vec<PathBuf>>;

    /// Commit the index on top of HEAD
    ///
    /// # Arguments
    /// * `message` - Full commit message
    /// * `author` - `Name <email>`, used for both author and committer
    ///
    /// # Returns
    /// * `Ok(String)` - Id of the new commit
    fn commit(&self, message: &str, author: &str) -> Result<String>;

    /// Create an annotated tag on HEAD
    fn tag(&self, name: &str, message: &str) -> Result<()>;

    /// Push `branch`, or every tag when `tags` is set
    ///
    /// # Arguments
    /// * `remote` - Remote name or full URL (possibly carrying credentials)
    /// * `branch` - Branch to push
    /// * `tags` - Push tags instead of the branch
    fn push(&self, remote: &str, branch: &str, tags: bool) -> Result<()>;

    /// URL configured for a named remote, `None` when the remote does not exist
    fn remote_url(&self, name: &str) -> Result<Option<String>>;
}
