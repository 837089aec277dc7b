use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Placeholder written in place of any secret found in an error message.
pub const REDACTED: &str = "********";

/// Side-effecting steps of a release, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStep {
    PatchFiles,
    Changelog,
    Commit,
    Tag,
    Push,
}

impl fmt::Display for ReleaseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReleaseStep::PatchFiles => "patch version files",
            ReleaseStep::Changelog => "update changelog",
            ReleaseStep::Commit => "commit",
            ReleaseStep::Tag => "tag",
            ReleaseStep::Push => "push",
        };
        f.write_str(name)
    }
}

/// Unified error type for semrel operations
#[derive(Error, Debug)]
pub enum SemrelError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid version pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Changelog marker missing in {}: refusing to guess where the release goes", path.display())]
    ChangelogMarkerMissing { path: PathBuf },

    #[error("Cannot determine repository owner and name from '{url}'")]
    RepositoryUrl { url: String },

    #[error("Git {operation} failed: {message}")]
    Vcs { operation: String, message: String },

    #[error("Release step '{step}' failed after [{}]: {message}", format_steps(completed))]
    Step {
        step: ReleaseStep,
        completed: Vec<ReleaseStep>,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration file is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in semrel
pub type Result<T> = std::result::Result<T, SemrelError>;

fn format_steps(steps: &[ReleaseStep]) -> String {
    steps
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl SemrelError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SemrelError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        SemrelError::Version(msg.into())
    }

    /// Create a pattern error for a regex that cannot drive version extraction
    pub fn pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        SemrelError::Pattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create a VCS error, scrubbing `secret` from the message before it is stored
    pub fn vcs(operation: impl Into<String>, message: impl AsRef<str>, secret: Option<&str>) -> Self {
        SemrelError::Vcs {
            operation: operation.into(),
            message: redact_opt(message.as_ref(), secret),
        }
    }

    /// Wrap the failure of a release step, keeping track of what already succeeded
    pub fn step(
        step: ReleaseStep,
        completed: &[ReleaseStep],
        cause: &SemrelError,
        secret: Option<&str>,
    ) -> Self {
        SemrelError::Step {
            step,
            completed: completed.to_vec(),
            message: redact_opt(&cause.to_string(), secret),
        }
    }

    /// The step that failed, if this error came from the publish phase
    pub fn failed_step(&self) -> Option<ReleaseStep> {
        match self {
            SemrelError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Replace every occurrence of `secret` in `text`.
///
/// Empty secrets are ignored so that an unset token cannot blank out a message.
pub fn redact(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }
    text.replace(secret, REDACTED)
}

fn redact_opt(text: &str, secret: Option<&str>) -> String {
    match secret {
        Some(secret) => redact(text, secret),
        None => text.to_string(),
    }
}
