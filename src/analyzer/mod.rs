//! Version resolution: tag timeline, commit classification, bump decision

pub mod classifier;
pub mod timeline;
pub mod version_analyzer;

pub use classifier::{CommitGrammar, CommitLog, Records};
pub use timeline::{TagTimeline, TimelineEntry};
pub use version_analyzer::{commit_level, ResolveOptions, VersionAnalyzer, VersionBumpDecision};
