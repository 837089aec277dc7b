//! Domain logic - pure value types independent of git operations

pub mod commit;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use commit::{CommitRecord, CommitType, RawCommit};
pub use prerelease::Prerelease;
pub use tag::{Tag, TagKind, TagPattern};
pub use version::{ReleaseLevel, SemanticVersion};
