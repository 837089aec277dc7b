use crate::domain::version::SemanticVersion;
use crate::error::{Result, SemrelError};
use chrono::{DateTime, Utc};
use regex::Regex;

/// Regex fragment matching a semantic version with optional pre-release and build metadata.
const SEMVER_FRAGMENT: &str =
    r"\d+\.\d+\.\d+(?:-[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?(?:\+[0-9A-Za-z.-]+)?";

/// How a tag was created
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKind {
    /// Plain pointer to a commit
    Lightweight,
    /// Tag object carrying its own tagger timestamp
    Annotated { tagged_date: DateTime<Utc> },
}

/// Represents a git tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    /// Id of the commit the tag resolves to
    pub target: String,
    /// Commit date of `target`
    pub commit_date: DateTime<Utc>,
    pub kind: TagKind,
}

impl Tag {
    /// Create a lightweight tag
    pub fn lightweight(
        name: impl Into<String>,
        target: impl Into<String>,
        commit_date: DateTime<Utc>,
    ) -> Self {
        Tag {
            name: name.into(),
            target: target.into(),
            commit_date,
            kind: TagKind::Lightweight,
        }
    }

    /// Create an annotated tag
    pub fn annotated(
        name: impl Into<String>,
        target: impl Into<String>,
        commit_date: DateTime<Utc>,
        tagged_date: DateTime<Utc>,
    ) -> Self {
        Tag {
            name: name.into(),
            target: target.into(),
            commit_date,
            kind: TagKind::Annotated { tagged_date },
        }
    }

    pub fn is_annotated(&self) -> bool {
        matches!(self.kind, TagKind::Annotated { .. })
    }

    /// Date used to place the tag on the timeline
    ///
    /// Annotated tags use their own tagging time, lightweight tags the commit time.
    pub fn effective_date(&self) -> DateTime<Utc> {
        match self.kind {
            TagKind::Annotated { tagged_date } => tagged_date,
            TagKind::Lightweight => self.commit_date,
        }
    }
}

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
///
/// Formats new tag names and extracts versions from existing ones. The
/// extraction regex has exactly one capturing group holding the version.
#[derive(Debug, Clone)]
pub struct TagPattern {
    format: String,
    regex: Regex,
}

impl TagPattern {
    /// Build a pattern from a tag format; the matching regex is derived from it
    pub fn new(format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        if !format.contains("{version}") {
            return Err(SemrelError::config(format!(
                "Tag format '{}' must contain a {{version}} placeholder",
                format
            )));
        }

        let escaped = regex::escape(&format);
        let regex_pattern = escaped.replace(r"\{version\}", &format!("({})", SEMVER_FRAGMENT));

        Self::with_regex(format, &format!("^{}$", regex_pattern))
    }

    /// Build a pattern from a tag format plus an explicit version-matching regex
    pub fn with_regex(format: impl Into<String>, pattern: &str) -> Result<Self> {
        let format = format.into();
        let regex =
            Regex::new(pattern).map_err(|e| SemrelError::pattern(pattern, e.to_string()))?;

        // captures_len counts the implicit whole-match group
        if regex.captures_len() != 2 {
            return Err(SemrelError::pattern(
                pattern,
                format!(
                    "expected exactly one capturing group, found {}",
                    regex.captures_len() - 1
                ),
            ));
        }

        Ok(TagPattern { format, regex })
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version="1.2.3" -> "v1.2.3"
    pub fn format(&self, version: &SemanticVersion) -> String {
        self.format.replace("{version}", &version.to_string())
    }

    /// Extract the version from a tag name
    ///
    /// Returns `None` when the name does not match or the captured text is not
    /// a semantic version.
    pub fn extract(&self, tag_name: &str) -> Option<SemanticVersion> {
        let captured = self.regex.captures(tag_name)?.get(1)?;
        SemanticVersion::parse(captured.as_str()).ok()
    }

    pub fn as_regex(&self) -> &str {
        self.regex.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_effective_date_annotated() {
        let tag = Tag::annotated("v1.0.0", "aaaa", at(10), at(20));
        assert!(tag.is_annotated());
        assert_eq!(tag.effective_date(), at(20));
    }

    #[test]
    fn test_effective_date_lightweight() {
        let tag = Tag::lightweight("v1.0.0", "aaaa", at(10));
        assert!(!tag.is_annotated());
        assert_eq!(tag.effective_date(), at(10));
    }

    #[test]
    fn test_pattern_format() {
        let pattern = TagPattern::new("v{version}").unwrap();
        assert_eq!(pattern.format(&SemanticVersion::new(1, 2, 3)), "v1.2.3");
    }

    #[test]
    fn test_pattern_format_with_prefix() {
        let pattern = TagPattern::new("release-{version}").unwrap();
        assert_eq!(pattern.format(&SemanticVersion::new(1, 2, 3)), "release-1.2.3");
    }

    #[test]
    fn test_pattern_requires_placeholder() {
        assert!(TagPattern::new("v1").is_err());
    }

    #[test]
    fn test_pattern_extract() {
        let pattern = TagPattern::new("v{version}").unwrap();
        assert_eq!(pattern.extract("v1.2.3"), Some(SemanticVersion::new(1, 2, 3)));
        assert_eq!(
            pattern.extract("v2.1.0-beta.0").map(|v| v.to_string()),
            Some("2.1.0-beta.0".to_string())
        );
        assert_eq!(pattern.extract("release-1.2.3"), None);
        assert_eq!(pattern.extract("badly_formatted"), None);
    }

    #[test]
    fn test_pattern_escapes_literal_text() {
        let pattern = TagPattern::new("pkg.v{version}").unwrap();
        assert!(pattern.extract("pkg.v1.0.0").is_some());
        assert!(pattern.extract("pkgXv1.0.0").is_none());
    }

    #[test]
    fn test_custom_regex() {
        let pattern = TagPattern::with_regex("v{version}", r"(\d+.\d+.\d+)").unwrap();
        assert_eq!(pattern.extract("v2.0.0"), Some(SemanticVersion::new(2, 0, 0)));
        assert_eq!(pattern.extract("badly_formatted"), None);
    }

    #[test]
    fn test_custom_regex_rejects_wrong_group_count() {
        let none = TagPattern::with_regex("v{version}", r"v\d+\.\d+\.\d+");
        assert!(matches!(none, Err(SemrelError::Pattern { .. })));

        let two = TagPattern::with_regex("v{version}", r"(v)(\d+\.\d+\.\d+)");
        assert!(matches!(two, Err(SemrelError::Pattern { .. })));

        let broken = TagPattern::with_regex("v{version}", r"(\d+");
        assert!(matches!(broken, Err(SemrelError::Pattern { .. })));
    }
}
