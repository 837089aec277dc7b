use crate::domain::prerelease::Prerelease;
use crate::error::{Result, SemrelError};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
///
/// Ordering: major, minor, patch, then a version with a pre-release sorts
/// strictly before the same core without one, then pre-release label, then
/// pre-release number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<Prerelease>,
}

impl SemanticVersion {
    /// Create a new release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }

    /// Builder-style pre-release setter
    pub fn with_prerelease(mut self, prerelease: Prerelease) -> Self {
        self.prerelease = Some(prerelease);
        self
    }

    /// Parse a version string (e.g., "1.2.3", "v2.1.0-beta.0")
    ///
    /// A leading `v`/`V` is accepted, build metadata is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let clean = text.trim().trim_start_matches(['v', 'V']);

        let parsed = semver::Version::parse(clean).map_err(|e| {
            SemrelError::version(format!("Invalid version format: '{}' - {}", text, e))
        })?;

        let prerelease = if parsed.pre.is_empty() {
            None
        } else {
            Some(Prerelease::parse(parsed.pre.as_str())?)
        };

        Ok(SemanticVersion {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            prerelease,
        })
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// The same major.minor.patch with the pre-release dropped
    pub fn core(&self) -> Self {
        SemanticVersion::new(self.major, self.minor, self.patch)
    }

    /// Bump version according to release level
    ///
    /// Every non-`None` bump clears the pre-release component. Fails when the
    /// bumped component would overflow.
    pub fn bump(&self, level: ReleaseLevel) -> Result<Self> {
        let next = |part: u64| {
            part.checked_add(1).ok_or_else(|| {
                SemrelError::version(format!("cannot bump {} to the next {} version", self, level))
            })
        };
        Ok(match level {
            ReleaseLevel::Major => SemanticVersion::new(next(self.major)?, 0, 0),
            ReleaseLevel::Minor => SemanticVersion::new(self.major, next(self.minor)?, 0),
            ReleaseLevel::Patch => SemanticVersion::new(self.major, self.minor, next(self.patch)?),
            ReleaseLevel::None => self.clone(),
        })
    }

    /// Level of the release this version core represents relative to its predecessor
    ///
    /// `2.0.0` is a major, `2.1.0` a minor and `2.1.3` a patch release.
    pub fn core_level(&self) -> ReleaseLevel {
        if self.minor == 0 && self.patch == 0 {
            ReleaseLevel::Major
        } else if self.patch == 0 {
            ReleaseLevel::Minor
        } else {
            ReleaseLevel::Patch
        }
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for SemanticVersion {
    type Err = SemrelError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

/// Magnitude of a version bump
///
/// Variant order is severity order, so `max` picks the stronger level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReleaseLevel {
    None,
    Patch,
    Minor,
    Major,
}

impl fmt::Display for ReleaseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReleaseLevel::None => "none",
            ReleaseLevel::Patch => "patch",
            ReleaseLevel::Minor => "minor",
            ReleaseLevel::Major => "major",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> SemanticVersion {
        SemanticVersion::parse(s).unwrap()
    }

    #[test]
    fn test_version_parse() {
        let version = v("v1.2.3");
        assert_eq!(version, SemanticVersion::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_prerelease() {
        let version = v("2.1.0-beta.0");
        assert_eq!(
            version,
            SemanticVersion::new(2, 1, 0).with_prerelease(Prerelease::new("beta", 0))
        );
    }

    #[test]
    fn test_version_parse_ignores_build_metadata() {
        assert_eq!(v("1.0.0+build.7"), SemanticVersion::new(1, 0, 0));
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(SemanticVersion::parse("1.2").is_err());
        assert!(SemanticVersion::parse("v1.2.3.4").is_err());
        assert!(SemanticVersion::parse("badly_formatted").is_err());
    }

    #[test]
    fn test_prerelease_sorts_before_release() {
        assert!(v("1.2.3-rc.5") < v("1.2.3"));
        assert!(v("1.2.3-alpha.0") < v("1.2.3-beta.0"));
        assert!(v("1.2.3") < v("1.2.4-alpha.0"));
    }

    #[test]
    fn test_ordering_by_components() {
        let mut versions = vec![v("1.10.0"), v("1.2.0"), v("0.9.9"), v("2.0.0-rc.10"), v("2.0.0-rc.9")];
        versions.sort();
        let rendered: Vec<String> = versions.iter().map(|v| v.to_string()).collect();
        assert_eq!(rendered, ["0.9.9", "1.2.0", "1.10.0", "2.0.0-rc.9", "2.0.0-rc.10"]);
    }

    #[test]
    fn test_version_bump() {
        let version = v("1.2.3-beta.1");
        assert_eq!(version.bump(ReleaseLevel::Major).unwrap(), v("2.0.0"));
        assert_eq!(version.bump(ReleaseLevel::Minor).unwrap(), v("1.3.0"));
        assert_eq!(version.bump(ReleaseLevel::Patch).unwrap(), v("1.2.4"));
        assert_eq!(version.bump(ReleaseLevel::None).unwrap(), version);
    }

    #[test]
    fn test_bump_overflow_is_an_error() {
        let version = v("18446744073709551615.0.0");
        assert!(matches!(version.bump(ReleaseLevel::Major), Err(SemrelError::Version(_))));
        assert_eq!(version.bump(ReleaseLevel::Minor).unwrap(), v("18446744073709551615.1.0"));

        let patch = SemanticVersion::new(1, 2, u64::MAX);
        assert!(patch.bump(ReleaseLevel::Patch).is_err());
    }

    #[test]
    fn test_core_level() {
        assert_eq!(v("2.0.0-beta.1").core_level(), ReleaseLevel::Major);
        assert_eq!(v("0.1.0").core_level(), ReleaseLevel::Minor);
        assert_eq!(v("1.4.2").core_level(), ReleaseLevel::Patch);
    }

    #[test]
    fn test_release_level_order() {
        assert!(ReleaseLevel::None < ReleaseLevel::Patch);
        assert!(ReleaseLevel::Patch < ReleaseLevel::Minor);
        assert!(ReleaseLevel::Minor < ReleaseLevel::Major);
    }

    #[test]
    fn test_version_display() {
        assert_eq!(v("1.2.3").to_string(), "1.2.3");
        assert_eq!(v("1.2.3-rc.2").to_string(), "1.2.3-rc.2");
    }
}
