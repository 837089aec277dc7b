//! Pre-release component of a semantic version
//!
//! Pre-releases carry a label and an iteration number (`beta.2`, `rc.0`).
//! They order by label lexicographically, then by number numerically, so
//! `rc.10` sorts after `rc.9` and `alpha.*` before `beta.*`.

use crate::error::{Result, SemrelError};
use std::fmt;
use std::str::FromStr;

/// Pre-release label plus iteration number
///
/// Field order matters: the derived ordering compares `label` first, then `number`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prerelease {
    /// Pre-release label (alpha, beta, rc, or anything alphanumeric with hyphens)
    pub label: String,
    /// Iteration number, incremented on every pre-release of the same version core
    pub number: u64,
}

impl Prerelease {
    /// Create a new pre-release
    pub fn new(label: impl Into<String>, number: u64) -> Self {
        Prerelease {
            label: label.into(),
            number,
        }
    }

    /// Parse a pre-release from a string
    ///
    /// Accepts `label` and `label.N`; a bare label is iteration 0 and is
    /// written back as `label.0`, so `1.0.0-rc1` displays as `1.0.0-rc1.0`.
    /// Tags keep their own name; only computed versions use this form.
    ///
    /// # Examples
    /// ```ignore
    /// let pr = Prerelease::parse("beta.1")?;
    /// assert_eq!(pr.label, "beta");
    /// assert_eq!(pr.number, 1);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(SemrelError::version("Empty pre-release identifier"));
        }

        let (label, number) = match s.split_once('.') {
            Some((label, number)) => {
                let number = number.parse::<u64>().map_err(|_| {
                    SemrelError::version(format!("Invalid pre-release number: '{}'", number))
                })?;
                (label, number)
            }
            None => (s, 0),
        };

        validate_label(label)?;

        Ok(Prerelease::new(label, number))
    }

    /// The next iteration of the same label
    ///
    /// # Examples
    /// ```ignore
    /// let next = Prerelease::parse("beta.1")?.increment()?;
    /// assert_eq!(next.number, 2);
    /// ```
    pub fn increment(&self) -> Result<Self> {
        let number = self.number.checked_add(1).ok_or_else(|| {
            SemrelError::version(format!("cannot increment pre-release '{}'", self))
        })?;
        Ok(Prerelease {
            label: self.label.clone(),
            number,
        })
    }
}

/// Validate a pre-release label: non-empty, alphanumeric or hyphen
pub fn validate_label(label: &str) -> Result<()> {
    if label.is_empty() || !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(SemrelError::version(format!(
            "Invalid pre-release identifier: '{}'",
            label
        )));
    }
    Ok(())
}

impl FromStr for Prerelease {
    type Err = SemrelError;

    fn from_str(s: &str) -> Result<Self> {
        Prerelease::parse(s)
    }
}

impl fmt::Display for Prerelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.label, self.number)
    }
}
