use crate::domain::{CommitRecord, CommitType, Prerelease, ReleaseLevel, SemanticVersion};
use crate::error::Result;
use std::borrow::Borrow;

/// Caller overrides for version resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Explicit level; only honoured when at least as strong as the computed one
    pub force: Option<ReleaseLevel>,
    /// Produce a pre-release with this label
    pub prerelease: Option<String>,
    /// Turn the current pre-release into the matching release
    pub promote: bool,
}

/// Outcome of version resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionBumpDecision {
    pub level: ReleaseLevel,
    /// Version the decision started from, `None` before the first release
    pub current: Option<SemanticVersion>,
    /// Version to release; equals `current` (or `0.0.0` before the first release) when nothing is due
    pub next_version: SemanticVersion,
}

impl VersionBumpDecision {
    fn unchanged(current: Option<&SemanticVersion>) -> Self {
        VersionBumpDecision {
            level: ReleaseLevel::None,
            current: current.cloned(),
            next_version: current
                .cloned()
                .unwrap_or_else(|| SemanticVersion::new(0, 0, 0)),
        }
    }

    /// Whether a new version should be released
    pub fn is_release(&self) -> bool {
        match &self.current {
            Some(current) => current != &self.next_version,
            None => self.level != ReleaseLevel::None,
        }
    }
}

/// Release level implied by a single commit
pub fn commit_level(commit: &CommitRecord) -> ReleaseLevel {
    if commit.is_breaking {
        return ReleaseLevel::Major;
    }
    match commit.r#type {
        CommitType::Breaking => ReleaseLevel::Major,
        CommitType::Feature => ReleaseLevel::Minor,
        CommitType::Fix | CommitType::Performance => ReleaseLevel::Patch,
        CommitType::Other => ReleaseLevel::None,
    }
}

/// Resolves the next version from the current one and the commits since it
#[derive(Debug, Clone, Default)]
pub struct VersionAnalyzer {
    options: ResolveOptions,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(options: ResolveOptions) -> Self {
        VersionAnalyzer { options }
    }

    /// Highest level implied by the commits, scanning them once
    pub fn scan<I>(&self, commits: I) -> ReleaseLevel
    where
        I: IntoIterator,
        I::Item: Borrow<CommitRecord>,
    {
        let mut level = ReleaseLevel::None;
        for commit in commits {
            level = level.max(commit_level(commit.borrow()));
            if level == ReleaseLevel::Major {
                break;
            }
        }
        level
    }

    /// Apply the explicit override, refusing to downgrade
    fn effective_level(&self, computed: ReleaseLevel) -> ReleaseLevel {
        match self.options.force {
            Some(forced) if forced >= computed => forced,
            Some(forced) => {
                log::warn!(
                    "Ignoring requested {} release: commits call for a {} release",
                    forced,
                    computed
                );
                computed
            }
            None => computed,
        }
    }

    /// Compute the next version
    ///
    /// # Arguments
    /// * `current` - Latest released version, `None` before the first release
    /// * `commits` - Classified commits since `current`
    ///
    /// Fails only when the bumped version cannot be represented.
    pub fn resolve<I>(&self, current: Option<&SemanticVersion>, commits: I) -> Result<VersionBumpDecision>
    where
        I: IntoIterator,
        I::Item: Borrow<CommitRecord>,
    {
        let computed = self.scan(commits);
        let level = self.effective_level(computed);
        log::debug!("Commits imply a {} release, resolved to {}", computed, level);

        match current {
            None => Ok(self.first_release(level)),
            Some(current) if current.is_prerelease() => self.from_prerelease(current, level),
            Some(current) => self.from_release(current, level),
        }
    }

    fn first_release(&self, level: ReleaseLevel) -> VersionBumpDecision {
        if level == ReleaseLevel::None && self.options.force.is_none() {
            return VersionBumpDecision::unchanged(None);
        }

        let core = if level == ReleaseLevel::Major {
            SemanticVersion::new(1, 0, 0)
        } else {
            SemanticVersion::new(0, 1, 0)
        };
        let level = core.core_level();

        VersionBumpDecision {
            level,
            current: None,
            next_version: self.with_requested_prerelease(core, None),
        }
    }

    fn from_release(&self, current: &SemanticVersion, level: ReleaseLevel) -> Result<VersionBumpDecision> {
        if level == ReleaseLevel::None {
            return Ok(VersionBumpDecision::unchanged(Some(current)));
        }

        let core = current.bump(level)?;
        Ok(VersionBumpDecision {
            level,
            current: Some(current.clone()),
            next_version: self.with_requested_prerelease(core, None),
        })
    }

    fn from_prerelease(&self, current: &SemanticVersion, level: ReleaseLevel) -> Result<VersionBumpDecision> {
        if level == ReleaseLevel::None && !self.options.promote {
            return Ok(VersionBumpDecision::unchanged(Some(current)));
        }

        let in_progress = current.core_level();
        let current_label = current.prerelease.as_ref().map(|pre| pre.label.as_str());

        // The pending core already covers this level: stay on it.
        if level <= in_progress {
            let next_version = if self.options.promote {
                current.core()
            } else {
                match (&self.options.prerelease, &current.prerelease) {
                    (Some(label), Some(pre)) if label != &pre.label => {
                        current.core().with_prerelease(Prerelease::new(label.clone(), 0))
                    }
                    (_, Some(pre)) => current.core().with_prerelease(pre.increment()?),
                    (_, None) => current.core(),
                }
            };
            let level = if self.options.promote {
                level.max(in_progress)
            } else {
                level
            };
            return Ok(VersionBumpDecision {
                level,
                current: Some(current.clone()),
                next_version,
            });
        }

        // Commits outgrew the pending core: move to the bigger one.
        let core = current.core().bump(level)?;
        let next_version = if self.options.promote {
            core
        } else {
            self.with_requested_prerelease(core, current_label)
        };

        Ok(VersionBumpDecision {
            level,
            current: Some(current.clone()),
            next_version,
        })
    }

    /// Attach `-<label>.0` when a pre-release was requested (or is being continued)
    fn with_requested_prerelease(&self, core: SemanticVersion, continuing: Option<&str>) -> SemanticVersion {
        match self.options.prerelease.as_deref().or(continuing) {
            Some(label) => core.with_prerelease(Prerelease::new(label, 0)),
            None => core,
        }
    }
}
