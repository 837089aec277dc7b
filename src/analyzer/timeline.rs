use crate::domain::{SemanticVersion, Tag, TagPattern};
use std::cmp::Ordering;
use std::collections::HashSet;

/// One tag that parsed as a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub version: SemanticVersion,
    pub tag: Tag,
}

/// Version tags ordered newest first
///
/// Entries are sorted descending by effective date; equal dates fall back to
/// version precedence, again descending. Tags that are skipped or do not
/// match the pattern never make it in.
#[derive(Debug, Clone, Default)]
pub struct TagTimeline {
    entries: Vec<TimelineEntry>,
}

impl TagTimeline {
    /// Build the timeline from every tag in the repository
    ///
    /// # Arguments
    /// * `tags` - All tags, in any order
    /// * `pattern` - Pattern whose capture group holds the version
    /// * `skip` - Tag names dropped before matching
    pub fn build<I>(tags: I, pattern: &TagPattern, skip: &[String]) -> Self
    where
        I: IntoIterator<Item = Tag>,
    {
        let skip: HashSet<&str> = skip.iter().map(String::as_str).collect();

        let mut entries: Vec<TimelineEntry> = tags
            .into_iter()
            .filter(|tag| {
                let skipped = skip.contains(tag.name.as_str());
                if skipped {
                    log::debug!("Skipping excluded tag '{}'", tag.name);
                }
                !skipped
            })
            .filter_map(|tag| match pattern.extract(&tag.name) {
                Some(version) => Some(TimelineEntry { version, tag }),
                None => {
                    log::debug!("Ignoring tag '{}': does not match {}", tag.name, pattern.as_regex());
                    None
                }
            })
            .collect();

        entries.sort_by(newest_first);

        TagTimeline { entries }
    }

    /// Latest known version, optionally ignoring pre-releases
    ///
    /// `None` means there is no prior version: the next release is the first one.
    pub fn latest(&self, releases_only: bool) -> Option<&SemanticVersion> {
        self.latest_entry(releases_only).map(|entry| &entry.version)
    }

    /// Latest entry, with its tag
    pub fn latest_entry(&self, releases_only: bool) -> Option<&TimelineEntry> {
        self.entries
            .iter()
            .find(|entry| !releases_only || !entry.version.is_prerelease())
    }

    /// Tag that carries exactly this version, if any
    pub fn find(&self, version: &SemanticVersion) -> Option<&TimelineEntry> {
        self.entries.iter().find(|entry| &entry.version == version)
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn newest_first(a: &TimelineEntry, b: &TimelineEntry) -> Ordering {
    b.tag
        .effective_date()
        .cmp(&a.tag.effective_date())
        .then_with(|| b.version.cmp(&a.version))
        .then_with(|| a.tag.name.cmp(&b.tag.name))
}
