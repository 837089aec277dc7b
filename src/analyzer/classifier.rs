//! Commit log classification
//!
//! Turns raw commit messages into [`CommitRecord`]s using a commit grammar
//! built from configuration. Classification never fails: a message that does
//! not fit the grammar degrades to an `Other` record holding the raw text.

use crate::config::ConventionalCommitsConfig;
use crate::domain::{CommitRecord, CommitType, RawCommit};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Header line: `type(scope)!: summary`, scope and `!` optional.
const HEADER_PATTERN: &str =
    r"^(?P<type>[A-Za-z]+)(?:\((?P<scope>[^()\r\n]*)\))?(?P<breaking>!)?:[ \t]+(?P<summary>\S.*?)\s*$";

fn header_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(HEADER_PATTERN).expect("commit header pattern is valid"))
}

/// Structured-commit grammar: the header shape plus a keyword table
#[derive(Debug, Clone)]
pub struct CommitGrammar {
    header: &'static Regex,
    types: HashMap<String, CommitType>,
    breaking_indicators: Vec<String>,
}

impl CommitGrammar {
    /// Build the grammar from the configured keyword table
    pub fn new(config: &ConventionalCommitsConfig) -> Self {
        let mut types: HashMap<String, CommitType> = config
            .types
            .iter()
            .map(|keyword| (keyword.to_lowercase(), CommitType::Other))
            .collect();

        let mapped = [
            (&config.performance_types, CommitType::Performance),
            (&config.fix_types, CommitType::Fix),
            (&config.feature_types, CommitType::Feature),
        ];
        for (keywords, commit_type) in mapped {
            for keyword in keywords {
                types.insert(keyword.to_lowercase(), commit_type);
            }
        }

        CommitGrammar {
            header: header_regex(),
            types,
            breaking_indicators: config.breaking_change_indicators.clone(),
        }
    }

    /// Classify one commit
    ///
    /// Root commits are never matched against the grammar.
    pub fn classify(&self, raw: &RawCommit) -> CommitRecord {
        if raw.is_root() {
            log::debug!("Not classifying root commit {}", raw.id);
            return CommitRecord::unparsed(raw);
        }

        match self.parse(raw) {
            Some(record) => record,
            None => {
                log::debug!(
                    "Commit {} does not follow the commit grammar, classified as other",
                    raw.id
                );
                CommitRecord::unparsed(raw)
            }
        }
    }

    fn parse(&self, raw: &RawCommit) -> Option<CommitRecord> {
        let message = raw.message.trim_start();
        let (header, rest) = match message.split_once('\n') {
            Some((header, rest)) => (header, rest),
            None => (message, ""),
        };

        let captures = self.header.captures(header)?;
        let keyword = captures.name("type")?.as_str().to_lowercase();
        let mapped = *self.types.get(&keyword)?;

        let scope = captures
            .name("scope")
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let summary = captures.name("summary")?.as_str().to_string();
        let body = rest.trim_matches(['\r', '\n']).trim_end().to_string();

        let is_breaking = captures.name("breaking").is_some() || self.has_breaking_footer(&body);

        Some(CommitRecord {
            id: raw.id.clone(),
            message: raw.message.clone(),
            r#type: if is_breaking {
                CommitType::Breaking
            } else {
                mapped
            },
            scope,
            summary: Some(summary),
            body,
            is_breaking,
        })
    }

    fn has_breaking_footer(&self, body: &str) -> bool {
        body.lines().any(|line| {
            let line = line.trim_start();
            self.breaking_indicators
                .iter()
                .any(|indicator| line.starts_with(indicator.as_str()))
        })
    }
}

/// Commits newer than the current version, classified on demand
///
/// Holds the already-fetched raw commits (newest first); every call to
/// [`CommitLog::iter`] starts a fresh lazy pass.
#[derive(Debug, Clone)]
pub struct CommitLog<'g> {
    commits: Vec<RawCommit>,
    grammar: &'g CommitGrammar,
}

impl<'g> CommitLog<'g> {
    pub fn new(commits: Vec<RawCommit>, grammar: &'g CommitGrammar) -> Self {
        CommitLog { commits, grammar }
    }

    pub fn iter(&self) -> Records<'_> {
        Records {
            inner: self.commits.iter(),
            grammar: self.grammar,
        }
    }

    pub fn raw(&self) -> &[RawCommit] {
        &self.commits
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

impl<'a, 'g> IntoIterator for &'a CommitLog<'g> {
    type Item = CommitRecord;
    type IntoIter = Records<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over classified commits
#[derive(Debug, Clone)]
pub struct Records<'a> {
    inner: std::slice::Iter<'a, RawCommit>,
    grammar: &'a CommitGrammar,
}

impl Iterator for Records<'_> {
    type Item = CommitRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|raw| self.grammar.classify(raw))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Records<'_> {}
