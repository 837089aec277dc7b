use crate::domain::{CommitType, TagPattern};
use crate::error::{Result, SemrelError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the complete configuration for semrel.
///
/// Threaded explicitly into every component; nothing reads configuration globally.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub hvcs: HvcsConfig,

    #[serde(default)]
    pub conventional_commits: ConventionalCommitsConfig,
}

fn default_tag_format() -> String {
    "v{version}".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_commit_author() -> String {
    "semantic-release <semantic-release>".to_string()
}

fn default_commit_message() -> String {
    "{version}\n\nAutomatically generated by semrel".to_string()
}

/// Tagging, committing and pushing settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReleaseConfig {
    /// Tag name template; `{version}` is replaced by the version
    #[serde(default = "default_tag_format")]
    pub tag_format: String,

    /// Regex with one capturing group overriding the one derived from `tag_format`
    #[serde(default)]
    pub version_pattern: Option<String>,

    /// Tag names ignored when looking for the current version
    #[serde(default)]
    pub skip_tags: Vec<String>,

    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_commit_author")]
    pub commit_author: String,

    /// Commit message template; `{version}` is replaced by the version
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Version markers to rewrite, as `path:variable`
    #[serde(default)]
    pub version_variables: Vec<String>,

    /// Extra files staged with the release commit when they have changes
    #[serde(default)]
    pub include_additional_files: Vec<String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            tag_format: default_tag_format(),
            version_pattern: None,
            skip_tags: Vec::new(),
            branch: default_branch(),
            remote: default_remote(),
            commit_author: default_commit_author(),
            commit_message: default_commit_message(),
            version_variables: Vec::new(),
            include_additional_files: Vec::new(),
        }
    }
}

impl ReleaseConfig {
    /// Compile the tag pattern described by this configuration
    pub fn tag_pattern(&self) -> Result<TagPattern> {
        match &self.version_pattern {
            Some(pattern) => TagPattern::with_regex(&self.tag_format, pattern),
            None => TagPattern::new(&self.tag_format),
        }
    }
}

/// What to do when an existing changelog lacks the placeholder marker but
/// starts with the expected header.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingMarker {
    /// Insert the marker under the header, then the release
    #[default]
    Insert,
    /// Leave the file alone and report the missing marker
    Refuse,
}

fn default_changelog_path() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}

fn default_placeholder() -> String {
    "<!--next-version-placeholder-->".to_string()
}

fn default_header() -> String {
    "# Changelog".to_string()
}

fn default_sections() -> Vec<CommitType> {
    vec![
        CommitType::Breaking,
        CommitType::Feature,
        CommitType::Fix,
        CommitType::Performance,
    ]
}

/// Changelog document settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChangelogConfig {
    #[serde(default = "default_changelog_path")]
    pub path: PathBuf,

    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    #[serde(default = "default_header")]
    pub header: String,

    #[serde(default)]
    pub missing_marker: MissingMarker,

    /// Headings rendered, in display order
    #[serde(default = "default_sections")]
    pub sections: Vec<CommitType>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            path: default_changelog_path(),
            placeholder: default_placeholder(),
            header: default_header(),
            missing_marker: MissingMarker::default(),
            sections: default_sections(),
        }
    }
}

fn default_domain() -> String {
    "github.com".to_string()
}

/// Hosting provider settings used to build an authenticated push URL.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HvcsConfig {
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Push to the configured remote even when a token is available
    #[serde(default)]
    pub ignore_token_for_push: bool,
}

impl Default for HvcsConfig {
    fn default() -> Self {
        HvcsConfig {
            domain: default_domain(),
            ignore_token_for_push: false,
        }
    }
}

/// Returns the default list of conventional commit types.
fn default_commit_types() -> Vec<String> {
    [
        "feat", "feature", "fix", "docs", "style", "refactor", "test", "chore", "build", "ci",
        "perf",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_feature_types() -> Vec<String> {
    vec!["feat".to_string(), "feature".to_string()]
}

fn default_fix_types() -> Vec<String> {
    vec!["fix".to_string()]
}

fn default_performance_types() -> Vec<String> {
    vec!["perf".to_string()]
}

/// Returns the default list of breaking change indicators.
fn default_breaking_change_indicators() -> Vec<String> {
    vec![
        "BREAKING CHANGE:".to_string(),
        "BREAKING-CHANGE:".to_string(),
    ]
}

/// Configuration for conventional commit analysis.
///
/// The commit grammar is data: accepted type keywords, which of them map to
/// feature/fix/performance, and the footer tokens marking breaking changes.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConventionalCommitsConfig {
    #[serde(default = "default_commit_types")]
    pub types: Vec<String>,

    #[serde(default = "default_feature_types")]
    pub feature_types: Vec<String>,

    #[serde(default = "default_fix_types")]
    pub fix_types: Vec<String>,

    #[serde(default = "default_performance_types")]
    pub performance_types: Vec<String>,

    #[serde(default = "default_breaking_change_indicators")]
    pub breaking_change_indicators: Vec<String>,
}

impl Default for ConventionalCommitsConfig {
    fn default() -> Self {
        ConventionalCommitsConfig {
            types: default_commit_types(),
            feature_types: default_feature_types(),
            fix_types: default_fix_types(),
            performance_types: default_performance_types(),
            breaking_change_indicators: default_breaking_change_indicators(),
        }
    }
}

impl Config {
    /// Reject configuration that would make a release unsafe, before any side effect
    pub fn validate(&self) -> Result<()> {
        self.release.tag_pattern()?;

        if self.release.remote.trim().is_empty() {
            return Err(SemrelError::config("release.remote must not be empty"));
        }
        if self.release.branch.trim().is_empty() {
            return Err(SemrelError::config("release.branch must not be empty"));
        }
        if self.changelog.placeholder.trim().is_empty() {
            return Err(SemrelError::config("changelog.placeholder must not be empty"));
        }

        for entry in &self.release.version_variables {
            match entry.split_once(':') {
                Some((path, variable)) if !path.is_empty() && !variable.is_empty() => {}
                _ => {
                    return Err(SemrelError::config(format!(
                        "version_variables entry '{}' must look like 'path:variable'",
                        entry
                    )))
                }
            }
        }

        for keyword in self
            .conventional_commits
            .feature_types
            .iter()
            .chain(&self.conventional_commits.fix_types)
            .chain(&self.conventional_commits.performance_types)
        {
            if !self.conventional_commits.types.contains(keyword) {
                return Err(SemrelError::config(format!(
                    "commit type '{}' is mapped to a release level but missing from conventional_commits.types",
                    keyword
                )));
            }
        }

        Ok(())
    }
}

/// Parse configuration from TOML text and validate it.
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `semrel.toml` in current directory
/// 3. `.semrel.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./semrel.toml").exists() {
        fs::read_to_string("./semrel.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".semrel.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    log::debug!("Loaded configuration ({} bytes)", config_str.len());
    parse_config(&config_str)
}
