//! Release workflow
//!
//! Planning is read-only: it lists tags and commits once, resolves the next
//! version and renders the changelog section. Publishing then runs the side
//! effects in a fixed order (patch files, changelog, commit, tag, push) and
//! reports which of them completed when one fails.

use crate::analyzer::{CommitGrammar, CommitLog, ResolveOptions, TagTimeline, VersionAnalyzer, VersionBumpDecision};
use crate::boundary::BoundaryWarning;
use crate::changelog::{self, ChangelogSection};
use crate::config::Config;
use crate::domain::{ReleaseLevel, SemanticVersion};
use crate::error::{ReleaseStep, Result, SemrelError};
use crate::git::{push_target, CiEnv, Repository};
use crate::version_files::patch_version_files;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the release workflow
///
/// Mirrors the CLI flags without depending on clap, so the workflow can be
/// driven programmatically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseArgs {
    /// Branch to release from; defaults to `release.branch`
    pub branch: Option<String>,

    /// Hosting token used for an authenticated push
    pub token: Option<String>,

    /// Explicit release level
    pub force: Option<ReleaseLevel>,

    /// Pre-release label
    pub prerelease: Option<String>,

    /// Promote the current pre-release
    pub promote: bool,

    /// Plan and report only, no side effects
    pub noop: bool,
}

impl ReleaseArgs {
    /// Branch to push, falling back to the configured one
    pub fn branch<'a>(&'a self, config: &'a Config) -> &'a str {
        self.branch.as_deref().unwrap_or(&config.release.branch)
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }

    fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            force: self.force,
            prerelease: self.prerelease.clone(),
            promote: self.promote,
        }
    }
}

/// Everything decided before any side effect
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasePlan {
    pub decision: VersionBumpDecision,
    /// Tag holding the current version, if any
    pub current_tag: Option<String>,
    /// Tag name for the next version
    pub tag_name: String,
    pub section: ChangelogSection,
    /// Commits since the current version
    pub commit_count: usize,
    pub warnings: Vec<BoundaryWarning>,
}

impl ReleasePlan {
    pub fn is_release(&self) -> bool {
        self.decision.is_release()
    }

    pub fn next_version(&self) -> &SemanticVersion {
        &self.decision.next_version
    }
}

/// Result of a publish run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The version that was released
    pub version: SemanticVersion,

    /// The tag that was created
    pub tag: String,

    /// The branch that was pushed
    pub branch: String,

    /// Steps that ran, in order
    pub completed: Vec<ReleaseStep>,

    /// Whether branch and tags reached the remote
    pub pushed: bool,
}

/// Resolve the next release
///
/// Reads tags and commits once; nothing is written.
///
/// # Arguments
/// * `repo` - Version-control collaborator
/// * `config` - Validated configuration
/// * `args` - Level override and pre-release options
/// * `today` - Date printed in the changelog heading
pub fn plan_release<R: Repository + ?Sized>(
    repo: &R,
    config: &Config,
    args: &ReleaseArgs,
    today: NaiveDate,
) -> Result<ReleasePlan> {
    let pattern = config.release.tag_pattern()?;
    let tags = repo.list_tags()?;
    let tag_count = tags.len();
    let timeline = TagTimeline::build(tags, &pattern, &config.release.skip_tags);

    let mut warnings = Vec::new();
    if timeline.is_empty() && tag_count > 0 {
        warnings.push(BoundaryWarning::NoMatchingTags {
            tags: tag_count,
            format: config.release.tag_format.clone(),
        });
    }

    let releases_only = args.prerelease.is_none() && !args.promote;
    let current = timeline.latest_entry(releases_only);
    let head = repo.current_head_id()?;

    let raw = repo.commits_between(Some(&head), current.map(|entry| entry.tag.target.as_str()))?;
    let grammar = CommitGrammar::new(&config.conventional_commits);
    let commits = CommitLog::new(raw, &grammar);

    let analyzer = VersionAnalyzer::new(args.resolve_options());
    let decision = analyzer.resolve(current.map(|entry| &entry.version), &commits)?;

    if let Some(requested) = args.force {
        let computed = analyzer.scan(&commits);
        if requested < computed {
            warnings.push(BoundaryWarning::ForceLevelIgnored { requested, computed });
        }
    }

    match current {
        Some(entry) if commits.is_empty() => warnings.push(BoundaryWarning::NoNewCommits {
            latest_tag: entry.tag.name.clone(),
            current_commit_hash: head.clone(),
        }),
        _ if !commits.is_empty() && !decision.is_release() => {
            warnings.push(BoundaryWarning::NoReleaseWarranted { commits: commits.len() })
        }
        _ => {}
    }

    let tag_name = pattern.format(&decision.next_version);
    let section = changelog::render(
        &decision.next_version,
        tag_name.clone(),
        today,
        &commits,
        &config.changelog.sections,
    );

    match &decision.current {
        Some(current) => log::info!(
            "Current version {}, {} release -> {}",
            current,
            decision.level,
            decision.next_version
        ),
        None => log::info!(
            "No previous release, {} release -> {}",
            decision.level,
            decision.next_version
        ),
    }

    Ok(ReleasePlan {
        current_tag: current.map(|entry| entry.tag.name.clone()),
        tag_name,
        section,
        commit_count: commits.len(),
        decision,
        warnings,
    })
}

/// Splice the planned section into the changelog file under the working tree
///
/// The file is only written when splicing succeeds. Returns the path relative
/// to the working tree.
pub fn write_changelog<R: Repository + ?Sized>(repo: &R, config: &Config, plan: &ReleasePlan) -> Result<PathBuf> {
    let workdir = repo.workdir()?;
    let content = changelog::prepare_update(&workdir, &plan.section, &config.changelog)?;
    fs::write(workdir.join(&config.changelog.path), content)?;
    log::info!("Updated {}", config.changelog.path.display());
    Ok(config.changelog.path.clone())
}

/// Push the branch, then the tags
///
/// Pushes to an authenticated URL when a token is available, otherwise to the
/// configured remote. Errors never contain the token.
pub fn push_release<R: Repository + ?Sized>(
    repo: &R,
    config: &Config,
    args: &ReleaseArgs,
    env: &CiEnv,
) -> Result<()> {
    let token = args.token();
    let branch = args.branch(config);
    let redacted = |e: SemrelError| match e {
        SemrelError::Vcs { operation, message } => SemrelError::vcs(operation, message, token),
        other => other,
    };

    let target = push_target(repo, &config.release, &config.hvcs, token, env).map_err(redacted)?;
    let shown = if target == config.release.remote {
        target.as_str()
    } else {
        "authenticated remote"
    };

    log::info!("Pushing {} to {}", branch, shown);
    repo.push(&target, branch, false).map_err(redacted)?;
    log::info!("Pushing tags to {}", shown);
    repo.push(&target, branch, true).map_err(redacted)?;
    Ok(())
}

/// Run every side effect of a planned release
///
/// Nothing happens when the plan is not a release or when `args.noop` is
/// set. The changelog is spliced in memory first, so a missing marker stops
/// the run before any file is touched. Later failures are reported as
/// [SemrelError::Step] listing the steps that already completed.
pub fn publish<R: Repository + ?Sized>(
    repo: &R,
    config: &Config,
    args: &ReleaseArgs,
    plan: &ReleasePlan,
    env: &CiEnv,
) -> Result<WorkflowResult> {
    let branch = args.branch(config).to_string();
    let version = plan.next_version().clone();
    let mut result = WorkflowResult {
        version: version.clone(),
        tag: plan.tag_name.clone(),
        branch: branch.clone(),
        completed: Vec::new(),
        pushed: false,
    };

    if !plan.is_release() {
        log::info!("No release warranted, nothing to publish");
        return Ok(result);
    }
    if args.noop {
        log::info!(
            "No-op: would release {} as {} on {}",
            version,
            plan.tag_name,
            branch
        );
        return Ok(result);
    }

    let token = args.token();
    let workdir = repo.workdir()?;
    let changelog_content = changelog::prepare_update(&workdir, &plan.section, &config.changelog)?;

    let mut completed = Vec::new();
    let failed = |step: ReleaseStep, completed: &[ReleaseStep], e: SemrelError| {
        log::error!("Release step '{}' failed", step);
        SemrelError::step(step, completed, &e, token)
    };

    let patched = patch_version_files(&workdir, &config.release.version_variables, &version)
        .and_then(|paths| stage(repo, &paths).map(|_| paths))
        .map_err(|e| failed(ReleaseStep::PatchFiles, &completed, e))?;
    completed.push(ReleaseStep::PatchFiles);

    fs::write(workdir.join(&config.changelog.path), changelog_content)
        .map_err(SemrelError::from)
        .and_then(|_| repo.add(&config.changelog.path))
        .and_then(|_| stage_additional_files(repo, config, &patched))
        .map_err(|e| failed(ReleaseStep::Changelog, &completed, e))?;
    completed.push(ReleaseStep::Changelog);

    let message = config
        .release
        .commit_message
        .replace("{version}", &version.to_string());
    let commit_id = repo
        .commit(&message, &config.release.commit_author)
        .map_err(|e| failed(ReleaseStep::Commit, &completed, e))?;
    log::info!("Committed release {} as {}", version, commit_id);
    completed.push(ReleaseStep::Commit);

    repo.tag(&plan.tag_name, &plan.tag_name)
        .map_err(|e| failed(ReleaseStep::Tag, &completed, e))?;
    log::info!("Tagged {}", plan.tag_name);
    completed.push(ReleaseStep::Tag);

    push_release(repo, config, args, env).map_err(|e| failed(ReleaseStep::Push, &completed, e))?;
    completed.push(ReleaseStep::Push);
    result.completed = completed;
    result.pushed = true;

    Ok(result)
}

fn stage<R: Repository + ?Sized>(repo: &R, paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        repo.add(path)?;
    }
    Ok(())
}

/// Stage `include_additional_files` entries that have changes
fn stage_additional_files<R: Repository + ?Sized>(
    repo: &R,
    config: &Config,
    already_staged: &[PathBuf],
) -> Result<()> {
    if config.release.include_additional_files.is_empty() {
        return Ok(());
    }

    let changed = repo.changed_files()?;
    for file in &config.release.include_additional_files {
        let path = Path::new(file);
        if already_staged.iter().any(|p| p == path) || path == config.changelog.path {
            continue;
        }
        if changed.iter().any(|p| p == path) {
            repo.add(path)?;
        } else {
            log::debug!("{} has no changes, not staged", file);
        }
    }
    Ok(())
}
