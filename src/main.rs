use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use semrel::cli::orchestration::{self, ReleaseArgs};
use semrel::config;
use semrel::domain::ReleaseLevel;
use semrel::error::SemrelError;
use semrel::git::{CiEnv, Git2Repository, Repository};
use semrel::ui;

/// Exit code when no release is warranted
const NO_RELEASE: u8 = 2;

#[derive(Parser)]
#[command(
    name = "semrel",
    version,
    about = "Compute the next semantic version from conventional commits, update the changelog, tag and push"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Show debug output")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the next version
    Version {
        #[command(flatten)]
        release: ReleaseFlags,
    },
    /// Print the changelog section for the next version
    Changelog {
        #[arg(long, help = "Splice the section into the changelog file")]
        write: bool,

        #[command(flatten)]
        release: ReleaseFlags,
    },
    /// Patch files, update the changelog, commit, tag and push
    Publish {
        #[arg(long, help = "Show what would happen without making changes")]
        noop: bool,

        #[command(flatten)]
        release: ReleaseFlags,
    },
    /// Push the branch and tags only, e.g. after a failed push
    Push {
        #[command(flatten)]
        remote: RemoteFlags,
    },
}

#[derive(Args, Clone)]
struct RemoteFlags {
    #[arg(long, help = "Branch to release from")]
    branch: Option<String>,

    #[arg(long, env = "GH_TOKEN", hide_env_values = true, help = "Token for an authenticated push")]
    token: Option<String>,
}

#[derive(Args, Clone)]
struct ReleaseFlags {
    #[command(flatten)]
    remote: RemoteFlags,

    #[arg(long, conflicts_with_all = ["minor", "patch"], help = "Force a major release")]
    major: bool,

    #[arg(long, conflicts_with = "patch", help = "Force a minor release")]
    minor: bool,

    #[arg(long, help = "Force a patch release")]
    patch: bool,

    #[arg(long, value_name = "LABEL", help = "Release a pre-release with this label")]
    prerelease: Option<String>,

    #[arg(long, conflicts_with = "prerelease", help = "Promote the current pre-release")]
    promote: bool,
}

impl ReleaseFlags {
    fn force(&self) -> Option<ReleaseLevel> {
        if self.major {
            Some(ReleaseLevel::Major)
        } else if self.minor {
            Some(ReleaseLevel::Minor)
        } else if self.patch {
            Some(ReleaseLevel::Patch)
        } else {
            None
        }
    }

    fn into_args(self, noop: bool) -> ReleaseArgs {
        ReleaseArgs {
            force: self.force(),
            branch: self.remote.branch,
            token: self.remote.token,
            prerelease: self.prerelease,
            promote: self.promote,
            noop,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            if let Some(SemrelError::Step { completed, .. }) = e.downcast_ref::<SemrelError>() {
                ui::display_retry_instruction(completed);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = config::load_config(cli.config.as_deref()).context("Error loading config")?;
    let repo = Git2Repository::open(".").context("Not in a git repository")?;
    let today = chrono::Local::now().date_naive();

    let (args, action) = match cli.command {
        Command::Version { release } => (release.into_args(false), Action::Version),
        Command::Changelog { write, release } => (release.into_args(false), Action::Changelog { write }),
        Command::Publish { noop, release } => (release.into_args(noop), Action::Publish),
        Command::Push { remote } => {
            let args = ReleaseArgs {
                branch: remote.branch,
                token: remote.token,
                ..ReleaseArgs::default()
            };
            orchestration::push_release(&repo, &config, &args, &CiEnv::from_env())?;
            ui::display_success(&format!("Pushed {}", args.branch(&config)));
            return Ok(ExitCode::SUCCESS);
        }
    };

    if let (Action::Publish, Some(branch)) = (&action, &args.branch) {
        if !args.noop {
            repo.checkout(branch)?;
        }
    }

    let plan = orchestration::plan_release(&repo, &config, &args, today)?;
    ui::display_plan(&plan);
    if !plan.is_release() {
        ui::display_status("No release warranted");
        return Ok(ExitCode::from(NO_RELEASE));
    }

    match action {
        Action::Version => println!("{}", plan.next_version()),
        Action::Changelog { write: false } => println!("{}", plan.section.to_markdown()),
        Action::Changelog { write: true } => {
            let path = orchestration::write_changelog(&repo, &config, &plan)?;
            ui::display_success(&format!("Updated {}", path.display()));
        }
        Action::Publish => {
            let result = orchestration::publish(&repo, &config, &args, &plan, &CiEnv::from_env())?;
            ui::display_success(&ui::format_release_summary(&result));
        }
    }

    Ok(ExitCode::SUCCESS)
}

enum Action {
    Version,
    Changelog { write: bool },
    Publish,
}
