use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use maven_release_action::cli::{ReleaseOrchestrator, RunOutcome};
use maven_release_action::config::{self, RunConfig, Secret};
use maven_release_action::git::resolve_head_ref;
use maven_release_action::process::SystemRunner;
use maven_release_action::ui;

#[derive(clap::Parser)]
#[command(
    name = "maven-release-action",
    version,
    about = "Release a Maven project: tag the release, deploy it, and move to the next SNAPSHOT"
)]
struct Args {
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true, help = "Token used to push to the remote")]
    token: Option<String>,

    #[arg(long, env = "INPUT_AUTHORNAME", help = "Author name for generated commits")]
    author_name: Option<String>,

    #[arg(long, env = "INPUT_AUTHOREMAIL", help = "Author email for generated commits")]
    author_email: Option<String>,

    #[arg(long, env = "GITHUB_REPOSITORY", help = "Repository in owner/name form")]
    repository: Option<String>,

    #[arg(
        long = "ref",
        env = "GITHUB_REF",
        help = "Ref that triggered the run; defaults to the checked-out branch"
    )]
    git_ref: Option<String>,

    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".", help = "Working copy to release")]
    workdir: PathBuf,

    #[arg(short, long, help = "Custom settings file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Override the release branch from the settings file")]
    release_branch: Option<String>,

    #[arg(long, help = "Timeout in seconds for each external command")]
    timeout: Option<u64>,

    #[arg(long, help = "Directory for the transient credential file; defaults to $HOME")]
    home: Option<PathBuf>,

    #[arg(long, env = "GITHUB_ACTIONS", help = "Emit GitHub Actions error annotations")]
    github_actions: bool,
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let annotate = args.github_actions;

    match run(args) {
        Ok(RunOutcome::Released(report)) => {
            ui::display_release_summary(&report);
            Ok(())
        }
        Ok(outcome @ RunOutcome::Skipped { .. }) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            ui::display_failure(&format!("{:#}", e), annotate);
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<RunOutcome> {
    let mut settings = config::load_settings(args.config.as_deref(), &args.workdir)
        .context("Failed to load release settings")?;
    if let Some(branch) = args.release_branch {
        settings.release_branch = branch;
    }
    if let Some(secs) = args.timeout {
        settings.process.timeout_secs = Some(secs);
    }

    let home_dir = match args.home {
        Some(home) => home,
        None => dirs::home_dir().context("Cannot determine the home directory")?,
    };

    let mut run_config = RunConfig {
        token: Secret::new(args.token.unwrap_or_default()),
        author_name: args.author_name.unwrap_or_default(),
        author_email: args.author_email.unwrap_or_default(),
        repository_slug: args.repository.unwrap_or_default(),
        git_ref: args.git_ref.unwrap_or_default(),
        workdir: args.workdir,
        home_dir,
    };
    run_config.validate()?;

    if run_config.git_ref.trim().is_empty() {
        run_config.git_ref = resolve_head_ref(&run_config.workdir)
            .context("No ref supplied and the checked-out branch could not be resolved")?;
    }

    let runner = SystemRunner::new(run_config.workdir.clone());
    let orchestrator = ReleaseOrchestrator::new(run_config, settings, runner);
    Ok(orchestrator.run()?)
}

/// Console logging controlled by RUST_LOG (default: warn)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}
