//! Release workflow orchestration
//!
//! [ReleaseOrchestrator] runs the release sequence once, strictly in order,
//! stopping at the first failing step. Completed steps are never undone: a
//! failed deploy leaves the release commit and tag on the remote and the
//! snapshot bump unapplied.

use tracing::{info, info_span, warn};

use crate::boundary::BoundaryWarning;
use crate::build::{MavenTool, VersionTemplate};
use crate::config::{ReleaseSettings, RunConfig};
use crate::credentials::CredentialGuard;
use crate::domain::{BranchGuard, ReleaseIdentity};
use crate::error::Result;
use crate::git::GitCommands;
use crate::process::CommandRunner;
use crate::ui;

/// Number of steps in a full release
pub const TOTAL_STEPS: usize = 10;

/// How a run ended when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every step completed
    Released(ReleaseReport),
    /// The run was not on the release branch; nothing was released
    Skipped { branch: String, required: String },
}

impl RunOutcome {
    /// Process exit status for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Released(_) => 0,
            RunOutcome::Skipped { .. } => 1,
        }
    }
}

/// What a completed release produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
    /// The branch that was released
    pub branch: String,

    /// The annotated tag pointing at the release commit
    pub tag: String,

    /// Version recorded in the release commit
    pub release_version: String,

    /// Development version after the release, when the release version parsed
    pub next_snapshot: Option<String>,
}

/// Runs one release against a working copy
pub struct ReleaseOrchestrator<R: CommandRunner> {
    config: RunConfig,
    settings: ReleaseSettings,
    runner: R,
}

impl<R: CommandRunner> ReleaseOrchestrator<R> {
    pub fn new(config: RunConfig, settings: ReleaseSettings, runner: R) -> Self {
        ReleaseOrchestrator {
            config,
            settings,
            runner,
        }
    }

    /// Run the release sequence.
    ///
    /// 1. Check inputs
    /// 2. Configure the local commit identity
    /// 3. Provision push credentials
    /// 4. Check the branch
    /// 5. Check out the branch
    /// 6. Set and commit the release version
    /// 7. Tag the release and push with tags
    /// 8. Deploy
    /// 9. Set and commit the next snapshot version
    /// 10. Push the branch
    ///
    /// Credentials provisioned in step 3 are removed when this returns, whatever
    /// the outcome.
    ///
    /// # Returns
    /// * `Ok(RunOutcome::Released)` - All ten steps completed
    /// * `Ok(RunOutcome::Skipped)` - Not on the release branch; steps 5-10 did not run
    /// * `Err` - The error of the first failing step
    pub fn run(&self) -> Result<RunOutcome> {
        let span = info_span!("release", git_ref = %self.config.git_ref);
        let _entered = span.enter();

        ui::display_step(1, TOTAL_STEPS, "Checking inputs");
        self.config.validate()?;
        let owner = self.config.repository_owner()?;
        let timeout = self.settings.process.timeout();

        ui::display_step(2, TOTAL_STEPS, "Configuring git");
        let local = GitCommands::new(&self.runner, Vec::new(), timeout);
        local.config_local("user.name", &self.config.author_name)?;
        local.config_local("user.email", &self.config.author_email)?;

        ui::display_step(3, TOTAL_STEPS, "Provisioning credentials");
        let credentials = CredentialGuard::provision(
            self.settings.credentials.mode,
            &self.config.home_dir,
            &self.settings.credentials.host,
            owner,
            &self.config.token,
        )?;
        if let (true, Some(path)) = (credentials.replaced_existing(), credentials.netrc_path()) {
            ui::display_boundary_warning(&BoundaryWarning::ExistingCredentialFile {
                path: path.display().to_string(),
            });
        }
        let git = GitCommands::new(&self.runner, credentials.git_env().to_vec(), timeout);

        ui::display_step(4, TOTAL_STEPS, "Checking branch");
        let branch = match BranchGuard::evaluate(&self.config.git_ref, &self.settings.release_branch) {
            BranchGuard::Proceed { branch } => branch,
            BranchGuard::Skip { branch, required } => {
                warn!(branch = %branch, required = %required, "not on the release branch, skipping");
                ui::display_boundary_warning(&BoundaryWarning::BranchMismatch {
                    branch: branch.clone(),
                    required: required.clone(),
                });
                return Ok(RunOutcome::Skipped { branch, required });
            }
        };
        ui::display_status(&format!("CURRENT_BRANCH = {}", branch));

        ui::display_step(5, TOTAL_STEPS, "Checking out branch");
        git.checkout(&branch)?;

        let maven = MavenTool::new(
            &self.runner,
            &self.settings.build,
            &self.config.workdir,
            timeout,
        );
        let descriptor = &self.settings.build.descriptor;

        ui::display_step(6, TOTAL_STEPS, "Updating version");
        maven.set_version(VersionTemplate::Release)?;
        git.add(descriptor)?;
        git.commit(&self.settings.commit.release_message)?;

        ui::display_step(7, TOTAL_STEPS, "Tagging release version");
        let identity = ReleaseIdentity::from_output(
            &maven.evaluate("project.name")?,
            &maven.evaluate("project.version")?,
        )?;
        let tag = identity.tag_name();
        ui::display_status(&format!("Tagging version {}", tag));
        git.tag_annotated(&tag)?;
        git.push_follow_tags()?;
        ui::display_success(&format!("Pushed {} with tags", branch));
        info!(tag = %tag, "release tag pushed");

        ui::display_step(8, TOTAL_STEPS, "Deploying release package");
        maven.deploy()?;
        ui::display_success(&format!("Deployed {}", tag));
        info!(tag = %tag, "release deployed");

        ui::display_step(9, TOTAL_STEPS, "Updating SNAPSHOT version");
        maven.set_version(VersionTemplate::NextSnapshot)?;
        git.add(descriptor)?;
        git.commit(&self.settings.commit.snapshot_message)?;

        ui::display_step(10, TOTAL_STEPS, "Pushing branch");
        git.push_branch(&branch)?;

        let next_snapshot = match identity.version() {
            Ok(version) => Some(version.next_snapshot().to_string()),
            Err(e) => {
                ui::display_boundary_warning(&BoundaryWarning::UnparsableVersion {
                    version: identity.project_version.clone(),
                    reason: e.to_string(),
                });
                None
            }
        };

        info!(branch = %branch, tag = %tag, "release complete");
        Ok(RunOutcome::Released(ReleaseReport {
            branch,
            tag,
            release_version: identity.project_version,
            next_snapshot,
        }))
    }
}
