//! Git operations used by a release
//!
//! Mutating operations run the git CLI through a [CommandRunner], so a test
//! runner can stand in for it. Each method emits exactly one git invocation.
//! [repository::WorkingCopy] offers read-only inspection through `git2`.
//!
//! ```rust
//! # use maven_release_action::git::GitCommands;
//! # use maven_release_action::process::RecordingRunner;
//! let runner = RecordingRunner::new();
//! let git = GitCommands::new(&runner, Vec::new(), None);
//! git.checkout("master").unwrap();
//! assert_eq!(runner.command_lines(), vec!["git checkout master"]);
//! ```

pub mod repository;

pub use repository::{resolve_head_ref, WorkingCopy};

use std::time::Duration;

use crate::error::Result;
use crate::process::{CommandRunner, Invocation};

const GIT: &str = "git";

/// Typed front for the git CLI
pub struct GitCommands<R: CommandRunner> {
    runner: R,
    env: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl<R: CommandRunner> GitCommands<R> {
    /// Create git commands that pass `env` to every git child process
    pub fn new(runner: R, env: Vec<(String, String)>, timeout: Option<Duration>) -> Self {
        GitCommands {
            runner,
            env,
            timeout,
        }
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        let invocation = Invocation::new(GIT, args.iter().copied())
            .with_env(&self.env)
            .with_timeout(self.timeout);
        self.runner.invoke_checked(&invocation)?;
        Ok(())
    }

    /// `git config --local <key> <value>`; scoped to the working copy
    pub fn config_local(&self, key: &str, value: &str) -> Result<()> {
        self.run(&["config", "--local", key, value])
    }

    pub fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch])
    }

    pub fn add(&self, path: &str) -> Result<()> {
        self.run(&["add", path])
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message])
    }

    /// Annotated tag on HEAD whose message is the tag name
    pub fn tag_annotated(&self, tag: &str) -> Result<()> {
        self.run(&["tag", "-a", tag, "-m", tag])
    }

    /// Push the current branch with the annotated tags reachable from it
    pub fn push_follow_tags(&self) -> Result<()> {
        self.run(&["push", "--follow-tags"])
    }

    /// Push a branch to origin under the same name, without tags
    pub fn push_branch(&self, branch: &str) -> Result<()> {
        self.run(&["push", "origin", branch])
    }
}
