//! External process abstraction layer
//!
//! Every git and build-tool call in a release goes through the [CommandRunner]
//! trait. A call blocks until the child exits and hands back its exit status
//! and captured output as a value.
//!
//! - [system::SystemRunner]: spawns real processes in the working copy
//! - [mock::RecordingRunner]: records invocations and replays scripted results

pub mod mock;
pub mod system;

pub use mock::RecordingRunner;
pub use system::SystemRunner;

use std::time::Duration;

use crate::error::{ReleaseError, Result};

/// One external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Extra environment for the child only
    pub env: Vec<(String, String)>,
    pub timeout: Option<Duration>,
    /// Quiet invocations are read back by the caller and not echoed
    pub quiet: bool,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            env: Vec::new(),
            timeout: None,
            quiet: false,
        }
    }

    pub fn with_env(mut self, env: &[(String, String)]) -> Self {
        self.env.extend(env.iter().cloned());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// `program arg1 arg2 ...`, used in logs and error messages.
    ///
    /// Environment values are never part of the rendering.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Exit status and captured output of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Turns a non-zero exit into [ReleaseError::Command].
    pub fn check(self, invocation: &Invocation) -> Result<CommandOutput> {
        if self.success() {
            Ok(self)
        } else {
            Err(ReleaseError::command(
                invocation.command_line(),
                self.status,
                self.stderr,
            ))
        }
    }
}

/// Runs external commands synchronously.
///
/// Implementations return `Ok` for any process that ran to completion, even
/// with a non-zero status; `Err` is reserved for spawn failures and timeouts.
pub trait CommandRunner: Send + Sync {
    fn invoke(&self, invocation: &Invocation) -> Result<CommandOutput>;

    /// Invoke and fail on a non-zero exit status.
    fn invoke_checked(&self, invocation: &Invocation) -> Result<CommandOutput> {
        self.invoke(invocation)?.check(invocation)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn invoke(&self, invocation: &Invocation) -> Result<CommandOutput> {
        (**self).invoke(invocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_rendering() {
        let inv = Invocation::new("git", ["commit", "-m", "GitHub Action: release version"]);
        assert_eq!(
            inv.command_line(),
            "git commit -m GitHub Action: release version"
        );
    }

    #[test]
    fn test_command_line_omits_env() {
        let inv = Invocation::new("git", ["push", "--follow-tags"])
            .with_env(&[("RELEASE_TOKEN".to_string(), "s3cret".to_string())]);
        assert!(!inv.command_line().contains("s3cret"));
        assert_eq!(inv.env.len(), 1);
    }

    #[test]
    fn test_builder_flags() {
        let inv = Invocation::new("mvn", ["deploy"])
            .with_timeout(Some(Duration::from_secs(5)))
            .quiet();
        assert!(inv.quiet);
        assert_eq!(inv.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_check_passes_success_through() {
        let inv = Invocation::new("git", ["add", "pom.xml"]);
        let output = CommandOutput {
            status: Some(0),
            stdout: "ok".to_string(),
            stderr: String::new(),
        };
        assert_eq!(output.check(&inv).unwrap().stdout, "ok");
    }

    #[test]
    fn test_check_converts_failure() {
        let inv = Invocation::new("git", ["checkout", "master"]);
        let output = CommandOutput {
            status: Some(1),
            stdout: String::new(),
            stderr: "error: pathspec 'master' did not match".to_string(),
        };
        let err = output.check(&inv).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("git checkout master"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("pathspec"));
    }
}
