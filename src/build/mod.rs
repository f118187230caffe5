//! Maven build tool invocations
//!
//! Version changes go through `build-helper:parse-version` + `versions:set`,
//! project values are read back with the help plugin's `evaluate` goal, and
//! publishing runs the `deploy` phase.

use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::config::BuildSettings;
use crate::error::Result;
use crate::process::{CommandRunner, Invocation};

/// Version expression handed to `versions:set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionTemplate {
    /// Current version with the pre-release qualifier dropped
    Release,
    /// Incremental component plus one, with `-SNAPSHOT`
    NextSnapshot,
}

impl VersionTemplate {
    pub fn expression(&self) -> &'static str {
        match self {
            VersionTemplate::Release => {
                "${parsedVersion.majorVersion}.${parsedVersion.minorVersion}.${parsedVersion.incrementalVersion}"
            }
            VersionTemplate::NextSnapshot => {
                "${parsedVersion.majorVersion}.${parsedVersion.minorVersion}.${parsedVersion.nextIncrementalVersion}-SNAPSHOT"
            }
        }
    }
}

/// Maven front end bound to one working copy
pub struct MavenTool<R: CommandRunner> {
    runner: R,
    command: String,
    help_plugin: String,
    extra_args: Vec<String>,
    timeout: Option<Duration>,
}

impl<R: CommandRunner> MavenTool<R> {
    pub fn new(
        runner: R,
        settings: &BuildSettings,
        workdir: &Path,
        timeout: Option<Duration>,
    ) -> Self {
        let command = settings
            .command
            .clone()
            .unwrap_or_else(|| maven_command(workdir).to_string());
        debug!(command = %command, "using build command");

        MavenTool {
            runner,
            command,
            help_plugin: settings.help_plugin.clone(),
            extra_args: settings.extra_args.clone(),
            timeout,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn invocation(&self, args: Vec<String>) -> Invocation {
        Invocation::new(self.command.clone(), args).with_timeout(self.timeout)
    }

    /// Rewrite the project version and commit the descriptor change in place
    pub fn set_version(&self, template: VersionTemplate) -> Result<()> {
        let mut args = vec![
            "build-helper:parse-version".to_string(),
            "versions:set".to_string(),
            format!("-DnewVersion={}", template.expression()),
            "versions:commit".to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        self.runner.invoke_checked(&self.invocation(args))?;
        Ok(())
    }

    /// Evaluate a project expression such as `project.name`.
    ///
    /// Returns raw stdout; callers trim it.
    pub fn evaluate(&self, expression: &str) -> Result<String> {
        let args = vec![
            format!("{}:evaluate", self.help_plugin),
            format!("-Dexpression={}", expression),
            "-q".to_string(),
            "-DforceStdout".to_string(),
        ];
        let output = self.runner.invoke_checked(&self.invocation(args).quiet())?;
        Ok(output.stdout)
    }

    /// Run the deploy phase
    pub fn deploy(&self) -> Result<()> {
        let mut args = vec!["deploy".to_string()];
        args.extend(self.extra_args.iter().cloned());
        self.runner.invoke_checked(&self.invocation(args))?;
        Ok(())
    }
}

/// `./mvnw` when the working copy ships a Maven wrapper, `mvn` otherwise
pub fn maven_command(workdir: &Path) -> &'static str {
    if workdir.join("mvnw").exists() || workdir.join("mvnw.cmd").exists() {
        "./mvnw"
    } else {
        "mvn"
    }
}
