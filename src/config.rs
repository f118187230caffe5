use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ReleaseError, Result};

/// File name looked up in the working copy when no settings path is given.
pub const SETTINGS_FILE: &str = "release-action.toml";

/// A secret string that never prints its value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    /// Access the raw secret. Keep call sites few.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Inputs for one release run.
///
/// Built once by the binary from flags and the host environment, then handed to
/// the orchestrator. Nothing below the binary reads the process environment.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Credential used to push to the remote
    pub token: Secret,
    /// Commit author name for generated commits
    pub author_name: String,
    /// Commit author email for generated commits
    pub author_email: String,
    /// Repository in `owner/name` form
    pub repository_slug: String,
    /// The ref that triggered the run, e.g. `refs/heads/master`
    pub git_ref: String,
    /// Working copy of the repository
    pub workdir: PathBuf,
    /// Directory that receives the transient credential file
    pub home_dir: PathBuf,
}

impl RunConfig {
    /// Checks that every required input is present.
    ///
    /// Runs before any side effect of the release sequence.
    pub fn validate(&self) -> Result<()> {
        if self.token.is_blank() {
            return Err(ReleaseError::config(
                "Input required and not supplied: token",
            ));
        }
        if self.author_name.trim().is_empty() {
            return Err(ReleaseError::config(
                "Input required and not supplied: authorName",
            ));
        }
        if self.author_email.trim().is_empty() {
            return Err(ReleaseError::config(
                "Input required and not supplied: authorEmail",
            ));
        }
        self.repository_owner()?;
        Ok(())
    }

    /// Owner portion of the repository slug (`owner/name` -> `owner`).
    pub fn repository_owner(&self) -> Result<&str> {
        let owner = self
            .repository_slug
            .split('/')
            .next()
            .unwrap_or_default()
            .trim();
        if owner.is_empty() {
            return Err(ReleaseError::config(format!(
                "Repository slug '{}' is not in owner/name form",
                self.repository_slug
            )));
        }
        Ok(owner)
    }
}

/// How push credentials reach git.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CredentialMode {
    /// `.netrc` in the home directory, removed when the run ends
    #[default]
    Netrc,
    /// Credential helper injected through the environment of each git process
    Environment,
}

/// Tunable behaviour of the release sequence, loaded from TOML.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseSettings {
    #[serde(default = "default_release_branch")]
    pub release_branch: String,

    #[serde(default)]
    pub build: BuildSettings,

    #[serde(default)]
    pub commit: CommitSettings,

    #[serde(default)]
    pub credentials: CredentialSettings,

    #[serde(default)]
    pub process: ProcessSettings,
}

fn default_release_branch() -> String {
    "master".to_string()
}

/// Build tool invocation settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BuildSettings {
    /// Build command; when unset the Maven wrapper is preferred over `mvn`
    #[serde(default)]
    pub command: Option<String>,

    /// Plugin coordinate used to evaluate project expressions
    #[serde(default = "default_help_plugin")]
    pub help_plugin: String,

    /// Project descriptor committed after each version change
    #[serde(default = "default_descriptor")]
    pub descriptor: String,

    /// Arguments appended to version-setting and deploy invocations
    #[serde(default = "default_extra_args")]
    pub extra_args: Vec<String>,
}

fn default_help_plugin() -> String {
    "org.apache.maven.plugins:maven-help-plugin:3.2.0".to_string()
}

fn default_descriptor() -> String {
    "pom.xml".to_string()
}

fn default_extra_args() -> Vec<String> {
    vec!["--no-transfer-progress".to_string()]
}

impl Default for BuildSettings {
    fn default() -> Self {
        BuildSettings {
            command: None,
            help_plugin: default_help_plugin(),
            descriptor: default_descriptor(),
            extra_args: default_extra_args(),
        }
    }
}

/// Messages for the two generated commits.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommitSettings {
    #[serde(default = "default_release_message")]
    pub release_message: String,

    #[serde(default = "default_snapshot_message")]
    pub snapshot_message: String,
}

fn default_release_message() -> String {
    "GitHub Action: release version".to_string()
}

fn default_snapshot_message() -> String {
    "GitHub Action: SNAPSHOT version".to_string()
}

impl Default for CommitSettings {
    fn default() -> Self {
        CommitSettings {
            release_message: default_release_message(),
            snapshot_message: default_snapshot_message(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CredentialSettings {
    #[serde(default)]
    pub mode: CredentialMode,

    /// Code-hosting domain the credential is valid for
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_host() -> String {
    "github.com".to_string()
}

impl Default for CredentialSettings {
    fn default() -> Self {
        CredentialSettings {
            mode: CredentialMode::default(),
            host: default_host(),
        }
    }
}

/// External process limits.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ProcessSettings {
    /// Per-invocation timeout; no limit when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ProcessSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ReleaseSettings {
    fn default() -> Self {
        ReleaseSettings {
            release_branch: default_release_branch(),
            build: BuildSettings::default(),
            commit: CommitSettings::default(),
            credentials: CredentialSettings::default(),
            process: ProcessSettings::default(),
        }
    }
}

/// Loads release settings from file or returns defaults.
///
/// Attempts to load settings in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-action.toml` in the working copy
/// 3. `.release-action.toml` in the user config directory
/// 4. Default settings if no file found
///
/// # Returns
/// * `Ok(ReleaseSettings)` - Loaded or default settings
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_settings(settings_path: Option<&Path>, workdir: &Path) -> Result<ReleaseSettings> {
    let local = workdir.join(SETTINGS_FILE);

    let settings_str = if let Some(path) = settings_path {
        fs::read_to_string(path)?
    } else if local.exists() {
        fs::read_to_string(&local)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join(format!(".{}", SETTINGS_FILE));
        if global.exists() {
            fs::read_to_string(global)?
        } else {
            return Ok(ReleaseSettings::default());
        }
    } else {
        return Ok(ReleaseSettings::default());
    };

    let settings: ReleaseSettings = toml::from_str(&settings_str)?;
    if settings.release_branch.trim().is_empty() {
        return Err(ReleaseError::config("release_branch must not be empty"));
    }
    Ok(settings)
}
