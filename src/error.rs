use std::time::Duration;

use thiserror::Error;

/// Unified error type for release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("The process '{command}' failed with {status}{}", stderr_suffix(.stderr))]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Unable to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("The process '{command}' timed out after {}s", .timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    #[error("Release identity error: {0}")]
    Identity(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Settings file error: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

/// Convenience type alias for Results in the release action
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a release identity error with context
    pub fn identity(msg: impl Into<String>) -> Self {
        ReleaseError::Identity(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create an external command failure from its exit code
    pub fn command(command: impl Into<String>, code: Option<i32>, stderr: impl Into<String>) -> Self {
        let status = match code {
            Some(code) => format!("exit code {}", code),
            None => "no exit code (terminated by signal)".to_string(),
        };
        ReleaseError::Command {
            command: command.into(),
            status,
            stderr: stderr.into(),
        }
    }

    /// Whether this error came from an external VCS or build-tool invocation
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            ReleaseError::Command { .. } | ReleaseError::Spawn { .. } | ReleaseError::Timeout { .. }
        )
    }
}
