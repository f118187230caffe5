use crate::domain::version::ProjectVersion;
use crate::error::{ReleaseError, Result};

/// Project name and version read back from the build tool after the release bump
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseIdentity {
    pub project_name: String,
    pub project_version: String,
}

impl ReleaseIdentity {
    /// Build an identity from raw build-tool output.
    ///
    /// Surrounding whitespace, including trailing newlines, is dropped. Empty
    /// values and names that cannot appear in a git tag are rejected.
    pub fn from_output(name_output: &str, version_output: &str) -> Result<Self> {
        let project_name = name_output.trim();
        let project_version = version_output.trim();

        if project_name.is_empty() {
            return Err(ReleaseError::identity("build tool returned an empty project name"));
        }
        if project_version.is_empty() {
            return Err(ReleaseError::identity(
                "build tool returned an empty project version",
            ));
        }

        let identity = ReleaseIdentity {
            project_name: project_name.to_string(),
            project_version: project_version.to_string(),
        };

        let tag = identity.tag_name();
        if tag.chars().any(char::is_whitespace) {
            return Err(ReleaseError::identity(format!(
                "'{}' is not a valid tag name",
                tag
            )));
        }

        Ok(identity)
    }

    /// Tag name `{name}-{version}`
    pub fn tag_name(&self) -> String {
        format!("{}-{}", self.project_name, self.project_version)
    }

    /// Parsed form of the project version
    pub fn version(&self) -> Result<ProjectVersion> {
        ProjectVersion::parse(&self.project_version)
    }
}
