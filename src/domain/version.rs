use crate::error::{ReleaseError, Result};
use regex::Regex;
use semver::{Prerelease, Version};
use std::fmt;

/// Qualifier marking an in-development version
pub const SNAPSHOT: &str = "SNAPSHOT";

const VERSION_PATTERN: &str = r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:-(.+))?$";

/// A project descriptor version such as `1.2.3-SNAPSHOT`.
///
/// Missing minor or incremental components read as zero, the same way the
/// build tool's version parser treats them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectVersion(Version);

impl ProjectVersion {
    pub fn new(major: u64, minor: u64, incremental: u64) -> Self {
        ProjectVersion(Version::new(major, minor, incremental))
    }

    /// Parse a version string (e.g. "1.2.3", "1.2-SNAPSHOT")
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let re = Regex::new(VERSION_PATTERN).map_err(|e| ReleaseError::version(e.to_string()))?;
        let caps = re.captures(input).ok_or_else(|| {
            ReleaseError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z[-QUALIFIER]",
                input
            ))
        })?;

        let component = |index: usize| -> Result<u64> {
            match caps.get(index) {
                Some(m) => m.as_str().parse::<u64>().map_err(|_| {
                    ReleaseError::version(format!("Invalid version component: {}", m.as_str()))
                }),
                None => Ok(0),
            }
        };

        let mut version = Version::new(component(1)?, component(2)?, component(3)?);
        if let Some(qualifier) = caps.get(4) {
            version.pre = Prerelease::new(qualifier.as_str()).map_err(|e| {
                ReleaseError::version(format!(
                    "Invalid qualifier '{}': {}",
                    qualifier.as_str(),
                    e
                ))
            })?;
        }

        Ok(ProjectVersion(version))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn incremental(&self) -> u64 {
        self.0.patch
    }

    pub fn is_snapshot(&self) -> bool {
        self.0.pre.as_str() == SNAPSHOT
    }

    /// `major.minor.incremental` with any qualifier dropped
    pub fn release(&self) -> Self {
        ProjectVersion::new(self.0.major, self.0.minor, self.0.patch)
    }

    /// Incremental component advanced by one, with the snapshot qualifier
    pub fn next_snapshot(&self) -> Self {
        let mut next = Version::new(self.0.major, self.0.minor, self.0.patch + 1);
        next.pre = Prerelease::new(SNAPSHOT).unwrap_or(Prerelease::EMPTY);
        ProjectVersion(next)
    }
}

impl fmt::Display for ProjectVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
