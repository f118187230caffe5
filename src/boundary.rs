use std::fmt;

/// Non-fatal situations noticed during a release run.
/// These are reported to the user; none of them stops the run on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The triggering branch is not the release branch; the run is skipped
    BranchMismatch { branch: String, required: String },
    /// A credential file already existed and is restored after the run
    ExistingCredentialFile { path: String },
    /// The read-back project version could not be parsed
    UnparsableVersion { version: String, reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::BranchMismatch { branch, required } => {
                write!(
                    f,
                    "current git branch '{}' is not '{}' -- aborting release",
                    branch, required
                )
            }
            BoundaryWarning::ExistingCredentialFile { path } => {
                write!(
                    f,
                    "Credential file '{}' already exists; it will be restored after the run",
                    path
                )
            }
            BoundaryWarning::UnparsableVersion { version, reason } => {
                write!(f, "Cannot parse project version '{}': {}", version, reason)
            }
        }
    }
}
