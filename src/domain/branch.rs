/// Extract the branch name from a ref: the final `/`-separated segment.
///
/// `refs/heads/master` -> `master`, `master` -> `master`.
pub fn branch_from_ref(git_ref: &str) -> &str {
    git_ref.rsplit('/').next().unwrap_or(git_ref).trim()
}

/// Outcome of comparing the triggering ref with the release branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchGuard {
    /// The run is on the release branch
    Proceed { branch: String },
    /// Any other branch: the run ends without releasing
    Skip { branch: String, required: String },
}

impl BranchGuard {
    /// Evaluate the guard for a ref against the required release branch
    pub fn evaluate(git_ref: &str, release_branch: &str) -> Self {
        let branch = branch_from_ref(git_ref).to_string();
        if branch == release_branch {
            BranchGuard::Proceed { branch }
        } else {
            BranchGuard::Skip {
                branch,
                required: release_branch.to_string(),
            }
        }
    }

    pub fn branch(&self) -> &str {
        match self {
            BranchGuard::Proceed { branch } | BranchGuard::Skip { branch, .. } => branch,
        }
    }
}
