use crate::error::{ReleaseError, Result};
use git2::{Oid, Repository as Git2Repo};
use std::path::Path;

/// Read-only view of the working copy through libgit2.
///
/// Mutations go through the git CLI; this is used to resolve the checked-out
/// ref when the host supplies none, and to inspect release results.
pub struct WorkingCopy {
    repo: Git2Repo,
}

impl WorkingCopy {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        Ok(WorkingCopy { repo })
    }

    /// Full name of the ref HEAD points at, e.g. `refs/heads/master`
    pub fn head_ref(&self) -> Result<String> {
        if self.repo.head_detached()? {
            return Err(ReleaseError::config(
                "HEAD is detached; pass the triggering ref explicitly",
            ));
        }
        let head = self.repo.find_reference("HEAD")?;
        let target = head
            .symbolic_target()
            .ok_or_else(|| ReleaseError::config("HEAD is not a symbolic reference"))?;
        Ok(target.to_string())
    }

    /// Commit a tag points at, peeling annotated tags
    pub fn tag_target(&self, tag_name: &str) -> Result<Option<Oid>> {
        let reference_name = format!("refs/tags/{}", tag_name);
        match self.repo.find_reference(&reference_name) {
            Ok(reference) => Ok(Some(reference.peel_to_commit()?.id())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Message of the tag object, `None` for lightweight tags
    pub fn tag_message(&self, tag_name: &str) -> Result<Option<String>> {
        let reference = self
            .repo
            .find_reference(&format!("refs/tags/{}", tag_name))?;
        let message = reference
            .peel_to_tag()
            .ok()
            .and_then(|tag| tag.message().map(|m| m.trim().to_string()));
        Ok(message)
    }

    /// Tip commit of a local branch
    pub fn branch_tip(&self, branch: &str) -> Result<Oid> {
        let branch = self.repo.find_branch(branch, git2::BranchType::Local)?;
        Ok(branch.get().peel_to_commit()?.id())
    }

    /// First-parent chain starting at `from`, newest first, with messages
    pub fn first_parent_log(&self, from: Oid, limit: usize) -> Result<Vec<(Oid, String)>> {
        let mut commits = Vec::new();
        let mut current = Some(self.repo.find_commit(from)?);
        while let Some(commit) = current {
            if commits.len() == limit {
                break;
            }
            commits.push((
                commit.id(),
                commit.message().unwrap_or_default().trim().to_string(),
            ));
            current = commit.parent(0).ok();
        }
        Ok(commits)
    }

    /// Contents of a file at a commit
    pub fn file_at(&self, commit: Oid, path: &str) -> Result<String> {
        let tree = self.repo.find_commit(commit)?.tree()?;
        let entry = tree.get_path(Path::new(path))?;
        let blob = self.repo.find_blob(entry.id())?;
        Ok(String::from_utf8_lossy(blob.content()).into_owned())
    }
}

/// Resolve the ref checked out in `workdir`
pub fn resolve_head_ref(workdir: &Path) -> Result<String> {
    WorkingCopy::open(workdir)?.head_ref()
}
