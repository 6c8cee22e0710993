//! Repository discovery.
//!
//! Every worktree of a repository shares one git common directory. Deriving
//! the repository root from it (instead of from `--show-toplevel`) makes
//! configuration and worktree lookups identical no matter which worktree a
//! command runs from.

use crate::error::{GtrError, Result};
use crate::git::GitCommand;
use std::path::{Path, PathBuf};

/// Name of the metadata directory inside a normal (non-bare) checkout.
const GIT_DIR_NAME: &str = ".git";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryContext {
    /// Main checkout directory.
    pub repo_root: PathBuf,
    /// Canonical git common directory.
    pub common_dir: PathBuf,
}

impl RepositoryContext {
    /// Discover the repository containing the command's working directory.
    pub fn discover(git: &GitCommand) -> Result<Self> {
        let raw = git
            .rev_parse_git_common_dir()
            .map_err(|_| GtrError::NotInRepository)?;

        // git prints the common dir relative to where it ran when inside the main checkout
        let mut common_dir = PathBuf::from(raw);
        if common_dir.is_relative() {
            let base = match git.work_dir() {
                Some(dir) => dir.to_path_buf(),
                None => std::env::current_dir()?,
            };
            common_dir = base.join(common_dir);
        }
        let common_dir = common_dir.canonicalize()?;

        if let Some(ctx) = Self::from_common_dir(&common_dir) {
            return Ok(ctx);
        }

        // Bare repositories or a relocated git dir: fall back to the working tree top level
        let toplevel = git
            .rev_parse_show_toplevel()
            .map_err(|_| GtrError::NotInRepository)?;
        Ok(Self {
            repo_root: PathBuf::from(toplevel).canonicalize()?,
            common_dir,
        })
    }

    /// Derive the context from a common directory ending in `.git`.
    pub fn from_common_dir(common_dir: &Path) -> Option<Self> {
        if common_dir.file_name()? != GIT_DIR_NAME {
            return None;
        }
        Some(Self {
            repo_root: common_dir.parent()?.to_path_buf(),
            common_dir: common_dir.to_path_buf(),
        })
    }

    /// Last path component of the repository root.
    pub fn repo_name(&self) -> String {
        self.repo_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "repo".to_string())
    }

    /// Git command rooted at the main checkout.
    pub fn git(&self, git: &GitCommand) -> GitCommand {
        git.at(&self.repo_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_common_dir_strips_git_suffix() {
        let ctx = RepositoryContext::from_common_dir(Path::new("/src/app/.git")).unwrap();
        assert_eq!(ctx.repo_root, PathBuf::from("/src/app"));
        assert_eq!(ctx.common_dir, PathBuf::from("/src/app/.git"));
        assert_eq!(ctx.repo_name(), "app");
    }

    #[test]
    fn test_from_common_dir_rejects_bare_layout() {
        assert!(RepositoryContext::from_common_dir(Path::new("/src/app.git")).is_none());
        assert!(RepositoryContext::from_common_dir(Path::new("/")).is_none());
    }
}
