//! Mapping user identifiers to worktrees.
//!
//! An identifier is either the reserved main-repository token [`MAIN_TOKEN`],
//! the branch checked out in the main repository, or a branch name whose
//! worktree lives under the base directory.

use super::base_dir::WorktreeLayout;
use super::repo::RepositoryContext;
use super::status::{self, WorktreeSection, WorktreeStatus};
use crate::error::{GtrError, Result};
use crate::git::GitCommand;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Identifier that always means the main repository checkout.
pub const MAIN_TOKEN: &str = "1";

/// Branch label used when HEAD is not on a branch.
pub const DETACHED: &str = "(detached)";

const UNSAFE_CHARS: &[char] = &['/', '\\', ' ', ':', '*', '?', '"', '<', '>', '|'];

/// Turn a branch name into a directory name.
///
/// Every character in `/ \ space : * ? " < > |` becomes `-`, then leading and
/// trailing dashes are stripped. The mapping is many-to-one: `feature/auth`
/// and `feature auth` both become `feature-auth` and therefore share a
/// worktree directory. That collision is accepted behavior.
pub fn sanitize_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '-' } else { c })
        .collect();
    replaced.trim_matches('-').to_string()
}

/// Branch checked out at `path`, or [`DETACHED`].
pub fn current_branch_of(git: &GitCommand, path: &Path) -> String {
    let git = git.at(path);
    match git.branch_show_current() {
        Ok(branch) if !branch.is_empty() => return branch,
        _ => {}
    }
    // Older git without `branch --show-current`
    match git.rev_parse_abbrev_head() {
        Ok(name) if name == "HEAD" || name.is_empty() => DETACHED.to_string(),
        Ok(name) => name,
        Err(_) => DETACHED.to_string(),
    }
}

/// One checkout, recomputed on every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorktreeRecord {
    pub is_main: bool,
    pub path: PathBuf,
    pub branch: String,
    pub status: WorktreeStatus,
}

impl WorktreeRecord {
    /// Build a record for `path`, using git's section for it when present.
    pub fn describe(git: &GitCommand, sections: &[WorktreeSection], path: &Path, is_main: bool) -> Self {
        let section = status::find_section(sections, path);
        let branch = match section {
            Some(s) if s.markers.contains(&status::Marker::Detached) => DETACHED.to_string(),
            Some(WorktreeSection {
                branch: Some(branch),
                ..
            }) => branch.clone(),
            _ => current_branch_of(git, path),
        };
        Self {
            is_main,
            path: path.to_path_buf(),
            branch,
            status: section.map_or(WorktreeStatus::Missing, status::classify),
        }
    }
}

/// Resolves identifiers for one repository and layout.
pub struct IdentityResolver<'a> {
    git: &'a GitCommand,
    ctx: &'a RepositoryContext,
    layout: &'a WorktreeLayout,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(git: &'a GitCommand, ctx: &'a RepositoryContext, layout: &'a WorktreeLayout) -> Self {
        Self { git, ctx, layout }
    }

    /// First match wins: main token, main branch, sanitized directory,
    /// then a scan of every prefixed directory for an exact branch match.
    pub fn resolve(&self, identifier: &str) -> Result<WorktreeRecord> {
        let sections = self.sections();

        if identifier == MAIN_TOKEN {
            return Ok(self.main_record(&sections));
        }

        let main_branch = current_branch_of(self.git, &self.ctx.repo_root);
        if identifier == main_branch {
            return Ok(self.main_record(&sections));
        }

        // An empty sanitized name would point at the base dir itself
        let name = sanitize_name(identifier);
        if !name.is_empty() {
            let candidate = self.layout.dir_for(&name);
            if candidate.is_dir() && candidate != self.layout.base_dir {
                return Ok(WorktreeRecord::describe(self.git, &sections, &candidate, false));
            }
        }

        for dir in self.layout.entries()? {
            if dir == self.layout.base_dir {
                continue;
            }
            if current_branch_of(self.git, &dir) == identifier {
                return Ok(WorktreeRecord::describe(self.git, &sections, &dir, false));
            }
        }

        Err(GtrError::WorktreeNotFound {
            identifier: identifier.to_string(),
        })
    }

    fn main_record(&self, sections: &[WorktreeSection]) -> WorktreeRecord {
        WorktreeRecord {
            is_main: true,
            path: self.ctx.repo_root.clone(),
            branch: current_branch_of(self.git, &self.ctx.repo_root),
            status: status::status_of(sections, &self.ctx.repo_root),
        }
    }

    /// Sections from git; a failing listing yields none, and every path is
    /// then reported `missing`.
    fn sections(&self) -> Vec<WorktreeSection> {
        self.ctx
            .git(self.git)
            .worktree_list_porcelain()
            .map(|out| status::parse_sections(&out))
            .unwrap_or_default()
    }
}
