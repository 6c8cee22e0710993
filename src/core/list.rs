//! Listing the main checkout and every managed worktree.

use super::base_dir::WorktreeLayout;
use super::identity::WorktreeRecord;
use super::repo::RepositoryContext;
use super::status;
use crate::error::Result;
use crate::git::GitCommand;

/// Main repository first, then each prefixed directory under the base dir
/// in name order. Statuses come from one `git worktree list` call; a
/// directory git does not know about is `missing`.
pub fn list_worktrees(
    git: &GitCommand,
    ctx: &RepositoryContext,
    layout: &WorktreeLayout,
) -> Result<Vec<WorktreeRecord>> {
    let porcelain = ctx.git(git).worktree_list_porcelain()?;
    let sections = status::parse_sections(&porcelain);

    let mut records = vec![WorktreeRecord::describe(git, &sections, &ctx.repo_root, true)];
    for dir in layout.entries()? {
        records.push(WorktreeRecord::describe(git, &sections, &dir, false));
    }
    Ok(records)
}
