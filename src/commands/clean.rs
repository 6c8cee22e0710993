use super::Session;
use crate::core::base_dir::WorktreeLayout;
use crate::git::GitCommand;
use crate::output::Output;
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(about = "Prune stale worktree metadata and empty directories")]
#[command(long_about = r#"
Runs 'git worktree prune' to drop metadata of worktrees whose directories are
gone, then removes empty directories left in the worktrees directory.
"#)]
pub struct Args {}

pub fn run(_args: Args, git: &GitCommand, output: &mut dyn Output) -> Result<()> {
    let session = Session::open(git, output)?;

    output.step("Pruning worktree metadata...");
    session.git.worktree_prune()?;

    let removed = remove_empty_dirs(&session.layout)?;
    for dir in &removed {
        output.step(&format!("Removed empty directory '{}'", dir.display()));
    }
    let suffix = if removed.len() == 1 { "y" } else { "ies" };
    output.success(&format!("Removed {} empty director{suffix}", removed.len()));
    Ok(())
}

fn remove_empty_dirs(layout: &WorktreeLayout) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for dir in layout.entries()? {
        let is_empty = std::fs::read_dir(&dir)
            .with_context(|| format!("Failed to read '{}'", dir.display()))?
            .next()
            .is_none();
        if is_empty {
            std::fs::remove_dir(&dir)
                .with_context(|| format!("Failed to remove '{}'", dir.display()))?;
            removed.push(dir);
        }
    }
    Ok(removed)
}
