use super::Session;
use crate::core::hooks::{self, HookContext, HookPhase};
use crate::core::identity::DETACHED;
use crate::core::provision;
use crate::core::OutputSink;
use crate::git::GitCommand;
use crate::output::Output;
use anyhow::Result;

#[derive(clap::Args, Debug)]
#[command(about = "Remove worktrees")]
#[command(long_about = r#"
Removes the worktree of each IDENTIFIER. The main repository is never
removed.

gtr.hook.preRemove commands run inside the worktree first; if one fails the
worktree is kept unless --force is given. gtr.hook.postRemove commands run in
the repository root afterwards.

Remaining identifiers are still processed after a failure; the exit status
is non-zero if any removal failed.
"#)]
pub struct Args {
    #[arg(required = true, help = "Branch names of the worktrees to remove")]
    identifiers: Vec<String>,

    #[arg(long, help = "Remove even with local changes or failing preRemove hooks")]
    force: bool,

    #[arg(long, help = "Also delete the branch (git branch -d, or -D with --force)")]
    delete_branch: bool,
}

pub fn run(args: Args, git: &GitCommand, output: &mut dyn Output) -> Result<()> {
    let session = Session::open(git, output)?;

    let mut failed = 0;
    for identifier in &args.identifiers {
        if let Err(e) = remove_one(&session, identifier, &args, output) {
            output.error(&format!("{identifier}: {e:#}"));
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!(
            "Failed to remove {failed} of {} worktree(s)",
            args.identifiers.len()
        );
    }
    Ok(())
}

fn remove_one(session: &Session, identifier: &str, args: &Args, output: &mut dyn Output) -> Result<()> {
    let record = session.resolve(identifier)?;
    if record.is_main {
        anyhow::bail!(
            "Refusing to remove the main repository at '{}'",
            record.path.display()
        );
    }

    let mut hook_ctx = HookContext {
        phase: HookPhase::PreRemove,
        repo_root: session.ctx.repo_root.clone(),
        worktree_path: record.path.clone(),
        branch: record.branch.clone(),
    };

    let pre_remove = session.resolver.get_all(HookPhase::PreRemove.key().name)?;
    if let Err(e) = hooks::run(&pre_remove, &hook_ctx, &mut OutputSink(&mut *output)) {
        if !args.force {
            return Err(e.context("Removal aborted (use --force to remove anyway)"));
        }
        output.warning(&format!("{e:#}"));
    }

    provision::remove(&session.git, &record.path, args.force)?;
    output.success(&format!("Removed worktree '{}'", record.path.display()));

    if args.delete_branch {
        if record.branch == DETACHED {
            output.warning(&format!(
                "'{}' was detached; no branch to delete",
                record.path.display()
            ));
        } else {
            session.git.branch_delete(&record.branch, args.force)?;
            output.success(&format!("Deleted branch '{}'", record.branch));
        }
    }

    hook_ctx.phase = HookPhase::PostRemove;
    let post_remove = session.resolver.get_all(HookPhase::PostRemove.key().name)?;
    if let Err(e) = hooks::run(&post_remove, &hook_ctx, &mut OutputSink(&mut *output)) {
        output.warning(&format!("{e:#}"));
    }

    Ok(())
}
