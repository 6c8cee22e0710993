use super::Session;
use crate::adapters::Registry;
use crate::core::copy::copy_matching;
use crate::core::hooks::{self, HookContext, HookPhase};
use crate::core::provision::{self, ProvisioningRequest, TrackMode};
use crate::core::OutputSink;
use crate::git::GitCommand;
use crate::output::Output;
use crate::settings::keys;
use anyhow::Result;

#[derive(clap::Args, Debug)]
#[command(about = "Create a worktree for a branch")]
#[command(long_about = r#"
Creates a worktree for BRANCH under the worktrees directory
(gtr.worktrees.dir, default: <repo>-worktrees next to the repository). The
directory name is the branch name with '/' and other unsafe characters
replaced by '-', prefixed with gtr.worktrees.prefix.

How the branch is obtained depends on --track (default: gtr.track):

  auto    track the remote branch if only the remote has it, reuse the local
          branch if it exists, otherwise create a new branch from --from
  remote  require <remote>/BRANCH
  local   require a local BRANCH
  none    always create a new branch from --from

After creation, files matching gtr.copy.include are copied from the main
checkout and gtr.hook.postCreate commands run inside the new worktree.
"#)]
pub struct Args {
    #[arg(help = "Branch name")]
    branch: String,

    #[arg(long, value_name = "REF", help = "Start point for a new branch [default: the default branch]")]
    from: Option<String>,

    #[arg(long, value_name = "MODE", value_parser = parse_track, help = "Tracking mode: auto, remote, local or none")]
    track: Option<TrackMode>,

    #[arg(long, help = "Do not copy files into the new worktree")]
    no_copy: bool,

    #[arg(long, help = "Do not fetch from the remote first")]
    no_fetch: bool,

    #[arg(long, help = "Allow a branch already checked out elsewhere (requires --name)")]
    force: bool,

    #[arg(long, value_name = "SUFFIX", help = "Append -SUFFIX to the directory name")]
    name: Option<String>,

    #[arg(long, help = "Open the new worktree in the default editor")]
    editor: bool,

    #[arg(long, help = "Start the default AI tool in the new worktree")]
    ai: bool,
}

fn parse_track(value: &str) -> std::result::Result<TrackMode, String> {
    TrackMode::parse(value).ok_or_else(|| format!("invalid tracking mode '{value}'"))
}

pub fn run(args: Args, git: &GitCommand, output: &mut dyn Output) -> Result<()> {
    let mut request = ProvisioningRequest::new(args.branch.clone(), String::new());
    request.skip_fetch = args.no_fetch;
    request.force = args.force;
    request.custom_name = args.name.clone();
    request.validate()?;

    let session = Session::open(git, output)?;
    let settings = &session.settings;
    request.track_mode = args.track.unwrap_or(settings.track);
    request.from_ref = match args.from {
        Some(from) => from,
        None => provision::resolve_default_branch(
            &session.git,
            &settings.default_branch,
            &settings.remote,
        )?,
    };
    output.debug(&format!("Start point: {}", request.from_ref));

    let created = provision::create(
        &session.git,
        &session.layout,
        &settings.remote,
        &request,
        &mut OutputSink(&mut *output),
    )?;

    if !args.no_copy {
        let includes = session.resolver.get_all(keys::COPY_INCLUDE.name)?;
        let excludes = session.resolver.get_all(keys::COPY_EXCLUDE.name)?;
        let report = copy_matching(
            &session.ctx.repo_root,
            &created.path,
            &includes,
            &excludes,
            Some(&session.layout.base_dir),
            &mut OutputSink(&mut *output),
        );
        if !report.copied.is_empty() {
            output.step(&format!("Copied {} file(s)", report.copied.len()));
        }
    }

    let post_create = session.resolver.get_all(HookPhase::PostCreate.key().name)?;
    let hook_ctx = HookContext {
        phase: HookPhase::PostCreate,
        repo_root: session.ctx.repo_root.clone(),
        worktree_path: created.path.clone(),
        branch: request.branch_name.clone(),
    };
    if let Err(e) = hooks::run(&post_create, &hook_ctx, &mut OutputSink(&mut *output)) {
        output.warning(&format!("{e:#}"));
    }

    // Printed even with -q so scripts can capture it
    output.raw(&format!("{}\n", created.path.display()));

    if args.editor {
        if let Err(e) = Registry::editors().launch(&settings.editor, &created.path, &[]) {
            output.warning(&format!("{e:#}"));
        }
    }
    if args.ai {
        if let Err(e) = Registry::ai_tools().launch(&settings.ai, &created.path, &[]) {
            output.warning(&format!("{e:#}"));
        }
    }

    Ok(())
}
