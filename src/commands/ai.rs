use super::Session;
use crate::adapters::Registry;
use crate::git::GitCommand;
use crate::output::Output;
use anyhow::Result;

#[derive(clap::Args, Debug)]
#[command(about = "Start an AI coding tool in a worktree")]
#[command(long_about = r#"
Starts --ai, or gtr.ai.default when no tool is given, with the worktree for
IDENTIFIER as its working directory. Arguments after -- are passed to the
tool.

Known tools: claude, aider, codex, gemini, cursor-agent.
"#)]
pub struct Args {
    #[arg(help = "Branch name, or 1 for the main repository")]
    identifier: String,

    #[arg(long, value_name = "NAME", help = "Tool to use instead of gtr.ai.default")]
    ai: Option<String>,

    #[arg(last = true, help = "Arguments passed to the tool")]
    args: Vec<String>,
}

pub fn run(args: Args, git: &GitCommand, output: &mut dyn Output) -> Result<()> {
    let session = Session::open(git, output)?;
    let record = session.resolve(&args.identifier)?;
    let name = args.ai.unwrap_or_else(|| session.settings.ai.clone());

    output.step(&format!("Starting {name} in '{}'", record.path.display()));
    if !Registry::ai_tools().launch(&name, &record.path, &args.args)? {
        anyhow::bail!("No AI tool configured; pass --ai or set gtr.ai.default");
    }
    Ok(())
}
