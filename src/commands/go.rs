use super::Session;
use crate::git::GitCommand;
use crate::output::Output;
use anyhow::Result;

#[derive(clap::Args, Debug)]
#[command(about = "Print the path of a worktree")]
#[command(long_about = r#"
Prints the absolute path of the worktree for IDENTIFIER and nothing else, so
it can be used as:

    cd "$(git gtr go feature/auth)"

IDENTIFIER is a branch name, or 1 for the main repository.
"#)]
pub struct Args {
    #[arg(help = "Branch name, or 1 for the main repository")]
    identifier: String,
}

pub fn run(args: Args, git: &GitCommand, output: &mut dyn Output) -> Result<()> {
    let session = Session::open(git, output)?;
    let record = session.resolve(&args.identifier)?;
    output.raw(&format!("{}\n", record.path.display()));
    Ok(())
}
