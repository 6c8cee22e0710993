use super::Session;
use crate::adapters::Registry;
use crate::git::GitCommand;
use crate::output::Output;
use anyhow::Result;

#[derive(clap::Args, Debug)]
#[command(about = "Open a worktree in an editor")]
#[command(long_about = r#"
Opens the worktree for IDENTIFIER in --editor, or in gtr.editor.default when
no editor is given.

Known editors: code, cursor, zed, subl, vim, nvim, emacs, idea.
"#)]
pub struct Args {
    #[arg(help = "Branch name, or 1 for the main repository")]
    identifier: String,

    #[arg(long, value_name = "NAME", help = "Editor to use instead of gtr.editor.default")]
    editor: Option<String>,
}

pub fn run(args: Args, git: &GitCommand, output: &mut dyn Output) -> Result<()> {
    let session = Session::open(git, output)?;
    let record = session.resolve(&args.identifier)?;
    let name = args.editor.unwrap_or_else(|| session.settings.editor.clone());

    output.step(&format!("Opening '{}' in {name}", record.path.display()));
    if !Registry::editors().launch(&name, &record.path, &[])? {
        anyhow::bail!("No editor configured; pass --editor or set gtr.editor.default");
    }
    Ok(())
}
