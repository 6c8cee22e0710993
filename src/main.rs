//! git-gtr: git worktree manager.
//!
//! Installed as `git-gtr`, so git exposes it as `git gtr <command>`.

use clap::Parser;
use gtr::git::GitCommand;
use gtr::logging::init_logging;
use gtr::output::{CliOutput, Output, OutputConfig};
use gtr::Cli;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut output = CliOutput::new(OutputConfig::new(cli.quiet, cli.verbose));
    let git = GitCommand::new(cli.quiet);

    if let Err(e) = cli.command.run(&git, &mut output) {
        output.error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
