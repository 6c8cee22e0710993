//! gtr: named, branch-scoped git worktrees with layered configuration.
//!
//! The library is split the same way the binary uses it:
//!
//! - [`config`] merges the local, `.gtrconfig`, global and system stores.
//! - [`core`] discovers the repository, maps identifiers to worktrees and
//!   creates or removes them.
//! - [`commands`] wires both to the `git gtr` subcommands.

pub mod adapters;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod logging;
pub mod output;
pub mod settings;
pub mod styles;

pub use error::{GtrError, Result};

/// Version shown by `--version`, with the commit hash on dev builds.
pub const VERSION: &str = env!("GTR_VERSION_DISPLAY");

use clap::{Parser, Subcommand};
use git::GitCommand;
use output::Output;

#[derive(Parser, Debug)]
#[command(name = "git-gtr", bin_name = "git gtr")]
#[command(version = VERSION)]
#[command(about = "Manage git worktrees named after their branches")]
pub struct Cli {
    #[arg(short, long, global = true, help = "Be verbose; show detailed progress")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Operate quietly; suppress progress reporting")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    New(commands::new::Args),
    Go(commands::go::Args),
    Rm(commands::rm::Args),
    #[command(alias = "ls")]
    List(commands::list::Args),
    Config(commands::config::Args),
    Editor(commands::editor::Args),
    Ai(commands::ai::Args),
    Clean(commands::clean::Args),
}

impl Command {
    /// Run the subcommand with `git` fixing the working directory.
    pub fn run(self, git: &GitCommand, output: &mut dyn Output) -> anyhow::Result<()> {
        match self {
            Command::New(args) => commands::new::run(args, git, output),
            Command::Go(args) => commands::go::run(args, git, output),
            Command::Rm(args) => commands::rm::run(args, git, output),
            Command::List(args) => commands::list::run(args, git, output),
            Command::Config(args) => commands::config::run(args, git, output),
            Command::Editor(args) => commands::editor::run(args, git, output),
            Command::Ai(args) => commands::ai::run(args, git, output),
            Command::Clean(args) => commands::clean::run(args, git, output),
        }
    }
}
