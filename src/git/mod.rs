use crate::log_debug;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

mod branch;
mod config;
mod refs;
mod remote;
mod worktree;

pub use config::{parse_null_entries, parse_null_values, ConfigTarget};

/// Thin wrapper around the `git` executable.
///
/// Every method spawns one subprocess. When a working directory is set the
/// subprocess runs there instead of the process's current directory, which
/// lets a single invocation query several worktrees without `chdir`.
#[derive(Debug, Clone)]
pub struct GitCommand {
    pub(crate) quiet: bool,
    pub(crate) work_dir: Option<PathBuf>,
}

impl GitCommand {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            work_dir: None,
        }
    }

    /// Run every subsequent command inside `dir`.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// A sibling command with the same settings, rooted at `dir`.
    pub fn at(&self, dir: &Path) -> Self {
        self.clone().in_dir(dir)
    }

    pub fn work_dir(&self) -> Option<&Path> {
        self.work_dir.as_deref()
    }

    pub(crate) fn command(&self) -> Command {
        let mut cmd = Command::new("git");
        if let Some(dir) = &self.work_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Spawn `cmd` and collect its output, logging the invocation in verbose mode.
    pub(crate) fn output(&self, cmd: &mut Command, what: &str) -> Result<Output> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        match &self.work_dir {
            Some(dir) => log_debug!("git {} (in {})", args.join(" "), dir.display()),
            None => log_debug!("git {}", args.join(" ")),
        }
        cmd.output()
            .with_context(|| format!("Failed to execute git {what} command"))
    }
}
