//! Shell hooks around worktree creation and removal.
//!
//! Each configured value of `gtr.hook.<phase>` is one shell command run via
//! `sh -c`. Hooks see `REPO_ROOT`, `WORKTREE_PATH` and `BRANCH`.

use super::ProgressSink;
use crate::config::ConfigKey;
use crate::settings::keys;
use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    PostCreate,
    PreRemove,
    PostRemove,
}

impl HookPhase {
    /// Multi-valued config key holding this phase's commands.
    pub fn key(&self) -> &'static ConfigKey {
        match self {
            Self::PostCreate => &keys::hooks::POST_CREATE,
            Self::PreRemove => &keys::hooks::PRE_REMOVE,
            Self::PostRemove => &keys::hooks::POST_REMOVE,
        }
    }
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PostCreate => "postCreate",
            Self::PreRemove => "preRemove",
            Self::PostRemove => "postRemove",
        })
    }
}

/// What a hook is told about the worktree it runs for.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub phase: HookPhase,
    pub repo_root: PathBuf,
    pub worktree_path: PathBuf,
    pub branch: String,
}

impl HookContext {
    /// Directory the hook runs in. After removal the worktree is gone, so
    /// postRemove runs in the repository root.
    pub fn working_dir(&self) -> &Path {
        match self.phase {
            HookPhase::PostRemove => &self.repo_root,
            _ => &self.worktree_path,
        }
    }

    pub fn vars(&self) -> [(&'static str, String); 3] {
        [
            ("REPO_ROOT", self.repo_root.display().to_string()),
            ("WORKTREE_PATH", self.worktree_path.display().to_string()),
            ("BRANCH", self.branch.clone()),
        ]
    }
}

/// Run `commands` in order, stopping at the first failure.
///
/// Hook output is captured and forwarded to the sink as steps, so it shows
/// in verbose mode and never mixes with command stdout.
pub fn run(commands: &[String], ctx: &HookContext, sink: &mut dyn ProgressSink) -> Result<()> {
    for cmd in commands.iter().filter(|c| !c.trim().is_empty()) {
        sink.on_step(&format!("Running {} hook: {cmd}", ctx.phase));

        let output = Command::new("sh")
            .args(["-c", cmd])
            .current_dir(ctx.working_dir())
            .envs(ctx.vars())
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to spawn {} hook: {cmd}", ctx.phase))?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            sink.on_step(line);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            anyhow::bail!(
                "{} hook '{cmd}' failed (exit {code}): {}",
                ctx.phase,
                stderr.trim()
            );
        }
    }
    Ok(())
}
