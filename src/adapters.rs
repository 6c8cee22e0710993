//! Editor and AI tool launchers.
//!
//! Each tool is a [`Launcher`] resolved by name from a [`Registry`]. The
//! configured name `none` means "do not launch anything".

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;
use which::which;

/// Name that disables launching.
pub const NONE: &str = "none";

pub trait Launcher {
    fn name(&self) -> &str;

    /// Whether the tool is installed.
    fn is_available(&self) -> bool;

    /// Start the tool for the worktree at `path` and wait for it to return.
    fn launch(&self, path: &Path, args: &[String]) -> Result<()>;
}

/// How a tool receives the worktree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Invocation {
    /// `<bin> <path>`.
    PathArgument,
    /// `<bin> <args...>` run inside the worktree.
    WorkingDirectory,
}

/// A launcher that runs one binary.
#[derive(Debug, Clone)]
pub struct CommandAdapter {
    name: &'static str,
    binary: &'static str,
    invocation: Invocation,
}

impl CommandAdapter {
    const fn editor(name: &'static str, binary: &'static str) -> Self {
        Self {
            name,
            binary,
            invocation: Invocation::PathArgument,
        }
    }

    const fn ai(name: &'static str, binary: &'static str) -> Self {
        Self {
            name,
            binary,
            invocation: Invocation::WorkingDirectory,
        }
    }

    fn command(&self, path: &Path, args: &[String]) -> Command {
        let mut cmd = Command::new(self.binary);
        match self.invocation {
            Invocation::PathArgument => {
                cmd.args(args).arg(path);
            }
            Invocation::WorkingDirectory => {
                cmd.args(args).current_dir(path);
            }
        }
        cmd
    }
}

impl Launcher for CommandAdapter {
    fn name(&self) -> &str {
        self.name
    }

    fn is_available(&self) -> bool {
        which(self.binary).is_ok()
    }

    fn launch(&self, path: &Path, args: &[String]) -> Result<()> {
        let status = self
            .command(path, args)
            .status()
            .with_context(|| format!("Failed to start '{}'", self.binary))?;
        if !status.success() {
            anyhow::bail!("'{}' exited with {status}", self.name);
        }
        Ok(())
    }
}

const EDITORS: &[CommandAdapter] = &[
    CommandAdapter::editor("code", "code"),
    CommandAdapter::editor("cursor", "cursor"),
    CommandAdapter::editor("zed", "zed"),
    CommandAdapter::editor("subl", "subl"),
    CommandAdapter::editor("vim", "vim"),
    CommandAdapter::editor("nvim", "nvim"),
    CommandAdapter::editor("emacs", "emacs"),
    CommandAdapter::editor("idea", "idea"),
];

const AI_TOOLS: &[CommandAdapter] = &[
    CommandAdapter::ai("claude", "claude"),
    CommandAdapter::ai("aider", "aider"),
    CommandAdapter::ai("codex", "codex"),
    CommandAdapter::ai("gemini", "gemini"),
    CommandAdapter::ai("cursor-agent", "cursor-agent"),
];

/// A named family of launchers.
pub struct Registry {
    kind: &'static str,
    adapters: Vec<Box<dyn Launcher>>,
}

impl Registry {
    pub fn editors() -> Self {
        Self::from_adapters("editor", EDITORS)
    }

    pub fn ai_tools() -> Self {
        Self::from_adapters("AI tool", AI_TOOLS)
    }

    fn from_adapters(kind: &'static str, adapters: &[CommandAdapter]) -> Self {
        Self {
            kind,
            adapters: adapters
                .iter()
                .map(|a| Box::new(a.clone()) as Box<dyn Launcher>)
                .collect(),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Look up `name`. `none` and the empty string resolve to `None`.
    pub fn resolve(&self, name: &str) -> Result<Option<&dyn Launcher>> {
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case(NONE) {
            return Ok(None);
        }
        match self.adapters.iter().find(|a| a.name() == name) {
            Some(adapter) => Ok(Some(adapter.as_ref())),
            None => anyhow::bail!(
                "Unknown {} '{name}' (known: {})",
                self.kind,
                self.names().join(", ")
            ),
        }
    }

    /// Resolve `name` and launch it for `path`, failing when the tool is
    /// not installed. Returns whether anything was launched.
    pub fn launch(&self, name: &str, path: &Path, args: &[String]) -> Result<bool> {
        let Some(adapter) = self.resolve(name)? else {
            return Ok(false);
        };
        if !adapter.is_available() {
            anyhow::bail!("{} '{}' is not installed or not on PATH", self.kind, adapter.name());
        }
        adapter.launch(path, args)?;
        Ok(true)
    }
}
