//! Creating and removing worktrees.
//!
//! Creation picks a git-level strategy from two facts (does a
//! remote-tracking ref exist, does a local branch exist) and the requested
//! [`TrackMode`]. See [`plan`] for the decision table.

use super::base_dir::WorktreeLayout;
use super::identity::sanitize_name;
use super::ProgressSink;
use crate::error::{GtrError, Result};
use crate::git::GitCommand;
use std::fmt;
use std::path::{Path, PathBuf};

/// How the branch of a new worktree relates to existing refs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackMode {
    /// Remote-tracking if only the remote has it, else local, else new.
    #[default]
    Auto,
    /// Require the remote-tracking branch.
    Remote,
    /// Require the local branch.
    Local,
    /// Always create a fresh branch from the start ref.
    None,
}

impl TrackMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "remote" => Some(Self::Remote),
            "local" => Some(Self::Local),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Remote => "remote",
            Self::Local => "local",
            Self::None => "none",
        }
    }
}

impl fmt::Display for TrackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Git-level strategy chosen for a new worktree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Create a local branch tracking the remote one, then add the worktree.
    RemoteTracking,
    /// Add the worktree on the existing local branch.
    LocalReuse,
    /// Create a new branch at the start ref.
    NewBranch,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RemoteTracking => "remote-tracking",
            Self::LocalReuse => "local-reuse",
            Self::NewBranch => "new-branch",
        })
    }
}

/// Input for [`create`].
#[derive(Debug, Clone)]
pub struct ProvisioningRequest {
    pub branch_name: String,
    /// Start point when a new branch has to be created.
    pub from_ref: String,
    pub track_mode: TrackMode,
    pub skip_fetch: bool,
    /// Allow the branch to be checked out in more than one worktree.
    pub force: bool,
    /// Appended to the directory name as `-<suffix>`. Required with `force`.
    pub custom_name: Option<String>,
}

impl ProvisioningRequest {
    pub fn new(branch_name: impl Into<String>, from_ref: impl Into<String>) -> Self {
        Self {
            branch_name: branch_name.into(),
            from_ref: from_ref.into(),
            track_mode: TrackMode::Auto,
            skip_fetch: false,
            force: false,
            custom_name: None,
        }
    }

    fn suffix(&self) -> Option<&str> {
        self.custom_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !sanitize_name(s).is_empty())
    }

    /// Fail early when `force` comes without a distinguishing name, or when
    /// the branch name leaves nothing to name a directory after.
    pub fn validate(&self) -> Result<()> {
        if self.force && self.suffix().is_none() {
            return Err(GtrError::MissingRequiredName {
                branch: self.branch_name.clone(),
            });
        }
        if sanitize_name(&self.branch_name).is_empty() {
            return Err(GtrError::Git(anyhow::anyhow!(
                "Branch name '{}' does not yield a worktree directory name",
                self.branch_name
            )));
        }
        Ok(())
    }

    /// Sanitized branch name plus `-<suffix>` when a custom name is given.
    pub fn target_name(&self) -> String {
        let base = sanitize_name(&self.branch_name);
        match self.suffix() {
            Some(suffix) => format!("{base}-{}", sanitize_name(suffix)),
            None => base,
        }
    }
}

/// The decision table.
///
/// | mode   | remote | local | strategy              |
/// |--------|--------|-------|-----------------------|
/// | auto   | yes    | no    | remote-tracking       |
/// | auto   | *      | yes   | local-reuse           |
/// | auto   | no     | no    | new-branch            |
/// | remote | yes    | no    | remote-tracking       |
/// | remote | yes    | yes   | local-reuse           |
/// | remote | no     | *     | RemoteBranchNotFound  |
/// | local  | *      | yes   | local-reuse           |
/// | local  | *      | no    | LocalBranchNotFound   |
/// | none   | *      | *     | new-branch            |
///
/// Under `auto` the local branch wins when both exist, even if the remote
/// has moved ahead.
pub fn plan(
    mode: TrackMode,
    remote_exists: bool,
    local_exists: bool,
    remote: &str,
    branch: &str,
) -> Result<Strategy> {
    match mode {
        TrackMode::Auto if remote_exists && !local_exists => Ok(Strategy::RemoteTracking),
        TrackMode::Auto if local_exists => Ok(Strategy::LocalReuse),
        TrackMode::Auto | TrackMode::None => Ok(Strategy::NewBranch),
        TrackMode::Remote if !remote_exists => Err(GtrError::RemoteBranchNotFound {
            remote: remote.to_string(),
            branch: branch.to_string(),
        }),
        TrackMode::Remote if local_exists => Ok(Strategy::LocalReuse),
        TrackMode::Remote => Ok(Strategy::RemoteTracking),
        TrackMode::Local if local_exists => Ok(Strategy::LocalReuse),
        TrackMode::Local => Err(GtrError::LocalBranchNotFound {
            branch: branch.to_string(),
        }),
    }
}

/// Result of a successful creation.
#[derive(Debug, Clone)]
pub struct Provisioned {
    pub path: PathBuf,
    pub strategy: Strategy,
}

/// Create the worktree described by `req` under `layout`.
///
/// `git` must run in the repository. A failure after `branch --track`
/// succeeded leaves the new branch behind; it is harmless and visible.
pub fn create(
    git: &GitCommand,
    layout: &WorktreeLayout,
    remote: &str,
    req: &ProvisioningRequest,
    sink: &mut dyn ProgressSink,
) -> Result<Provisioned> {
    req.validate()?;

    let path = layout.dir_for(&req.target_name());
    if path.exists() {
        return Err(GtrError::WorktreeAlreadyExists { path });
    }

    std::fs::create_dir_all(&layout.base_dir)?;

    if !req.skip_fetch {
        sink.on_step(&format!("Fetching from '{remote}'..."));
        if let Err(e) = git.fetch(remote) {
            sink.on_warning(&format!("Could not fetch from '{remote}': {e:#}"));
        }
    }

    let branch = req.branch_name.as_str();
    let remote_exists = git.remote_branch_exists(remote, branch)?;
    let local_exists = git.local_branch_exists(branch)?;
    sink.on_debug(&format!(
        "Branch '{branch}': remote={remote_exists}, local={local_exists}, track={}",
        req.track_mode
    ));

    let strategy = plan(req.track_mode, remote_exists, local_exists, remote, branch)?;
    sink.on_step(&format!(
        "Creating worktree at '{}' ({strategy})",
        path.display()
    ));

    let outcome = match strategy {
        Strategy::RemoteTracking => git
            .branch_track(branch, &format!("{remote}/{branch}"))
            .and_then(|()| git.worktree_add(&path, branch, req.force)),
        Strategy::LocalReuse => git.worktree_add(&path, branch, req.force),
        Strategy::NewBranch => {
            git.worktree_add_new_branch(&path, branch, &req.from_ref, false, req.force)
        }
    };

    outcome.map_err(|e| GtrError::ProvisioningFailed {
        branch: branch.to_string(),
        strategy,
        reason: format!("{e:#}"),
    })?;

    Ok(Provisioned { path, strategy })
}

/// Remove the worktree at `path`. No retries.
pub fn remove(git: &GitCommand, path: &Path, force: bool) -> Result<()> {
    if !path.is_dir() {
        return Err(GtrError::WorktreeNotFound {
            identifier: path.display().to_string(),
        });
    }
    git.worktree_remove(path, force)
        .map_err(|e| GtrError::RemovalFailed {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        })
}

/// Resolve `gtr.defaultBranch`. `auto` asks `refs/remotes/<remote>/HEAD`,
/// then falls back to `main` when it exists and `master` otherwise.
pub fn resolve_default_branch(git: &GitCommand, configured: &str, remote: &str) -> Result<String> {
    let configured = configured.trim();
    if !configured.is_empty() && configured != "auto" {
        return Ok(configured.to_string());
    }

    let head_ref = format!("refs/remotes/{remote}/HEAD");
    if let Some(target) = git.symbolic_ref(&head_ref)? {
        let prefix = format!("refs/remotes/{remote}/");
        if let Some(branch) = target.strip_prefix(&prefix) {
            return Ok(branch.to_string());
        }
    }

    if git.local_branch_exists("main")? || git.remote_branch_exists(remote, "main")? {
        return Ok("main".to_string());
    }
    Ok("master".to_string())
}
