//! Error taxonomy for the configuration and worktree core.
//!
//! Core operations return [`GtrError`] so callers can match on the failure
//! kind. The command layer converts everything into `anyhow::Error` for
//! reporting.

use crate::core::provision::Strategy;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GtrError {
    #[error("Not inside a git repository")]
    NotInRepository,

    #[error("No worktree found for '{identifier}'")]
    WorktreeNotFound { identifier: String },

    #[error("Worktree already exists at '{}'", path.display())]
    WorktreeAlreadyExists { path: PathBuf },

    #[error("Remote branch '{remote}/{branch}' does not exist")]
    RemoteBranchNotFound { remote: String, branch: String },

    #[error("Local branch '{branch}' does not exist")]
    LocalBranchNotFound { branch: String },

    #[error("Failed to create worktree for '{branch}' ({strategy}): {reason}")]
    ProvisioningFailed {
        branch: String,
        strategy: Strategy,
        reason: String,
    },

    #[error("Failed to remove worktree at '{}': {reason}", path.display())]
    RemovalFailed { path: PathBuf, reason: String },

    #[error("Invalid config scope '{scope}' for '{action}' (expected one of: local, project, global, system)")]
    InvalidScope { scope: String, action: String },

    #[error("--force requires --name to distinguish the new worktree for '{branch}'")]
    MissingRequiredName { branch: String },

    #[error(transparent)]
    Git(#[from] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GtrError>;
