//! Subcommands of `git gtr`.
//!
//! Each module exposes clap `Args` and a `run` function taking the base
//! [`GitCommand`] (which fixes the working directory) and an [`Output`].

pub mod ai;
pub mod clean;
pub mod config;
pub mod editor;
pub mod go;
pub mod list;
pub mod new;
pub mod rm;

use crate::config::{ConfigResolver, GitConfigStore};
use crate::core::base_dir::{self, WorktreeLayout};
use crate::core::identity::{IdentityResolver, WorktreeRecord};
use crate::core::repo::RepositoryContext;
use crate::core::OutputSink;
use crate::git::GitCommand;
use crate::output::Output;
use crate::settings::GtrSettings;
use anyhow::Result;

/// Everything a worktree command needs, resolved once per invocation.
pub(crate) struct Session {
    /// Git rooted at the main repository.
    pub git: GitCommand,
    pub ctx: RepositoryContext,
    pub resolver: ConfigResolver<GitConfigStore>,
    pub settings: GtrSettings,
    pub layout: WorktreeLayout,
}

impl Session {
    pub fn open(git: &GitCommand, output: &mut dyn Output) -> Result<Self> {
        let ctx = RepositoryContext::discover(git)?;
        let resolver = ConfigResolver::new(GitConfigStore::new(git, &ctx));
        let settings = GtrSettings::load(&resolver)?;

        let base_dir =
            base_dir::resolve(&settings.worktrees_dir, &ctx, &mut OutputSink(&mut *output));
        let layout = WorktreeLayout::new(base_dir, settings.prefix.clone());
        output.debug(&format!(
            "Repository: {}, worktrees: {}",
            ctx.repo_root.display(),
            layout.base_dir.display()
        ));

        Ok(Self {
            git: ctx.git(git),
            ctx,
            resolver,
            settings,
            layout,
        })
    }

    pub fn resolve(&self, identifier: &str) -> Result<WorktreeRecord> {
        let resolver = IdentityResolver::new(&self.git, &self.ctx, &self.layout);
        Ok(resolver.resolve(identifier)?)
    }
}
