//! Git config-based settings for gtr.
//!
//! Settings are resolved through [`ConfigResolver`] from git's layered
//! config (local → `.gtrconfig` → global → system), then `GTR_*`
//! environment variables, then built-in defaults.
//!
//! # Config Keys
//!
//! | Key | `.gtrconfig` key | Env | Default |
//! |-----|------------------|-----|---------|
//! | `gtr.worktrees.dir` | `worktrees.dir` | `GTR_WORKTREES_DIR` | `<repo>-worktrees` next to the repo |
//! | `gtr.worktrees.prefix` | `worktrees.prefix` | `GTR_WORKTREES_PREFIX` | `""` |
//! | `gtr.defaultBranch` | `defaults.branch` | `GTR_DEFAULT_BRANCH` | `auto` |
//! | `gtr.track` | `defaults.track` | `GTR_TRACK` | `auto` |
//! | `gtr.remote` | `defaults.remote` | `GTR_REMOTE` | `origin` |
//! | `gtr.editor.default` | `defaults.editor` | `GTR_EDITOR_DEFAULT` | `none` |
//! | `gtr.ai.default` | `defaults.ai` | `GTR_AI_DEFAULT` | `none` |
//!
//! Multi-valued keys (`git config --add`): `gtr.copy.include`,
//! `gtr.copy.exclude`, `gtr.hook.postCreate`, `gtr.hook.preRemove`,
//! `gtr.hook.postRemove`.
//!
//! # Example
//!
//! ```bash
//! # Keep worktrees inside the repository
//! git gtr config set gtr.worktrees.dir .worktrees
//!
//! # Copy env files into every new worktree, for all repositories
//! git gtr config add gtr.copy.include '.env*' --scope global
//! ```

use crate::config::{ConfigResolver, ConfigStore};
use crate::core::provision::TrackMode;
use crate::error::Result;

/// Default values for settings.
pub mod defaults {
    /// Empty means "sibling `<repo>-worktrees` directory".
    pub const WORKTREES_DIR: &str = "";

    pub const WORKTREES_PREFIX: &str = "";

    /// `auto` asks the remote's HEAD, then checks `main` and `master`.
    pub const DEFAULT_BRANCH: &str = "auto";

    pub const TRACK: &str = "auto";

    pub const REMOTE: &str = "origin";

    /// `none` disables launching.
    pub const EDITOR: &str = "none";

    pub const AI: &str = "none";
}

/// Configuration keys known to gtr.
pub mod keys {
    use crate::config::ConfigKey;

    /// Prefix of every public key.
    pub const NAMESPACE: &str = "gtr.";

    pub const WORKTREES_DIR: ConfigKey =
        ConfigKey::singular("gtr.worktrees.dir", "worktrees.dir", "GTR_WORKTREES_DIR");

    pub const WORKTREES_PREFIX: ConfigKey = ConfigKey::singular(
        "gtr.worktrees.prefix",
        "worktrees.prefix",
        "GTR_WORKTREES_PREFIX",
    );

    pub const DEFAULT_BRANCH: ConfigKey =
        ConfigKey::singular("gtr.defaultBranch", "defaults.branch", "GTR_DEFAULT_BRANCH");

    pub const TRACK: ConfigKey = ConfigKey::singular("gtr.track", "defaults.track", "GTR_TRACK");

    pub const REMOTE: ConfigKey =
        ConfigKey::singular("gtr.remote", "defaults.remote", "GTR_REMOTE");

    pub const EDITOR: ConfigKey =
        ConfigKey::singular("gtr.editor.default", "defaults.editor", "GTR_EDITOR_DEFAULT");

    pub const AI: ConfigKey = ConfigKey::singular("gtr.ai.default", "defaults.ai", "GTR_AI_DEFAULT");

    pub const COPY_INCLUDE: ConfigKey = ConfigKey::multi("gtr.copy.include", "copy.include");

    pub const COPY_EXCLUDE: ConfigKey = ConfigKey::multi("gtr.copy.exclude", "copy.exclude");

    /// Hook keys.
    pub mod hooks {
        use crate::config::ConfigKey;

        pub const POST_CREATE: ConfigKey =
            ConfigKey::multi("gtr.hook.postCreate", "hooks.postCreate");

        pub const PRE_REMOVE: ConfigKey = ConfigKey::multi("gtr.hook.preRemove", "hooks.preRemove");

        pub const POST_REMOVE: ConfigKey =
            ConfigKey::multi("gtr.hook.postRemove", "hooks.postRemove");
    }

    /// Every key with a `.gtrconfig` equivalent or an environment fallback.
    pub static ALL: &[ConfigKey] = &[
        WORKTREES_DIR,
        WORKTREES_PREFIX,
        DEFAULT_BRANCH,
        TRACK,
        REMOTE,
        EDITOR,
        AI,
        COPY_INCLUDE,
        COPY_EXCLUDE,
        hooks::POST_CREATE,
        hooks::PRE_REMOVE,
        hooks::POST_REMOVE,
    ];
}

/// Built-in default of a singular key, for `config get`.
pub fn default_for(name: &str) -> Option<&'static str> {
    let value = match name {
        n if n == keys::WORKTREES_DIR.name => defaults::WORKTREES_DIR,
        n if n == keys::WORKTREES_PREFIX.name => defaults::WORKTREES_PREFIX,
        n if n == keys::DEFAULT_BRANCH.name => defaults::DEFAULT_BRANCH,
        n if n == keys::TRACK.name => defaults::TRACK,
        n if n == keys::REMOTE.name => defaults::REMOTE,
        n if n == keys::EDITOR.name => defaults::EDITOR,
        n if n == keys::AI.name => defaults::AI,
        _ => return None,
    };
    Some(value)
}

/// Whether `name` is a known multi-valued key.
pub fn is_multi(name: &str) -> bool {
    keys::ALL.iter().any(|k| k.multi && k.name == name)
}

/// Snapshot of every singular setting, resolved once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtrSettings {
    /// Raw configured worktrees directory; see `core::base_dir` for expansion.
    pub worktrees_dir: String,

    /// Prepended to every worktree directory name.
    pub prefix: String,

    /// Configured default branch, possibly `auto`.
    pub default_branch: String,

    pub track: TrackMode,

    pub remote: String,

    pub editor: String,

    pub ai: String,
}

impl Default for GtrSettings {
    fn default() -> Self {
        Self {
            worktrees_dir: defaults::WORKTREES_DIR.to_string(),
            prefix: defaults::WORKTREES_PREFIX.to_string(),
            default_branch: defaults::DEFAULT_BRANCH.to_string(),
            track: TrackMode::Auto,
            remote: defaults::REMOTE.to_string(),
            editor: defaults::EDITOR.to_string(),
            ai: defaults::AI.to_string(),
        }
    }
}

impl GtrSettings {
    pub fn load<S: ConfigStore>(resolver: &ConfigResolver<S>) -> Result<Self> {
        let track_value = resolver.get(keys::TRACK.name, defaults::TRACK)?;

        Ok(Self {
            worktrees_dir: resolver.get(keys::WORKTREES_DIR.name, defaults::WORKTREES_DIR)?,
            prefix: resolver.get(keys::WORKTREES_PREFIX.name, defaults::WORKTREES_PREFIX)?,
            default_branch: resolver.get(keys::DEFAULT_BRANCH.name, defaults::DEFAULT_BRANCH)?,
            track: TrackMode::parse(&track_value).unwrap_or(TrackMode::Auto),
            remote: resolver.get(keys::REMOTE.name, defaults::REMOTE)?,
            editor: resolver.get(keys::EDITOR.name, defaults::EDITOR)?,
            ai: resolver.get(keys::AI.name, defaults::AI)?,
        })
    }
}
