//! Where worktrees live.
//!
//! The configured `gtr.worktrees.dir` is expanded into an absolute path:
//! empty means a sibling `<repo>-worktrees` directory, a leading `~` is the
//! home directory, and relative values are anchored at the repository root
//! rather than the current directory.

use super::repo::RepositoryContext;
use super::ProgressSink;
use ignore::gitignore::Gitignore;
use std::path::{Component, Path, PathBuf};

/// Resolved storage location plus the directory-name prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeLayout {
    pub base_dir: PathBuf,
    pub prefix: String,
}

impl WorktreeLayout {
    pub fn new(base_dir: PathBuf, prefix: impl Into<String>) -> Self {
        Self {
            base_dir,
            prefix: prefix.into(),
        }
    }

    /// Directory for a worktree whose sanitized name is `name`.
    pub fn dir_for(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{}{}", self.prefix, name))
    }

    /// Directories directly under the base dir carrying the prefix, sorted.
    /// A missing base dir has no entries.
    pub fn entries(&self) -> std::io::Result<Vec<PathBuf>> {
        if !self.base_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if entry.file_name().to_string_lossy().starts_with(&self.prefix) {
                dirs.push(entry.path());
            }
        }
        dirs.sort();
        Ok(dirs)
    }
}

/// Expand the configured base directory for `ctx`.
///
/// Warns through `sink` when the result sits inside the repository and
/// `.gitignore` does not cover it.
pub fn resolve(configured: &str, ctx: &RepositoryContext, sink: &mut dyn ProgressSink) -> PathBuf {
    let base_dir = expand(configured, ctx);

    if let Ok(rel) = base_dir.strip_prefix(&ctx.repo_root) {
        if !rel.as_os_str().is_empty() && !is_ignored(&ctx.repo_root, rel) {
            sink.on_warning(&format!(
                "Worktrees directory '{}' is inside the repository and not ignored; add '/{}/' to .gitignore",
                base_dir.display(),
                rel.display()
            ));
        }
    }

    base_dir
}

/// Path expansion without diagnostics.
pub fn expand(configured: &str, ctx: &RepositoryContext) -> PathBuf {
    let configured = configured.trim();
    if configured.is_empty() {
        return default_for(ctx);
    }

    let path = expand_home(configured);
    let absolute = if path.is_absolute() {
        path
    } else {
        ctx.repo_root.join(path)
    };
    normalize(&absolute)
}

/// `<parent>/<repo>-worktrees`.
fn default_for(ctx: &RepositoryContext) -> PathBuf {
    let parent = ctx
        .repo_root
        .parent()
        .unwrap_or(ctx.repo_root.as_path());
    parent.join(format!("{}-worktrees", ctx.repo_name()))
}

fn expand_home(value: &str) -> PathBuf {
    let rest = if value == "~" {
        Some("")
    } else {
        value.strip_prefix("~/")
    };
    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(value),
    }
}

/// Lexically drop `.` and fold `..` so descendant checks see the real shape.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether `rel` (relative to `repo_root`) is covered by the root
/// `.gitignore`. A missing or unreadable file covers nothing.
fn is_ignored(repo_root: &Path, rel: &Path) -> bool {
    let gitignore_path = repo_root.join(".gitignore");
    if !gitignore_path.is_file() {
        return false;
    }
    let (matcher, _partial_error) = Gitignore::new(&gitignore_path);
    // `dir/` matches the directory itself; `dir/*` only matches its children
    matcher.matched_path_or_any_parents(rel, true).is_ignore()
        || matcher
            .matched_path_or_any_parents(rel.join("_"), false)
            .is_ignore()
}
