use super::ConfigScope;
use crate::core::repo::RepositoryContext;
use crate::error::{GtrError, Result};
use crate::git::{ConfigTarget, GitCommand};
use std::path::PathBuf;

/// Raw access to the four configuration stores.
///
/// Keys passed here are already in the store's own namespace; mapping
/// between the public and project-file namespaces is the resolver's job.
/// Reads of a store that does not exist return no values.
pub trait ConfigStore {
    /// Every value of `key` in `scope`, in store order.
    fn get_all(&self, scope: ConfigScope, key: &str) -> Result<Vec<String>>;

    /// Replace all values of `key` in `scope` with `value`.
    fn set(&self, scope: ConfigScope, key: &str, value: &str) -> Result<()>;

    /// Append `value` to `key` in `scope`.
    fn add(&self, scope: ConfigScope, key: &str, value: &str) -> Result<()>;

    /// Remove every value of `key` in `scope`. Absent keys are not an error.
    fn unset(&self, scope: ConfigScope, key: &str) -> Result<()>;

    /// Every entry in `scope`, in store order.
    fn list(&self, scope: ConfigScope) -> Result<Vec<(String, String)>>;
}

/// File name of the project-level configuration, at the repository root.
pub const PROJECT_CONFIG_FILE: &str = ".gtrconfig";

/// [`ConfigStore`] backed by `git config`.
pub struct GitConfigStore {
    git: GitCommand,
    project_file: Option<PathBuf>,
    in_repo: bool,
}

impl GitConfigStore {
    /// Store for a repository. Local-scope commands run from the main
    /// repository root so every worktree sees the same values.
    pub fn new(git: &GitCommand, ctx: &RepositoryContext) -> Self {
        Self {
            git: git.at(&ctx.repo_root),
            project_file: Some(ctx.repo_root.join(PROJECT_CONFIG_FILE)),
            in_repo: true,
        }
    }

    /// Store usable outside any repository: only global and system exist.
    pub fn outside_repo(git: &GitCommand) -> Self {
        Self {
            git: git.clone(),
            project_file: None,
            in_repo: false,
        }
    }

    fn read_target(&self, scope: ConfigScope) -> Option<ConfigTarget<'_>> {
        match scope {
            ConfigScope::Local if self.in_repo => Some(ConfigTarget::Local),
            ConfigScope::ProjectFile => self.project_file.as_deref().map(ConfigTarget::File),
            ConfigScope::Global => Some(ConfigTarget::Global),
            ConfigScope::System => Some(ConfigTarget::System),
            _ => None,
        }
    }

    fn write_target(&self, scope: ConfigScope, action: &str) -> Result<ConfigTarget<'_>> {
        match scope {
            ConfigScope::Local | ConfigScope::ProjectFile if !self.in_repo => {
                Err(GtrError::NotInRepository)
            }
            _ => self.read_target(scope).ok_or_else(|| GtrError::InvalidScope {
                scope: scope.to_string(),
                action: action.to_string(),
            }),
        }
    }
}

impl ConfigStore for GitConfigStore {
    fn get_all(&self, scope: ConfigScope, key: &str) -> Result<Vec<String>> {
        match self.read_target(scope) {
            Some(ConfigTarget::File(path)) if !path.exists() => Ok(Vec::new()),
            Some(target) => Ok(self.git.config_get_all(target, key)?),
            None => Ok(Vec::new()),
        }
    }

    fn set(&self, scope: ConfigScope, key: &str, value: &str) -> Result<()> {
        let target = self.write_target(scope, "set")?;
        Ok(self.git.config_set(target, key, value)?)
    }

    fn add(&self, scope: ConfigScope, key: &str, value: &str) -> Result<()> {
        let target = self.write_target(scope, "add")?;
        Ok(self.git.config_add(target, key, value)?)
    }

    fn unset(&self, scope: ConfigScope, key: &str) -> Result<()> {
        let target = self.write_target(scope, "unset")?;
        Ok(self.git.config_unset_all(target, key)?)
    }

    fn list(&self, scope: ConfigScope) -> Result<Vec<(String, String)>> {
        match self.read_target(scope) {
            Some(ConfigTarget::File(path)) if !path.exists() => Ok(Vec::new()),
            Some(target) => Ok(self.git.config_list(target)?),
            None => Ok(Vec::new()),
        }
    }
}

/// In-memory store for resolver tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryStore {
    entries: std::cell::RefCell<Vec<(ConfigScope, String, String)>>,
}

#[cfg(test)]
impl MemoryStore {
    pub(crate) fn with(entries: &[(ConfigScope, &str, &str)]) -> Self {
        let store = Self::default();
        for (scope, key, value) in entries {
            store
                .entries
                .borrow_mut()
                .push((*scope, key.to_string(), value.to_string()));
        }
        store
    }
}

#[cfg(test)]
impl ConfigStore for MemoryStore {
    fn get_all(&self, scope: ConfigScope, key: &str) -> Result<Vec<String>> {
        Ok(self
            .entries
            .borrow()
            .iter()
            .filter(|(s, k, _)| *s == scope && k == key)
            .map(|(_, _, v)| v.clone())
            .collect())
    }

    fn set(&self, scope: ConfigScope, key: &str, value: &str) -> Result<()> {
        self.unset(scope, key)?;
        self.add(scope, key, value)
    }

    fn add(&self, scope: ConfigScope, key: &str, value: &str) -> Result<()> {
        if !scope.is_store() {
            return Err(GtrError::InvalidScope {
                scope: scope.to_string(),
                action: "add".to_string(),
            });
        }
        self.entries
            .borrow_mut()
            .push((scope, key.to_string(), value.to_string()));
        Ok(())
    }

    fn unset(&self, scope: ConfigScope, key: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .retain(|(s, k, _)| !(*s == scope && k == key));
        Ok(())
    }

    fn list(&self, scope: ConfigScope) -> Result<Vec<(String, String)>> {
        Ok(self
            .entries
            .borrow()
            .iter()
            .filter(|(s, _, _)| *s == scope)
            .map(|(_, k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
