use super::{ConfigEntry, ConfigKey, ConfigScope, ConfigStore};
use crate::core::ProgressSink;
use crate::error::{GtrError, Result};
use crate::settings::keys;
use std::collections::HashSet;

/// Scope argument of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Merge all four stores, labelling each entry with its origin.
    Auto,
    Only(ConfigScope),
}

/// Parse the scope of a read-only listing. Unknown values fall back to
/// [`ListScope::Auto`] with a warning instead of failing.
pub fn parse_list_scope(raw: Option<&str>, sink: &mut impl ProgressSink) -> ListScope {
    let Some(raw) = raw else {
        return ListScope::Auto;
    };
    if raw.eq_ignore_ascii_case("auto") {
        return ListScope::Auto;
    }
    match ConfigScope::parse(raw) {
        Some(scope) => ListScope::Only(scope),
        None => {
            sink.on_warning(&format!(
                "Unknown config scope '{raw}', listing all scopes instead"
            ));
            ListScope::Auto
        }
    }
}

/// Parse the scope of a mutation. There is no fallback: writing to a scope
/// the caller did not ask for is worse than failing.
pub fn parse_write_scope(raw: Option<&str>, action: &str) -> Result<ConfigScope> {
    match raw {
        None => Ok(ConfigScope::Local),
        Some(raw) => ConfigScope::parse(raw).ok_or_else(|| GtrError::InvalidScope {
            scope: raw.to_string(),
            action: action.to_string(),
        }),
    }
}

/// Merges the configuration stores per key.
///
/// Holds no cached values: every lookup reads the stores again.
pub struct ConfigResolver<S: ConfigStore> {
    store: S,
    table: &'static [ConfigKey],
}

impl<S: ConfigStore> ConfigResolver<S> {
    pub fn new(store: S) -> Self {
        Self::with_table(store, keys::ALL)
    }

    pub fn with_table(store: S, table: &'static [ConfigKey]) -> Self {
        Self { store, table }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn lookup(&self, name: &str) -> Option<&'static ConfigKey> {
        self.table.iter().find(|k| k.name == name)
    }

    fn lookup_file_key(&self, file_key: &str) -> Option<&'static ConfigKey> {
        self.table.iter().find(|k| k.file_key == Some(file_key))
    }

    /// The key as the given store spells it. `None` means the key does not
    /// exist in that store's namespace.
    fn store_key(&self, scope: ConfigScope, name: &str) -> Option<String> {
        match scope {
            ConfigScope::ProjectFile => self
                .lookup(name)
                .and_then(|k| k.file_key)
                .map(str::to_string),
            _ => Some(name.to_string()),
        }
    }

    /// Map a store's key back into the public namespace, dropping keys that
    /// are not ours.
    fn public_key(&self, scope: ConfigScope, raw: &str) -> Option<String> {
        match scope {
            ConfigScope::ProjectFile => self.lookup_file_key(raw).map(|k| k.name.to_string()),
            _ if raw.starts_with(keys::NAMESPACE) => Some(raw.to_string()),
            _ => None,
        }
    }

    /// Resolve a singular key, reporting where the value came from.
    ///
    /// Stores are consulted in precedence order; within a store the last
    /// value wins, as with `git config --get`. Empty values do not count.
    pub fn resolve(&self, name: &str, default: &str) -> Result<ConfigEntry> {
        for scope in ConfigScope::STORES {
            let Some(key) = self.store_key(scope, name) else {
                continue;
            };
            let values = self.store.get_all(scope, &key)?;
            if let Some(value) = values.into_iter().rev().find(|v| !v.is_empty()) {
                return Ok(ConfigEntry {
                    key: name.to_string(),
                    value,
                    scope,
                });
            }
        }

        if let Some(var) = self.lookup(name).and_then(|k| k.env) {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    return Ok(ConfigEntry {
                        key: name.to_string(),
                        value,
                        scope: ConfigScope::Environment,
                    });
                }
            }
        }

        Ok(ConfigEntry {
            key: name.to_string(),
            value: default.to_string(),
            scope: ConfigScope::StaticFallback,
        })
    }

    /// Effective value of a singular key.
    pub fn get(&self, name: &str, default: &str) -> Result<String> {
        Ok(self.resolve(name, default)?.value)
    }

    /// Effective values of a multi-valued key: all stores concatenated in
    /// precedence order, duplicates removed keeping the first occurrence.
    /// Empty values are kept (once); consumers decide what an empty entry means.
    pub fn get_all(&self, name: &str) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();

        for scope in ConfigScope::STORES {
            let Some(key) = self.store_key(scope, name) else {
                continue;
            };
            for value in self.store.get_all(scope, &key)? {
                if seen.insert(value.clone()) {
                    values.push(value);
                }
            }
        }

        Ok(values)
    }

    /// Raw values of `name` in one store, without any fallback.
    pub fn get_in(&self, name: &str, scope: ConfigScope) -> Result<Vec<String>> {
        match self.store_key(scope, name) {
            Some(key) => self.store.get_all(scope, &key),
            None => Ok(Vec::new()),
        }
    }

    fn writable_key(&self, scope: ConfigScope, name: &str, action: &str) -> Result<String> {
        if !scope.is_store() {
            return Err(GtrError::InvalidScope {
                scope: scope.to_string(),
                action: action.to_string(),
            });
        }
        self.store_key(scope, name)
            .ok_or_else(|| GtrError::InvalidScope {
                scope: scope.to_string(),
                action: format!("{action} {name}"),
            })
    }

    pub fn set(&self, name: &str, value: &str, scope: ConfigScope) -> Result<()> {
        let key = self.writable_key(scope, name, "set")?;
        self.store.set(scope, &key, value)
    }

    /// Append a value. Never replaces existing values.
    pub fn add(&self, name: &str, value: &str, scope: ConfigScope) -> Result<()> {
        let key = self.writable_key(scope, name, "add")?;
        self.store.add(scope, &key, value)
    }

    pub fn unset(&self, name: &str, scope: ConfigScope) -> Result<()> {
        let key = self.writable_key(scope, name, "unset")?;
        self.store.unset(scope, &key)
    }

    /// Entries of our namespace.
    ///
    /// `Auto` merges all stores and shows each distinct `(key, value)` pair
    /// once, at its highest-priority origin; a multi-valued key keeps all of
    /// its distinct values. A single scope is listed as stored.
    pub fn list(&self, scope: ListScope) -> Result<Vec<ConfigEntry>> {
        match scope {
            ListScope::Only(scope) => self.list_scope(scope),
            ListScope::Auto => {
                let mut seen = HashSet::new();
                let mut entries = Vec::new();
                for scope in ConfigScope::STORES {
                    for entry in self.list_scope(scope)? {
                        if seen.insert((entry.key.clone(), entry.value.clone())) {
                            entries.push(entry);
                        }
                    }
                }
                Ok(entries)
            }
        }
    }

    fn list_scope(&self, scope: ConfigScope) -> Result<Vec<ConfigEntry>> {
        Ok(self
            .store
            .list(scope)?
            .into_iter()
            .filter_map(|(raw, value)| {
                self.public_key(scope, &raw).map(|key| ConfigEntry { key, value, scope })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryStore;
    use crate::core::NullSink;
    use ConfigScope::*;

    const ENV_VAR: &str = "GTR_RESOLVER_TEST_DIR";

    static TABLE: &[ConfigKey] = &[
        ConfigKey::singular("gtr.worktrees.dir", "worktrees.dir", ENV_VAR),
        ConfigKey::multi("gtr.copy.include", "copy.include"),
    ];

    fn resolver(entries: &[(ConfigScope, &str, &str)]) -> ConfigResolver<MemoryStore> {
        ConfigResolver::with_table(MemoryStore::with(entries), TABLE)
    }

    #[test]
    fn test_singular_precedence_walks_scopes_in_order() {
        let all = [
            (System, "gtr.worktrees.dir", "system"),
            (Global, "gtr.worktrees.dir", "global"),
            (ProjectFile, "worktrees.dir", "project"),
            (Local, "gtr.worktrees.dir", "local"),
        ];
        let entry = resolver(&all).resolve("gtr.worktrees.dir", "fallback").unwrap();
        assert_eq!(entry.value, "local");
        assert_eq!(entry.scope, Local);

        let entry = resolver(&all[..3]).resolve("gtr.worktrees.dir", "x").unwrap();
        assert_eq!((entry.value.as_str(), entry.scope), ("project", ProjectFile));

        let entry = resolver(&all[..2]).resolve("gtr.worktrees.dir", "x").unwrap();
        assert_eq!((entry.value.as_str(), entry.scope), ("global", Global));

        let entry = resolver(&all[..1]).resolve("gtr.worktrees.dir", "x").unwrap();
        assert_eq!((entry.value.as_str(), entry.scope), ("system", System));
    }

    #[test]
    #[serial_test::serial]
    fn test_singular_falls_back_to_env_then_default() {
        std::env::remove_var(ENV_VAR);
        let r = resolver(&[]);
        let entry = r.resolve("gtr.worktrees.dir", "fallback").unwrap();
        assert_eq!(entry.value, "fallback");
        assert_eq!(entry.scope, StaticFallback);

        std::env::set_var(ENV_VAR, "/from/env");
        let entry = r.resolve("gtr.worktrees.dir", "fallback").unwrap();
        assert_eq!(entry.value, "/from/env");
        assert_eq!(entry.scope, Environment);

        // Any store beats the environment
        let r = resolver(&[(System, "gtr.worktrees.dir", "system")]);
        assert_eq!(r.get("gtr.worktrees.dir", "fallback").unwrap(), "system");
        std::env::remove_var(ENV_VAR);
    }

    #[test]
    fn test_get_all_keeps_one_empty_value() {
        let r = resolver(&[
            (Local, "gtr.copy.include", ""),
            (Local, "gtr.copy.include", ".env"),
            (Global, "gtr.copy.include", ""),
        ]);
        assert_eq!(r.get_all("gtr.copy.include").unwrap(), vec!["", ".env"]);
    }

    #[test]
    fn test_singular_skips_empty_values() {
        let r = resolver(&[
            (Local, "gtr.worktrees.dir", ""),
            (Global, "gtr.worktrees.dir", "global"),
        ]);
        assert_eq!(r.get("gtr.worktrees.dir", "").unwrap(), "global");
    }

    #[test]
    fn test_singular_last_value_in_store_wins() {
        let r = resolver(&[
            (Local, "gtr.worktrees.dir", "first"),
            (Local, "gtr.worktrees.dir", "second"),
        ]);
        assert_eq!(r.get("gtr.worktrees.dir", "").unwrap(), "second");
    }

    #[test]
    fn test_unmapped_key_is_invisible_in_project_file() {
        let r = resolver(&[(ProjectFile, "gtr.unknown", "nope"), (ProjectFile, "unknown", "nope")]);
        assert_eq!(r.get("gtr.unknown", "d").unwrap(), "d");
        assert!(r.get_in("gtr.unknown", ProjectFile).unwrap().is_empty());
    }

    #[test]
    fn test_get_all_dedups_keeping_highest_priority_position() {
        let r = resolver(&[
            (Global, "gtr.copy.include", ".env"),
            (Global, "gtr.copy.include", "*.pem"),
            (Local, "gtr.copy.include", ".env.local"),
            (Local, "gtr.copy.include", ".env"),
            (ProjectFile, "copy.include", "config/*.json"),
            (System, "gtr.copy.include", ".env.local"),
        ]);
        assert_eq!(
            r.get_all("gtr.copy.include").unwrap(),
            vec![".env.local", ".env", "config/*.json", "*.pem"]
        );
    }

    #[test]
    fn test_add_appends_and_unset_removes_all() {
        let r = resolver(&[]);
        r.add("gtr.copy.include", ".env", Local).unwrap();
        r.add("gtr.copy.include", ".env.local", Local).unwrap();
        assert_eq!(r.get_in("gtr.copy.include", Local).unwrap(), vec![".env", ".env.local"]);

        r.unset("gtr.copy.include", Local).unwrap();
        assert!(r.get_in("gtr.copy.include", Local).unwrap().is_empty());

        // Unsetting again is fine
        r.unset("gtr.copy.include", Local).unwrap();
    }

    #[test]
    fn test_set_replaces_and_maps_project_key() {
        let r = resolver(&[(ProjectFile, "worktrees.dir", "old")]);
        r.set("gtr.worktrees.dir", "new", ProjectFile).unwrap();
        assert_eq!(r.store().get_all(ProjectFile, "worktrees.dir").unwrap(), vec!["new"]);
    }

    #[test]
    fn test_write_unmapped_key_to_project_file_fails() {
        let r = resolver(&[]);
        let err = r.set("gtr.unknown", "x", ProjectFile).unwrap_err();
        assert!(matches!(err, GtrError::InvalidScope { .. }));
    }

    #[test]
    fn test_write_to_fallback_tiers_fails() {
        let r = resolver(&[]);
        assert!(matches!(
            r.set("gtr.worktrees.dir", "x", Environment),
            Err(GtrError::InvalidScope { .. })
        ));
        assert!(matches!(
            r.add("gtr.copy.include", "x", StaticFallback),
            Err(GtrError::InvalidScope { .. })
        ));
    }

    #[test]
    fn test_list_auto_dedups_by_key_and_value() {
        let r = resolver(&[
            (Local, "gtr.copy.include", ".env"),
            (Local, "user.name", "not ours"),
            (ProjectFile, "copy.include", ".env"),
            (ProjectFile, "copy.include", ".npmrc"),
            (ProjectFile, "unmapped.key", "dropped"),
            (Global, "gtr.worktrees.dir", "~/worktrees"),
            (System, "gtr.worktrees.dir", "~/worktrees"),
        ]);
        let entries = r.list(ListScope::Auto).unwrap();
        let flat: Vec<(&str, &str, ConfigScope)> = entries
            .iter()
            .map(|e| (e.key.as_str(), e.value.as_str(), e.scope))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("gtr.copy.include", ".env", Local),
                ("gtr.copy.include", ".npmrc", ProjectFile),
                ("gtr.worktrees.dir", "~/worktrees", Global),
            ]
        );
    }

    #[test]
    fn test_list_single_scope_is_not_deduplicated() {
        let r = resolver(&[
            (Local, "gtr.copy.include", ".env"),
            (Local, "gtr.copy.include", ".env"),
        ]);
        let entries = r.list(ListScope::Only(Local)).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_list_keeps_empty_values() {
        let r = resolver(&[(Local, "gtr.worktrees.dir", "")]);
        let entries = r.list(ListScope::Auto).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].value, "");
    }

    #[test]
    fn test_parse_list_scope_falls_back_with_warning() {
        let mut sink = crate::core::tests::RecordingSink::default();
        assert_eq!(parse_list_scope(Some("bogus"), &mut sink), ListScope::Auto);
        assert_eq!(sink.warnings.len(), 1);
        assert!(sink.warnings[0].contains("bogus"));

        let mut null = NullSink;
        assert_eq!(parse_list_scope(None, &mut null), ListScope::Auto);
        assert_eq!(parse_list_scope(Some("auto"), &mut null), ListScope::Auto);
        assert_eq!(
            parse_list_scope(Some("global"), &mut null),
            ListScope::Only(Global)
        );
    }

    #[test]
    fn test_parse_write_scope_rejects_unknown() {
        assert_eq!(parse_write_scope(None, "set").unwrap(), Local);
        assert_eq!(parse_write_scope(Some("system"), "set").unwrap(), System);
        let err = parse_write_scope(Some("everywhere"), "set").unwrap_err();
        assert!(matches!(err, GtrError::InvalidScope { ref scope, .. } if scope == "everywhere"));
        assert!(parse_write_scope(Some("auto"), "unset").is_err());
    }
}
