//! Layered configuration resolution.
//!
//! Values come from four git config files, consulted in precedence order,
//! followed by an environment variable and a built-in default:
//!
//! | Scope | Backing store |
//! |-------|---------------|
//! | `local` | `.git/config` of the main repository |
//! | `project` | `.gtrconfig` at the repository root (own key namespace) |
//! | `global` | `~/.gitconfig` |
//! | `system` | `$(prefix)/etc/gitconfig` |
//! | `env` | `GTR_*` variables, singular keys only |
//! | `default` | built-in fallback |
//!
//! Singular keys take the first non-empty value in that order; multi-valued
//! keys concatenate all four stores and collapse duplicate values, keeping
//! the highest-priority occurrence.

mod resolver;
mod store;

pub use resolver::{parse_list_scope, parse_write_scope, ConfigResolver, ListScope};
pub use store::{ConfigStore, GitConfigStore};

#[cfg(test)]
pub(crate) use store::MemoryStore;

use serde::Serialize;
use std::fmt;

/// Configuration tiers, declared from highest to lowest precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigScope {
    Local,
    #[serde(rename = "project")]
    ProjectFile,
    Global,
    System,
    #[serde(rename = "env")]
    Environment,
    #[serde(rename = "default")]
    StaticFallback,
}

impl ConfigScope {
    /// The four addressable stores, in precedence order.
    pub const STORES: [ConfigScope; 4] = [
        ConfigScope::Local,
        ConfigScope::ProjectFile,
        ConfigScope::Global,
        ConfigScope::System,
    ];

    /// Parse a store name. Only the four addressable stores parse.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "local" => Some(Self::Local),
            "project" | "file" => Some(Self::ProjectFile),
            "global" => Some(Self::Global),
            "system" => Some(Self::System),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::ProjectFile => "project",
            Self::Global => "global",
            Self::System => "system",
            Self::Environment => "env",
            Self::StaticFallback => "default",
        }
    }

    pub fn is_store(&self) -> bool {
        Self::STORES.contains(self)
    }
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Static description of a known configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigKey {
    /// Dotted name in the public `gtr.*` namespace.
    pub name: &'static str,
    /// Equivalent key inside `.gtrconfig`, if the key may live there.
    pub file_key: Option<&'static str>,
    /// Environment variable consulted after every store (singular keys only).
    pub env: Option<&'static str>,
    pub multi: bool,
}

impl ConfigKey {
    pub const fn singular(
        name: &'static str,
        file_key: &'static str,
        env: &'static str,
    ) -> Self {
        Self {
            name,
            file_key: Some(file_key),
            env: Some(env),
            multi: false,
        }
    }

    pub const fn multi(name: &'static str, file_key: &'static str) -> Self {
        Self {
            name,
            file_key: Some(file_key),
            env: None,
            multi: true,
        }
    }
}

/// One `(key, value)` pair and the scope it came from.
///
/// `value` may be empty; an empty value is still a present key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub scope: ConfigScope,
}
