//! Worktree status from `git worktree list --porcelain`.
//!
//! The porcelain output is parsed into one typed [`WorktreeSection`] per
//! worktree; classification then applies a fixed priority over the markers,
//! independent of the order git printed them in.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Flags git may attach to a worktree section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Marker {
    Bare,
    Detached,
    Locked,
    Prunable,
}

impl Marker {
    fn from_line(line: &str) -> Option<Self> {
        let word = line.split_once(' ').map_or(line, |(w, _)| w);
        match word {
            "bare" => Some(Self::Bare),
            "detached" => Some(Self::Detached),
            "locked" => Some(Self::Locked),
            "prunable" => Some(Self::Prunable),
            _ => None,
        }
    }
}

/// One worktree as reported by git.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeSection {
    pub path: PathBuf,
    pub head: Option<String>,
    /// Short branch name, without `refs/heads/`.
    pub branch: Option<String>,
    pub markers: BTreeSet<Marker>,
}

/// Derived state of a worktree directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorktreeStatus {
    Ok,
    Detached,
    Locked,
    Prunable,
    Missing,
}

impl WorktreeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Detached => "detached",
            Self::Locked => "locked",
            Self::Prunable => "prunable",
            Self::Missing => "missing",
        }
    }
}

impl std::fmt::Display for WorktreeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split porcelain output into sections. Sections are separated by blank
/// lines and start with a `worktree <path>` line; anything before the first
/// such line is ignored.
pub fn parse_sections(porcelain: &str) -> Vec<WorktreeSection> {
    let mut sections = Vec::new();
    let mut current: Option<WorktreeSection> = None;

    for line in porcelain.lines() {
        if line.trim().is_empty() {
            if let Some(section) = current.take() {
                sections.push(section);
            }
            continue;
        }

        if let Some(path) = line.strip_prefix("worktree ") {
            if let Some(section) = current.take() {
                sections.push(section);
            }
            current = Some(WorktreeSection {
                path: PathBuf::from(path),
                ..Default::default()
            });
            continue;
        }

        let Some(section) = current.as_mut() else {
            continue;
        };
        if let Some(head) = line.strip_prefix("HEAD ") {
            section.head = Some(head.to_string());
        } else if let Some(branch) = line.strip_prefix("branch ") {
            let short = branch.strip_prefix("refs/heads/").unwrap_or(branch);
            section.branch = Some(short.to_string());
        } else if let Some(marker) = Marker::from_line(line) {
            section.markers.insert(marker);
        }
    }

    if let Some(section) = current {
        sections.push(section);
    }
    sections
}

/// Locked beats prunable beats detached.
pub fn classify(section: &WorktreeSection) -> WorktreeStatus {
    if section.markers.contains(&Marker::Locked) {
        WorktreeStatus::Locked
    } else if section.markers.contains(&Marker::Prunable) {
        WorktreeStatus::Prunable
    } else if section.markers.contains(&Marker::Detached) {
        WorktreeStatus::Detached
    } else {
        WorktreeStatus::Ok
    }
}

/// Find the section describing `path`. Paths are compared canonicalized so
/// symlinked temp directories and trailing components do not matter.
pub fn find_section<'a>(sections: &'a [WorktreeSection], path: &Path) -> Option<&'a WorktreeSection> {
    let wanted = canonical(path);
    sections.iter().find(|s| canonical(&s.path) == wanted)
}

/// Status of `path`; paths git does not list are `missing`.
pub fn status_of(sections: &[WorktreeSection], path: &Path) -> WorktreeStatus {
    find_section(sections, path).map_or(WorktreeStatus::Missing, classify)
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
