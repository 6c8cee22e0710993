//! Copying untracked files into a new worktree.
//!
//! Files such as `.env` are usually git-ignored, so a fresh checkout lacks
//! them. Paths matching `gtr.copy.include` (and no `gtr.copy.exclude`) are
//! copied from the main checkout to the same relative location.

use super::ProgressSink;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Outcome of a copy pass. Failures have already been reported as warnings.
#[derive(Debug, Default)]
pub struct CopyReport {
    /// Relative paths that were copied.
    pub copied: Vec<PathBuf>,
    /// Relative paths left alone because the destination already existed.
    pub skipped: Vec<PathBuf>,
}

fn build_set(patterns: &[String], sink: &mut dyn ProgressSink) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns.iter().filter(|p| !p.trim().is_empty()) {
        match Glob::new(pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => sink.on_warning(&format!("Ignoring invalid copy pattern '{pattern}': {e}")),
        }
    }
    builder.build().unwrap_or_else(|e| {
        sink.on_warning(&format!("Could not compile copy patterns: {e}"));
        GlobSet::empty()
    })
}

/// Copy matching files from `repo_root` into `dest`.
///
/// `skip_dir` (usually the worktrees base dir) is not traversed, nor is any
/// `.git` entry. Ignore rules are not applied.
pub fn copy_matching(
    repo_root: &Path,
    dest: &Path,
    includes: &[String],
    excludes: &[String],
    skip_dir: Option<&Path>,
    sink: &mut dyn ProgressSink,
) -> CopyReport {
    let mut report = CopyReport::default();
    // Empty config values name no files
    if includes.iter().all(|p| p.trim().is_empty()) {
        return report;
    }

    let include = build_set(includes, sink);
    let exclude = build_set(excludes, sink);
    let skip_dir = skip_dir.map(Path::to_path_buf);
    let dest_dir = dest.to_path_buf();

    let walker = WalkBuilder::new(repo_root)
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            if entry.file_name() == ".git" {
                return false;
            }
            let path = entry.path();
            if path == dest_dir {
                return false;
            }
            !matches!(&skip_dir, Some(skip) if path == skip)
        })
        .build();

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                sink.on_warning(&format!("Could not read entry while copying: {e}"));
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(repo_root) else {
            continue;
        };
        if !include.is_match(rel) || exclude.is_match(rel) {
            continue;
        }

        let target = dest.join(rel);
        if target.exists() {
            report.skipped.push(rel.to_path_buf());
            continue;
        }

        let copied = target
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| std::fs::copy(entry.path(), &target));
        match copied {
            Ok(_) => {
                sink.on_step(&format!("Copied {}", rel.display()));
                report.copied.push(rel.to_path_buf());
            }
            Err(e) => sink.on_warning(&format!("Failed to copy {}: {e}", rel.display())),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tests::RecordingSink;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn pats(p: &[&str]) -> Vec<String> {
        p.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_copies_includes_minus_excludes() {
        let repo = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write(repo.path(), ".env", "A=1");
        write(repo.path(), ".env.example", "A=");
        write(repo.path(), "apps/web/.env.local", "B=2");
        write(repo.path(), "src/main.rs", "fn main() {}");
        write(repo.path(), ".git/config", "[core]");

        let mut sink = RecordingSink::default();
        let report = copy_matching(
            repo.path(),
            dest.path(),
            &pats(&[".env*", "**/.env*", ".git/*"]),
            &pats(&["*.example"]),
            None,
            &mut sink,
        );

        assert!(dest.path().join(".env").is_file());
        assert!(dest.path().join("apps/web/.env.local").is_file());
        assert!(!dest.path().join(".env.example").exists());
        assert!(!dest.path().join("src/main.rs").exists());
        assert!(!dest.path().join(".git").exists());
        assert_eq!(report.copied.len(), 2);
        assert!(sink.warnings.is_empty());
    }

    #[test]
    fn test_existing_destination_is_not_overwritten() {
        let repo = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write(repo.path(), ".env", "NEW");
        write(dest.path(), ".env", "OLD");

        let mut sink = RecordingSink::default();
        let report = copy_matching(repo.path(), dest.path(), &pats(&[".env"]), &[], None, &mut sink);

        assert_eq!(std::fs::read_to_string(dest.path().join(".env")).unwrap(), "OLD");
        assert_eq!(report.skipped, vec![PathBuf::from(".env")]);
    }

    #[test]
    fn test_skip_dir_is_not_traversed() {
        let repo = TempDir::new().unwrap();
        write(repo.path(), ".worktrees/other/.env", "X");
        write(repo.path(), ".env", "Y");
        let dest = repo.path().join(".worktrees/new");
        std::fs::create_dir_all(&dest).unwrap();

        let mut sink = RecordingSink::default();
        let report = copy_matching(
            repo.path(),
            &dest,
            &pats(&["**/.env"]),
            &[],
            Some(&repo.path().join(".worktrees")),
            &mut sink,
        );

        assert_eq!(report.copied, vec![PathBuf::from(".env")]);
    }

    #[test]
    fn test_invalid_pattern_warns() {
        let repo = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let mut sink = RecordingSink::default();
        copy_matching(repo.path(), dest.path(), &pats(&["a[b"]), &[], None, &mut sink);
        assert_eq!(sink.warnings.len(), 1);
    }

    #[test]
    fn test_empty_patterns_match_nothing() {
        let repo = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write(repo.path(), ".env", "A=1");

        let mut sink = RecordingSink::default();
        let report = copy_matching(repo.path(), dest.path(), &pats(&["", " "]), &[], None, &mut sink);
        assert!(report.copied.is_empty());

        // An empty exclude does not shadow real includes
        let report = copy_matching(repo.path(), dest.path(), &pats(&["", ".env"]), &pats(&[""]), None, &mut sink);
        assert_eq!(report.copied, vec![PathBuf::from(".env")]);
        assert!(sink.warnings.is_empty());
    }
}
