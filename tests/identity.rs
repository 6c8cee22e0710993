//! Repository discovery, identifier resolution and listing.

mod common;

use common::{git, TestRepo};
use gtr::core::base_dir::WorktreeLayout;
use gtr::core::identity::{IdentityResolver, DETACHED};
use gtr::core::repo::RepositoryContext;
use gtr::GtrError;
use serial_test::serial;

#[test]
#[serial]
fn test_context_is_the_same_from_any_worktree() {
    let repo = TestRepo::new();
    repo.run(&["new", "feature/ctx", "--no-fetch"]).0.unwrap();
    let wt = repo.worktrees_dir().join("feature-ctx");

    let from_main = RepositoryContext::discover(&repo.git_cmd()).unwrap();
    let from_wt = RepositoryContext::discover(&repo.git_cmd().at(&wt)).unwrap();
    let from_subdir = {
        std::fs::create_dir_all(wt.join("nested/dir")).unwrap();
        RepositoryContext::discover(&repo.git_cmd().at(&wt.join("nested/dir"))).unwrap()
    };

    assert_eq!(from_main.repo_root, repo.root);
    assert_eq!(from_wt, from_main);
    assert_eq!(from_subdir, from_main);
    assert_eq!(from_main.common_dir, repo.root.join(".git"));
}

#[test]
#[serial]
fn test_discover_outside_repository() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dir = tmp.path().canonicalize().unwrap();
    let git = gtr::git::GitCommand::new(true).in_dir(&dir);
    // Keep git from finding a repository above the temp dir
    std::env::set_var("GIT_CEILING_DIRECTORIES", dir.parent().unwrap());
    let result = RepositoryContext::discover(&git);
    std::env::remove_var("GIT_CEILING_DIRECTORIES");
    assert!(matches!(result, Err(GtrError::NotInRepository)));
}

#[test]
#[serial]
fn test_go_resolution_order() {
    let repo = TestRepo::new();
    repo.run(&["new", "feature/go", "--no-fetch"]).0.unwrap();
    let wt = repo.worktrees_dir().join("feature-go");

    // Main token, from inside a worktree
    let (result, output) = repo.run_in(&wt, &["go", "1"]);
    result.unwrap();
    assert_eq!(output.raw_text(), format!("{}\n", repo.root.display()));

    // Branch checked out in the main repository
    let (result, output) = repo.run(&["go", "main"]);
    result.unwrap();
    assert_eq!(output.raw_text().trim_end(), repo.root.display().to_string());

    // Sanitized directory name
    let (result, output) = repo.run(&["go", "feature/go"]);
    result.unwrap();
    assert_eq!(output.raw_text().trim_end(), wt.display().to_string());

    // Unknown
    let (result, _) = repo.run(&["go", "nope"]);
    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GtrError>(),
        Some(GtrError::WorktreeNotFound { identifier }) if identifier == "nope"
    ));
}

#[test]
#[serial]
fn test_resolve_scans_directories_for_branch() {
    let repo = TestRepo::new();
    // Directory name unrelated to the branch name
    let dir = repo.worktrees_dir().join("odd-name");
    std::fs::create_dir_all(repo.worktrees_dir()).unwrap();
    git(
        &repo.root,
        &["worktree", "add", "--quiet", "-b", "topic/x", dir.to_str().unwrap()],
    );

    let ctx = RepositoryContext::discover(&repo.git_cmd()).unwrap();
    let layout = WorktreeLayout::new(repo.worktrees_dir(), "");
    let git = repo.git_cmd();
    let record = IdentityResolver::new(&git, &ctx, &layout)
        .resolve("topic/x")
        .unwrap();
    assert!(!record.is_main);
    assert_eq!(record.path, dir);
    assert_eq!(record.branch, "topic/x");
}

#[test]
#[serial]
fn test_main_token_ignores_base_dir_contents() {
    let repo = TestRepo::new();
    // A worktree directory literally named "1" must not shadow the main repo
    std::fs::create_dir_all(repo.worktrees_dir().join("1")).unwrap();

    let ctx = RepositoryContext::discover(&repo.git_cmd()).unwrap();
    let layout = WorktreeLayout::new(repo.worktrees_dir(), "");
    let git = repo.git_cmd();
    let record = IdentityResolver::new(&git, &ctx, &layout).resolve("1").unwrap();
    assert!(record.is_main);
    assert_eq!(record.path, repo.root);
}

#[test]
#[serial]
fn test_list_porcelain_statuses() {
    let repo = TestRepo::new();
    repo.run(&["new", "feature/a", "--no-fetch"]).0.unwrap();
    repo.run(&["new", "feature/b", "--no-fetch"]).0.unwrap();
    let a = repo.worktrees_dir().join("feature-a");
    let b = repo.worktrees_dir().join("feature-b");
    git(&repo.root, &["worktree", "lock", b.to_str().unwrap()]);
    git(&b, &["checkout", "--quiet", "--detach"]);
    std::fs::create_dir_all(repo.worktrees_dir().join("stray")).unwrap();

    let (result, output) = repo.run(&["list", "--porcelain"]);
    result.unwrap();
    let text = output.raw_text();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 4, "{text}");
    assert_eq!(lines[0], format!("{}\tmain\tok", repo.root.display()));
    assert_eq!(lines[1], format!("{}\tfeature/a\tok", a.display()));
    // Locked wins over detached
    assert_eq!(lines[2], format!("{}\t{DETACHED}\tlocked", b.display()));
    assert!(lines[3].ends_with("\tmissing"), "{}", lines[3]);

    git(&repo.root, &["worktree", "unlock", b.to_str().unwrap()]);
}

#[test]
#[serial]
fn test_list_json() {
    let repo = TestRepo::new();
    repo.run(&["new", "feature/json", "--no-fetch"]).0.unwrap();

    let (result, output) = repo.run(&["list", "--json"]);
    result.unwrap();
    let value: serde_json::Value = serde_json::from_str(&output.raw_text()).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["is_main"], true);
    assert_eq!(items[1]["branch"], "feature/json");
    assert_eq!(items[1]["status"], "ok");
}

#[test]
#[serial]
fn test_relative_worktrees_dir_is_anchored_at_repo_root() {
    let repo = TestRepo::new();
    git(&repo.root, &["config", "gtr.worktrees.dir", ".worktrees"]);
    let subdir = repo.root.join("src");
    std::fs::create_dir_all(&subdir).unwrap();

    let (result, output) = repo.run_in(&subdir, &["new", "inside", "--no-fetch"]);
    result.unwrap();
    assert!(repo.root.join(".worktrees/inside").is_dir());
    assert!(!subdir.join(".worktrees").exists());
    assert!(output.has_warning("not ignored"));

    std::fs::write(repo.root.join(".gitignore"), "/.worktrees/\n").unwrap();
    let (result, output) = repo.run(&["go", "inside"]);
    result.unwrap();
    assert!(!output.has_warnings());
}

#[test]
#[serial]
fn test_prefix_applies_to_directories() {
    let repo = TestRepo::new();
    git(&repo.root, &["config", "gtr.worktrees.prefix", "app-"]);

    repo.run(&["new", "feature/p", "--no-fetch"]).0.unwrap();
    assert!(repo.worktrees_dir().join("app-feature-p").is_dir());

    let (result, output) = repo.run(&["go", "feature/p"]);
    result.unwrap();
    assert!(output.raw_text().contains("app-feature-p"));
}

#[test]
#[serial]
fn test_identifier_without_directory_name_is_not_found() {
    let repo = TestRepo::new();
    repo.run(&["new", "feature/x", "--no-fetch"]).0.unwrap();
    assert!(repo.worktrees_dir().is_dir());

    for identifier in ["/", "-", " "] {
        let (result, output) = repo.run(&["go", identifier]);
        let err = result.unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<GtrError>(),
                Some(GtrError::WorktreeNotFound { identifier: id }) if id == identifier
            ),
            "{identifier:?}: {err:#}"
        );
        assert!(output.raw_text().is_empty());
    }

    let (result, _) = repo.run(&["rm", "/"]);
    assert!(result.is_err());
    assert!(repo.worktrees_dir().join("feature-x").is_dir());
}
