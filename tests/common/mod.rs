#![allow(dead_code)]

use gtr::git::GitCommand;
use gtr::output::TestOutput;
use gtr::Cli;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Run git in `dir`, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to spawn git");
    assert!(
        output.status.success(),
        "git {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Points git's global and system config at empty temp files and clears
/// `GTR_*` variables for its lifetime. Mutates process env, so tests holding
/// one must be `#[serial]`.
pub struct IsolatedConfig {
    _dir: TempDir,
    pub global: PathBuf,
    pub system: PathBuf,
}

impl IsolatedConfig {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.gitconfig");
        let system = dir.path().join("system.gitconfig");
        std::fs::write(&global, "").unwrap();
        std::fs::write(&system, "").unwrap();
        std::env::set_var("GIT_CONFIG_GLOBAL", &global);
        std::env::set_var("GIT_CONFIG_SYSTEM", &system);
        std::env::remove_var("GIT_CONFIG_NOSYSTEM");
        clear_gtr_env();
        Self {
            _dir: dir,
            global,
            system,
        }
    }
}

impl Drop for IsolatedConfig {
    fn drop(&mut self) {
        std::env::remove_var("GIT_CONFIG_GLOBAL");
        std::env::remove_var("GIT_CONFIG_SYSTEM");
        clear_gtr_env();
    }
}

fn clear_gtr_env() {
    let vars: Vec<String> = std::env::vars()
        .map(|(k, _)| k)
        .filter(|k| k.starts_with("GTR_"))
        .collect();
    for var in vars {
        std::env::remove_var(var);
    }
}

/// A throwaway repository with one commit on `main`, living in its own
/// temp directory so the default sibling worktrees dir is isolated too.
/// Global and system git config are isolated for as long as it lives.
pub struct TestRepo {
    _tmp: TempDir,
    /// Canonical repository root.
    pub root: PathBuf,
    pub config: IsolatedConfig,
}

impl TestRepo {
    pub fn new() -> Self {
        let config = IsolatedConfig::new();
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().canonicalize().unwrap();
        let root = base.join("app");
        std::fs::create_dir(&root).unwrap();

        git(&root, &["init", "--quiet"]);
        git(&root, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(&root, &["config", "user.name", "Test"]);
        git(&root, &["config", "user.email", "test@example.com"]);
        git(&root, &["config", "commit.gpgsign", "false"]);
        std::fs::write(root.join("README.md"), "# app\n").unwrap();
        git(&root, &["add", "."]);
        git(&root, &["commit", "--quiet", "-m", "initial"]);

        Self {
            _tmp: tmp,
            root,
            config,
        }
    }

    /// Parent of the repository, unique to this test.
    pub fn sandbox(&self) -> &Path {
        self.root.parent().unwrap()
    }

    /// Default worktrees directory.
    pub fn worktrees_dir(&self) -> PathBuf {
        self.sandbox().join("app-worktrees")
    }

    /// Add a bare `origin` next to the repository and push `main` to it.
    pub fn with_origin(self) -> Self {
        let origin = self.sandbox().join("origin.git");
        git(self.sandbox(), &["init", "--quiet", "--bare", origin.to_str().unwrap()]);
        git(&self.root, &["remote", "add", "origin", origin.to_str().unwrap()]);
        git(&self.root, &["push", "--quiet", "origin", "main"]);
        git(&self.root, &["fetch", "--quiet", "origin"]);
        self
    }

    /// Create `branch` on the remote only, from the current HEAD.
    pub fn push_remote_only_branch(&self, branch: &str) {
        git(&self.root, &["push", "--quiet", "origin", &format!("HEAD:refs/heads/{branch}")]);
        git(&self.root, &["fetch", "--quiet", "origin"]);
    }

    pub fn git_cmd(&self) -> GitCommand {
        GitCommand::new(true).in_dir(&self.root)
    }

    /// Run `git gtr <args>` in-process from `dir`.
    pub fn run_in(&self, dir: &Path, args: &[&str]) -> (anyhow::Result<()>, TestOutput) {
        let argv = std::iter::once("git-gtr").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).expect("arguments should parse");
        let mut output = TestOutput::verbose();
        let git = GitCommand::new(true).in_dir(dir);
        let result = cli.command.run(&git, &mut output);
        (result, output)
    }

    pub fn run(&self, args: &[&str]) -> (anyhow::Result<()>, TestOutput) {
        self.run_in(&self.root, args)
    }
}
