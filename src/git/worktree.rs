use super::GitCommand;
use anyhow::{Context, Result};
use std::path::Path;

impl GitCommand {
    /// Add a worktree at `path` checking out an existing branch.
    pub fn worktree_add(&self, path: &Path, branch: &str, force: bool) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["worktree", "add"]);

        if self.quiet {
            cmd.arg("--quiet");
        }
        if force {
            cmd.arg("--force");
        }

        cmd.arg(path).arg(branch);

        let output = self.output(&mut cmd, "worktree add")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git worktree add failed: {}", stderr.trim());
        }

        Ok(())
    }

    /// Add a worktree at `path` on a brand-new branch starting at `start_point`.
    pub fn worktree_add_new_branch(
        &self,
        path: &Path,
        new_branch: &str,
        start_point: &str,
        track: bool,
        force: bool,
    ) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["worktree", "add"]);

        if self.quiet {
            cmd.arg("--quiet");
        }
        if force {
            cmd.arg("--force");
        }
        if track {
            cmd.arg("--track");
        } else {
            cmd.arg("--no-track");
        }

        cmd.arg("-b").arg(new_branch).arg(path).arg(start_point);

        let output = self.output(&mut cmd, "worktree add")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git worktree add failed: {}", stderr.trim());
        }

        Ok(())
    }

    pub fn worktree_remove(&self, path: &Path, force: bool) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["worktree", "remove"]);

        if force {
            cmd.arg("--force");
        }

        cmd.arg(path);

        let output = self.output(&mut cmd, "worktree remove")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git worktree remove failed: {}", stderr.trim());
        }

        Ok(())
    }

    pub fn worktree_prune(&self) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["worktree", "prune"]);

        let output = self.output(&mut cmd, "worktree prune")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git worktree prune failed: {}", stderr.trim());
        }

        Ok(())
    }

    pub fn worktree_list_porcelain(&self) -> Result<String> {
        let mut cmd = self.command();
        cmd.args(["worktree", "list", "--porcelain"]);

        let output = self.output(&mut cmd, "worktree list")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git worktree list failed: {}", stderr.trim());
        }

        String::from_utf8(output.stdout).context("Failed to parse git worktree list output")
    }
}
