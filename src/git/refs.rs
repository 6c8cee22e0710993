use super::GitCommand;
use anyhow::{Context, Result};

impl GitCommand {
    pub fn show_ref_exists(&self, ref_name: &str) -> Result<bool> {
        let mut cmd = self.command();
        cmd.args(["show-ref", "--verify", "--quiet", ref_name]);

        let output = self.output(&mut cmd, "show-ref")?;

        Ok(output.status.success())
    }

    pub fn local_branch_exists(&self, branch: &str) -> Result<bool> {
        self.show_ref_exists(&format!("refs/heads/{branch}"))
    }

    pub fn remote_branch_exists(&self, remote: &str, branch: &str) -> Result<bool> {
        self.show_ref_exists(&format!("refs/remotes/{remote}/{branch}"))
    }

    /// `git branch --show-current`. Empty when HEAD is detached, and on git
    /// versions older than 2.22 which do not know the flag.
    pub fn branch_show_current(&self) -> Result<String> {
        let mut cmd = self.command();
        cmd.args(["branch", "--show-current"]);

        let output = self.output(&mut cmd, "branch --show-current")?;

        if !output.status.success() {
            return Ok(String::new());
        }

        String::from_utf8(output.stdout)
            .context("Failed to parse git branch output")
            .map(|s| s.trim().to_string())
    }

    /// `git rev-parse --abbrev-ref HEAD`, which prints the literal `HEAD`
    /// when detached.
    pub fn rev_parse_abbrev_head(&self) -> Result<String> {
        let mut cmd = self.command();
        cmd.args(["rev-parse", "--abbrev-ref", "HEAD"]);

        let output = self.output(&mut cmd, "rev-parse")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git rev-parse failed: {}", stderr.trim());
        }

        String::from_utf8(output.stdout)
            .context("Failed to parse git rev-parse output")
            .map(|s| s.trim().to_string())
    }

    /// Resolve a symbolic ref such as `refs/remotes/origin/HEAD`.
    /// Returns `None` when the ref does not exist or is not symbolic.
    pub fn symbolic_ref(&self, name: &str) -> Result<Option<String>> {
        let mut cmd = self.command();
        cmd.args(["symbolic-ref", "--quiet", name]);

        let output = self.output(&mut cmd, "symbolic-ref")?;

        if !output.status.success() {
            return Ok(None);
        }

        let target = String::from_utf8(output.stdout)
            .context("Failed to parse git symbolic-ref output")?
            .trim()
            .to_string();

        Ok(if target.is_empty() { None } else { Some(target) })
    }

    /// Get the Git common directory path, as git prints it (may be relative
    /// to the working directory).
    pub fn rev_parse_git_common_dir(&self) -> Result<String> {
        let mut cmd = self.command();
        cmd.args(["rev-parse", "--git-common-dir"]);

        let output = self.output(&mut cmd, "rev-parse")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git rev-parse failed: {}", stderr.trim());
        }

        String::from_utf8(output.stdout)
            .context("Failed to parse git rev-parse output")
            .map(|s| s.trim().to_string())
    }

    pub fn rev_parse_show_toplevel(&self) -> Result<String> {
        let mut cmd = self.command();
        cmd.args(["rev-parse", "--show-toplevel"]);

        let output = self.output(&mut cmd, "rev-parse")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git rev-parse failed: {}", stderr.trim());
        }

        String::from_utf8(output.stdout)
            .context("Failed to parse git rev-parse output")
            .map(|s| s.trim().to_string())
    }
}
