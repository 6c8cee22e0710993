use super::GitCommand;
use anyhow::Result;

impl GitCommand {
    /// Create `branch` tracking `upstream` (e.g. `origin/feature`).
    pub fn branch_track(&self, branch: &str, upstream: &str) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["branch", "--track", branch, upstream]);

        let output = self.output(&mut cmd, "branch")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git branch --track failed: {}", stderr.trim());
        }

        Ok(())
    }

    pub fn branch_delete(&self, branch: &str, force: bool) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["branch"]);

        if force {
            cmd.arg("-D");
        } else {
            cmd.arg("-d");
        }

        cmd.arg(branch);

        let output = self.output(&mut cmd, "branch")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git branch delete failed: {}", stderr.trim());
        }

        Ok(())
    }
}
