use super::GitCommand;
use anyhow::Result;

impl GitCommand {
    pub fn fetch(&self, remote: &str) -> Result<()> {
        let mut cmd = self.command();
        cmd.args(["fetch", remote]);

        if self.quiet {
            cmd.arg("--quiet");
        }

        let output = self.output(&mut cmd, "fetch")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git fetch failed: {}", stderr.trim());
        }

        Ok(())
    }
}
