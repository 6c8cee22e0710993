use super::GitCommand;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::Path;

use crate::log_debug;

/// Which `git config` file a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigTarget<'a> {
    Local,
    Global,
    System,
    File(&'a Path),
}

impl ConfigTarget<'_> {
    fn args(&self) -> Vec<OsString> {
        match self {
            ConfigTarget::Local => vec!["--local".into()],
            ConfigTarget::Global => vec!["--global".into()],
            ConfigTarget::System => vec!["--system".into()],
            ConfigTarget::File(path) => vec!["--file".into(), path.as_os_str().to_owned()],
        }
    }
}

/// Exit status `git config` uses when the key (or section) is absent.
const EXIT_KEY_MISSING: i32 = 1;

/// Exit status `git config --unset-all` uses when nothing matched.
const EXIT_NOTHING_TO_UNSET: i32 = 5;

impl GitCommand {
    /// Every value of `key` in one config file, in file order.
    ///
    /// A missing key, missing file or unreadable scope yields an empty list;
    /// only a failure to spawn git is an error.
    pub fn config_get_all(&self, target: ConfigTarget<'_>, key: &str) -> Result<Vec<String>> {
        let mut cmd = self.command();
        cmd.arg("config").args(target.args());
        cmd.args(["--null", "--get-all", key]);

        let output = self.output(&mut cmd, "config --get-all")?;

        if !output.status.success() {
            if output.status.code() != Some(EXIT_KEY_MISSING) {
                log_debug!(
                    "git config --get-all {key} failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                );
            }
            return Ok(Vec::new());
        }

        let stdout = String::from_utf8(output.stdout).context("Failed to parse git config output")?;
        Ok(parse_null_values(&stdout))
    }

    /// Every `(key, value)` pair in one config file, in file order.
    pub fn config_list(&self, target: ConfigTarget<'_>) -> Result<Vec<(String, String)>> {
        let mut cmd = self.command();
        cmd.arg("config").args(target.args());
        cmd.args(["--null", "--list"]);

        let output = self.output(&mut cmd, "config --list")?;

        if !output.status.success() {
            log_debug!(
                "git config --list failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(Vec::new());
        }

        let stdout = String::from_utf8(output.stdout).context("Failed to parse git config output")?;
        Ok(parse_null_entries(&stdout))
    }

    /// Set `key` to exactly one value, replacing any existing values.
    pub fn config_set(&self, target: ConfigTarget<'_>, key: &str, value: &str) -> Result<()> {
        let mut cmd = self.command();
        cmd.arg("config").args(target.args());
        cmd.args(["--replace-all", key, value]);

        let output = self.output(&mut cmd, "config")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git config failed: {}", stderr.trim());
        }

        Ok(())
    }

    /// Append a value to a multi-valued key.
    pub fn config_add(&self, target: ConfigTarget<'_>, key: &str, value: &str) -> Result<()> {
        let mut cmd = self.command();
        cmd.arg("config").args(target.args());
        cmd.args(["--add", key, value]);

        let output = self.output(&mut cmd, "config --add")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git config --add failed: {}", stderr.trim());
        }

        Ok(())
    }

    /// Remove every value of `key`. Removing an absent key is not an error.
    pub fn config_unset_all(&self, target: ConfigTarget<'_>, key: &str) -> Result<()> {
        if let ConfigTarget::File(path) = target {
            if !path.exists() {
                return Ok(());
            }
        }

        let mut cmd = self.command();
        cmd.arg("config").args(target.args());
        cmd.args(["--unset-all", key]);

        let output = self.output(&mut cmd, "config --unset-all")?;

        if !output.status.success() && output.status.code() != Some(EXIT_NOTHING_TO_UNSET) {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git config --unset-all failed: {}", stderr.trim());
        }

        Ok(())
    }
}

/// Parse `git config --null --list` output.
///
/// Each entry is `key LF value NUL`. An entry without LF is a key that has
/// no value at all, reported here with an empty value. Splitting on the
/// first LF only means values may themselves contain LF, `=` or spaces.
pub fn parse_null_entries(output: &str) -> Vec<(String, String)> {
    output
        .split('\0')
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('\n') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (entry.to_string(), String::new()),
        })
        .collect()
}

/// Parse `git config --null --get-all` output: one NUL-terminated value per entry.
pub fn parse_null_values(output: &str) -> Vec<String> {
    let mut values: Vec<String> = output.split('\0').map(String::from).collect();
    // The output ends with a terminator, so the final split piece is not a value.
    values.pop();
    values
}
