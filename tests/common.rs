// tests/common.rs

use std::fs;
use std::path::Path;
use std::process::Command;

// Helper function to get the binary command
#[allow(dead_code)] // This is used by the CLI tests, but not the library ones.
pub fn repodigest_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repodigest"));
    // Keep a developer's token out of the probe.
    cmd.env_remove("GITHUB_TOKEN");
    cmd
}

/// Writes `content` at `relative` under `root`, creating parent directories.
#[allow(dead_code)]
pub fn create_file(root: &Path, relative: &str, content: &str) -> std::io::Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
