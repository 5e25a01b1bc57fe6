// src/filtering/ignore_file.rs

//! Reads `.gitignore`-style files into plain exclude globs.
//!
//! Only the subset of gitignore syntax that maps onto globs is honored:
//! negations (`!pattern`) are skipped, anchoring `/` is dropped and unanchored
//! names are made to apply at any depth.

use crate::constants::IGNORE_FILE_NAMES;
use crate::errors::{io_error_with_path, Result};
use log::{debug, trace};
use std::fs;
use std::path::Path;

/// Patterns excluded from every ingestion.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    ".bzr",
    ".gitmodules",
    // Python
    "*.pyc",
    "*.pyo",
    "*.pyd",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
    ".tox",
    ".venv",
    "venv",
    "*.egg-info",
    // JavaScript
    "node_modules",
    "bower_components",
    ".npm",
    ".yarn",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    // Rust
    "target",
    "Cargo.lock",
    // Java / JVM
    "*.class",
    "*.jar",
    ".gradle",
    // Native build artifacts
    "*.o",
    "*.obj",
    "*.so",
    "*.dll",
    "*.dylib",
    "*.exe",
    "*.a",
    "*.lib",
    // Editors & OS
    ".idea",
    ".vscode",
    "*.swp",
    "*.swo",
    ".DS_Store",
    "Thumbs.db",
    // Build output & caches
    "build",
    "dist",
    ".cache",
    ".next",
    ".terraform",
    "coverage",
    // Logs and temporary files
    "*.log",
    "*.tmp",
    // Output of this tool
    "digest.txt",
];

/// Converts one ignore-file line into zero or more glob patterns.
///
/// ```
/// use repodigest::filtering::expand_ignore_line;
///
/// assert_eq!(expand_ignore_line("*.log"), vec!["*.log", "**/*.log"]);
/// assert_eq!(expand_ignore_line("/build/"), vec!["build"]);
/// assert_eq!(expand_ignore_line("docs/tmp"), vec!["docs/tmp"]);
/// assert!(expand_ignore_line("# comment").is_empty());
/// assert!(expand_ignore_line("!keep.me").is_empty());
/// ```
pub fn expand_ignore_line(line: &str) -> Vec<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
        return Vec::new();
    }

    let anchored = line.starts_with('/');
    let pattern = line.trim_start_matches('/').trim_end_matches('/');
    if pattern.is_empty() {
        return Vec::new();
    }

    if anchored || pattern.contains('/') || pattern.starts_with("**") {
        vec![pattern.to_string()]
    } else {
        vec![pattern.to_string(), format!("**/{pattern}")]
    }
}

/// Expands [`DEFAULT_IGNORE_PATTERNS`] so each applies at any depth.
pub fn default_ignore_patterns() -> Vec<String> {
    DEFAULT_IGNORE_PATTERNS
        .iter()
        .flat_map(|p| expand_ignore_line(p))
        .collect()
}

/// Loads the ignore files found directly in `root`.
///
/// Missing files are not an error.
///
/// # Errors
/// Returns an I/O error if an ignore file exists but cannot be read.
pub fn load_ignore_patterns(root: &Path) -> Result<Vec<String>> {
    let mut patterns = Vec::new();
    for name in IGNORE_FILE_NAMES {
        let path = root.join(name);
        if !path.is_file() {
            trace!("No ignore file at {}", path.display());
            continue;
        }
        let text = fs::read_to_string(&path).map_err(|e| io_error_with_path(e, &path))?;
        let before = patterns.len();
        patterns.extend(text.lines().flat_map(expand_ignore_line));
        debug!(
            "Loaded {} ignore patterns from {}",
            patterns.len() - before,
            path.display()
        );
    }
    Ok(patterns)
}
