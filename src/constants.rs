// src/constants.rs

use std::time::Duration;

/// Separator line wrapped around every file header in the content section.
pub const SEPARATOR: &str = "================================================";

/// First line of the tree section.
pub const TREE_HEADER: &str = "Directory structure:\n";

/// Body used for files with no bytes.
pub const EMPTY_FILE_MARKER: &str = "[Empty file]";

/// Body used for files detected as non-text.
pub const BINARY_FILE_MARKER: &str = "[Binary file]";

/// Body used when a file could not be read.
pub const READ_ERROR_MARKER: &str = "Error reading file";

/// Default output file name when none is given.
pub const DEFAULT_OUTPUT_FILE: &str = "digest.txt";

/// Output destination meaning "standard output".
pub const STDOUT_MARKER: &str = "-";

/// Files larger than this are skipped unless overridden.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum directory depth the walker descends.
pub const MAX_DIRECTORY_DEPTH: usize = 20;

/// Maximum number of files collected before the walk stops.
pub const MAX_FILES: usize = 10_000;

/// Maximum total bytes of file content collected before the walk stops.
pub const MAX_TOTAL_SIZE_BYTES: u64 = 500 * 1024 * 1024;

/// Bytes inspected when classifying a file as text or binary.
pub const TEXT_DETECTION_CHUNK: usize = 1024;

/// Deadline applied to each git subprocess.
pub const DEFAULT_CLONE_TIMEOUT: Duration = Duration::from_secs(60);

/// Deadline applied to the repository existence probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Branch names left out of the summary.
pub const DEFAULT_BRANCH_NAMES: &[&str] = &["main", "master"];

/// Ignore files read from the ingestion root.
pub const IGNORE_FILE_NAMES: &[&str] = &[".gitignore", ".repodigestignore"];
