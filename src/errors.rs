//! Defines application-specific error types.
//!
//! This module provides the `Error` enum, which categorizes the failures that
//! abort an ingestion: clone-layer failures, pattern-matching invariant
//! violations, configuration problems and I/O. Per-file degradations (comment
//! stripping, token estimation) are not errors and never reach this type.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while building an [`IngestionQuery`](crate::config::IngestionQuery)
/// from user-facing parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A parameter had a value that could not be parsed or is out of range.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue {
        /// The name of the offending parameter.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The source is neither an existing local path nor a recognizable remote URL.
    #[error("Invalid source '{0}': expected an existing path or a repository URL")]
    InvalidSource(String),

    /// A required parameter was not provided.
    #[error("Missing required value: {0}")]
    MissingValue(String),
}

/// Application-specific errors used throughout `repodigest`.
#[derive(Error, Debug)]
pub enum Error {
    // --- Clone errors ---
    /// The remote existence probe answered with a non-success status.
    #[error("Repository not found: {url}")]
    RepositoryNotFound {
        /// The URL that was probed.
        url: String,
    },

    /// A bounded operation exceeded its deadline.
    #[error("Operation timed out after {deadline:?}: {command}")]
    Timeout {
        /// The command that was running, with credentials redacted.
        command: String,
        /// The deadline that was exceeded.
        deadline: Duration,
    },

    /// A git command exited with a non-zero status.
    #[error("Command failed: {command}\nError: {stderr}")]
    CommandFailed {
        /// The command that failed, with credentials redacted.
        command: String,
        /// The captured standard error output.
        stderr: String,
    },

    /// The `git` executable could not be spawned.
    #[error("git is not installed or not on PATH")]
    GitNotInstalled,

    // --- Matching errors ---
    /// A directory deeper than a non-recursive include pattern reached the matcher.
    #[error(
        "Directory '{dir}' has {dir_segments} segments but pattern '{pattern}' only has {pattern_segments}; it should have been pruned by its parent"
    )]
    TraversalInvariant {
        /// The relative directory path.
        dir: String,
        /// Segment count of the directory path.
        dir_segments: usize,
        /// The non-recursive include pattern.
        pattern: String,
        /// Segment count of the pattern.
        pattern_segments: usize,
    },

    /// A pattern could not be compiled as a glob.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The raw pattern.
        pattern: String,
        /// The glob compiler's message.
        reason: String,
    },

    // --- Configuration errors ---
    /// Invalid user-supplied parameters.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    // --- I/O Errors ---
    /// Error occurring during file or directory access (read, write, metadata).
    #[error("I/O error accessing path '{path}': {source}")]
    Io {
        /// The path that caused the I/O error.
        path: String,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },

    // --- Signal Handling ---
    /// The operation was cancelled by the user (e.g., Ctrl+C).
    #[error("Operation cancelled by user (Ctrl+C)")]
    Interrupted,

    /// Filtering left nothing to ingest.
    #[error("No files found matching the specified criteria.")]
    NoFilesFound,
}

impl Error {
    /// Builds a [`Error::Timeout`] from the elapsed deadline.
    pub(crate) fn timeout(command: impl Into<String>, deadline: Duration) -> Self {
        Error::Timeout {
            command: command.into(),
            deadline,
        }
    }
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Helper function to create an `Error::Io` with path context.
///
/// # Arguments
/// * `source` - The original `std::io::Error`.
/// * `path` - The path associated with the error.
pub fn io_error_with_path<P: AsRef<std::path::Path>>(source: std::io::Error, path: P) -> Error {
    Error::Io {
        path: path.as_ref().display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{io, path::PathBuf};

    #[test]
    fn test_io_error_with_path_helper() {
        let path = PathBuf::from("some/test/path.txt");
        let source_error = io::Error::new(io::ErrorKind::NotFound, "File not found");

        match io_error_with_path(source_error, &path) {
            Error::Io {
                path: error_path,
                source,
            } => {
                assert!(error_path.contains("some/test/path.txt"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("Expected Error::Io, got {other:?}"),
        }
    }

    #[test]
    fn test_timeout_is_distinct_from_command_failure() {
        let timeout = Error::timeout("git clone", Duration::from_secs(60));
        assert!(timeout.to_string().starts_with("Operation timed out after 60s: git clone"));

        let short = Error::timeout("git clone", Duration::from_millis(500));
        assert!(short.to_string().starts_with("Operation timed out after 500ms"));

        let failed = Error::CommandFailed {
            command: "git clone".into(),
            stderr: "fatal: boom".into(),
        };
        assert!(failed.to_string().contains("Error: fatal: boom"));
        assert!(!failed.to_string().contains("timed out"));
    }

    #[test]
    fn test_config_error_converts() {
        let err: Error = ConfigError::MissingValue("source".into()).into();
        assert!(matches!(err, Error::Config(ConfigError::MissingValue(_))));
        assert_eq!(
            err.to_string(),
            "Invalid configuration: Missing required value: source"
        );
    }
}
