//! `repodigest` is a library and command-line tool that turns a source tree
//! into a text digest suitable for feeding to a language model.
//!
//! A digest has three parts: a short summary, an ASCII tree of the filtered
//! files and the concatenated file contents, each wrapped in a header. The
//! source is either a local path or a remote repository, which is cloned
//! into a temporary directory that is removed when ingestion finishes.
//!
//! As a library, it provides a staged pipeline:
//! 1.  **Resolve**: build an [`IngestionQuery`] with [`QueryBuilder`].
//! 2.  **Materialize**: clone the requested part of a remote repository ([`git`]).
//! 3.  **Walk**: filter the tree with include/exclude globs ([`tree::build_tree`]).
//! 4.  **Format**: render summary, tree and content ([`output::format`]),
//!     optionally stripping comments ([`processing`]).
//!
//! # Example: Library Usage
//!
//! ```
//! use repodigest::{ingest, CancellationToken, QueryBuilder};
//! use repodigest::progress::NoOpProgress;
//! use std::fs;
//! use tempfile::tempdir;
//!
//! // 1. Set up a temporary directory with some files.
//! let temp_dir = tempdir().unwrap();
//! fs::write(temp_dir.path().join("main.rs"), "fn main() { /* comment */ }\n").unwrap();
//! fs::write(temp_dir.path().join("notes.txt"), "Hello, world!\n").unwrap();
//!
//! // 2. Describe the ingestion.
//! let query = QueryBuilder::new(temp_dir.path().to_string_lossy())
//!     .include_patterns(["*.rs"])
//!     .remove_comments(true)
//!     .build()
//!     .unwrap();
//!
//! // 3. Run it.
//! let digest = ingest(&query, None, &CancellationToken::new(), &NoOpProgress).unwrap();
//!
//! assert!(digest.summary.contains("Files analyzed: 1"));
//! assert!(digest.tree.contains("main.rs"));
//! assert!(digest.content.contains("fn main() {  }"));
//! assert!(!digest.content.contains("notes.txt"));
//! ```

pub mod cancellation;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod filtering;
#[cfg(feature = "git")]
pub mod git;
pub mod output;
pub mod processing;
pub mod progress;
pub mod signal;
pub mod tree;

// Re-export key public types for easier use as a library
pub use cancellation::CancellationToken;
pub use config::{CloneConfig, IngestionQuery, OutputDestination, QueryBuilder};
pub use errors::{Error, Result};
pub use output::Digest;

use crate::filtering::{load_ignore_patterns, PatternSet};
use crate::progress::ProgressReporter;
use log::{debug, info};

/// Produces the digest for `query`.
///
/// Remote sources are cloned with the system `git` into a temporary
/// directory that is removed before this function returns, whether it
/// succeeds or not. `token` is only used to authenticate the clone.
///
/// # Errors
/// Clone failures, pattern-matching invariant violations and I/O errors
/// abort the ingestion. [`Error::NoFilesFound`] is returned when filtering
/// leaves an empty directory.
pub fn ingest(
    query: &IngestionQuery,
    token: Option<&str>,
    cancel: &CancellationToken,
    progress: &dyn ProgressReporter,
) -> Result<Digest> {
    #[cfg(feature = "git")]
    {
        let cloner = git::Cloner::new().timeout(query.clone_timeout);
        ingest_with(query, &cloner, token, cancel, progress)
    }
    #[cfg(not(feature = "git"))]
    {
        let _ = (token, progress);
        if query.is_remote() {
            return Err(errors::ConfigError::InvalidSource(format!(
                "{} (remote sources require the `git` feature)",
                query.source
            ))
            .into());
        }
        ingest_materialized(query.clone(), cancel)
    }
}

/// Like [`ingest`], with a caller-supplied [`git::Cloner`].
///
/// The cloner's own timeout applies, not `query.clone_timeout`.
#[cfg(feature = "git")]
pub fn ingest_with(
    query: &IngestionQuery,
    cloner: &git::Cloner,
    token: Option<&str>,
    cancel: &CancellationToken,
    progress: &dyn ProgressReporter,
) -> Result<Digest> {
    if !query.is_remote() {
        return ingest_materialized(query.clone(), cancel);
    }

    // Dropping the guard removes the clone on every exit path.
    let workdir = tempfile::Builder::new()
        .prefix("repodigest-")
        .tempdir()
        .map_err(|e| errors::io_error_with_path(e, std::env::temp_dir()))?;
    let mut query = query.clone();
    query.materialize_at(workdir.path());

    let clone_config = query.extract_clone_config()?;
    info!("Cloning {} ...", clone_config.url);
    cloner.clone_repo(&clone_config, token, cancel, progress)?;

    let digest = ingest_materialized(query, cancel);
    debug!("Removing {}", workdir.path().display());
    digest
}

/// Walks and formats a query whose `local_path` already exists on disk.
fn ingest_materialized(mut query: IngestionQuery, cancel: &CancellationToken) -> Result<Digest> {
    if !query.include_gitignored {
        let ignored = load_ignore_patterns(&query.local_path)?;
        query.exclude_patterns.extend(PatternSet::from_patterns(ignored)?);
    }

    let tree = tree::build_tree(&query, cancel)?;
    if !tree.is_single_file() && tree.is_empty() {
        return Err(Error::NoFilesFound);
    }
    Ok(output::format(&tree, &query))
}

/// Runs [`ingest`] and writes `"{tree}\n{content}"` to `query.output`, if set.
///
/// # Errors
/// Any ingestion error, or an I/O error while writing.
pub fn run(
    query: &IngestionQuery,
    token: Option<&str>,
    cancel: &CancellationToken,
    progress: &dyn ProgressReporter,
) -> Result<Digest> {
    let digest = ingest(query, token, cancel, progress)?;
    if let Some(destination) = &query.output {
        output::write_digest(&digest, destination)?;
    }
    Ok(digest)
}
