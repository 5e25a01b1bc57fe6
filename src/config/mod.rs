// src/config/mod.rs

//! Defines the resolved parameters of one ingestion.
//!
//! An [`IngestionQuery`] is produced by [`QueryBuilder`] from user-facing
//! parameters (CLI flags or programmatic setters). For remote sources it
//! also yields the [`CloneConfig`] consumed by the clone orchestrator.

use crate::errors::{ConfigError, Result};
use crate::filtering::PatternSet;
use crate::processing::CommentKinds;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use builder::QueryBuilder;
pub use source::{is_commit_hash, parse_remote_url, RemoteSource, KNOWN_HOSTS};

mod builder;
mod parsing;
mod source;

/// Represents the destination for the rendered digest.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum OutputDestination {
    /// Write to standard output.
    Stdout,
    /// Write to the specified file path.
    File(PathBuf),
}

/// Immutable description of one clone request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneConfig {
    pub url: String,
    /// Directory the repository is cloned into.
    pub local_path: PathBuf,
    /// Full 40-character hash; takes precedence over `branch` and `tag`.
    pub commit: Option<String>,
    pub branch: Option<String>,
    pub tag: Option<String>,
    /// Sparse-checkout path, `/` for the whole repository.
    pub subpath: String,
    pub include_submodules: bool,
    /// The target is a single file; sparse checkout covers its directory.
    pub blob: bool,
}

impl CloneConfig {
    /// A minimal config with only a URL and a destination.
    pub fn new(url: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            local_path: local_path.into(),
            commit: None,
            branch: None,
            tag: None,
            subpath: "/".to_string(),
            include_submodules: false,
            blob: false,
        }
    }

    /// True when only part of the repository is requested.
    pub fn is_sparse(&self) -> bool {
        self.subpath.trim_matches('/') != ""
    }

    /// The path passed to `sparse-checkout set`, without a leading `/`.
    pub fn sparse_path(&self) -> String {
        self.subpath.trim_matches('/').to_string()
    }
}

/// The resolved parameters driving one ingestion.
///
/// Include and exclude sets are evaluated independently: an entry is kept
/// iff (no include patterns OR it matches one) AND it matches no exclude
/// pattern.
#[derive(Debug, Clone)]
pub struct IngestionQuery {
    /// The source argument as given.
    pub source: String,
    /// Root that patterns are relative to. For remote sources this is the
    /// clone directory, assigned by [`IngestionQuery::materialize_at`].
    pub local_path: PathBuf,
    /// Clone URL for remote sources.
    pub url: Option<String>,
    pub host: Option<String>,
    pub user_name: Option<String>,
    pub repo_name: Option<String>,
    /// Short identifier: `owner-repo` or the local directory name.
    pub slug: String,
    /// Path below `local_path` to ingest, `/` for the root.
    pub subpath: String,
    /// The target is a single file inside a repository.
    pub is_blob: bool,
    pub branch: Option<String>,
    pub tag: Option<String>,
    pub commit: Option<String>,
    pub include_patterns: PatternSet,
    /// User excludes merged with the defaults and, once loaded, ignore files.
    pub exclude_patterns: PatternSet,
    /// Files larger than this many bytes are skipped.
    pub max_file_size: u64,
    pub remove_comments: bool,
    pub comment_kinds: CommentKinds,
    pub include_submodules: bool,
    /// Skip loading `.gitignore` and `.repodigestignore`.
    pub include_gitignored: bool,
    /// Where [`crate::run`] writes the digest; `None` writes nothing.
    pub output: Option<OutputDestination>,
    /// Deadline for each git command.
    pub clone_timeout: Duration,
}

impl IngestionQuery {
    pub fn is_remote(&self) -> bool {
        self.url.is_some()
    }

    /// The directory or file the walk starts at.
    pub fn walk_root(&self) -> PathBuf {
        let relative = self.subpath.trim_matches('/');
        if relative.is_empty() {
            self.local_path.clone()
        } else {
            self.local_path.join(relative)
        }
    }

    /// Points a remote query at its clone directory, `<dir>/<slug>`.
    pub fn materialize_at(&mut self, dir: &Path) {
        self.local_path = dir.join(&self.slug);
    }

    /// Branch shown in the summary: only one that is not a default name.
    pub fn display_branch(&self) -> Option<&str> {
        self.branch
            .as_deref()
            .filter(|b| {
                !crate::constants::DEFAULT_BRANCH_NAMES.contains(&b.to_ascii_lowercase().as_str())
            })
    }

    /// Builds the clone request for a remote query.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingValue`] for local queries.
    pub fn extract_clone_config(&self) -> Result<CloneConfig> {
        let url = self
            .url
            .clone()
            .ok_or_else(|| ConfigError::MissingValue("repository URL".to_string()))?;

        let subpath = if self.is_blob {
            parent_subpath(&self.subpath)
        } else {
            self.subpath.clone()
        };

        Ok(CloneConfig {
            url,
            local_path: self.local_path.clone(),
            commit: self.commit.clone(),
            branch: self.branch.clone(),
            tag: self.tag.clone(),
            subpath,
            include_submodules: self.include_submodules,
            blob: self.is_blob,
        })
    }
}

/// `/a/b/file.rs` becomes `/a/b`; a top-level file yields `/`.
fn parent_subpath(subpath: &str) -> String {
    match subpath.trim_end_matches('/').rsplit_once('/') {
        Some((parent, _)) if !parent.is_empty() => parent.to_string(),
        _ => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_subpath() {
        assert_eq!(parent_subpath("/src/lib/mod.rs"), "/src/lib");
        assert_eq!(parent_subpath("/README.md"), "/");
        assert_eq!(parent_subpath("/"), "/");
    }

    #[test]
    fn test_clone_config_sparse() {
        let mut config = CloneConfig::new("https://github.com/o/r", "/tmp/o-r");
        assert!(!config.is_sparse());
        config.subpath = "/src/docs/".to_string();
        assert!(config.is_sparse());
        assert_eq!(config.sparse_path(), "src/docs");
    }

    #[test]
    fn test_remote_query_clone_config() -> anyhow::Result<()> {
        let mut query =
            QueryBuilder::new("https://github.com/o/r/blob/dev/src/main.rs").build()?;
        assert!(query.is_remote());
        query.materialize_at(Path::new("/tmp/work"));
        assert_eq!(query.local_path, PathBuf::from("/tmp/work/o-r"));
        assert_eq!(query.walk_root(), PathBuf::from("/tmp/work/o-r/src/main.rs"));

        let clone = query.extract_clone_config()?;
        assert_eq!(clone.url, "https://github.com/o/r");
        assert_eq!(clone.branch.as_deref(), Some("dev"));
        assert_eq!(clone.subpath, "/src");
        assert!(clone.blob);
        Ok(())
    }

    #[test]
    fn test_local_query_has_no_clone_config() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let query = QueryBuilder::new(temp.path().to_string_lossy()).build()?;
        assert!(!query.is_remote());
        assert!(query.extract_clone_config().is_err());
        Ok(())
    }
}
