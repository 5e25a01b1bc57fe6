// src/config/builder.rs

use super::parsing::{
    normalize_exclude, normalize_include, parse_commit, parse_max_size, split_patterns,
};
use super::source::{resolve_source, RemoteSource, ResolvedSource};
use super::{IngestionQuery, OutputDestination};
use crate::cli::Cli;
use crate::constants::{DEFAULT_CLONE_TIMEOUT, DEFAULT_MAX_FILE_SIZE, DEFAULT_OUTPUT_FILE, STDOUT_MARKER};
use crate::errors::{ConfigError, Result};
use crate::filtering::{default_ignore_patterns, PatternSet};
use crate::processing::{CommentKind, CommentKinds};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A builder for creating an [`IngestionQuery`] programmatically.
///
/// # Examples
///
/// ```no_run
/// use repodigest::config::QueryBuilder;
///
/// let query = QueryBuilder::new("https://github.com/rust-lang/cargo")
///     .branch("master")
///     .include_patterns(["src/**/*.rs"])
///     .exclude_patterns(["tests/"])
///     .max_file_size(512 * 1024)
///     .build()?;
///
/// assert_eq!(query.slug, "rust-lang-cargo");
/// # Ok::<(), repodigest::errors::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    source: String,
    include: Vec<String>,
    exclude: Vec<String>,
    max_file_size: Option<u64>,
    branch: Option<String>,
    tag: Option<String>,
    commit: Option<String>,
    remove_comments: Option<bool>,
    comment_kinds: Option<CommentKinds>,
    include_submodules: Option<bool>,
    include_gitignored: Option<bool>,
    output: Option<OutputDestination>,
    clone_timeout: Option<Duration>,
}

impl QueryBuilder {
    /// Starts a query for a local path or repository URL.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Translates parsed CLI arguments into a builder.
    ///
    /// # Errors
    /// Fails if `--max-size` cannot be parsed.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut builder = Self::new(cli.source.clone())
            .include_patterns(cli.include.iter().cloned())
            .exclude_patterns(cli.exclude.iter().cloned())
            .remove_comments(cli.remove_comments)
            .include_submodules(cli.include_submodules)
            .include_gitignored(cli.include_gitignored)
            .output(match cli.output.as_deref() {
                Some(STDOUT_MARKER) => OutputDestination::Stdout,
                Some(path) => OutputDestination::File(PathBuf::from(path)),
                None => OutputDestination::File(PathBuf::from(DEFAULT_OUTPUT_FILE)),
            });

        if let Some(size) = cli.max_size.as_deref() {
            builder = builder.max_file_size(parse_max_size(size)?);
        }
        if !cli.comment_types.is_empty() {
            builder = builder.comment_kinds(cli.comment_types.iter().copied());
        }
        if let Some(secs) = cli.timeout {
            builder = builder.clone_timeout(Duration::from_secs(secs));
        }
        builder.branch = cli.branch.clone();
        builder.tag = cli.tag.clone();
        builder.commit = cli.commit.clone();
        Ok(builder)
    }

    /// Glob patterns a file must match to be kept. Comma or whitespace
    /// separated lists are split; `dir/` means everything below `dir`.
    pub fn include_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Glob patterns that remove a file or prune a directory.
    pub fn exclude_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Maximum file size in bytes.
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// A full 40-character commit hash, validated in [`build`](Self::build).
    pub fn commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }

    pub fn remove_comments(mut self, remove: bool) -> Self {
        self.remove_comments = Some(remove);
        self
    }

    /// Comment kinds to strip when comment removal is on. Defaults to all.
    pub fn comment_kinds<I>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = CommentKind>,
    {
        self.comment_kinds = Some(kinds.into_iter().collect());
        self
    }

    pub fn include_submodules(mut self, include: bool) -> Self {
        self.include_submodules = Some(include);
        self
    }

    /// Do not read `.gitignore`/`.repodigestignore` from the source.
    pub fn include_gitignored(mut self, include: bool) -> Self {
        self.include_gitignored = Some(include);
        self
    }

    pub fn output(mut self, destination: OutputDestination) -> Self {
        self.output = Some(destination);
        self
    }

    /// Deadline applied to each git command.
    pub fn clone_timeout(mut self, timeout: Duration) -> Self {
        self.clone_timeout = Some(timeout);
        self
    }

    /// Resolves the source and validates every parameter.
    ///
    /// # Errors
    /// Returns a configuration error for an unknown source or an invalid
    /// commit, and [`Error::InvalidPattern`](crate::errors::Error::InvalidPattern)
    /// for a pattern that is not a valid glob.
    pub fn build(self) -> Result<IngestionQuery> {
        let resolved = resolve_source(&self.source)?;

        let include_patterns = PatternSet::from_patterns(
            split_patterns(&self.include)
                .into_iter()
                .map(normalize_include),
        )?;
        let mut exclude_patterns = PatternSet::from_patterns(default_ignore_patterns())?;
        exclude_patterns.extend(PatternSet::from_patterns(
            split_patterns(&self.exclude)
                .into_iter()
                .map(normalize_exclude),
        )?);

        let commit = self.commit.as_deref().map(parse_commit).transpose()?;

        let mut query = IngestionQuery {
            source: self.source.clone(),
            local_path: PathBuf::new(),
            url: None,
            host: None,
            user_name: None,
            repo_name: None,
            slug: String::new(),
            subpath: "/".to_string(),
            is_blob: false,
            branch: None,
            tag: None,
            commit: None,
            include_patterns,
            exclude_patterns,
            max_file_size: self.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE),
            remove_comments: self.remove_comments.unwrap_or(false),
            comment_kinds: self.comment_kinds.unwrap_or_default(),
            include_submodules: self.include_submodules.unwrap_or(false),
            include_gitignored: self.include_gitignored.unwrap_or(false),
            output: self.output,
            clone_timeout: self.clone_timeout.unwrap_or(DEFAULT_CLONE_TIMEOUT),
        };

        match resolved {
            ResolvedSource::Local(path) => {
                if self.branch.is_some() || self.tag.is_some() || commit.is_some() {
                    warn!("Branch, tag and commit are ignored for local sources");
                }
                apply_local(&mut query, &path)?;
            }
            ResolvedSource::Remote(remote) => {
                let (branch, tag, commit) = resolve_refs(&remote, self.branch, self.tag, commit);
                query.slug = remote.slug();
                query.local_path = PathBuf::from(&query.slug);
                query.url = Some(remote.url);
                query.host = Some(remote.host);
                query.user_name = Some(remote.user_name);
                query.repo_name = Some(remote.repo_name);
                query.subpath = remote.subpath;
                query.is_blob = remote.is_blob;
                query.branch = branch;
                query.tag = tag;
                query.commit = commit;
            }
        }

        debug!(
            "Built query for '{}' (slug '{}', subpath '{}', {} include / {} exclude patterns)",
            query.source,
            query.slug,
            query.subpath,
            query.include_patterns.len(),
            query.exclude_patterns.len()
        );
        Ok(query)
    }
}

/// A local file is ingested from its parent so patterns and headers see its name.
fn apply_local(query: &mut IngestionQuery, path: &Path) -> Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    if path.is_file() {
        let parent = path
            .parent()
            .ok_or_else(|| ConfigError::InvalidSource(path.display().to_string()))?;
        query.local_path = parent.to_path_buf();
        query.subpath = format!("/{name}");
    } else {
        query.local_path = path.to_path_buf();
    }
    query.slug = name;
    Ok(())
}

/// Explicit refs override the ones found in the URL; a tag wins over a branch.
fn resolve_refs(
    remote: &RemoteSource,
    branch: Option<String>,
    tag: Option<String>,
    commit: Option<String>,
) -> (Option<String>, Option<String>, Option<String>) {
    let commit = match (commit, &remote.commit) {
        (Some(explicit), Some(from_url)) if &explicit != from_url => {
            warn!("Commit {explicit} overrides {from_url} from the URL");
            Some(explicit)
        }
        (explicit, from_url) => explicit.or_else(|| from_url.clone()),
    };

    if let Some(tag) = tag {
        if let Some(branch) = branch.as_ref().or(remote.branch.as_ref()) {
            warn!("Both branch '{branch}' and tag '{tag}' given; using the tag");
        }
        return (None, Some(tag), commit);
    }

    let branch = match (branch, &remote.branch) {
        (Some(explicit), Some(from_url)) if &explicit != from_url => {
            warn!("Branch '{explicit}' overrides '{from_url}' from the URL");
            Some(explicit)
        }
        (explicit, from_url) => explicit.or_else(|| from_url.clone()),
    };
    (branch, None, commit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const COMMIT: &str = "0123456789abcdef0123456789abcdef01234567";

    #[test]
    fn test_local_directory_query() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let query = QueryBuilder::new(temp.path().to_string_lossy())
            .include_patterns(["*.rs, docs/"])
            .exclude_patterns(["target/"])
            .build()?;

        let canonical = temp.path().canonicalize()?;
        assert_eq!(query.local_path, canonical);
        assert_eq!(query.walk_root(), canonical);
        assert_eq!(query.subpath, "/");
        assert_eq!(
            query.slug,
            canonical.file_name().unwrap().to_string_lossy()
        );
        let includes: Vec<&str> = query.include_patterns.iter().map(|p| p.as_str()).collect();
        assert_eq!(includes, vec!["*.rs", "docs/**"]);
        assert!(query.exclude_patterns.iter().any(|p| p.as_str() == "target"));
        assert!(query.exclude_patterns.iter().any(|p| p.as_str() == ".git"));
        assert_eq!(query.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(query.comment_kinds, CommentKinds::ALL);
        Ok(())
    }

    #[test]
    fn test_local_file_query_targets_parent() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let file = temp.path().join("notes.md");
        fs::write(&file, "hi")?;
        let query = QueryBuilder::new(file.to_string_lossy()).build()?;
        assert_eq!(query.local_path, temp.path().canonicalize()?);
        assert_eq!(query.subpath, "/notes.md");
        assert_eq!(query.slug, "notes.md");
        assert_eq!(query.walk_root(), file.canonicalize()?);
        Ok(())
    }

    #[test]
    fn test_remote_refs_resolution() -> anyhow::Result<()> {
        let query = QueryBuilder::new("https://github.com/o/r/tree/dev/src")
            .branch("feature")
            .build()?;
        assert_eq!(query.branch.as_deref(), Some("feature"));
        assert_eq!(query.subpath, "/src");
        assert_eq!(query.user_name.as_deref(), Some("o"));

        let tagged = QueryBuilder::new("github.com/o/r/tree/dev")
            .tag("v1.0.0")
            .build()?;
        assert!(tagged.branch.is_none());
        assert_eq!(tagged.tag.as_deref(), Some("v1.0.0"));

        let pinned = QueryBuilder::new("https://github.com/o/r").commit(COMMIT).build()?;
        assert_eq!(pinned.commit.as_deref(), Some(COMMIT));
        assert!(pinned.branch.is_none());
        Ok(())
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let bad_commit = QueryBuilder::new("https://github.com/o/r").commit("abc").build();
        assert!(matches!(
            bad_commit,
            Err(Error::Config(ConfigError::InvalidValue { .. }))
        ));

        let bad_pattern = QueryBuilder::new("https://github.com/o/r")
            .include_patterns(["src/[unclosed"])
            .build();
        assert!(matches!(bad_pattern, Err(Error::InvalidPattern { .. })));

        let bad_source = QueryBuilder::new("not-a-source").build();
        assert!(matches!(
            bad_source,
            Err(Error::Config(ConfigError::InvalidSource(_)))
        ));
    }

    #[test]
    fn test_from_cli() -> anyhow::Result<()> {
        let cli = Cli::parse_from([
            "repodigest",
            "github.com/o/r",
            "-s",
            "1KiB",
            "-i",
            "*.py",
            "--remove-comments",
            "--comment-types",
            "documentation",
            "-o",
            "-",
            "--timeout",
            "5",
        ]);
        let query = QueryBuilder::from_cli(&cli)?.build()?;
        assert_eq!(query.max_file_size, 1024);
        assert!(query.remove_comments);
        assert_eq!(
            query.comment_kinds,
            CommentKinds::only(CommentKind::Documentation)
        );
        assert_eq!(query.output, Some(OutputDestination::Stdout));
        assert_eq!(query.clone_timeout, Duration::from_secs(5));

        let defaults = QueryBuilder::from_cli(&Cli::parse_from(["repodigest", "github.com/o/r"]))?
            .build()?;
        assert_eq!(
            defaults.output,
            Some(OutputDestination::File(PathBuf::from("digest.txt")))
        );
        Ok(())
    }
}
