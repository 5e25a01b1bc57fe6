// src/config/source.rs

//! Resolves the user's source argument into a local path or a remote
//! repository reference.

use crate::errors::ConfigError;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use url::Url;

/// Forge hosts that may be given without a scheme (`github.com/owner/repo`).
pub const KNOWN_HOSTS: &[&str] = &[
    "github.com",
    "gitlab.com",
    "bitbucket.org",
    "codeberg.org",
    "gitea.com",
];

static COMMIT_HASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{40}$").unwrap());

/// True for a full 40-character hexadecimal commit hash.
///
/// # Examples
/// ```
/// use repodigest::config::is_commit_hash;
///
/// assert!(is_commit_hash("0123456789abcdef0123456789abcdef01234567"));
/// assert!(!is_commit_hash("main"));
/// assert!(!is_commit_hash("0123456"));
/// ```
pub fn is_commit_hash(candidate: &str) -> bool {
    COMMIT_HASH_RE.is_match(candidate)
}

/// A remote repository reference parsed from a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSource {
    /// Clone URL without any `/tree/...` or `/blob/...` suffix.
    pub url: String,
    pub host: String,
    pub user_name: String,
    pub repo_name: String,
    /// Branch named in the URL, if any.
    pub branch: Option<String>,
    /// Commit named in the URL, if any.
    pub commit: Option<String>,
    /// Path inside the repository, `/` for the root.
    pub subpath: String,
    /// The URL pointed at a single file (`/blob/`).
    pub is_blob: bool,
}

impl RemoteSource {
    /// `owner-repo`.
    pub fn slug(&self) -> String {
        format!("{}-{}", self.user_name, self.repo_name)
    }
}

/// What a source argument resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ResolvedSource {
    Local(PathBuf),
    Remote(RemoteSource),
}

/// Resolves `input`: an existing path wins, then URLs and bare forge paths.
pub(crate) fn resolve_source(input: &str) -> Result<ResolvedSource, ConfigError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingValue("source".to_string()));
    }
    let path = Path::new(trimmed);
    if path.exists() {
        let canonical = path
            .canonicalize()
            .map_err(|e| ConfigError::InvalidSource(format!("{trimmed}: {e}")))?;
        debug!("Source resolved to local path {}", canonical.display());
        return Ok(ResolvedSource::Local(canonical));
    }
    parse_remote_url(trimmed).map(ResolvedSource::Remote)
}

/// Parses a repository URL.
///
/// Accepts `http(s)://host/owner/repo[.git]` and the same without a scheme
/// for [`KNOWN_HOSTS`]. A `/tree/<ref>/<path>` or `/blob/<ref>/<path>`
/// suffix selects a ref and a subpath; a ref of 40 hex characters is taken
/// as a commit. Refs containing `/` are not supported: the first segment
/// after `tree`/`blob` is always the ref.
///
/// # Examples
/// ```
/// use repodigest::config::parse_remote_url;
///
/// let parsed = parse_remote_url("github.com/rust-lang/cargo/tree/master/src/cargo")?;
/// assert_eq!(parsed.url, "https://github.com/rust-lang/cargo");
/// assert_eq!(parsed.branch.as_deref(), Some("master"));
/// assert_eq!(parsed.subpath, "/src/cargo");
/// assert_eq!(parsed.slug(), "rust-lang-cargo");
/// # Ok::<(), repodigest::errors::ConfigError>(())
/// ```
pub fn parse_remote_url(input: &str) -> Result<RemoteSource, ConfigError> {
    let invalid = || ConfigError::InvalidSource(input.to_string());

    let with_scheme = if input.starts_with("https://") || input.starts_with("http://") {
        input.to_string()
    } else {
        let host = input.split('/').next().unwrap_or_default().to_ascii_lowercase();
        if !KNOWN_HOSTS.contains(&host.as_str()) {
            return Err(invalid());
        }
        format!("https://{input}")
    };

    let parsed = Url::parse(&with_scheme).map_err(|_| invalid())?;
    let host = match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host.to_ascii_lowercase(), port),
        (Some(host), None) => host.to_ascii_lowercase(),
        (None, _) => return Err(invalid()),
    };
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();
    if segments.len() < 2 {
        return Err(invalid());
    }

    let user_name = segments[0].to_string();
    let repo_name = segments[1].trim_end_matches(".git").to_string();
    if repo_name.is_empty() {
        return Err(invalid());
    }

    let mut source = RemoteSource {
        url: format!("{}://{}/{}/{}", parsed.scheme(), host, user_name, repo_name),
        host,
        user_name,
        repo_name,
        branch: None,
        commit: None,
        subpath: "/".to_string(),
        is_blob: false,
    };

    // GitLab puts a `-` segment before `tree`/`blob`.
    let mut rest = &segments[2..];
    if rest.first() == Some(&"-") {
        rest = &rest[1..];
    }
    match rest {
        [kind @ ("tree" | "blob"), reference, path @ ..] => {
            if is_commit_hash(reference) {
                source.commit = Some(reference.to_ascii_lowercase());
            } else {
                source.branch = Some((*reference).to_string());
            }
            if !path.is_empty() {
                source.subpath = format!("/{}", path.join("/"));
            }
            source.is_blob = *kind == "blob";
        }
        [] => {}
        other => debug!("Ignoring unrecognised URL path suffix: {}", other.join("/")),
    }
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_plain_and_bare_urls() -> anyhow::Result<()> {
        let full = parse_remote_url("https://github.com/user/repo.git")?;
        assert_eq!(full.url, "https://github.com/user/repo");
        assert_eq!(full.host, "github.com");
        assert_eq!(full.subpath, "/");
        assert!(full.branch.is_none() && full.commit.is_none() && !full.is_blob);

        let bare = parse_remote_url("gitlab.com/group/project")?;
        assert_eq!(bare.url, "https://gitlab.com/group/project");
        assert_eq!(bare.slug(), "group-project");
        Ok(())
    }

    #[test]
    fn test_parse_tree_and_blob_urls() -> anyhow::Result<()> {
        let tree = parse_remote_url("https://github.com/o/r/tree/dev/src/docs/")?;
        assert_eq!(tree.branch.as_deref(), Some("dev"));
        assert_eq!(tree.subpath, "/src/docs");
        assert!(!tree.is_blob);

        let commit = "0123456789abcdef0123456789abcdef01234567";
        let blob = parse_remote_url(&format!("https://github.com/o/r/blob/{commit}/src/main.rs"))?;
        assert_eq!(blob.commit.as_deref(), Some(commit));
        assert!(blob.branch.is_none());
        assert_eq!(blob.subpath, "/src/main.rs");
        assert!(blob.is_blob);

        let gitlab = parse_remote_url("https://gitlab.com/g/p/-/tree/main/lib")?;
        assert_eq!(gitlab.branch.as_deref(), Some("main"));
        assert_eq!(gitlab.subpath, "/lib");
        Ok(())
    }

    #[test]
    fn test_unrecognised_sources_are_rejected() {
        assert!(matches!(
            parse_remote_url("example.org/a/b"),
            Err(ConfigError::InvalidSource(_))
        ));
        assert!(parse_remote_url("https://github.com/only-owner").is_err());
        assert!(matches!(
            resolve_source("definitely/not/a/path/or/url"),
            Err(ConfigError::InvalidSource(_))
        ));
        assert!(matches!(resolve_source("  "), Err(ConfigError::MissingValue(_))));
    }

    #[test]
    fn test_existing_path_is_local() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let resolved = resolve_source(&temp.path().to_string_lossy())?;
        assert_eq!(resolved, ResolvedSource::Local(temp.path().canonicalize()?));
        Ok(())
    }
}
