// src/git/probe.rs

//! Checks that a remote repository exists before cloning it.

use super::auth::is_github_host;
use crate::constants::PROBE_TIMEOUT;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::redirect::Policy;
use std::time::Duration;
use url::Url;

/// Answers whether a repository URL points at something clonable.
pub trait RepoProbe: Send + Sync {
    fn exists(&self, url: &str, token: Option<&str>) -> bool;
}

/// Probes with an HTTP `HEAD` request. Redirects are not followed and count
/// as "not found", as do transport errors.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    timeout: Duration,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self {
            timeout: PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl RepoProbe for HttpProbe {
    fn exists(&self, url: &str, token: Option<&str>) -> bool {
        let client = match Client::builder()
            .redirect(Policy::none())
            .timeout(self.timeout)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                log::warn!("Could not build HTTP client for existence check: {}", e);
                return false;
            }
        };

        let authenticated = token
            .filter(|t| !t.is_empty())
            .and_then(|t| github_api_url(url).map(|api| (api, t)));
        let (target, bearer) = match authenticated {
            Some((api, token)) => (api, Some(token)),
            None => (url.to_string(), None),
        };

        let mut request = client
            .head(&target)
            .header(USER_AGENT, concat!("repodigest/", env!("CARGO_PKG_VERSION")));
        if let Some(token) = bearer {
            request = request
                .header(ACCEPT, "application/vnd.github+json")
                .header(AUTHORIZATION, format!("Bearer {token}"));
        }

        match request.send() {
            Ok(response) => {
                let status = response.status();
                log::debug!("Existence check for {} returned {}", target, status);
                status.is_success()
            }
            Err(e) => {
                log::debug!("Existence check for {} failed: {}", target, e);
                false
            }
        }
    }
}

/// The REST API URL of a GitHub repository, for authenticated probes.
///
/// `github.com` uses `api.github.com`; other GitHub hosts use `/api/v3`.
pub fn github_api_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    if !is_github_host(&host) {
        return None;
    }
    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?.trim_end_matches(".git");
    let base = if host == "github.com" {
        "https://api.github.com".to_string()
    } else {
        format!("https://{host}/api/v3")
    };
    Some(format!("{base}/repos/{owner}/{repo}"))
}
