// src/git/clone.rs

//! Builds and runs the git commands that materialize a [`CloneConfig`].

use super::auth::auth_env;
use super::command::{GitCommand, GitRunner, SystemGitRunner};
use super::probe::{HttpProbe, RepoProbe};
use crate::cancellation::CancellationToken;
use crate::config::CloneConfig;
use crate::constants::DEFAULT_CLONE_TIMEOUT;
use crate::errors::{io_error_with_path, Error, Result};
use crate::progress::ProgressReporter;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;
use url::Url;

/// The `git clone` invocation for `config`.
///
/// Flags are emitted in a fixed order: `--single-branch`, then
/// `--recurse-submodules`, `--filter=blob:none --sparse`, `--depth=1` and
/// `--branch <ref>` as applicable, then the URL and destination.
///
/// # Examples
/// ```
/// use repodigest::config::CloneConfig;
/// use repodigest::git::clone_command;
///
/// let config = CloneConfig::new("https://github.com/o/r", "/tmp/o-r");
/// assert_eq!(
///     clone_command(&config).to_string(),
///     "git clone --single-branch --depth=1 https://github.com/o/r /tmp/o-r"
/// );
/// ```
pub fn clone_command(config: &CloneConfig) -> GitCommand {
    let mut args = vec!["clone".to_string(), "--single-branch".to_string()];
    if config.include_submodules {
        args.push("--recurse-submodules".to_string());
    }
    if config.is_sparse() {
        args.push("--filter=blob:none".to_string());
        args.push("--sparse".to_string());
    }
    // A commit checkout needs the history, so only shallow-clone without one.
    if config.commit.is_none() {
        args.push("--depth=1".to_string());
    }
    if let Some(reference) = checkout_ref(config) {
        args.push("--branch".to_string());
        args.push(reference.to_string());
    }
    args.push(config.url.clone());
    args.push(config.local_path.display().to_string());
    GitCommand::new(args)
}

/// The ref passed to `--branch`: the tag, else the requested branch.
fn checkout_ref(config: &CloneConfig) -> Option<&str> {
    config.tag.as_deref().or(config.branch.as_deref())
}

/// Commands run inside the clone, in order: sparse-checkout, then commit checkout.
pub fn post_clone_commands(config: &CloneConfig) -> Vec<GitCommand> {
    let path = config.local_path.display().to_string();
    let mut commands = Vec::new();
    if config.is_sparse() {
        commands.push(GitCommand::new([
            "-C".to_string(),
            path.clone(),
            "sparse-checkout".to_string(),
            "set".to_string(),
            config.sparse_path(),
        ]));
    }
    if let Some(commit) = &config.commit {
        commands.push(GitCommand::new([
            "-C".to_string(),
            path,
            "checkout".to_string(),
            commit.clone(),
        ]));
    }
    commands
}

/// Every command for `config`, clone first.
pub fn clone_commands(config: &CloneConfig) -> Vec<GitCommand> {
    let mut commands = vec![clone_command(config)];
    commands.extend(post_clone_commands(config));
    commands
}

/// Runs the clone for a [`CloneConfig`] through pluggable seams.
///
/// The default cloner spawns the system `git` and probes the remote over
/// HTTP first. Tests substitute the runner, and may disable the probe.
#[derive(Clone)]
pub struct Cloner {
    runner: Arc<dyn GitRunner>,
    probe: Option<Arc<dyn RepoProbe>>,
    timeout: Duration,
}

impl Default for Cloner {
    fn default() -> Self {
        Self::new()
    }
}

impl Cloner {
    pub fn new() -> Self {
        Self {
            runner: Arc::new(SystemGitRunner),
            probe: Some(Arc::new(HttpProbe::new())),
            timeout: DEFAULT_CLONE_TIMEOUT,
        }
    }

    pub fn runner(mut self, runner: Arc<dyn GitRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn probe(mut self, probe: Arc<dyn RepoProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Clones without asking the remote whether the repository exists.
    pub fn skip_existence_check(mut self) -> Self {
        self.probe = None;
        self
    }

    /// Deadline applied to each git command.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Materializes `config.local_path`.
    ///
    /// `token`, if given, is passed to git as a one-off HTTP header through
    /// the environment; it is never logged or written to disk.
    ///
    /// # Errors
    /// [`Error::RepositoryNotFound`] when the probe fails (no command is run),
    /// otherwise the first error of a git command; later commands are skipped.
    #[instrument(skip_all, fields(url = %config.url, path = %config.local_path.display()))]
    pub fn clone_repo(
        &self,
        config: &CloneConfig,
        token: Option<&str>,
        cancel: &CancellationToken,
        progress: &dyn ProgressReporter,
    ) -> Result<()> {
        if let Some(probe) = &self.probe {
            progress.set_message(format!("Checking {}", config.url));
            if !probe.exists(&config.url, token) {
                progress.finish();
                return Err(Error::RepositoryNotFound {
                    url: config.url.clone(),
                });
            }
        }

        if let Some(parent) = config.local_path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error_with_path(e, parent))?;
        }

        let env = Url::parse(&config.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| auth_env(h, token)))
            .unwrap_or_default();

        for command in clone_commands(config) {
            let command = command.envs(&env);
            progress.set_message(format!("Running {command}"));
            if let Err(e) = self.runner.run(&command, self.timeout, cancel) {
                progress.finish();
                return Err(e);
            }
        }
        log::info!("Cloned {} into {}", config.url, config.local_path.display());
        progress.finish_with_message(format!("Cloned {}", config.url));
        Ok(())
    }
}
