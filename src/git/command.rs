// src/git/command.rs

//! Runs git as a subprocess with a deadline.

use crate::cancellation::CancellationToken;
use crate::errors::{io_error_with_path, Error, Result};
use std::fmt;
use std::io::{ErrorKind, Read};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// One git invocation: arguments after `git`, plus extra environment.
///
/// `Debug` and `Display` never show environment values, which may carry
/// credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct GitCommand {
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl GitCommand {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            env: Vec::new(),
        }
    }

    /// Adds one environment variable for the subprocess.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Appends several environment variables.
    pub fn envs(mut self, vars: &[(String, String)]) -> Self {
        self.env.extend_from_slice(vars);
        self
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git {}", self.args.join(" "))
    }
}

impl fmt::Debug for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.env.iter().map(|(k, _)| k.as_str()).collect();
        f.debug_struct("GitCommand")
            .field("args", &self.args)
            .field("env", &keys)
            .finish()
    }
}

/// Captured output of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Executes git commands. Tests substitute a recording implementation.
pub trait GitRunner: Send + Sync {
    /// Runs `command` to completion.
    ///
    /// # Errors
    /// [`Error::Timeout`] when `timeout` elapses, [`Error::CommandFailed`] on a
    /// non-zero exit, [`Error::Interrupted`] when `token` is cancelled and
    /// [`Error::GitNotInstalled`] when git cannot be spawned.
    fn run(
        &self,
        command: &GitCommand,
        timeout: Duration,
        token: &CancellationToken,
    ) -> Result<GitOutput>;
}

/// Spawns the `git` executable found on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGitRunner;

impl GitRunner for SystemGitRunner {
    fn run(
        &self,
        command: &GitCommand,
        timeout: Duration,
        token: &CancellationToken,
    ) -> Result<GitOutput> {
        log::debug!("Running {}", command);
        let mut child = Command::new("git")
            .args(&command.args)
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => Error::GitNotInstalled,
                _ => io_error_with_path(e, "git"),
            })?;

        // Drain both pipes concurrently so a chatty child cannot block on a full pipe.
        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        let deadline = Instant::now() + timeout;
        let status = loop {
            if let Some(status) = child.try_wait().map_err(|e| io_error_with_path(e, "git"))? {
                break status;
            }
            if token.is_cancelled() {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::Interrupted);
            }
            if Instant::now() >= deadline {
                log::warn!("{} exceeded {:?}, killing it", command, timeout);
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::timeout(command.to_string(), timeout));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let output = GitOutput {
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
        };
        if !status.success() {
            return Err(Error::CommandFailed {
                command: command.to_string(),
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}
