// src/git/mod.rs
//! Clones remote repositories by driving the `git` executable.
//!
//! This module provides functionality to:
//! - Build the minimal clone, sparse-checkout and checkout commands for a
//!   [`CloneConfig`](crate::config::CloneConfig).
//! - Run them sequentially with a per-command timeout and cancellation.
//! - Probe the remote over HTTP before cloning, using `reqwest`.
//! - Pass an access token to git through the environment.

mod auth;
mod clone;
mod command;
mod probe;

pub use auth::{auth_env, auth_header_config, is_github_host};
pub use clone::{clone_command, clone_commands, post_clone_commands, Cloner};
pub use command::{GitCommand, GitOutput, GitRunner, SystemGitRunner};
pub use probe::{github_api_url, HttpProbe, RepoProbe};
