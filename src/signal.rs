// src/signal.rs

//! Provides signal handling for graceful shutdown.

use crate::cancellation::CancellationToken;
use anyhow::{Context, Result};

/// Registers a Ctrl+C (SIGINT/SIGTERM) handler that cancels the returned token.
///
/// A running git command is killed and the walk stops at the next entry; the
/// ingestion then fails with [`Error::Interrupted`](crate::errors::Error::Interrupted)
/// and the temporary clone directory is removed as the error unwinds.
///
/// # Errors
/// Returns an error if the handler cannot be installed (e.g. one is already set).
pub fn setup_signal_handler() -> Result<CancellationToken> {
    let token = CancellationToken::new();
    let handler_token = token.clone();

    ctrlc::set_handler(move || {
        log::info!("Ctrl+C signal received, cancelling ingestion.");
        handler_token.cancel();
    })
    .context("Failed to set Ctrl+C signal handler")?;

    Ok(token)
}
