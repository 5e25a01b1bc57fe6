// src/cancellation.rs

//! A shared flag for cooperative cancellation of an ingestion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable, thread-safe cancellation flag.
///
/// The tree walk checks it between entries and the git runner checks it
/// while waiting on a subprocess, killing the child once it is set.
///
/// # Examples
///
/// ```
/// use repodigest::CancellationToken;
/// use std::thread;
///
/// let token = CancellationToken::new();
/// let worker_token = token.clone();
///
/// let handle = thread::spawn(move || {
///     let mut polls = 0u32;
///     while !worker_token.is_cancelled() {
///         polls += 1;
///         thread::yield_now();
///     }
///     polls
/// });
///
/// token.cancel();
/// handle.join().unwrap();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token in the non-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks this token and all of its clones as cancelled.
    pub fn cancel(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Relaxed)
    }
}
