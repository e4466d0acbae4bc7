//! Cooperative search cancellation.
//!
//! A `CancellationToken` is a shared flag with release/acquire ordering.
//! The searcher owns one, hands clones to the backend search, and exposes
//! a `StopHandle` for threads that only need to request a stop or ask
//! whether a search is running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    #[inline]
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}

/// Stop-only view of a searcher's token, plus its busy flag.
#[derive(Debug, Clone)]
pub struct StopHandle {
    token: CancellationToken,
    searching: Arc<AtomicBool>,
}

impl StopHandle {
    pub(crate) fn new(token: CancellationToken, searching: Arc<AtomicBool>) -> Self {
        Self { token, searching }
    }

    #[inline]
    pub fn is_searching(&self) -> bool {
        self.searching.load(Ordering::Acquire)
    }

    /// Requests that the current (or next) search stop as soon as it polls.
    #[inline]
    pub fn stop(&self) {
        self.token.cancel();
    }
}
