//! Cooperative cancellation for long scans.
//!
//! A [`CancellationToken`] is a shared flag plus an optional deadline.
//! Stages check it between steps and the extractor checks it per file.

use crate::errors::AnalysisError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    started: Instant,
    deadline: Option<Duration>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    /// A token that is never cancelled unless [`cancel`](Self::cancel) is called.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            started: Instant::now(),
            deadline: None,
        }
    }

    /// A token that also expires `timeout` after creation.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(timeout),
            ..Self::new()
        }
    }

    /// Clones share the flag, so cancelling any clone cancels them all.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|limit| self.elapsed() >= limit)
    }

    /// `Err` once the token is cancelled or past its deadline.
    pub fn check(&self) -> Result<(), AnalysisError> {
        if self.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        if self.is_expired() {
            return Err(AnalysisError::TimedOut {
                elapsed: self.elapsed(),
            });
        }
        Ok(())
    }
}
