//! Trailing-edge debounce timer.
//!
//! Each [`Debouncer::schedule`] call pushes the deadline out to
//! `now + delay`; [`Debouncer::elapsed`] resolves once the deadline passes
//! with no further scheduling. Designed to sit in a `tokio::select!` loop.

use std::time::Duration;

use tokio::time::Instant;

/// Delays an action until input has been quiet for a fixed interval.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Start (or restart) the quiet period.
    pub fn schedule(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
        tracing::trace!(delay_ms = self.delay.as_millis() as u64, "Debounce scheduled");
    }

    /// Drop any pending deadline.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            tracing::trace!("Debounce cancelled");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Resolve when the pending deadline passes; never resolves while idle.
    ///
    /// Cancel-safe: if the future is dropped before the deadline, the
    /// deadline stays pending.
    pub async fn elapsed(&mut self) {
        match self.deadline {
            Some(deadline) => {
                tokio::time::sleep_until(deadline).await;
                self.deadline = None;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
