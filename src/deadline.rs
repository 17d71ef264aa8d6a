//! Deadlines and cancellation for suspending operations.
//!
//! Connecting to a tool server, discovering its catalog, and dispatching a
//! tool call are the only operations that suspend. Each of them takes a
//! [`Deadline`], which bounds the wait by an optional timeout and an optional
//! cancellation token supplied by the caller.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Reason a bounded operation stopped before producing a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    /// The timeout elapsed.
    #[error("timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),
    /// The caller cancelled the operation.
    #[error("cancelled by caller")]
    Cancelled,
}

/// Caller-supplied bound on a suspending operation.
#[derive(Debug, Clone, Default)]
pub struct Deadline {
    timeout: Option<Duration>,
    cancellation: Option<CancellationToken>,
}

impl Deadline {
    /// Creates a deadline that never expires and cannot be cancelled.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            timeout: None,
            cancellation: None,
        }
    }

    /// Creates a deadline that expires after `timeout`.
    #[must_use]
    pub const fn after(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            cancellation: None,
        }
    }

    /// Attaches a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Returns the configured timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Drives `future` to completion unless the deadline interrupts it first.
    ///
    /// Cancellation wins over a result that becomes ready in the same poll.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupted::TimedOut`] when the timeout elapses and
    /// [`Interrupted::Cancelled`] when the token is cancelled.
    pub async fn run<F>(&self, future: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        let cancelled = async {
            match &self.cancellation {
                Some(token) => token.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };
        let bounded = async {
            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, future)
                    .await
                    .map_err(|_| Interrupted::TimedOut(limit)),
                None => Ok(future.await),
            }
        };

        tokio::select! {
            biased;
            () = cancelled => Err(Interrupted::Cancelled),
            outcome = bounded => outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unbounded_deadline_returns_value() {
        let outcome = Deadline::unbounded().run(async { 7 }).await;
        assert_eq!(outcome, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_timeout_reports_timed_out() {
        let limit = Duration::from_millis(50);
        let outcome = Deadline::after(limit)
            .run(tokio::time::sleep(Duration::from_secs(5)))
            .await;
        assert_eq!(outcome, Err(Interrupted::TimedOut(limit)));
    }

    #[tokio::test]
    async fn cancelled_token_interrupts() {
        let token = CancellationToken::new();
        token.cancel();
        let outcome = Deadline::unbounded()
            .with_cancellation(token)
            .run(std::future::pending::<()>())
            .await;
        assert_eq!(outcome, Err(Interrupted::Cancelled));
    }
}
