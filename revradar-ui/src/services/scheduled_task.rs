//! Revocable one-shot timers
//!
//! A [`ScheduledTask`] runs a future once after a delay unless it is
//! cancelled first. Dropping the handle cancels it, so replacing the handle
//! stored in an `Option` revokes the previous timer.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Handle to a pending delayed callback
#[derive(Debug)]
pub struct ScheduledTask {
    cancel_token: CancellationToken,
}

impl ScheduledTask {
    /// Spawn `task` to run once after `delay`
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(delay: Duration, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cancel_token = CancellationToken::new();
        let child_token = cancel_token.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = child_token.cancelled() => {
                    tracing::trace!("Scheduled task revoked before firing");
                }
                _ = tokio::time::sleep(delay) => {
                    task.await;
                }
            }
        });

        Self { cancel_token }
    }

    /// Revoke the callback if it has not fired yet
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
