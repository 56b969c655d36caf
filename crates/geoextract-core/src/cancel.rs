//! Cooperative cancellation via a shared token and atomic flag

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// How often [`Cancellation::cancelled`] looks at the raw flag, which signal
/// handlers set without waking anyone
const FLAG_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Cancellation signal shared between a run and whoever may stop it.
///
/// Clones observe the same state. Once cancelled, it stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    token: CancellationToken,
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
        self.token.cancel();
    }

    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.flag.load(Ordering::Relaxed)
    }

    /// Resolves once cancellation is requested, by [`cancel`](Self::cancel)
    /// or through the raw flag.
    pub async fn cancelled(&self) {
        tokio::select! {
            () = self.token.cancelled() => {}
            () = self.flag_set() => {}
        }
    }

    async fn flag_set(&self) {
        while !self.flag.load(Ordering::Relaxed) {
            tokio::time::sleep(FLAG_POLL_INTERVAL).await;
        }
    }

    /// Underlying flag, for signal handlers (storing to an `AtomicBool` is
    /// async-signal-safe)
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        assert!(!Cancellation::new().is_cancelled());
    }

    #[test]
    fn clones_share_state() {
        let a = Cancellation::new();
        let b = a.clone();
        b.cancel();
        assert!(a.is_cancelled());
    }

    #[test]
    fn raw_flag_sets_cancellation() {
        let c = Cancellation::new();
        c.flag().store(true, Ordering::Relaxed);
        assert!(c.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_wakes_waiter() {
        let c = Cancellation::new();
        let trigger = c.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });
        tokio::time::timeout(Duration::from_secs(2), c.cancelled())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn cancelled_notices_raw_flag() {
        let c = Cancellation::new();
        let flag = c.flag();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            flag.store(true, Ordering::Relaxed);
        });
        tokio::time::timeout(Duration::from_secs(2), c.cancelled())
            .await
            .unwrap();
    }
}
