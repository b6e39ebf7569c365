//! Per-call cancellation.
//!
//! A [`CancelHandle`] owns the sending side; any number of [`CancelSignal`]
//! clones observe it. Cancelling one handle only affects calls holding its
//! signals.

use tokio::sync::watch;

/// Create a connected handle/signal pair.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

/// Sending side of a cancellation pair.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation to every observer.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Create another signal observing this handle.
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: self.tx.subscribe(),
        }
    }
}

/// Observing side of a cancellation pair.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation is signalled.
    ///
    /// Never resolves if the handle is dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        let observed = rx.wait_for(|cancelled| *cancelled).await.map(|_| ());
        if observed.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_wakes_waiters() {
        let (handle, signal) = cancel_pair();
        assert!(!signal.is_cancelled());

        let waiter = tokio::spawn({
            let signal = signal.clone();
            async move { signal.cancelled().await }
        });

        handle.cancel();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
        assert!(signal.is_cancelled());
    }

    #[test]
    fn test_cancelled_is_pending_until_cancel() {
        let (handle, signal) = cancel_pair();
        let mut waiter = tokio_test::task::spawn(signal.cancelled());

        tokio_test::assert_pending!(waiter.poll());
        handle.cancel();
        assert!(waiter.is_woken());
        tokio_test::assert_ready!(waiter.poll());
    }

    #[tokio::test]
    async fn test_cancel_before_wait_is_observed() {
        let (handle, signal) = cancel_pair();
        handle.cancel();
        tokio::time::timeout(Duration::from_millis(100), signal.cancelled())
            .await
            .expect("already cancelled");
    }

    #[tokio::test]
    async fn test_dropped_handle_never_cancels() {
        let (handle, signal) = cancel_pair();
        drop(handle);
        let result = tokio::time::timeout(Duration::from_millis(50), signal.cancelled()).await;
        assert!(result.is_err());
        assert!(!signal.is_cancelled());
    }

    #[tokio::test]
    async fn test_pairs_are_independent() {
        let (first, first_signal) = cancel_pair();
        let (_second, second_signal) = cancel_pair();
        first.cancel();
        assert!(first_signal.is_cancelled());
        assert!(!second_signal.is_cancelled());
    }
}
