//! Cooperative cancellation token
//!
//! Long-running operations (grace-period waits, log following, the
//! interactive monitor loop) take a [`CancelToken`] and check it at their
//! suspension points instead of trapping signals themselves.

use tokio::sync::watch;

/// Signals cancellation to cooperating tasks
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    /// Create a token observing this handle
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }
}

/// Observer side of a cancellation request
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Non-blocking check
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation has been requested
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // wait_for returns Err only if the handle is dropped; treat that as
        // "never cancelled" and park forever so select! arms stay honest
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Create a connected handle/token pair
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}
