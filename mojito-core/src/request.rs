// File: mojito-core/src/request.rs

//! Boundary calls paired with a cancellation handle.
//!
//! A request runs its operation on a spawned task. When the operation
//! resolves, the task takes the handle's lock, checks the cancelled flag and
//! only then hands the value to the resolution callback. [`RequestHandle::cancel`]
//! takes the same lock, so once `cancel()` has returned the callback either
//! already finished or will never run.
//!
//! Waiting for a request goes through a [`RequestWaiter`], which never owns
//! the request. The handle stays with whoever mounted the work, so dropping
//! a wait early leaves cancellation with the owner.
//!
//! Failures (network errors, timeouts) are logged and swallowed here. They
//! never reach the caller and never become user-visible messages.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::Error;

/// How a request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The operation succeeded and the callback ran.
    Completed,
    /// The handle was cancelled first; any result was discarded.
    Cancelled,
    /// The operation failed; nothing was delivered.
    Failed,
}

struct Shared {
    cancelled: Mutex<bool>,
    token: CancellationToken,
}

pub struct CancellableRequest;

impl CancellableRequest {
    /// Start `operation` and deliver its value to `on_resolve` unless the
    /// returned handle is cancelled first.
    pub fn start<T, F, C>(label: &str, operation: F, on_resolve: C) -> RequestHandle
    where
        T: Send + 'static,
        F: Future<Output = Result<T, Error>> + Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        Self::start_with_timeout(label, None, operation, on_resolve)
    }

    /// Like [`CancellableRequest::start`], but a call that takes longer than
    /// `timeout` counts as failed.
    pub fn start_with_timeout<T, F, C>(
        label: &str,
        timeout: Option<Duration>,
        operation: F,
        on_resolve: C,
    ) -> RequestHandle
    where
        T: Send + 'static,
        F: Future<Output = Result<T, Error>> + Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        let shared = Arc::new(Shared {
            cancelled: Mutex::new(false),
            token: CancellationToken::new(),
        });
        let label = label.to_string();
        let task_shared = shared.clone();
        let task_label = label.clone();
        // The sender lives in the task; if the task dies, waiters see it closed.
        let (done_tx, done_rx) = watch::channel(None);

        tokio::spawn(async move {
            let bounded = async move {
                match timeout {
                    Some(limit) => match tokio::time::timeout(limit, operation).await {
                        Ok(r) => r,
                        Err(elapsed) => Err(Error::from(elapsed)),
                    },
                    None => operation.await,
                }
            };

            let result = tokio::select! {
                biased;
                _ = task_shared.token.cancelled() => Err(Error::Cancelled),
                r = bounded => r,
            };

            let outcome = match result {
                Ok(value) => {
                    let cancelled = task_shared.cancelled.lock();
                    if *cancelled {
                        debug!("request '{}' resolved after cancel; result discarded", task_label);
                        RequestOutcome::Cancelled
                    } else {
                        // Held while the callback runs so cancel() waits for it.
                        on_resolve(value);
                        drop(cancelled);
                        RequestOutcome::Completed
                    }
                }
                Err(e) if e.is_cancelled() => {
                    debug!("request '{}' was cancelled", task_label);
                    RequestOutcome::Cancelled
                }
                Err(e) => {
                    warn!("there was a problem or the request was canceled ({}): {}", task_label, e);
                    RequestOutcome::Failed
                }
            };
            done_tx.send_replace(Some(outcome));
        });

        RequestHandle {
            label,
            shared,
            done: done_rx,
        }
    }
}

/// Owner-side handle of a running request. Dropping it cancels the request
/// unless it already settled.
pub struct RequestHandle {
    label: String,
    shared: Arc<Shared>,
    done: watch::Receiver<Option<RequestOutcome>>,
}

impl RequestHandle {
    /// Mark the request cancelled. After this returns the resolution
    /// callback is guaranteed not to start.
    pub fn cancel(&self) {
        let mut cancelled = self.shared.cancelled.lock();
        if !*cancelled {
            debug!("cancelling request '{}'", self.label);
            *cancelled = true;
        }
        drop(cancelled);
        self.shared.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.shared.cancelled.lock()
    }

    /// How the request ended, or `None` while it is still running.
    pub fn outcome(&self) -> Option<RequestOutcome> {
        *self.done.borrow()
    }

    /// Something to await the outcome with. The handle keeps ownership.
    pub fn waiter(&self) -> RequestWaiter {
        RequestWaiter {
            done: self.done.clone(),
        }
    }

    /// Wait for the request to settle.
    pub async fn join(&self) -> RequestOutcome {
        self.waiter().wait().await
    }
}

impl Drop for RequestHandle {
    fn drop(&mut self) {
        if self.outcome().is_none() {
            self.cancel();
        }
    }
}

/// Awaits a request's outcome without owning it.
#[derive(Clone)]
pub struct RequestWaiter {
    done: watch::Receiver<Option<RequestOutcome>>,
}

impl RequestWaiter {
    pub async fn wait(mut self) -> RequestOutcome {
        match self.done.wait_for(Option::is_some).await {
            Ok(outcome) => (*outcome).unwrap_or(RequestOutcome::Failed),
            Err(_) => {
                // The task ended without reporting, e.g. the callback panicked.
                warn!("request task ended without an outcome");
                RequestOutcome::Failed
            }
        }
    }
}
