//! Planned-navigation scheduling
//!
//! A form owns at most one in-flight navigation. Scheduling a new one first
//! cancels the previous navigation's scope, so only the most recently
//! dispatched response can ever be loaded into the document, no matter when
//! the superseded responses complete.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use url::Url;

use crate::dom::Document;
use crate::network::{NavigationRequest, Transport};

/// Cooperative cancellation scope
///
/// Created fresh for every planned navigation and never handed forward to a
/// later one; cancelling a superseded navigation must not poison its
/// successor.
#[derive(Debug, Clone)]
pub struct CancelScope {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl CancelScope {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    /// Signal cancellation to every clone of this scope
    pub fn cancel(&self) {
        let _ = self.sender.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolve once the scope is cancelled
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        // Every clone of the scope keeps the sender alive, so wait_for only
        // fails after the last clone is gone
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelScope {
    fn default() -> Self {
        Self::new()
    }
}

/// An in-flight navigation
struct PendingNavigation {
    url: Url,
    scope: CancelScope,
    task: JoinHandle<()>,
}

/// Owns the zero-or-one pending navigation of a form
///
/// States: idle (no pending navigation) and pending. A completed, failed or
/// cancelled navigation returns the scheduler to idle on its own.
#[derive(Default)]
pub struct NavigationScheduler {
    pending: Option<PendingNavigation>,
}

impl NavigationScheduler {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Whether a navigation is still in flight
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.task.is_finished())
    }

    /// Supersede any pending navigation and issue this request.
    ///
    /// The previous scope is cancelled before the new request exists, so two
    /// back-to-back submissions can never both remain current. The request
    /// itself runs asynchronously; this call returns immediately.
    pub fn schedule(
        &mut self,
        transport: Arc<dyn Transport>,
        target: Arc<Document>,
        request: NavigationRequest,
    ) {
        if let Some(previous) = self.pending.take() {
            log::debug!("superseding pending navigation to {}", previous.url);
            previous.scope.cancel();
        }

        let scope = CancelScope::new();
        let task_scope = scope.clone();
        let url = request.url.clone();
        let task = tokio::spawn(async move {
            let request_url = request.url.clone();
            let outcome = tokio::select! {
                _ = task_scope.cancelled() => {
                    log::debug!("navigation to {} cancelled in flight", request_url);
                    return;
                }
                result = transport.send(request, task_scope.clone()) => result,
            };
            match outcome {
                Ok(response) if !task_scope.is_cancelled() && target.is_navigable() => {
                    target.load(response);
                }
                Ok(_) => {
                    log::debug!(
                        "discarding response from {}: superseded or target not navigable",
                        request_url
                    );
                }
                Err(err) => {
                    log::warn!("navigation to {} failed: {}", request_url, err);
                }
            }
        });

        self.pending = Some(PendingNavigation { url, scope, task });
    }

    /// Wait for the current navigation to settle. Test and teardown hook;
    /// submissions themselves never block on this.
    pub async fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            let _ = pending.task.await;
        }
    }
}

impl Drop for NavigationScheduler {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.scope.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_starts_uncancelled() {
        let scope = CancelScope::new();
        assert!(!scope.is_cancelled());
        scope.cancel();
        assert!(scope.is_cancelled());
    }

    #[test]
    fn test_cancel_reaches_clones() {
        let scope = CancelScope::new();
        let clone = scope.clone();
        scope.cancel();
        assert!(clone.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_future_resolves() {
        let scope = CancelScope::new();
        let waiter = scope.clone();
        let handle = tokio::spawn(async move {
            waiter.cancelled().await;
        });
        scope.cancel();
        handle.await.expect("waiter must resolve after cancel");
    }

    #[test]
    fn test_scheduler_starts_idle() {
        let scheduler = NavigationScheduler::new();
        assert!(!scheduler.is_pending());
    }
}
