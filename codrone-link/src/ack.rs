//! Acknowledgment tracking.
//!
//! Correlates inbound Ack frames with commands awaiting them. At most one
//! wait is outstanding per data type; a second `expect` for the same type
//! supersedes the first. Entries never expire on their own.

use crate::error::AckError;
use codrone_protocol::DataType;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;

type Completion = oneshot::Sender<Result<(), AckError>>;

/// Pending acknowledgment waits keyed by data type.
#[derive(Debug, Default)]
pub struct AckTracker {
    pending: DashMap<DataType, (u64, Completion)>,
    next_id: AtomicU64,
}

impl AckTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a wait for an acknowledgment of `data_type`.
    ///
    /// Call this before the command is written so an early Ack is not lost.
    pub fn expect(&self, data_type: DataType) -> AckHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();

        if let Some((_, previous)) = self.pending.insert(data_type, (id, tx)) {
            tracing::debug!(?data_type, "superseding pending acknowledgment");
            let _ = previous.send(Err(AckError::Superseded));
        }

        AckHandle { data_type, id, rx }
    }

    /// Completes the wait for `data_type`, if any.
    ///
    /// Returns whether a waiter was resolved. Unsolicited and undecodable
    /// acks are normal traffic and only logged.
    pub fn resolve(&self, data_type: Option<DataType>) -> bool {
        let Some(data_type) = data_type else {
            tracing::debug!("ignoring ack for unrecognized data type");
            return false;
        };

        match self.pending.remove(&data_type) {
            Some((_, (_, completion))) => {
                // The waiter may have been dropped already.
                let _ = completion.send(Ok(()));
                true
            }
            None => {
                tracing::debug!(?data_type, "unsolicited ack");
                false
            }
        }
    }

    /// Cancels whatever wait is pending for `data_type`.
    pub fn cancel(&self, data_type: DataType) -> bool {
        match self.pending.remove(&data_type) {
            Some((_, (_, completion))) => {
                let _ = completion.send(Err(AckError::Cancelled));
                true
            }
            None => false,
        }
    }

    /// Removes the entry registered by `handle`, leaving a newer wait for
    /// the same type in place.
    pub fn cancel_handle(&self, handle: &AckHandle) -> bool {
        self.pending
            .remove_if(&handle.data_type, |_, (id, _)| *id == handle.id)
            .is_some()
    }

    pub fn is_pending(&self, data_type: DataType) -> bool {
        self.pending.contains_key(&data_type)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// The waiting side of one [`AckTracker::expect`] call.
#[derive(Debug)]
pub struct AckHandle {
    data_type: DataType,
    id: u64,
    rx: oneshot::Receiver<Result<(), AckError>>,
}

impl AckHandle {
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Waits until the ack arrives or the entry is superseded or cancelled.
    pub async fn wait(self) -> Result<(), AckError> {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(AckError::Cancelled),
        }
    }

    /// Like [`AckHandle::wait`], bounded by `timeout`.
    ///
    /// On timeout the tracker entry is left in place; use
    /// [`AckTracker::cancel_handle`] to clear it.
    pub async fn wait_timeout(&mut self, timeout: Duration) -> Result<(), AckError> {
        match tokio::time::timeout(timeout, &mut self.rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(AckError::Cancelled),
            Err(_) => Err(AckError::Timeout(timeout)),
        }
    }

    /// Non-blocking check. `None` while still pending.
    pub fn try_wait(&mut self) -> Option<Result<(), AckError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(AckError::Cancelled)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_expect_then_resolve() {
        let tracker = AckTracker::new();
        let handle = tracker.expect(DataType::Command);
        assert!(tracker.is_pending(DataType::Command));

        assert!(tracker.resolve(Some(DataType::Command)));
        assert_eq!(handle.wait().await, Ok(()));
        assert_eq!(tracker.pending_count(), 0);

        // Resolving again is a no-op.
        assert!(!tracker.resolve(Some(DataType::Command)));
    }

    #[test]
    fn test_resolve_without_expect() {
        let tracker = AckTracker::new();
        assert!(!tracker.resolve(Some(DataType::Control)));
        assert!(!tracker.resolve(None));
        assert_eq!(tracker.pending_count(), 0);
    }

    #[test]
    fn test_resolve_none_leaves_waiters() {
        let tracker = AckTracker::new();
        let mut handle = tracker.expect(DataType::LightManual);
        assert!(!tracker.resolve(None));
        assert!(handle.try_wait().is_none());
        assert!(tracker.is_pending(DataType::LightManual));
    }

    #[tokio::test]
    async fn test_expect_supersedes() {
        let tracker = AckTracker::new();
        let first = tracker.expect(DataType::Command);
        let second = tracker.expect(DataType::Command);
        assert_eq!(tracker.pending_count(), 1);

        assert_eq!(first.wait().await, Err(AckError::Superseded));
        assert!(tracker.resolve(Some(DataType::Command)));
        assert_eq!(second.wait().await, Ok(()));
    }

    #[tokio::test]
    async fn test_waits_are_per_type() {
        let tracker = AckTracker::new();
        let mut command = tracker.expect(DataType::Command);
        let buzzer = tracker.expect(DataType::Buzzer);

        assert!(tracker.resolve(Some(DataType::Buzzer)));
        assert_eq!(buzzer.wait().await, Ok(()));
        assert!(command.try_wait().is_none());
        assert!(tracker.is_pending(DataType::Command));
    }

    #[tokio::test]
    async fn test_cancel() {
        let tracker = AckTracker::new();
        let handle = tracker.expect(DataType::Command);
        assert!(tracker.cancel(DataType::Command));
        assert!(!tracker.cancel(DataType::Command));
        assert_eq!(handle.wait().await, Err(AckError::Cancelled));
    }

    #[tokio::test]
    async fn test_wait_timeout() {
        let tracker = AckTracker::new();
        let mut handle = tracker.expect(DataType::Command);
        let result = handle.wait_timeout(Duration::from_millis(10)).await;
        assert_eq!(result, Err(AckError::Timeout(Duration::from_millis(10))));

        // Entry survives the timeout until the caller clears it.
        assert!(tracker.is_pending(DataType::Command));
        assert!(tracker.cancel_handle(&handle));
        assert!(!tracker.is_pending(DataType::Command));
    }

    #[test]
    fn test_cancel_handle_keeps_newer_wait() {
        let tracker = AckTracker::new();
        let old = tracker.expect(DataType::Command);
        let _new = tracker.expect(DataType::Command);
        assert!(!tracker.cancel_handle(&old));
        assert!(tracker.is_pending(DataType::Command));
    }

    #[test]
    fn test_try_wait_after_drop() {
        let tracker = AckTracker::new();
        let mut handle = tracker.expect(DataType::Command);
        assert!(handle.try_wait().is_none());
        drop(tracker);
        assert_eq!(handle.try_wait(), Some(Err(AckError::Cancelled)));
    }

    #[tokio::test]
    async fn test_resolve_from_another_task() {
        let tracker = Arc::new(AckTracker::new());
        let handle = tracker.expect(DataType::Command);
        assert_eq!(handle.data_type(), DataType::Command);

        let resolver = Arc::clone(&tracker);
        tokio::spawn(async move {
            resolver.resolve(Some(DataType::Command));
        });

        assert_eq!(handle.wait().await, Ok(()));
    }
}
