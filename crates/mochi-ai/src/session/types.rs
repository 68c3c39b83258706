//! Session event sink and concurrency guard.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{AiError, StreamEvent};

/// Ordered, FIFO sink for a turn's events. The receiving side (gateway or
/// test) observes exactly the emission order.
pub type EventSink = tokio::sync::mpsc::UnboundedSender<StreamEvent>;

/// Guard that clears the `busy` flag on drop, ensuring it is always
/// released even if the in-flight future is cancelled.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Attempt to acquire the busy lock. Returns `AiError::Busy` if a
    /// previous turn has not reached its terminal event yet.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Result<Self, AiError> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(AiError::Busy);
        }
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
