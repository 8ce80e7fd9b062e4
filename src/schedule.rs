//! Frame scheduling with explicit cancellation.
//!
//! The host owns the display-refresh callback; the animator owns a
//! [`FrameTask`] that records whether a frame has been requested and whether
//! the run is still live. A frame only executes if it was scheduled and the
//! [`CancellationToken`] has not been cancelled, so a callback that fires
//! after `stop()` finds nothing to do.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared liveness flag for one animation run.
///
/// Clones observe the same flag. Cancelling is permanent.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A live token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the run. Returns `true` only for the call that flipped the flag.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::AcqRel)
    }

    /// Whether the run has been cancelled.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// What the host should do after a frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The next frame has been scheduled; request another refresh callback.
    Scheduled,
    /// The run is over; do not request further callbacks.
    Stopped,
}

/// A recurring frame task: at most one frame pending, guarded by a token.
#[derive(Debug)]
pub struct FrameTask {
    token: CancellationToken,
    pending: bool,
}

impl FrameTask {
    /// A task with no frame pending.
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            pending: false,
        }
    }

    /// Request the next frame. Ignored once cancelled.
    pub fn schedule(&mut self) -> FrameStatus {
        if self.token.is_cancelled() {
            self.pending = false;
            FrameStatus::Stopped
        } else {
            self.pending = true;
            FrameStatus::Scheduled
        }
    }

    /// Take the pending frame, if it may still run.
    ///
    /// Returns `false` when no frame was scheduled or the token was
    /// cancelled after scheduling.
    pub fn take(&mut self) -> bool {
        let run = self.pending && !self.token.is_cancelled();
        self.pending = false;
        run
    }

    /// Drop any pending frame and cancel the token.
    pub fn cancel(&mut self) -> bool {
        self.pending = false;
        self.token.cancel()
    }

    /// Whether a frame is waiting to run.
    pub fn is_pending(&self) -> bool {
        self.pending && !self.token.is_cancelled()
    }

    /// The token guarding this task.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_reported_once() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        assert!(clone.cancel());
        assert!(!token.cancel());
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_take_requires_schedule() {
        let mut task = FrameTask::new(CancellationToken::new());
        assert!(!task.take());
        assert_eq!(task.schedule(), FrameStatus::Scheduled);
        assert!(task.is_pending());
        assert!(task.take());
        assert!(!task.take());
    }

    #[test]
    fn test_stale_frame_after_cancel_does_not_run() {
        let token = CancellationToken::new();
        let mut task = FrameTask::new(token.clone());
        task.schedule();
        token.cancel();
        assert!(!task.is_pending());
        assert!(!task.take());
    }

    #[test]
    fn test_schedule_after_cancel_stops() {
        let mut task = FrameTask::new(CancellationToken::new());
        assert!(task.cancel());
        assert_eq!(task.schedule(), FrameStatus::Stopped);
        assert!(!task.take());
    }
}
