//! Frame scheduling contract
//!
//! Each frame callback asks for the next one. Stopping is simply not asking
//! again (and cancelling the request already in flight).

use std::cell::RefCell;
use std::rc::Rc;

/// Identifies one outstanding frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Something that calls back once per display refresh
pub trait FrameScheduler {
    /// Ask for one callback on the next refresh. `None` if the request failed.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Withdraw a request that has not fired yet
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct ManualFrames {
    next_id: i32,
    pending: Vec<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

/// Scheduler driven by hand: the host decides when a refresh happens.
///
/// Clones share the same queue, so a host can keep one handle while the
/// simulation owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    frames: Rc<RefCell<ManualFrames>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the oldest outstanding request. Returns true if there was one,
    /// in which case the host should run the frame callback.
    pub fn fire(&self) -> bool {
        let mut frames = self.frames.borrow_mut();
        if frames.pending.is_empty() {
            return false;
        }
        frames.pending.remove(0);
        true
    }

    /// Outstanding requests
    pub fn pending(&self) -> usize {
        self.frames.borrow().pending.len()
    }

    /// Requests ever made
    pub fn requested(&self) -> u64 {
        self.frames.borrow().requested
    }

    /// Requests withdrawn before firing
    pub fn cancelled(&self) -> u64 {
        self.frames.borrow().cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let mut frames = self.frames.borrow_mut();
        frames.next_id += 1;
        let handle = FrameHandle(frames.next_id);
        frames.pending.push(handle);
        frames.requested += 1;
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut frames = self.frames.borrow_mut();
        let before = frames.pending.len();
        frames.pending.retain(|h| *h != handle);
        if frames.pending.len() != before {
            frames.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_and_fire() {
        let host = ManualScheduler::new();
        let mut owned = host.clone();

        assert!(!host.fire());
        owned.request_frame();
        assert_eq!(host.pending(), 1);
        assert!(host.fire());
        assert_eq!(host.pending(), 0);
        assert_eq!(host.requested(), 1);
    }

    #[test]
    fn test_cancel_only_counts_outstanding() {
        let host = ManualScheduler::new();
        let mut owned = host.clone();

        let handle = owned.request_frame().unwrap();
        owned.cancel_frame(handle);
        owned.cancel_frame(handle);
        assert_eq!(host.pending(), 0);
        assert_eq!(host.cancelled(), 1);
        assert!(!host.fire());
    }
}
