//! Deferred, coalesced repositioning.
//!
//! Geometry reads are only trustworthy once layout has settled, so a panel
//! never repositions inline. Size-affecting events mark it dirty and ask the
//! host for one frame callback; any further events before that frame fires
//! fold into the same pass.
//!
//! # Usage
//!
//! ```
//! use anchorpanel_runtime::scheduler::{FrameScheduler, RepositionScheduler};
//! use std::cell::Cell;
//!
//! #[derive(Default)]
//! struct Frames(Cell<u32>);
//!
//! impl FrameScheduler for Frames {
//!     fn request_frame(&self) {
//!         self.0.set(self.0.get() + 1);
//!     }
//! }
//!
//! let frames = Frames::default();
//! let scheduler = RepositionScheduler::new();
//! assert!(scheduler.invalidate(&frames));
//! assert!(!scheduler.invalidate(&frames)); // coalesced
//! assert_eq!(frames.0.get(), 1);
//!
//! assert!(scheduler.take());
//! assert!(!scheduler.take());
//! ```

use std::cell::Cell;

/// Host hook that runs a callback on the next frame.
///
/// The host answers a request by calling `Panel::on_frame` once.
pub trait FrameScheduler {
    fn request_frame(&self);
}

/// Counters for observability and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Frames requested from the host.
    pub requested: u64,
    /// Invalidations folded into an already pending frame.
    pub coalesced: u64,
    /// Frames that ran a reposition.
    pub flushed: u64,
}

/// Dirty flag plus schedule-once bookkeeping.
///
/// Single-threaded by construction (`Cell`), like the event loop it serves.
#[derive(Debug, Default)]
pub struct RepositionScheduler {
    pending: Cell<bool>,
    stats: Cell<SchedulerStats>,
}

impl RepositionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark dirty. Requests a frame only if none is pending.
    ///
    /// Returns `true` when a new frame was requested.
    pub fn invalidate(&self, frames: &dyn FrameScheduler) -> bool {
        let mut stats = self.stats.get();
        let scheduled = if self.pending.replace(true) {
            stats.coalesced += 1;
            false
        } else {
            stats.requested += 1;
            frames.request_frame();
            true
        };
        self.stats.set(stats);
        scheduled
    }

    /// Consume the dirty flag at frame time.
    pub fn take(&self) -> bool {
        let was_pending = self.pending.replace(false);
        if was_pending {
            let mut stats = self.stats.get();
            stats.flushed += 1;
            self.stats.set(stats);
        }
        was_pending
    }

    /// Drop a pending reposition (panel closed).
    pub fn cancel(&self) {
        self.pending.set(false);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats.get()
    }
}
