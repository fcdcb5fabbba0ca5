//! Pending Update Accumulation
//!
//! [`UpdateTracker`] collects change and copy notifications from arbitrary
//! producers (the band scanner, input-event hints, explicit client requests)
//! into two pending region sets:
//!
//! - **changed**: pixels believed or confirmed to differ from what the
//!   consumer last saw
//! - **copied**: pixels whose new content equals other pixels' prior-frame
//!   content shifted by a single delta vector, letting a consumer encode a
//!   move instead of fresh pixel data
//!
//! # Invariant
//!
//! The two sets never claim the same pixel. Changed always wins: a change
//! notification over a copied area evicts it from the copy set, and a copy
//! recorded over an already-changed area is demoted to changed. Losing a
//! copy hint only costs bandwidth; losing a change costs correctness.
//!
//! # Usage
//!
//! ```rust
//! use framediff_pixels::Rect;
//! use framediff_track::{Region, UpdateTracker};
//!
//! let mut tracker = UpdateTracker::new();
//! tracker.add_changed(&Region::from_rect(Rect::new(0, 0, 100, 100)));
//!
//! let info = tracker.get_update_info(&Region::from_rect(Rect::new(0, 0, 640, 480)), 0);
//! assert_eq!(info.changed.area(), 10_000);
//! tracker.clear();
//! assert!(tracker.is_empty());
//! ```

use framediff_pixels::Point;
use tracing::trace;

use crate::region::Region;

/// A retrievable pending update
///
/// `copied` pixels equal the prior frame's pixels at `copied - copy_delta`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateInfo {
    /// Pixels that must be re-sent
    pub changed: Region,
    /// Pixels reproducible by copying prior-frame content
    pub copied: Region,
    /// Source-to-destination offset for `copied`
    pub copy_delta: Point,
}

impl UpdateInfo {
    /// True if neither region holds any pixels
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.copied.is_empty()
    }

    /// Combined pending area in pixels
    #[must_use]
    pub fn area(&self) -> u64 {
        self.changed.area() + self.copied.area()
    }
}

/// Counters for tracker activity since construction
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackerStats {
    /// Change notifications accepted
    pub changed_ops: u64,
    /// Copy notifications accepted
    pub copy_ops: u64,
    /// Copy hints demoted to changed (stale source or conflicting delta)
    pub copies_demoted: u64,
}

/// Accumulator for pending changed and copied regions
#[derive(Debug, Clone, Default)]
pub struct UpdateTracker {
    pub(crate) changed: Region,
    copied: Region,
    copy_delta: Point,
    stats: TrackerStats,
}

impl UpdateTracker {
    /// An empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no update is pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.copied.is_empty()
    }

    /// The pending changed region
    #[must_use]
    pub fn changed(&self) -> &Region {
        &self.changed
    }

    /// The pending copied region
    #[must_use]
    pub fn copied(&self) -> &Region {
        &self.copied
    }

    /// Activity counters
    #[must_use]
    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    /// Record that `region` changed
    ///
    /// The area is evicted from any pending copy hint first.
    pub fn add_changed(&mut self, region: &Region) {
        if region.is_empty() {
            return;
        }
        self.stats.changed_ops += 1;
        self.changed = self.changed.union(region);
        if !self.copied.is_empty() {
            self.copied = self.copied.subtract(region);
        }
    }

    /// Record that `dest`'s pixels equal prior-frame pixels at `dest - delta`
    ///
    /// Destination pixels whose source area is itself pending (changed or
    /// copied) cannot be reproduced from what the consumer holds, so they are
    /// demoted to changed. A delta conflicting with an existing copy demotes
    /// the older copy; the tracker carries at most one delta at a time.
    pub fn add_copied(&mut self, dest: &Region, delta: Point) {
        if dest.is_empty() {
            return;
        }
        self.stats.copy_ops += 1;

        let src = dest.translate(delta.negate());
        let dirty = self.changed.union(&self.copied);
        let stale = src.intersect(&dirty).translate(delta);
        let clean = dest.subtract(&stale);

        if clean.is_empty() {
            self.stats.copies_demoted += 1;
            self.changed = self.changed.union(dest);
        } else if self.copied.is_empty() || delta == self.copy_delta {
            self.copied = self.copied.union(&clean);
            self.copy_delta = delta;
            if !stale.is_empty() {
                self.stats.copies_demoted += 1;
                self.changed = self.changed.union(&stale);
            }
        } else {
            trace!(
                old_delta = ?self.copy_delta,
                new_delta = ?delta,
                "conflicting copy delta, demoting older copy to changed"
            );
            self.stats.copies_demoted += 1;
            self.changed = self.changed.union(&self.copied).union(&stale);
            self.copied = clean;
            self.copy_delta = delta;
        }
        // Changed wins every overlap.
        self.copied = self.copied.subtract(&self.changed);
    }

    /// The pending update intersected with `clip`
    ///
    /// When `max_area` is non-zero and the combined area exceeds it, copy
    /// hints are folded into changed (a copy hint is droppable, changed
    /// pixels never are); the consumer then sends fresh data for the lot.
    #[must_use]
    pub fn get_update_info(&self, clip: &Region, max_area: u64) -> UpdateInfo {
        let changed = self.changed.intersect(clip);
        let copied = self.copied.intersect(clip);

        if max_area > 0 && changed.area() + copied.area() > max_area && !copied.is_empty() {
            return UpdateInfo {
                changed: changed.union(&copied),
                copied: Region::new(),
                copy_delta: Point::new(0, 0),
            };
        }
        UpdateInfo {
            changed,
            copied,
            copy_delta: self.copy_delta,
        }
    }

    /// Remove `region` from both pending sets
    ///
    /// Called after the clipped portion of an update has been transmitted.
    pub fn subtract(&mut self, region: &Region) {
        self.changed = self.changed.subtract(region);
        self.copied = self.copied.subtract(region);
    }

    /// Drop everything pending
    ///
    /// The tracker has no acknowledgement protocol; callers clear after a
    /// successful flush.
    pub fn clear(&mut self) {
        self.changed = Region::new();
        self.copied = Region::new();
    }
}
