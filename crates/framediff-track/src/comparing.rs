//! Snapshot-Comparing Diff Engine
//!
//! [`ComparingTracker`] wraps an [`UpdateTracker`] and narrows its broad
//! changed-region hints down to the pixels that actually differ, by comparing
//! live frame data against a retained previous-frame snapshot.
//!
//! # Compare-Then-Flush Cycle
//!
//! ```rust
//! use framediff_pixels::{BorrowedFrame, PixelFormat, Rect};
//! use framediff_track::{ComparingTracker, Region};
//!
//! let data = vec![0u8; 320 * 240 * 4];
//! let live = BorrowedFrame::new(&data, 320, 240, 320, PixelFormat::xrgb8888())?;
//!
//! let mut tracker = ComparingTracker::new();
//! tracker.add_changed(&Region::from_rect(Rect::new(0, 0, 320, 240)));
//!
//! // First compare has no prior frame: the full hint survives.
//! tracker.compare(&live);
//! let info = tracker.flush_update(&Region::from_rect(Rect::new(0, 0, 320, 240)), 0);
//! assert_eq!(info.changed.area(), 320 * 240);
//!
//! // Nothing moved since the snapshot was taken, so nothing survives now.
//! tracker.add_changed(&Region::from_rect(Rect::new(0, 0, 320, 240)));
//! tracker.compare(&live);
//! assert!(tracker.is_empty());
//! # Ok::<(), framediff_pixels::BufferError>(())
//! ```
//!
//! # Comparison Semantics
//!
//! Comparison is byte-exact over the packed pixel representation, padding
//! bits included. Two logically equal colours stored with different pad-bit
//! garbage compare unequal; the cost is a spurious micro-update, never a
//! missed one. Formats that are not byte-comparable (big-endian with more
//! than 8 bits per pixel) skip the diff and pass the hint through whole.
//!
//! Not reentrant. The live buffer may be torn by a concurrent video write;
//! clamped row access keeps every read in bounds, and the next pass corrects
//! any tear.

use framediff_pixels::{FrameSnapshot, FrameView, Point};
use tracing::{debug, warn};

use crate::region::Region;
use crate::tracker::{UpdateInfo, UpdateTracker};

/// Counters for diff activity since construction
#[derive(Debug, Clone, Copy, Default)]
pub struct CompareStats {
    /// Compare passes run
    pub passes: u64,
    /// Hinted rectangles walked pixel-by-pixel
    pub rects_compared: u64,
    /// Snapshot reallocations (first pass or mode change)
    pub full_refreshes: u64,
    /// Passes skipped because the format is not byte-comparable
    pub opaque_formats: u64,
}

/// An update tracker that shrinks hints to exact pixel diffs
#[derive(Debug, Default)]
pub struct ComparingTracker {
    tracker: UpdateTracker,
    snapshot: Option<FrameSnapshot>,
    stats: CompareStats,
}

impl ComparingTracker {
    /// A tracker with no prior snapshot
    ///
    /// The first [`compare`](Self::compare) captures the snapshot and leaves
    /// the hint untouched, so the whole hinted area is reported changed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no update is pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracker.is_empty()
    }

    /// Diff activity counters
    #[must_use]
    pub fn stats(&self) -> CompareStats {
        self.stats
    }

    /// The wrapped accumulator
    #[must_use]
    pub fn tracker(&self) -> &UpdateTracker {
        &self.tracker
    }

    /// Record that `region` changed (broad hint, refined by `compare`)
    pub fn add_changed(&mut self, region: &Region) {
        self.tracker.add_changed(region);
    }

    /// Record a copy hint (passed through to the accumulator unrefined)
    pub fn add_copied(&mut self, dest: &Region, delta: Point) {
        self.tracker.add_copied(dest, delta);
    }

    /// Shrink the pending changed region to the pixels that differ from the
    /// snapshot, then refresh the snapshot under the compared area
    ///
    /// The result is always a subset of the pending hint: compare never marks
    /// a pixel changed outside what the caller supplied. With no valid prior
    /// snapshot (first call, or geometry/format disagreement) the snapshot is
    /// reallocated whole and the hint survives unrefined.
    pub fn compare(&mut self, live: &dyn FrameView) {
        self.stats.passes += 1;
        if self.tracker.changed.is_empty() {
            return;
        }

        let valid_prior = self
            .snapshot
            .as_ref()
            .is_some_and(|snap| snap.matches(live));
        if !valid_prior {
            debug!(
                width = live.width(),
                height = live.height(),
                "no usable prior snapshot, treating hinted area as changed"
            );
            self.snapshot = Some(FrameSnapshot::capture(live));
            self.stats.full_refreshes += 1;
            return;
        }

        if !live.format().byte_comparable() {
            warn!(
                bits_per_pixel = live.format().bits_per_pixel,
                "format is not byte-comparable, skipping diff"
            );
            self.stats.opaque_formats += 1;
            self.refresh_hinted_rects(live);
            return;
        }

        let Some(snap) = self.snapshot.as_mut() else {
            return;
        };
        let bpp = live.format().bytes_per_pixel();
        let bounds = live.bounds();

        let mut exact = Region::new();
        for rect in self.tracker.changed.rects() {
            let rect = rect.intersection(&bounds);
            if rect.is_empty() {
                continue;
            }
            self.stats.rects_compared += 1;

            let rows = (rect.top..rect.bottom).map(|y| {
                let old = snap.row_span(y, rect.left, rect.right);
                let new = live.row_span(y, rect.left, rect.right);
                if old == new {
                    (y, Vec::new())
                } else {
                    (y, differing_runs(old, new, bpp, rect.left))
                }
            });
            let diff = Region::from_row_intervals(rows);
            snap.copy_rect_from(live, &rect);
            exact = exact.union(&diff);
        }
        self.tracker.changed = exact;
    }

    /// The pending update clipped to `clip`, removed from the tracker
    ///
    /// Compare-then-flush is the intended order; flushing without comparing
    /// yields a correct superset of the true diff.
    pub fn flush_update(&mut self, clip: &Region, max_area: u64) -> UpdateInfo {
        let info = self.tracker.get_update_info(clip, max_area);
        self.tracker.subtract(clip);
        info
    }

    /// Drop the snapshot and all pending state
    ///
    /// Mode-change and reconnect path: the next compare has no prior frame,
    /// so whatever is hinted next is reported changed in full.
    pub fn reset(&mut self) {
        self.tracker.clear();
        self.snapshot = None;
    }

    /// Copy the hinted rectangles from `live` into the snapshot unchanged
    fn refresh_hinted_rects(&mut self, live: &dyn FrameView) {
        if let Some(snap) = self.snapshot.as_mut() {
            for rect in self.tracker.changed.rects() {
                snap.copy_rect_from(live, rect);
            }
        }
    }
}

/// Contiguous runs of differing pixels between two row spans
///
/// Returns x-sorted, merged `[x0, x1)` pixel intervals offset by `x_base`.
/// Spans of unequal length (possible for a stale rectangle mid mode change)
/// are compared over their common prefix.
fn differing_runs(old: &[u8], new: &[u8], bpp: usize, x_base: i32) -> Vec<(i32, i32)> {
    let pixels = old.len().min(new.len()) / bpp;
    let mut runs = Vec::new();
    let mut run_start: Option<i32> = None;

    for px in 0..pixels {
        let at = px * bpp;
        if old[at..at + bpp] == new[at..at + bpp] {
            if let Some(start) = run_start.take() {
                runs.push((start, x_base + px as i32));
            }
        } else if run_start.is_none() {
            run_start = Some(x_base + px as i32);
        }
    }
    if let Some(start) = run_start {
        runs.push((start, x_base + pixels as i32));
    }
    runs
}
