//! Adaptive Band Scan Scheduling
//!
//! [`ScanScheduler`] walks the screen in horizontal bands, one band per
//! tick: hint the band to the diff engine, compare, flush, hand any real
//! changes to the [`UpdateSink`]. When a pass finishes it measures the
//! achieved bands-per-second rate and nudges the band height to keep that
//! rate inside a configured window, so the effective update rate stays
//! steady regardless of screen size or capture speed.
//!
//! # Architecture
//!
//! ```text
//!   tick ──▶ lock ──▶ serial/mode check ──▶ scan one band ──▶ unlock
//!                        │                      │
//!                        ▼                      ▼
//!                  reset + notify         compare + flush
//!                  (ModeChanged)          ──▶ UpdateSink
//! ```
//!
//! The controller is a hysteresis band, not a PID: rates above the high
//! threshold grow the band by one row per pass, rates below the low
//! threshold shrink it, and anything inside the dead zone leaves it alone.
//! Oscillation inside the zone is accepted.
//!
//! # Usage
//!
//! ```rust
//! use framediff_pixels::{FrameView, PixelFormat};
//! use framediff_track::UpdateInfo;
//! use framediff_scan::{MemoryFrameSource, ScanConfig, ScanScheduler, UpdateSink};
//!
//! struct Printer;
//! impl UpdateSink for Printer {
//!     fn handle_update(&mut self, info: &UpdateInfo, _frame: &dyn FrameView) {
//!         println!("{} changed pixels", info.changed.area());
//!     }
//!     fn handle_mode_change(&mut self, w: u32, h: u32, _format: &PixelFormat) {
//!         println!("mode is now {w}x{h}");
//!     }
//! }
//!
//! let mut source = MemoryFrameSource::new(640, 480, PixelFormat::xrgb8888());
//! let mut sink = Printer;
//! let mut scheduler = ScanScheduler::new(ScanConfig::default())?;
//! scheduler.tick(&mut source, &mut sink)?;
//! # Ok::<(), framediff_scan::ScanError>(())
//! ```

use std::time::Instant;

use framediff_pixels::{FrameView, PixelFormat, Rect};
use framediff_track::{ComparingTracker, Region};
use tracing::{debug, trace};

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::source::{FrameSource, UpdateSink};

/// Where the scheduler is within a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No pass in progress; the next tick starts one at row 0
    Idle,
    /// Mid-pass; the cursor points at the next unscanned row
    Scanning,
}

/// What a single tick accomplished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A band was scanned and a non-empty update went to the sink
    Updated,
    /// A band was scanned and nothing had changed
    Clean,
    /// A mode change was detected; pending state was reset and the sink
    /// notified that its output is stale
    ModeChanged,
}

/// Counters and gauges for scan activity
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanStats {
    /// Ticks processed (including failed ones)
    pub ticks: u64,
    /// Full passes completed
    pub passes: u64,
    /// Non-empty updates delivered to the sink
    pub updates_sent: u64,
    /// Mode changes detected
    pub mode_changes: u64,
    /// Current band height in rows
    pub band_height: u32,
    /// Bands-per-second rate measured over the last completed pass
    pub bands_per_second: f64,
}

/// The adaptive band scanner
///
/// Owns the diff engine; borrows a [`FrameSource`] and an [`UpdateSink`]
/// for the duration of each tick. Not reentrant: one tick at a time, from
/// one thread.
#[derive(Debug)]
pub struct ScanScheduler {
    config: ScanConfig,
    tracker: ComparingTracker,
    state: ScanState,
    cursor: u32,
    band_height: u32,
    bands_this_pass: u32,
    full_repaint_pending: bool,
    pass_start: Instant,
    last_refresh: Instant,
    last_serial: Option<u64>,
    last_mode: Option<(u32, u32, PixelFormat)>,
    stats: ScanStats,
}

impl ScanScheduler {
    /// Create a scheduler from a validated configuration
    pub fn new(config: ScanConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|issues| ScanError::invalid_config(&issues))?;

        let now = Instant::now();
        let band_height = config.initial_band_height;
        Ok(Self {
            config,
            tracker: ComparingTracker::new(),
            state: ScanState::Idle,
            cursor: 0,
            band_height,
            bands_this_pass: 0,
            full_repaint_pending: true,
            pass_start: now,
            last_refresh: now,
            last_serial: None,
            last_mode: None,
            stats: ScanStats {
                band_height,
                ..ScanStats::default()
            },
        })
    }

    /// Current pass state
    #[must_use]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Current band height in rows
    #[must_use]
    pub fn band_height(&self) -> u32 {
        self.band_height
    }

    /// Activity counters
    #[must_use]
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Add an external change hint (input events, client requests)
    ///
    /// The area is refined by the diff engine when the scan cursor reaches
    /// it, just like a scanned band.
    pub fn hint_changed(&mut self, region: &Region) {
        self.tracker.add_changed(region);
    }

    /// Process one tick: lock the source, scan one band, unlock
    ///
    /// Errors from the backend propagate without retry; the caller skips
    /// the tick and tries again on the next one. The frame lock is released
    /// on every path.
    pub fn tick(
        &mut self,
        source: &mut dyn FrameSource,
        sink: &mut dyn UpdateSink,
    ) -> Result<TickOutcome> {
        self.stats.ticks += 1;
        let serial = source.lock_frame()?;
        let outcome = self.tick_locked(serial, source, sink);
        source.unlock_frame();
        outcome
    }

    fn tick_locked(
        &mut self,
        serial: u64,
        source: &mut dyn FrameSource,
        sink: &mut dyn UpdateSink,
    ) -> Result<TickOutcome> {
        let (width, height, format) = {
            let frame = source.frame()?;
            (frame.width(), frame.height(), *frame.format())
        };
        let mode = (width, height, format);

        let serial_changed = self.last_serial.is_some_and(|s| s != serial);
        let mode_changed = self.last_mode.is_some_and(|m| m != mode);
        self.last_serial = Some(serial);
        self.last_mode = Some(mode);

        if serial_changed || mode_changed {
            debug!(serial, width, height, "mode change, aborting pass");
            self.tracker.reset();
            self.state = ScanState::Idle;
            self.full_repaint_pending = true;
            self.stats.mode_changes += 1;
            sink.handle_mode_change(width, height, &format);
            return Ok(TickOutcome::ModeChanged);
        }

        if self.full_repaint_pending {
            // Initial connection state: the consumer knows nothing, so the
            // whole screen goes out in one update before banding starts.
            // The first compare seeds the snapshot and keeps the hint whole.
            source.refresh()?;
            self.last_refresh = Instant::now();
            let full = Region::from_rect(Rect::from_size(0, 0, width, height));
            self.tracker.add_changed(&full);

            let frame = source.frame()?;
            self.tracker.compare(&frame);
            let info = self.tracker.flush_update(&full, self.config.max_update_area);
            let delivered = !info.is_empty();
            if delivered {
                sink.handle_update(&info, &frame);
                self.stats.updates_sent += 1;
            }
            self.full_repaint_pending = false;
            self.state = ScanState::Idle;
            return Ok(if delivered {
                TickOutcome::Updated
            } else {
                TickOutcome::Clean
            });
        }

        let now = Instant::now();
        if self.state == ScanState::Idle {
            self.cursor = 0;
            self.bands_this_pass = 0;
            self.pass_start = now;
            source.refresh()?;
            self.last_refresh = now;
            self.state = ScanState::Scanning;
        } else if now.duration_since(self.last_refresh) >= self.config.recapture_interval {
            // Mid-pass recapture keeps pointer motion visible during a
            // long pass.
            source.refresh()?;
            self.last_refresh = now;
        }

        let rows = self.band_height.min(height.saturating_sub(self.cursor));
        let band = Rect::from_size(0, self.cursor as i32, width, rows);
        trace!(cursor = self.cursor, rows, "scanning band");

        self.tracker.add_changed(&Region::from_rect(band));
        let frame = source.frame()?;
        self.tracker.compare(&frame);
        // The compare refined and snapshot-advanced every pending rect,
        // external hints outside the band included, so the flush must cover
        // the whole screen or those refined diffs would be lost.
        let screen = Region::from_rect(Rect::from_size(0, 0, width, height));
        let info = self
            .tracker
            .flush_update(&screen, self.config.max_update_area);

        let delivered = !info.is_empty();
        if delivered {
            sink.handle_update(&info, &frame);
            self.stats.updates_sent += 1;
        }
        drop(frame);

        self.cursor = self.cursor.saturating_add(self.band_height);
        self.bands_this_pass += 1;

        if self.cursor >= height {
            let elapsed = self.pass_start.elapsed().as_secs_f64().max(1e-6);
            let rate = f64::from(self.bands_this_pass) / elapsed;
            self.adjust_band_height(rate, height);
            self.stats.passes += 1;
            self.state = ScanState::Idle;
        }

        Ok(if delivered {
            TickOutcome::Updated
        } else {
            TickOutcome::Clean
        })
    }

    /// Nudge the band height toward the target rate window
    ///
    /// One row per pass in either direction, clamped to
    /// `[min_band_height, screen_height]`.
    fn adjust_band_height(&mut self, bands_per_second: f64, screen_height: u32) {
        let previous = self.band_height;
        if bands_per_second > self.config.high_rate_threshold {
            self.band_height = self.band_height.saturating_add(1);
        } else if bands_per_second < self.config.low_rate_threshold {
            self.band_height = self.band_height.saturating_sub(1);
        }
        let upper = screen_height.max(self.config.min_band_height);
        self.band_height = self.band_height.clamp(self.config.min_band_height, upper);

        if self.band_height != previous {
            trace!(
                rate = bands_per_second,
                band_height = self.band_height,
                "band height adjusted"
            );
        }
        self.stats.band_height = self.band_height;
        self.stats.bands_per_second = bands_per_second;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framediff_track::UpdateInfo;

    use crate::source::MemoryFrameSource;

    /// Records everything the scheduler delivers.
    #[derive(Default)]
    struct CollectingSink {
        updates: Vec<UpdateInfo>,
        mode_changes: Vec<(u32, u32)>,
    }

    impl UpdateSink for CollectingSink {
        fn handle_update(&mut self, info: &UpdateInfo, _frame: &dyn FrameView) {
            self.updates.push(info.clone());
        }

        fn handle_mode_change(&mut self, width: u32, height: u32, _format: &PixelFormat) {
            self.mode_changes.push((width, height));
        }
    }

    /// A source whose refresh can be made to fail on demand.
    struct FlakySource {
        inner: MemoryFrameSource,
        fail_refresh: bool,
    }

    impl FrameSource for FlakySource {
        fn lock_frame(&mut self) -> Result<u64> {
            self.inner.lock_frame()
        }

        fn unlock_frame(&mut self) {
            self.inner.unlock_frame();
        }

        fn frame(&self) -> Result<framediff_pixels::BorrowedFrame<'_>> {
            self.inner.frame()
        }

        fn refresh(&mut self) -> Result<()> {
            if self.fail_refresh {
                Err(ScanError::refresh_failed("backend unavailable"))
            } else {
                self.inner.refresh()
            }
        }
    }

    fn scheduler(config: ScanConfig) -> ScanScheduler {
        ScanScheduler::new(config).expect("valid config")
    }

    fn run_full_pass(
        scheduler: &mut ScanScheduler,
        source: &mut MemoryFrameSource,
        sink: &mut CollectingSink,
    ) {
        loop {
            scheduler.tick(source, sink).expect("tick");
            if scheduler.state() == ScanState::Idle {
                break;
            }
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ScanConfig {
            min_band_height: 0,
            ..Default::default()
        };
        assert!(matches!(
            ScanScheduler::new(config),
            Err(ScanError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_first_tick_delivers_full_screen() {
        let mut source = MemoryFrameSource::new(64, 48, PixelFormat::xrgb8888());
        let mut sink = CollectingSink::default();
        let mut scheduler = scheduler(ScanConfig {
            initial_band_height: 16,
            ..Default::default()
        });

        // No prior snapshot: the whole screen goes out in one update.
        let outcome = scheduler.tick(&mut source, &mut sink).expect("tick");
        assert_eq!(outcome, TickOutcome::Updated);
        assert_eq!(sink.updates.len(), 1);
        assert_eq!(sink.updates[0].area(), 64 * 48);
        assert_eq!(scheduler.state(), ScanState::Idle);

        // The banded pass that follows finds nothing new.
        sink.updates.clear();
        run_full_pass(&mut scheduler, &mut source, &mut sink);
        assert!(sink.updates.is_empty());
        assert_eq!(scheduler.stats().passes, 1);
    }

    #[test]
    fn test_steady_screen_goes_quiet() {
        let mut source = MemoryFrameSource::new(64, 48, PixelFormat::xrgb8888());
        let mut sink = CollectingSink::default();
        let mut scheduler = scheduler(ScanConfig::default());

        run_full_pass(&mut scheduler, &mut source, &mut sink);
        sink.updates.clear();

        run_full_pass(&mut scheduler, &mut source, &mut sink);
        assert!(sink.updates.is_empty());
    }

    #[test]
    fn test_paint_between_passes_is_detected_exactly() {
        let mut source = MemoryFrameSource::new(64, 48, PixelFormat::xrgb8888());
        let mut sink = CollectingSink::default();
        let mut scheduler = scheduler(ScanConfig::default());

        run_full_pass(&mut scheduler, &mut source, &mut sink);
        sink.updates.clear();

        let square = Rect::new(10, 10, 20, 20);
        source.paint_rect(&square, 0x00FF_FFFF);
        run_full_pass(&mut scheduler, &mut source, &mut sink);

        assert_eq!(sink.updates.len(), 1);
        assert_eq!(sink.updates[0].changed.rects(), &[square]);
    }

    #[test]
    fn test_mode_change_resets_and_notifies() {
        let mut source = MemoryFrameSource::new(64, 48, PixelFormat::xrgb8888());
        let mut sink = CollectingSink::default();
        let mut scheduler = scheduler(ScanConfig::default());

        run_full_pass(&mut scheduler, &mut source, &mut sink);
        sink.updates.clear();

        source.set_mode(32, 32, PixelFormat::rgb565());
        let outcome = scheduler.tick(&mut source, &mut sink).expect("tick");
        assert_eq!(outcome, TickOutcome::ModeChanged);
        assert_eq!(sink.mode_changes, vec![(32, 32)]);
        assert_eq!(scheduler.state(), ScanState::Idle);

        // The snapshot was dropped, so the next pass is a full repaint.
        run_full_pass(&mut scheduler, &mut source, &mut sink);
        let total: u64 = sink.updates.iter().map(UpdateInfo::area).sum();
        assert_eq!(total, 32 * 32);
    }

    #[test]
    fn test_band_height_grows_when_rate_is_high() {
        let mut scheduler = scheduler(ScanConfig::default());
        let start = scheduler.band_height();

        for _ in 0..1000 {
            let before = scheduler.band_height();
            scheduler.adjust_band_height(100.0, 480);
            assert!(scheduler.band_height() >= before);
        }
        assert!(scheduler.band_height() > start);
        assert_eq!(scheduler.band_height(), 480); // clamped at screen height
    }

    #[test]
    fn test_band_height_shrinks_when_rate_is_low() {
        let mut scheduler = scheduler(ScanConfig::default());

        for _ in 0..1000 {
            let before = scheduler.band_height();
            scheduler.adjust_band_height(1.0, 480);
            assert!(scheduler.band_height() <= before);
        }
        assert_eq!(scheduler.band_height(), 4); // clamped at the minimum
    }

    #[test]
    fn test_dead_zone_leaves_band_height_alone() {
        let mut scheduler = scheduler(ScanConfig::default());
        let start = scheduler.band_height();
        scheduler.adjust_band_height(25.0, 480);
        assert_eq!(scheduler.band_height(), start);
    }

    #[test]
    fn test_backend_error_skips_tick_and_releases_lock() {
        let mut source = FlakySource {
            inner: MemoryFrameSource::new(64, 48, PixelFormat::xrgb8888()),
            fail_refresh: true,
        };
        let mut sink = CollectingSink::default();
        let mut scheduler = scheduler(ScanConfig::default());

        assert!(scheduler.tick(&mut source, &mut sink).is_err());
        assert!(!source.inner.is_locked());

        // The next tick succeeds once the backend recovers.
        source.fail_refresh = false;
        scheduler.tick(&mut source, &mut sink).expect("tick");
    }

    #[test]
    fn test_stale_hint_is_refined_away() {
        let mut source = MemoryFrameSource::new(64, 48, PixelFormat::xrgb8888());
        let mut sink = CollectingSink::default();
        let mut scheduler = scheduler(ScanConfig::default());

        run_full_pass(&mut scheduler, &mut source, &mut sink);
        sink.updates.clear();

        // A stale hint over unchanged pixels is refined away to nothing.
        scheduler.hint_changed(&Region::from_rect(Rect::new(0, 0, 64, 8)));
        run_full_pass(&mut scheduler, &mut source, &mut sink);
        assert!(sink.updates.is_empty());
    }

    #[test]
    fn test_hint_below_the_band_is_delivered() {
        let mut source = MemoryFrameSource::new(64, 48, PixelFormat::xrgb8888());
        let mut sink = CollectingSink::default();
        let mut scheduler = scheduler(ScanConfig {
            initial_band_height: 32,
            ..Default::default()
        });

        run_full_pass(&mut scheduler, &mut source, &mut sink);
        sink.updates.clear();

        // A real change hinted below the first band: the compare refines it
        // along with the band, so it must reach the sink within the pass.
        let square = Rect::new(20, 40, 30, 48);
        source.paint_rect(&square, 0x00FF_FFFF);
        scheduler.hint_changed(&Region::from_rect(square));
        run_full_pass(&mut scheduler, &mut source, &mut sink);

        let total: u64 = sink.updates.iter().map(|u| u.changed.area()).sum();
        assert_eq!(total, 80);
        assert!(sink
            .updates
            .iter()
            .any(|u| u.changed.rects().contains(&square)));
    }
}
