//! Async Tick Loop
//!
//! [`ScanDriver`] owns a [`ScanScheduler`] together with its source and
//! sink and drives ticks from a tokio interval. Applications that already
//! have a tick source of their own can call
//! [`ScanScheduler::tick`] directly instead; the driver is a convenience,
//! not a requirement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use framediff_pixels::{FrameView, PixelFormat};
//! use framediff_track::UpdateInfo;
//! use framediff_scan::{MemoryFrameSource, ScanConfig, ScanDriver, UpdateSink};
//!
//! # struct Encoder;
//! # impl UpdateSink for Encoder {
//! #     fn handle_update(&mut self, _: &UpdateInfo, _: &dyn FrameView) {}
//! #     fn handle_mode_change(&mut self, _: u32, _: u32, _: &PixelFormat) {}
//! # }
//! # async fn example() -> Result<(), framediff_scan::ScanError> {
//! let source = MemoryFrameSource::new(1280, 800, PixelFormat::xrgb8888());
//! let driver = ScanDriver::new(ScanConfig::default(), source, Encoder)?;
//!
//! let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let stats = driver.stats_handle();
//! let task = tokio::spawn(driver.run(shutdown_rx));
//!
//! // ... later ...
//! let _ = shutdown_tx.send(true);
//! let final_stats = task.await.expect("driver task");
//! println!("sent {} updates", final_stats.updates_sent);
//! # let _ = stats;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace, warn};

use crate::config::ScanConfig;
use crate::error::Result;
use crate::scheduler::{ScanScheduler, ScanStats};
use crate::source::{FrameSource, UpdateSink};

/// Drives a [`ScanScheduler`] on a steady tokio interval
///
/// Tick errors are logged and the tick skipped; missed ticks (the loop
/// falling behind the cadence) are skipped rather than bursted. A shared
/// [`ScanStats`] snapshot is refreshed after every tick for observers.
pub struct ScanDriver<S, K> {
    scheduler: ScanScheduler,
    source: S,
    sink: K,
    tick_interval: std::time::Duration,
    stats: Arc<Mutex<ScanStats>>,
}

impl<S: FrameSource, K: UpdateSink> ScanDriver<S, K> {
    /// Create a driver from a validated configuration
    pub fn new(config: ScanConfig, source: S, sink: K) -> Result<Self> {
        let tick_interval = config.tick_interval;
        let scheduler = ScanScheduler::new(config)?;
        let stats = Arc::new(Mutex::new(scheduler.stats()));
        Ok(Self {
            scheduler,
            source,
            sink,
            tick_interval,
            stats,
        })
    }

    /// A shared handle to the latest stats snapshot
    ///
    /// Updated after every tick; clone it before calling [`run`](Self::run).
    #[must_use]
    pub fn stats_handle(&self) -> Arc<Mutex<ScanStats>> {
        Arc::clone(&self.stats)
    }

    /// Run the tick loop until the shutdown channel flips to `true` or its
    /// sender is dropped
    ///
    /// Returns the final stats snapshot.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> ScanStats {
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        debug!("scan driver started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.scheduler.tick(&mut self.source, &mut self.sink) {
                        Ok(outcome) => trace!(?outcome, "tick complete"),
                        Err(error) => warn!(%error, "tick failed, skipping"),
                    }
                    *self.stats.lock() = self.scheduler.stats();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        debug!("scan driver stopped");
        self.scheduler.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use framediff_pixels::{FrameView, PixelFormat};
    use framediff_track::UpdateInfo;

    use crate::source::MemoryFrameSource;

    /// Publishes delivered areas through a shared handle, since `run`
    /// consumes the sink.
    struct SharedSink {
        areas: Arc<Mutex<Vec<u64>>>,
    }

    impl UpdateSink for SharedSink {
        fn handle_update(&mut self, info: &UpdateInfo, _frame: &dyn FrameView) {
            self.areas.lock().push(info.area());
        }

        fn handle_mode_change(&mut self, _w: u32, _h: u32, _format: &PixelFormat) {}
    }

    #[tokio::test]
    async fn test_driver_runs_and_shuts_down() {
        let source = MemoryFrameSource::new(64, 48, PixelFormat::xrgb8888());
        let areas = Arc::new(Mutex::new(Vec::new()));
        let sink = SharedSink {
            areas: Arc::clone(&areas),
        };

        let config = ScanConfig {
            tick_interval: Duration::from_millis(1),
            ..Default::default()
        };
        let driver = ScanDriver::new(config, source, sink).expect("driver");
        let stats_handle = driver.stats_handle();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(driver.run(shutdown_rx));

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).expect("send shutdown");
        let final_stats = task.await.expect("driver task");

        assert!(final_stats.ticks > 0);
        // The first tick delivered the initial full-screen update.
        assert_eq!(areas.lock().first().copied(), Some(64 * 48));
        assert_eq!(stats_handle.lock().ticks, final_stats.ticks);
    }

    #[tokio::test]
    async fn test_driver_stops_when_sender_dropped() {
        let source = MemoryFrameSource::new(16, 16, PixelFormat::xrgb8888());
        let sink = SharedSink {
            areas: Arc::new(Mutex::new(Vec::new())),
        };
        let config = ScanConfig {
            tick_interval: Duration::from_millis(1),
            ..Default::default()
        };
        let driver = ScanDriver::new(config, source, sink).expect("driver");

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(driver.run(shutdown_rx));
        drop(shutdown_tx);

        let stats = task.await.expect("driver task");
        assert_eq!(stats.mode_changes, 0);
    }
}
