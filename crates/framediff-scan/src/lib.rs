//! # framediff-scan
//!
//! Adaptive band scan scheduling for the
//! [framediff](https://github.com/framediff/framediff) workspace.
//!
//! This crate closes the loop around the diff engine: it walks the screen
//! in horizontal bands, feeds each band to a
//! [`ComparingTracker`](framediff_track::ComparingTracker), delivers
//! whatever genuinely changed to a transport, and tunes the band height
//! from measured throughput so the update rate stays steady across screen
//! sizes and capture speeds.
//!
//! - [`FrameSource`] / [`UpdateSink`]: the narrow capability traits at the
//!   capture and transport boundaries
//! - [`ScanConfig`]: thresholds, clamps, and intervals, with a builder
//! - [`ScanScheduler`]: the per-tick state machine
//! - [`ScanDriver`]: an optional tokio tick loop around the scheduler
//! - [`MemoryFrameSource`]: an in-memory backend for tests and examples
//!
//! # Quick Start
//!
//! ```rust
//! use framediff_pixels::{FrameView, PixelFormat, Rect};
//! use framediff_track::UpdateInfo;
//! use framediff_scan::{MemoryFrameSource, ScanConfig, ScanScheduler, UpdateSink};
//!
//! struct Collector(u64);
//! impl UpdateSink for Collector {
//!     fn handle_update(&mut self, info: &UpdateInfo, _frame: &dyn FrameView) {
//!         self.0 += info.area();
//!     }
//!     fn handle_mode_change(&mut self, _w: u32, _h: u32, _format: &PixelFormat) {}
//! }
//!
//! let mut source = MemoryFrameSource::new(320, 240, PixelFormat::xrgb8888());
//! let mut sink = Collector(0);
//! let mut scheduler = ScanScheduler::new(ScanConfig::default())?;
//!
//! // First tick: initial full-screen update.
//! scheduler.tick(&mut source, &mut sink)?;
//! assert_eq!(sink.0, 320 * 240);
//!
//! // Paint something and keep ticking; only the square comes back.
//! source.paint_rect(&Rect::new(10, 10, 20, 20), 0x00FF_FFFF);
//! # Ok::<(), framediff_scan::ScanError>(())
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod config;
pub mod driver;
pub mod error;
pub mod scheduler;
pub mod source;

// =============================================================================
// RE-EXPORTS - PRIMARY API
// =============================================================================

pub use config::{ScanConfig, ScanConfigBuilder};
pub use driver::ScanDriver;
pub use error::{Result, ScanError};
pub use scheduler::{ScanScheduler, ScanState, ScanStats, TickOutcome};
pub use source::{FrameSource, MemoryFrameSource, UpdateSink};
