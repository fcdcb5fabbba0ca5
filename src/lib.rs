//! # framediff
//!
//! Incremental framebuffer diffing and update tracking for remote
//! framebuffer (RFB/VNC) servers.
//!
//! This crate provides a unified interface to the framediff libraries:
//!
//! - **[`pixels`]** - Geometry, pixel formats, colour maps, and frame buffer views
//! - **[`track`]** - Region set algebra and the snapshot-comparing update tracker
//! - **[`scan`]** - Adaptive band scan scheduling and the async tick driver
//!
//! # Features
//!
//! All features are enabled by default. You can selectively enable only what you need:
//!
//! ```toml
//! # Use everything (default)
//! framediff = "0.2"
//!
//! # Region algebra and diffing only
//! framediff = { version = "0.2", default-features = false, features = ["track"] }
//!
//! # Pixel data model only
//! framediff = { version = "0.2", default-features = false, features = ["pixels"] }
//! ```
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `pixels` | Yes | Geometry, pixel formats, frame buffer views |
//! | `track` | Yes | Region algebra and update tracking |
//! | `scan` | Yes | Adaptive band scanning and the tokio driver |
//! | `full` | No | All features from all sub-crates |
//!
//! # Quick Start
//!
//! ```rust
//! use framediff::prelude::*;
//!
//! // A synthetic 640x480 screen and a sink that counts delivered pixels.
//! struct Counter(u64);
//! impl UpdateSink for Counter {
//!     fn handle_update(&mut self, info: &UpdateInfo, _frame: &dyn FrameView) {
//!         self.0 += info.area();
//!     }
//!     fn handle_mode_change(&mut self, _w: u32, _h: u32, _format: &PixelFormat) {}
//! }
//!
//! let mut source = MemoryFrameSource::new(640, 480, PixelFormat::xrgb8888());
//! let mut sink = Counter(0);
//! let mut scheduler = ScanScheduler::new(ScanConfig::default())?;
//!
//! // Initial full-screen update, then exact diffs only.
//! scheduler.tick(&mut source, &mut sink)?;
//! assert_eq!(sink.0, 640 * 480);
//!
//! source.paint_rect(&Rect::new(100, 100, 110, 110), 0x00FF_FFFF);
//! # Ok::<(), framediff::scan::ScanError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          framediff                              │
//! ├────────────────────┬────────────────────┬───────────────────────┤
//! │  framediff-pixels  │  framediff-track   │    framediff-scan     │
//! │                    │                    │                       │
//! │  Rect / Point      │  Region            │  ScanScheduler        │
//! │  PixelFormat       │  UpdateTracker     │  ScanDriver           │
//! │  FrameView         │  ComparingTracker  │  FrameSource / Sink   │
//! └─────────┬──────────┴──────────┬─────────┴───────────┬───────────┘
//!           │                     │                     │
//!           ▼                     ▼                     ▼
//!     capture memory         exact diffs          tick cadence
//! ```
//!
//! The capture backend and the wire encoder stay outside: they connect
//! through the [`scan::FrameSource`] and [`scan::UpdateSink`] traits.
//!
//! # Related Crates
//!
//! You can also use the individual crates directly:
//!
//! - [`framediff-pixels`](https://crates.io/crates/framediff-pixels) - Pixel data model only
//! - [`framediff-track`](https://crates.io/crates/framediff-track) - Region algebra and diffing only
//! - [`framediff-scan`](https://crates.io/crates/framediff-scan) - Scan scheduling only

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// RE-EXPORTS
// =============================================================================

/// Geometry, pixel formats, colour maps, and frame buffer views.
///
/// The leaf data model shared by the capture boundary and the diff engine:
/// - `Point` / `Rect` geometry with exclusive right/bottom edges
/// - `PixelFormat` and `ColourMap` pixel descriptions
/// - The `FrameView` trait with `BorrowedFrame` and `FrameSnapshot`
///
/// See [`framediff_pixels`] documentation for details.
#[cfg(feature = "pixels")]
#[cfg_attr(docsrs, doc(cfg(feature = "pixels")))]
pub use framediff_pixels as pixels;

/// Region set algebra and snapshot-comparing update tracking.
///
/// This module turns broad change hints into exact dirty rectangles:
/// - `Region` with union/intersect/subtract in canonical banded form
/// - `UpdateTracker` accumulating changed regions and copy hints
/// - `ComparingTracker` diffing live pixels against a retained snapshot
///
/// See [`framediff_track`] documentation for details.
#[cfg(feature = "track")]
#[cfg_attr(docsrs, doc(cfg(feature = "track")))]
pub use framediff_track as track;

/// Adaptive band scan scheduling and the async tick driver.
///
/// This module drives the diff engine:
/// - `ScanScheduler` walking the screen band by band with a
///   hysteresis band-height controller
/// - `ScanDriver` tokio tick loop with watch-channel shutdown
/// - `FrameSource` / `UpdateSink` capability traits and the in-memory
///   `MemoryFrameSource` backend
///
/// See [`framediff_scan`] documentation for details.
#[cfg(feature = "scan")]
#[cfg_attr(docsrs, doc(cfg(feature = "scan")))]
pub use framediff_scan as scan;

// =============================================================================
// PRELUDE - Common types for convenience
// =============================================================================

/// Prelude module with commonly used types.
///
/// ```rust
/// use framediff::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "pixels")]
    pub use framediff_pixels::{
        BorrowedFrame, ColourMap, FrameSnapshot, FrameView, PixelFormat, Point, Rect,
    };

    #[cfg(feature = "track")]
    pub use framediff_track::{ComparingTracker, Region, UpdateInfo, UpdateTracker};

    #[cfg(feature = "scan")]
    pub use framediff_scan::{
        FrameSource, MemoryFrameSource, ScanConfig, ScanDriver, ScanScheduler, UpdateSink,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    #[cfg(feature = "pixels")]
    fn test_pixels_reexport() {
        // Just verify the re-export works
        let _ = pixels::PixelFormat::default();
    }

    #[test]
    #[cfg(feature = "track")]
    fn test_track_reexport() {
        // Just verify the re-export works
        assert!(track::Region::new().is_empty());
    }

    #[test]
    #[cfg(feature = "scan")]
    fn test_scan_reexport() {
        // Just verify the re-export works
        assert!(scan::ScanConfig::default().validate().is_ok());
    }
}
