//! # framediff-pixels
//!
//! Pixel formats, colour maps, and frame buffer views for the
//! [framediff](https://github.com/framediff/framediff) workspace.
//!
//! This crate holds the leaf data model shared by the capture boundary and
//! the diff engine:
//!
//! - **Geometry**: [`Point`] and [`Rect`] (exclusive right/bottom edges)
//! - **Pixel description**: [`PixelFormat`] (true colour or palette) and
//!   [`ColourMap`]
//! - **Buffer access**: the [`FrameView`] trait, [`BorrowedFrame`] for live
//!   capture memory, and [`FrameSnapshot`] for retained previous-frame
//!   copies
//!
//! # Quick Start
//!
//! ```rust
//! use framediff_pixels::{BorrowedFrame, FrameSnapshot, FrameView, PixelFormat};
//!
//! let data = vec![0u8; 640 * 480 * 4];
//! let live = BorrowedFrame::new(&data, 640, 480, 640, PixelFormat::xrgb8888())?;
//!
//! // Retain a private copy for later comparison
//! let snapshot = FrameSnapshot::capture(&live);
//! assert!(snapshot.matches(&live));
//! # Ok::<(), framediff_pixels::BufferError>(())
//! ```
//!
//! # Ownership Model
//!
//! A [`BorrowedFrame`] is a window onto memory owned elsewhere (typically
//! video memory mapped by a capture backend); it is only valid while that
//! backend's frame lock is held. A [`FrameSnapshot`] owns its bytes and is
//! reallocated whole on any geometry or format change.

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod buffer;
pub mod error;
pub mod format;
pub mod geom;

// =============================================================================
// RE-EXPORTS - PRIMARY API
// =============================================================================

pub use buffer::{BorrowedFrame, FrameSnapshot, FrameView};
pub use error::{BufferError, FormatError};
pub use format::{ColourMap, PixelFormat};
pub use geom::{Point, Rect};
