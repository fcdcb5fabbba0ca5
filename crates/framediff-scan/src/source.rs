//! Capture and Transport Capability Traits
//!
//! The scheduler reaches the outside world through two narrow traits so the
//! diff core carries zero dependency on any capture backend or wire encoder:
//!
//! - [`FrameSource`]: the capture side. Lock, read briefly through a
//!   [`BorrowedFrame`], unlock. The serial number returned by the lock is
//!   the mode-change signal: it changes iff geometry or pixel format changed
//!   since the last lock.
//! - [`UpdateSink`]: the transport side. Receives flushed [`UpdateInfo`]
//!   batches plus a readable frame view; how they become wire bytes is not
//!   this crate's concern.
//!
//! [`MemoryFrameSource`] is a complete in-memory backend for tests and
//! examples.

use framediff_pixels::{BorrowedFrame, ColourMap, FrameView, PixelFormat};
use framediff_track::UpdateInfo;

use crate::error::{Result, ScanError};

/// The capture side of a scan: a lockable live frame buffer
///
/// The lock is bounded-duration by contract ("lock, read briefly, unlock");
/// the scheduler holds it only for the duration of a single tick, never
/// across ticks.
pub trait FrameSource {
    /// Acquire the frame lock and return the mode serial
    ///
    /// The serial changes iff geometry or pixel format changed since the
    /// last lock.
    fn lock_frame(&mut self) -> Result<u64>;

    /// Release the frame lock
    fn unlock_frame(&mut self);

    /// A view over the live pixels; only valid while the lock is held
    fn frame(&self) -> Result<BorrowedFrame<'_>>;

    /// Bring the pixel data up to date
    ///
    /// A no-op for zero-copy backends that always expose live memory.
    fn refresh(&mut self) -> Result<()>;
}

/// The transport side of a scan: consumes flushed updates
pub trait UpdateSink {
    /// Deliver a non-empty update batch together with a readable frame
    fn handle_update(&mut self, info: &UpdateInfo, frame: &dyn FrameView);

    /// The video mode changed; all previously delivered output is stale
    ///
    /// Equivalent to the initial connection state: the consumer should
    /// expect a full-screen update next.
    fn handle_mode_change(&mut self, width: u32, height: u32, format: &PixelFormat);
}

/// An owned in-memory frame buffer implementing [`FrameSource`]
///
/// Stands in for a real capture backend in tests and examples. `set_mode`
/// bumps the serial exactly as a real backend's connection version counter
/// would on a video mode switch.
#[derive(Debug)]
pub struct MemoryFrameSource {
    data: Vec<u8>,
    width: u32,
    height: u32,
    format: PixelFormat,
    colour_map: Option<ColourMap>,
    serial: u64,
    locked: bool,
}

impl MemoryFrameSource {
    /// A zeroed buffer of the given mode
    #[must_use]
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let bpp = format.bytes_per_pixel();
        Self {
            data: vec![0u8; (width * height) as usize * bpp],
            width,
            height,
            format,
            colour_map: None,
            serial: 1,
            locked: false,
        }
    }

    /// Attach a palette for indexed formats
    #[must_use]
    pub fn with_colour_map(mut self, map: ColourMap) -> Self {
        self.colour_map = Some(map);
        self
    }

    /// Width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current pixel format
    #[must_use]
    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    /// Current mode serial
    #[must_use]
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// True while the frame lock is held
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Switch video mode: reallocate the buffer and bump the serial
    pub fn set_mode(&mut self, width: u32, height: u32, format: PixelFormat) {
        let bpp = format.bytes_per_pixel();
        self.data = vec![0u8; (width * height) as usize * bpp];
        self.width = width;
        self.height = height;
        self.format = format;
        self.serial += 1;
    }

    /// Fill the whole buffer with a packed little-endian pixel value
    pub fn fill(&mut self, pixel: u32) {
        let full = framediff_pixels::Rect::from_size(0, 0, self.width, self.height);
        self.paint_rect(&full, pixel);
    }

    /// Paint a rectangle with a packed little-endian pixel value
    ///
    /// The rectangle is clamped to the buffer.
    pub fn paint_rect(&mut self, rect: &framediff_pixels::Rect, pixel: u32) {
        let bounds = framediff_pixels::Rect::from_size(0, 0, self.width, self.height);
        let rect = rect.intersection(&bounds);
        let bpp = self.format.bytes_per_pixel();
        let bytes = pixel.to_le_bytes();

        for y in rect.top..rect.bottom {
            for x in rect.left..rect.right {
                let at = ((y as u32 * self.width + x as u32) as usize) * bpp;
                self.data[at..at + bpp].copy_from_slice(&bytes[..bpp]);
            }
        }
    }
}

impl FrameSource for MemoryFrameSource {
    fn lock_frame(&mut self) -> Result<u64> {
        if self.locked {
            return Err(ScanError::lock_failed("frame lock already held"));
        }
        self.locked = true;
        Ok(self.serial)
    }

    fn unlock_frame(&mut self) {
        self.locked = false;
    }

    fn frame(&self) -> Result<BorrowedFrame<'_>> {
        let frame = BorrowedFrame::new(&self.data, self.width, self.height, self.width, self.format)?;
        Ok(match &self.colour_map {
            Some(map) => frame.with_colour_map(map),
            None => frame,
        })
    }

    fn refresh(&mut self) -> Result<()> {
        // Memory is always current.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framediff_pixels::Rect;

    #[test]
    fn test_lock_unlock_serial() {
        let mut source = MemoryFrameSource::new(16, 16, PixelFormat::xrgb8888());
        let serial = source.lock_frame().expect("lock");
        assert_eq!(serial, 1);
        assert!(source.lock_frame().is_err());
        source.unlock_frame();
        assert_eq!(source.lock_frame().expect("relock"), 1);
    }

    #[test]
    fn test_set_mode_bumps_serial() {
        let mut source = MemoryFrameSource::new(16, 16, PixelFormat::xrgb8888());
        source.set_mode(32, 32, PixelFormat::rgb565());
        assert_eq!(source.serial(), 2);

        source.lock_frame().expect("lock");
        let frame = source.frame().expect("frame");
        assert_eq!(frame.width(), 32);
        assert_eq!(frame.format(), &PixelFormat::rgb565());
    }

    #[test]
    fn test_paint_rect_clamps() {
        let mut source = MemoryFrameSource::new(4, 4, PixelFormat::xrgb8888());
        source.paint_rect(&Rect::new(2, 2, 100, 100), 0x00FF_FFFF);

        let frame = source.frame().expect("frame");
        assert_eq!(frame.row_span(2, 2, 3), &[0xFF, 0xFF, 0xFF, 0x00]);
        assert_eq!(frame.row_span(0, 0, 1), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_paint_rect_16bpp() {
        let mut source = MemoryFrameSource::new(4, 4, PixelFormat::rgb565());
        source.fill(0xF800); // full red in 5:6:5
        let frame = source.frame().expect("frame");
        assert_eq!(frame.row_span(0, 0, 1), &[0x00, 0xF8]);
    }
}
