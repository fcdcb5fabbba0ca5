//! Frame Buffer Views and Snapshots
//!
//! Read access to rectangular pixel grids in two ownership flavours:
//!
//! - [`BorrowedFrame`] borrows live capture memory. Its lifetime is bounded
//!   by the capture backend's lock, and the underlying bytes may be
//!   overwritten by the video subsystem at any instant. Reads are always
//!   in-bounds, but a torn read (a mix of old and new rows) is possible and
//!   tolerated by the comparator.
//! - [`FrameSnapshot`] owns a tight private copy retained between compare
//!   passes. It is reallocated whole whenever geometry or format changes,
//!   never resized in place, because stride and byte layout are
//!   format-dependent.
//!
//! Both implement [`FrameView`], which is all the diff engine ever sees.

use crate::error::BufferError;
use crate::format::{ColourMap, PixelFormat};
use crate::geom::Rect;

/// Read-only access to a rectangular pixel grid
///
/// `stride_pixels` may exceed `width` due to row padding. `row_span` clamps
/// its arguments, so implementations never read out of bounds even when
/// handed a stale rectangle after a mode change.
pub trait FrameView {
    /// Pixel packing of the buffer
    fn format(&self) -> &PixelFormat;

    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Pixels per row including padding (>= width)
    fn stride_pixels(&self) -> u32;

    /// The raw backing bytes
    fn bytes(&self) -> &[u8];

    /// Palette for indexed formats, if any
    fn colour_map(&self) -> Option<&ColourMap> {
        None
    }

    /// The full-buffer rectangle
    fn bounds(&self) -> Rect {
        Rect::from_size(0, 0, self.width(), self.height())
    }

    /// The bytes of row `y` covering pixel columns `[x0, x1)`
    ///
    /// Arguments are clamped to the buffer: a row outside the buffer, or an
    /// empty column range after clamping, yields an empty slice.
    fn row_span(&self, y: i32, x0: i32, x1: i32) -> &[u8] {
        let width = self.width() as i32;
        let height = self.height() as i32;
        if y < 0 || y >= height {
            return &[];
        }
        let x0 = x0.clamp(0, width);
        let x1 = x1.clamp(0, width);
        if x0 >= x1 {
            return &[];
        }

        let bpp = self.format().bytes_per_pixel();
        let row_start = (y as usize) * (self.stride_pixels() as usize) * bpp;
        let start = row_start + (x0 as usize) * bpp;
        let end = row_start + (x1 as usize) * bpp;
        let bytes = self.bytes();
        if end > bytes.len() {
            return &[];
        }
        &bytes[start..end]
    }
}

/// A borrowed view over live capture memory
///
/// Valid only while the capture backend's frame lock is held; the backend
/// contract is "lock, read briefly, unlock".
#[derive(Debug)]
pub struct BorrowedFrame<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride_pixels: u32,
    format: PixelFormat,
    colour_map: Option<&'a ColourMap>,
}

impl<'a> BorrowedFrame<'a> {
    /// Create a view over `data`
    ///
    /// Fails if the slice cannot hold `height` rows of `stride_pixels`
    /// pixels, or if the stride is narrower than the width.
    pub fn new(
        data: &'a [u8],
        width: u32,
        height: u32,
        stride_pixels: u32,
        format: PixelFormat,
    ) -> Result<Self, BufferError> {
        if stride_pixels < width {
            return Err(BufferError::StrideTooSmall {
                stride_pixels,
                width,
            });
        }
        format.validate()?;

        let bpp = format.bytes_per_pixel();
        let required = if height == 0 || width == 0 {
            0
        } else {
            ((height as usize - 1) * stride_pixels as usize + width as usize) * bpp
        };
        if data.len() < required {
            return Err(BufferError::TooSmall {
                required,
                actual: data.len(),
                width,
                height,
                stride_pixels,
            });
        }

        Ok(Self {
            data,
            width,
            height,
            stride_pixels,
            format,
            colour_map: None,
        })
    }

    /// Attach a palette for indexed formats
    #[must_use]
    pub fn with_colour_map(mut self, map: &'a ColourMap) -> Self {
        self.colour_map = Some(map);
        self
    }
}

impl FrameView for BorrowedFrame<'_> {
    fn format(&self) -> &PixelFormat {
        &self.format
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn stride_pixels(&self) -> u32 {
        self.stride_pixels
    }

    fn bytes(&self) -> &[u8] {
        self.data
    }

    fn colour_map(&self) -> Option<&ColourMap> {
        self.colour_map
    }
}

/// An owned previous-frame copy kept for comparison
///
/// Rows are stored tightly (stride == width) regardless of the stride of the
/// view it was captured from.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    data: Vec<u8>,
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl FrameSnapshot {
    /// Copy an entire view into a new snapshot
    #[must_use]
    pub fn capture(view: &dyn FrameView) -> Self {
        let width = view.width();
        let height = view.height();
        let format = *view.format();
        let bpp = format.bytes_per_pixel();
        let row_bytes = width as usize * bpp;

        let mut data = vec![0u8; row_bytes * height as usize];
        for y in 0..height as i32 {
            let src = view.row_span(y, 0, width as i32);
            let start = y as usize * row_bytes;
            data[start..start + src.len()].copy_from_slice(src);
        }
        Self {
            data,
            width,
            height,
            format,
        }
    }

    /// True if the snapshot's geometry and format agree with `view`
    ///
    /// Disagreement means the snapshot is useless as a prior frame and must
    /// be recaptured whole.
    #[must_use]
    pub fn matches(&self, view: &dyn FrameView) -> bool {
        self.width == view.width() && self.height == view.height() && self.format == *view.format()
    }

    /// Refresh the pixels under `rect` from `view`
    ///
    /// The rectangle is clamped to both the snapshot and the view. Intended
    /// for the compare-then-update cycle; geometry mismatches should be
    /// handled by recapturing instead.
    pub fn copy_rect_from(&mut self, view: &dyn FrameView, rect: &Rect) {
        let rect = rect
            .intersection(&self.bounds())
            .intersection(&view.bounds());
        if rect.is_empty() {
            return;
        }

        let bpp = self.format.bytes_per_pixel();
        let row_bytes = self.width as usize * bpp;
        for y in rect.top..rect.bottom {
            let src = view.row_span(y, rect.left, rect.right);
            let start = y as usize * row_bytes + rect.left as usize * bpp;
            let dst = &mut self.data[start..start + src.len()];
            dst.copy_from_slice(src);
        }
    }
}

impl FrameView for FrameSnapshot {
    fn format(&self) -> &PixelFormat {
        &self.format
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn stride_pixels(&self) -> u32 {
        self.width
    }

    fn bytes(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: u32, height: u32, value: u8) -> Vec<u8> {
        vec![value; (width * height * 4) as usize]
    }

    #[test]
    fn test_borrowed_frame_validation() {
        let data = solid_frame(4, 4, 0);
        let format = PixelFormat::xrgb8888();

        assert!(BorrowedFrame::new(&data, 4, 4, 4, format).is_ok());
        assert!(matches!(
            BorrowedFrame::new(&data, 4, 4, 2, format),
            Err(BufferError::StrideTooSmall { .. })
        ));
        assert!(matches!(
            BorrowedFrame::new(&data[..8], 4, 4, 4, format),
            Err(BufferError::TooSmall { .. })
        ));
    }

    #[test]
    fn test_row_span_clamps() {
        let data = solid_frame(4, 4, 7);
        let frame = BorrowedFrame::new(&data, 4, 4, 4, PixelFormat::xrgb8888()).expect("frame");

        assert_eq!(frame.row_span(0, 0, 4).len(), 16);
        assert_eq!(frame.row_span(0, -10, 100).len(), 16);
        assert!(frame.row_span(-1, 0, 4).is_empty());
        assert!(frame.row_span(4, 0, 4).is_empty());
        assert!(frame.row_span(0, 3, 3).is_empty());
    }

    #[test]
    fn test_row_span_honours_stride() {
        // 2x2 frame padded to a stride of 4 pixels.
        let mut data = vec![0u8; 4 * 4 * 2];
        data[4 * 4] = 0xAA; // first byte of row 1
        let frame = BorrowedFrame::new(&data, 2, 2, 4, PixelFormat::xrgb8888()).expect("frame");

        let row = frame.row_span(1, 0, 2);
        assert_eq!(row.len(), 8);
        assert_eq!(row[0], 0xAA);
    }

    #[test]
    fn test_snapshot_capture_tightens_stride() {
        let mut data = vec![0u8; 4 * 4 * 2];
        for px in 0..2usize {
            data[4 * 4 + px * 4] = 0x55; // row 1 pixels
        }
        let frame = BorrowedFrame::new(&data, 2, 2, 4, PixelFormat::xrgb8888()).expect("frame");

        let snap = FrameSnapshot::capture(&frame);
        assert_eq!(snap.stride_pixels(), 2);
        assert_eq!(snap.bytes().len(), 2 * 2 * 4);
        assert_eq!(snap.row_span(1, 0, 2), frame.row_span(1, 0, 2));
        assert!(snap.matches(&frame));
    }

    #[test]
    fn test_snapshot_detects_mode_change() {
        let data = solid_frame(4, 4, 0);
        let frame = BorrowedFrame::new(&data, 4, 4, 4, PixelFormat::xrgb8888()).expect("frame");
        let snap = FrameSnapshot::capture(&frame);

        let data16 = vec![0u8; 4 * 4 * 2];
        let frame16 = BorrowedFrame::new(&data16, 4, 4, 4, PixelFormat::rgb565()).expect("frame");
        assert!(!snap.matches(&frame16));

        let smaller = BorrowedFrame::new(&data, 2, 4, 4, PixelFormat::xrgb8888()).expect("frame");
        assert!(!snap.matches(&smaller));
    }

    #[test]
    fn test_copy_rect_from() {
        let black = solid_frame(4, 4, 0);
        let white = solid_frame(4, 4, 0xFF);
        let format = PixelFormat::xrgb8888();
        let black_frame = BorrowedFrame::new(&black, 4, 4, 4, format).expect("frame");
        let white_frame = BorrowedFrame::new(&white, 4, 4, 4, format).expect("frame");

        let mut snap = FrameSnapshot::capture(&black_frame);
        snap.copy_rect_from(&white_frame, &Rect::new(1, 1, 3, 3));

        assert_eq!(snap.row_span(0, 0, 4), &black[..16]);
        assert_eq!(snap.row_span(1, 0, 1), &[0, 0, 0, 0]);
        assert_eq!(snap.row_span(1, 1, 3), &[0xFF; 8]);
        // Clamped: an oversized rectangle must not panic.
        snap.copy_rect_from(&white_frame, &Rect::new(-5, -5, 100, 100));
        assert_eq!(snap.row_span(0, 0, 4), &[0xFF; 16]);
    }
}
