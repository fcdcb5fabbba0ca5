//! Error types for pixel format and buffer validation
//!
//! Provides typed errors that library users can match and handle specifically.

use thiserror::Error;

/// Errors describing an invalid pixel format
///
/// Returned by [`crate::PixelFormat::validate`]. A format that fails
/// validation cannot describe real video memory and should be rejected at
/// the capture boundary rather than carried into the diffing pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Bits per pixel is not one of the supported packings (8, 16, 32)
    #[error("unsupported bits per pixel: {0}")]
    UnsupportedBitsPerPixel(u8),

    /// Colour depth exceeds the pixel size
    #[error("depth {depth} exceeds {bits_per_pixel} bits per pixel")]
    DepthExceedsPixelSize {
        /// Declared colour depth
        depth: u8,
        /// Declared pixel size
        bits_per_pixel: u8,
    },

    /// A channel's bit range extends past the pixel size
    #[error("{channel} channel (max {max}, shift {shift}) does not fit in {bits_per_pixel} bits")]
    ChannelOutOfRange {
        /// Channel name ("red", "green" or "blue")
        channel: &'static str,
        /// Channel maximum value
        max: u16,
        /// Channel bit shift
        shift: u8,
        /// Declared pixel size
        bits_per_pixel: u8,
    },

    /// Two channels claim overlapping bits
    #[error("{first} and {second} channel bit ranges overlap")]
    ChannelOverlap {
        /// First overlapping channel
        first: &'static str,
        /// Second overlapping channel
        second: &'static str,
    },
}

/// Errors constructing a frame buffer view
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The backing byte slice is too small for the declared geometry
    #[error("buffer of {actual} bytes too small for {width}x{height} (stride {stride_pixels} px), need {required}")]
    TooSmall {
        /// Bytes required by the declared geometry
        required: usize,
        /// Bytes actually provided
        actual: usize,
        /// Declared width in pixels
        width: u32,
        /// Declared height in pixels
        height: u32,
        /// Declared stride in pixels
        stride_pixels: u32,
    },

    /// Stride is smaller than the width it must span
    #[error("stride of {stride_pixels} pixels smaller than width {width}")]
    StrideTooSmall {
        /// Declared stride in pixels
        stride_pixels: u32,
        /// Declared width in pixels
        width: u32,
    },

    /// The view's pixel format failed validation
    #[error("invalid pixel format: {0}")]
    InvalidFormat(#[from] FormatError),
}
