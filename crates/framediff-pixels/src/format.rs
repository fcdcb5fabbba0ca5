//! Pixel Format Description
//!
//! Describes how a pixel is packed into memory: size, endianness, and either
//! true-colour channel layouts (bit shift + maximum per channel) or a palette
//! indirection through a [`ColourMap`].
//!
//! A [`PixelFormat`] is an immutable value: when the video mode changes the
//! capture layer replaces the whole descriptor rather than mutating fields,
//! so a reader can never observe a half-updated format. Structural equality
//! (`==`) is the "did the mode change?" test.
//!
//! # Usage
//!
//! ```rust
//! use framediff_pixels::PixelFormat;
//!
//! let format = PixelFormat::xrgb8888();
//! assert!(format.validate().is_ok());
//! assert_eq!(format.bytes_per_pixel(), 4);
//!
//! // Pack full-intensity white
//! let pixel = format.pixel_from_rgb(0xFFFF, 0xFFFF, 0xFFFF, None);
//! assert_eq!(pixel, 0x00FF_FFFF);
//! ```

use tracing::warn;

use crate::error::FormatError;

/// How pixels are packed in a frame buffer
///
/// Covers both true-colour formats (channel shifts and maxima) and palette
/// formats (`true_colour == false`, pixels are indices into a [`ColourMap`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    /// Size of a packed pixel: 8, 16 or 32
    pub bits_per_pixel: u8,

    /// Number of significant colour bits (<= bits_per_pixel)
    pub depth: u8,

    /// True if multi-byte pixels are stored big-endian
    ///
    /// Big-endian packings wider than 8 bits are not byte-comparable by this
    /// library; see [`PixelFormat::byte_comparable`].
    pub big_endian: bool,

    /// True for direct RGB packing, false for palette indices
    pub true_colour: bool,

    /// Maximum red value (e.g. 255 for 8 bits of red)
    pub red_max: u16,

    /// Maximum green value
    pub green_max: u16,

    /// Maximum blue value
    pub blue_max: u16,

    /// Bit position of the red channel
    pub red_shift: u8,

    /// Bit position of the green channel
    pub green_shift: u8,

    /// Bit position of the blue channel
    pub blue_shift: u8,
}

impl PixelFormat {
    /// 32bpp true colour, 8 bits per channel, x8r8g8b8 little-endian
    #[must_use]
    pub const fn xrgb8888() -> Self {
        Self {
            bits_per_pixel: 32,
            depth: 24,
            big_endian: false,
            true_colour: true,
            red_max: 255,
            green_max: 255,
            blue_max: 255,
            red_shift: 16,
            green_shift: 8,
            blue_shift: 0,
        }
    }

    /// 16bpp true colour, 5:6:5 little-endian
    #[must_use]
    pub const fn rgb565() -> Self {
        Self {
            bits_per_pixel: 16,
            depth: 16,
            big_endian: false,
            true_colour: true,
            red_max: 31,
            green_max: 63,
            blue_max: 31,
            red_shift: 11,
            green_shift: 5,
            blue_shift: 0,
        }
    }

    /// 16bpp true colour, 5:5:5 little-endian
    #[must_use]
    pub const fn rgb555() -> Self {
        Self {
            bits_per_pixel: 16,
            depth: 15,
            big_endian: false,
            true_colour: true,
            red_max: 31,
            green_max: 31,
            blue_max: 31,
            red_shift: 10,
            green_shift: 5,
            blue_shift: 0,
        }
    }

    /// 8bpp palette format; pixels index a [`ColourMap`]
    #[must_use]
    pub const fn indexed8() -> Self {
        Self {
            bits_per_pixel: 8,
            depth: 8,
            big_endian: false,
            true_colour: false,
            red_max: 0,
            green_max: 0,
            blue_max: 0,
            red_shift: 0,
            green_shift: 0,
            blue_shift: 0,
        }
    }

    /// Bytes occupied by one packed pixel
    #[must_use]
    pub const fn bytes_per_pixel(&self) -> usize {
        (self.bits_per_pixel as usize) / 8
    }

    /// True if raw byte comparison of packed pixels is meaningful
    ///
    /// Big-endian formats wider than one byte are not supported by the
    /// comparator; callers must treat hinted areas as fully changed instead
    /// of risking a mis-decoded comparison that silently corrupts output.
    #[must_use]
    pub const fn byte_comparable(&self) -> bool {
        !(self.big_endian && self.bits_per_pixel > 8)
    }

    /// Check that the format describes a real packing
    ///
    /// For true-colour formats the three channel bit ranges must fit inside
    /// `bits_per_pixel` bits without overlapping.
    pub fn validate(&self) -> Result<(), FormatError> {
        if !matches!(self.bits_per_pixel, 8 | 16 | 32) {
            return Err(FormatError::UnsupportedBitsPerPixel(self.bits_per_pixel));
        }
        if self.depth > self.bits_per_pixel {
            return Err(FormatError::DepthExceedsPixelSize {
                depth: self.depth,
                bits_per_pixel: self.bits_per_pixel,
            });
        }
        if !self.true_colour {
            return Ok(());
        }

        let channels: [(&'static str, u16, u8); 3] = [
            ("red", self.red_max, self.red_shift),
            ("green", self.green_max, self.green_shift),
            ("blue", self.blue_max, self.blue_shift),
        ];

        let mut masks = [0u64; 3];
        for (i, (name, max, shift)) in channels.iter().enumerate() {
            if *shift >= 32 {
                return Err(FormatError::ChannelOutOfRange {
                    channel: name,
                    max: *max,
                    shift: *shift,
                    bits_per_pixel: self.bits_per_pixel,
                });
            }
            let mask = u64::from(*max) << shift;
            if mask >= 1u64 << self.bits_per_pixel {
                return Err(FormatError::ChannelOutOfRange {
                    channel: name,
                    max: *max,
                    shift: *shift,
                    bits_per_pixel: self.bits_per_pixel,
                });
            }
            masks[i] = mask;
        }
        for i in 0..channels.len() {
            for j in (i + 1)..channels.len() {
                if masks[i] & masks[j] != 0 {
                    return Err(FormatError::ChannelOverlap {
                        first: channels[i].0,
                        second: channels[j].0,
                    });
                }
            }
        }
        Ok(())
    }

    /// Pack a 16-bit-per-channel RGB triple into a pixel value
    ///
    /// True-colour formats scale each channel to its maximum
    /// (`value * max / 65535`) and shift it into position. Palette formats
    /// perform a nearest-match lookup against `colour_map`, ties broken by
    /// the lowest index; a missing map is logged and packs as index 0.
    #[must_use]
    pub fn pixel_from_rgb(&self, r: u16, g: u16, b: u16, colour_map: Option<&ColourMap>) -> u32 {
        if self.true_colour {
            let scale = |v: u16, max: u16| (u32::from(v) * u32::from(max)) / 65535;
            (scale(r, self.red_max) << self.red_shift)
                | (scale(g, self.green_max) << self.green_shift)
                | (scale(b, self.blue_max) << self.blue_shift)
        } else {
            match colour_map {
                Some(map) => map.nearest(r, g, b) as u32,
                None => {
                    warn!("palette pixel requested without a colour map, using index 0");
                    0
                }
            }
        }
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::xrgb8888()
    }
}

/// Palette for indexed pixel formats: index to 16-bit RGB triples
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColourMap {
    entries: Vec<(u16, u16, u16)>,
}

impl ColourMap {
    /// Create a colour map from its entries
    #[must_use]
    pub fn new(entries: Vec<(u16, u16, u16)>) -> Self {
        Self { entries }
    }

    /// Number of palette entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the palette has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The RGB triple at `index`, if present
    #[must_use]
    pub fn lookup(&self, index: usize) -> Option<(u16, u16, u16)> {
        self.entries.get(index).copied()
    }

    /// Index of the entry closest to the given RGB triple
    ///
    /// Distance is the sum of squared channel differences. Ties resolve to
    /// the lowest index, so the result is deterministic. An empty palette
    /// returns index 0.
    #[must_use]
    pub fn nearest(&self, r: u16, g: u16, b: u16) -> usize {
        let mut best = 0usize;
        let mut best_dist = u64::MAX;
        for (i, &(er, eg, eb)) in self.entries.iter().enumerate() {
            let d = |a: u16, b: u16| {
                let diff = i64::from(a) - i64::from(b);
                (diff * diff) as u64
            };
            let dist = d(er, r) + d(eg, g) + d(eb, b);
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_formats_validate() {
        assert!(PixelFormat::xrgb8888().validate().is_ok());
        assert!(PixelFormat::rgb565().validate().is_ok());
        assert!(PixelFormat::rgb555().validate().is_ok());
        assert!(PixelFormat::indexed8().validate().is_ok());
    }

    #[test]
    fn test_overlapping_channels_rejected() {
        let bad = PixelFormat {
            green_shift: 12, // collides with red at shift 11
            ..PixelFormat::rgb565()
        };
        assert!(matches!(
            bad.validate(),
            Err(FormatError::ChannelOverlap { .. })
        ));
    }

    #[test]
    fn test_channel_out_of_range_rejected() {
        let bad = PixelFormat {
            red_shift: 28,
            red_max: 255, // 8 bits at shift 28 spills past 32
            ..PixelFormat::xrgb8888()
        };
        assert!(matches!(
            bad.validate(),
            Err(FormatError::ChannelOutOfRange { .. })
        ));
    }

    #[test]
    fn test_bad_bpp_rejected() {
        let bad = PixelFormat {
            bits_per_pixel: 24,
            ..PixelFormat::xrgb8888()
        };
        assert_eq!(
            bad.validate(),
            Err(FormatError::UnsupportedBitsPerPixel(24))
        );
    }

    #[test]
    fn test_byte_comparable() {
        assert!(PixelFormat::xrgb8888().byte_comparable());
        assert!(PixelFormat {
            big_endian: true,
            ..PixelFormat::indexed8()
        }
        .byte_comparable());

        let big = PixelFormat {
            big_endian: true,
            ..PixelFormat::xrgb8888()
        };
        assert!(!big.byte_comparable());
    }

    #[test]
    fn test_pixel_from_rgb_truecolour() {
        let format = PixelFormat::xrgb8888();
        assert_eq!(format.pixel_from_rgb(0xFFFF, 0xFFFF, 0xFFFF, None), 0x00FF_FFFF);
        assert_eq!(format.pixel_from_rgb(0xFFFF, 0, 0, None), 0x00FF_0000);
        assert_eq!(format.pixel_from_rgb(0, 0, 0xFFFF, None), 0x0000_00FF);

        let format = PixelFormat::rgb565();
        assert_eq!(format.pixel_from_rgb(0xFFFF, 0xFFFF, 0xFFFF, None), 0xFFFF);
    }

    #[test]
    fn test_pixel_from_rgb_palette_nearest() {
        let map = ColourMap::new(vec![
            (0, 0, 0),
            (0xFFFF, 0xFFFF, 0xFFFF),
            (0xFFFF, 0, 0),
        ]);
        let format = PixelFormat::indexed8();

        assert_eq!(format.pixel_from_rgb(0, 0, 0, Some(&map)), 0);
        assert_eq!(format.pixel_from_rgb(0xF000, 0xF000, 0xF000, Some(&map)), 1);
        assert_eq!(format.pixel_from_rgb(0xF000, 0x1000, 0x1000, Some(&map)), 2);
    }

    #[test]
    fn test_palette_tie_breaks_low() {
        // Two identical entries: the lower index must win.
        let map = ColourMap::new(vec![(10, 10, 10), (10, 10, 10)]);
        assert_eq!(map.nearest(10, 10, 10), 0);
    }

    #[test]
    fn test_mode_change_is_structural_equality() {
        let a = PixelFormat::xrgb8888();
        let b = PixelFormat::xrgb8888();
        assert_eq!(a, b);
        assert_ne!(a, PixelFormat::rgb565());
    }
}
