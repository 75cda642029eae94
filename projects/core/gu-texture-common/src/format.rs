//! Pixel, palette and colour encodings understood by the graphics device.
//!
//! The numeric ids are stable and match the device's own register values, so they can be
//! stored in asset files and passed across an FFI boundary unchanged.

use crate::color_16bit::{Color4444, Color5551, Color5650};
use crate::color_8888::Color8888;
use derive_enum_all_values::AllValues;

/// The way a colour is packed into 16 or 32 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
pub enum ColorEncoding {
    /// 16-bit, 5 bits red, 6 bits green, 5 bits blue, no alpha.
    Rgb5650,
    /// 16-bit, 5 bits per colour channel and a 1-bit alpha.
    Rgba5551,
    /// 16-bit, 4 bits per channel.
    Rgba4444,
    /// 32-bit, 8 bits per channel.
    Rgba8888,
}

impl ColorEncoding {
    /// Size of one encoded colour in bytes.
    #[inline]
    pub const fn bytes_per_color(self) -> usize {
        match self {
            ColorEncoding::Rgba8888 => 4,
            _ => 2,
        }
    }

    /// Converts an encoded colour into a normalized [`Color8888`].
    ///
    /// For the 16-bit encodings only the low 16 bits of `raw` are used.
    ///
    /// # Examples
    ///
    /// ```
    /// use gu_texture_common::color_8888::Color8888;
    /// use gu_texture_common::format::ColorEncoding;
    ///
    /// let color = ColorEncoding::Rgb5650.decode(0xF800);
    /// assert_eq!(color, Color8888::new(0, 0, 255, 255));
    /// ```
    #[inline]
    pub const fn decode(self, raw: u32) -> Color8888 {
        match self {
            ColorEncoding::Rgb5650 => Color5650::from_raw(raw as u16).to_color_8888(),
            ColorEncoding::Rgba5551 => Color5551::from_raw(raw as u16).to_color_8888(),
            ColorEncoding::Rgba4444 => Color4444::from_raw(raw as u16).to_color_8888(),
            ColorEncoding::Rgba8888 => Color8888::from_packed(raw),
        }
    }

    /// Reads one encoded colour (little endian) from the start of `bytes`.
    ///
    /// Returns [`None`] if `bytes` is shorter than [`Self::bytes_per_color`].
    #[inline]
    pub fn read_raw(self, bytes: &[u8]) -> Option<u32> {
        match self {
            ColorEncoding::Rgba8888 => {
                let value: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
                Some(u32::from_le_bytes(value))
            }
            _ => {
                let value: [u8; 2] = bytes.get(..2)?.try_into().ok()?;
                Some(u16::from_le_bytes(value) as u32)
            }
        }
    }
}

/// Layout of a single pixel inside a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
#[repr(u32)]
pub enum PixelFormat {
    /// 16-bit RGB5650
    Rgb5650 = 0,
    /// 16-bit RGBA5551
    Rgba5551 = 1,
    /// 16-bit RGBA4444
    Rgba4444 = 2,
    /// 32-bit RGBA8888
    Rgba8888 = 3,
    /// 4-bit index into a colour table
    Clut4 = 4,
    /// 8-bit index into a colour table
    Clut8 = 5,
}

impl PixelFormat {
    /// Looks up a format by its stable numeric id.
    ///
    /// # Examples
    ///
    /// ```
    /// use gu_texture_common::format::PixelFormat;
    ///
    /// assert_eq!(PixelFormat::from_id(5), Some(PixelFormat::Clut8));
    /// assert_eq!(PixelFormat::from_id(6), None);
    /// ```
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(PixelFormat::Rgb5650),
            1 => Some(PixelFormat::Rgba5551),
            2 => Some(PixelFormat::Rgba4444),
            3 => Some(PixelFormat::Rgba8888),
            4 => Some(PixelFormat::Clut4),
            5 => Some(PixelFormat::Clut8),
            _ => None,
        }
    }

    /// Returns the stable numeric id of this format.
    #[inline]
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Number of bits a single pixel occupies.
    #[inline]
    pub const fn bits_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb5650 | PixelFormat::Rgba5551 | PixelFormat::Rgba4444 => 16,
            PixelFormat::Rgba8888 => 32,
            PixelFormat::Clut4 => 4,
            PixelFormat::Clut8 => 8,
        }
    }

    /// Number of bytes needed to store `width` pixels, rounded up to whole bytes.
    #[inline]
    pub const fn row_bytes(self, width: usize) -> usize {
        (width * self.bits_per_pixel()).div_ceil(8)
    }

    /// Number of pixels that fit into `bytes` bytes.
    #[inline]
    pub const fn pixels_in(self, bytes: usize) -> usize {
        bytes * 8 / self.bits_per_pixel()
    }

    /// Whether pixels are indices into a colour table.
    #[inline]
    pub const fn is_indexed(self) -> bool {
        matches!(self, PixelFormat::Clut4 | PixelFormat::Clut8)
    }

    /// The direct colour encoding of the pixels, or [`None`] for indexed formats.
    #[inline]
    pub const fn color_encoding(self) -> Option<ColorEncoding> {
        match self {
            PixelFormat::Rgb5650 => Some(ColorEncoding::Rgb5650),
            PixelFormat::Rgba5551 => Some(ColorEncoding::Rgba5551),
            PixelFormat::Rgba4444 => Some(ColorEncoding::Rgba4444),
            PixelFormat::Rgba8888 => Some(ColorEncoding::Rgba8888),
            PixelFormat::Clut4 | PixelFormat::Clut8 => None,
        }
    }
}

impl TryFrom<u32> for PixelFormat {
    type Error = u32;

    /// Converts a numeric id, handing back the id itself if it is not a known format.
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_id(value).ok_or(value)
    }
}

/// Layout of a single colour table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AllValues)]
#[repr(u32)]
pub enum PaletteFormat {
    /// 16-bit RGB5650
    Rgb5650 = 0,
    /// 16-bit RGBA5551
    Rgba5551 = 1,
    /// 16-bit RGBA4444
    Rgba4444 = 2,
    /// 32-bit RGBA8888
    Rgba8888 = 3,
}

impl PaletteFormat {
    /// Looks up a format by its stable numeric id.
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(PaletteFormat::Rgb5650),
            1 => Some(PaletteFormat::Rgba5551),
            2 => Some(PaletteFormat::Rgba4444),
            3 => Some(PaletteFormat::Rgba8888),
            _ => None,
        }
    }

    /// Returns the stable numeric id of this format.
    #[inline]
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// The colour encoding of each entry.
    #[inline]
    pub const fn color_encoding(self) -> ColorEncoding {
        match self {
            PaletteFormat::Rgb5650 => ColorEncoding::Rgb5650,
            PaletteFormat::Rgba5551 => ColorEncoding::Rgba5551,
            PaletteFormat::Rgba4444 => ColorEncoding::Rgba4444,
            PaletteFormat::Rgba8888 => ColorEncoding::Rgba8888,
        }
    }

    /// Size of a single entry in bytes.
    #[inline]
    pub const fn bytes_per_entry(self) -> usize {
        self.color_encoding().bytes_per_color()
    }
}

impl TryFrom<u32> for PaletteFormat {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_id(value).ok_or(value)
    }
}

/// Physical arrangement of the pixel bytes of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AllValues)]
#[repr(u32)]
pub enum TilingMode {
    /// Rows are stored one after another, `pitch` bytes apart.
    #[default]
    Linear = 0,
    /// Rows are grouped into 8-row stripes of 16-byte wide blocks.
    Swizzled = 1,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn pixel_format_ids_round_trip() {
        for &format in PixelFormat::all_values() {
            assert_eq!(PixelFormat::from_id(format.id()), Some(format));
            assert_eq!(PixelFormat::try_from(format.id()), Ok(format));
        }
        assert_eq!(PixelFormat::try_from(6), Err(6));
    }

    #[test]
    fn palette_format_ids_round_trip() {
        for &format in PaletteFormat::all_values() {
            assert_eq!(PaletteFormat::from_id(format.id()), Some(format));
        }
        assert_eq!(PaletteFormat::from_id(4), None);
    }

    #[rstest]
    #[case(PixelFormat::Clut4, 18, 9)]
    #[case(PixelFormat::Clut4, 17, 9)]
    #[case(PixelFormat::Clut8, 18, 18)]
    #[case(PixelFormat::Rgb5650, 18, 36)]
    #[case(PixelFormat::Rgba8888, 18, 72)]
    fn row_bytes_rounds_up(#[case] format: PixelFormat, #[case] width: usize, #[case] bytes: usize) {
        assert_eq!(format.row_bytes(width), bytes);
    }

    #[rstest]
    #[case(PixelFormat::Clut4, 16, 32)]
    #[case(PixelFormat::Clut8, 16, 16)]
    #[case(PixelFormat::Rgba4444, 16, 8)]
    #[case(PixelFormat::Rgba8888, 16, 4)]
    fn pixels_per_block(#[case] format: PixelFormat, #[case] bytes: usize, #[case] pixels: usize) {
        assert_eq!(format.pixels_in(bytes), pixels);
    }

    #[test]
    fn reads_little_endian_colors() {
        let bytes = [0x34, 0x12, 0x78, 0x56];
        assert_eq!(ColorEncoding::Rgba4444.read_raw(&bytes), Some(0x1234));
        assert_eq!(ColorEncoding::Rgba8888.read_raw(&bytes), Some(0x5678_1234));
        assert_eq!(ColorEncoding::Rgba8888.read_raw(&bytes[..3]), None);
    }
}
