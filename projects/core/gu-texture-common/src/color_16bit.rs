//! # 16-bit Colour Encodings
//!
//! Bit-exact unpacking of the three compact colour encodings understood by the device into
//! a normalized [`Color8888`].
//!
//! | Encoding | Red | Green | Blue | Alpha |
//! |----------|-----|-------|------|-------|
//! | `5650`   | 0-4 | 5-10  | 11-15| -     |
//! | `5551`   | 0-4 | 5-9   | 10-14| 15    |
//! | `4444`   | 0-3 | 4-7   | 8-11 | 12-15 |
//!
//! ## Channel Expansion
//!
//! An `n`-bit channel value `v` becomes `v << (8 - n)`. If that result is non-zero the vacated
//! low bits are filled with ones, so the smallest non-zero intensity never rounds down to zero
//! while a true zero stays zero. Note this is not the usual top-bit replication: `0b00001`
//! expands to `0x0F`, and the maximum value always expands to `0xFF`.
//!
//! Encodings without an alpha channel are always fully opaque.

use crate::color_8888::Color8888;

/// Expands an `BITS`-wide channel value to 8 bits.
///
/// # Examples
///
/// ```
/// use gu_texture_common::color_16bit::expand_channel;
///
/// assert_eq!(expand_channel::<5>(0), 0x00);
/// assert_eq!(expand_channel::<5>(1), 0x0F);
/// assert_eq!(expand_channel::<5>(0x1F), 0xFF);
/// assert_eq!(expand_channel::<1>(1), 0xFF);
/// ```
#[inline(always)]
pub const fn expand_channel<const BITS: u32>(value: u16) -> u8 {
    let mask = (1u16 << BITS) - 1;
    let shifted = (value & mask) << (8 - BITS);
    if shifted == 0 {
        0
    } else {
        (shifted | ((1u16 << (8 - BITS)) - 1)) as u8
    }
}

/// Represents a 16-bit RGB5650 colour (5 bits red, 6 bits green, 5 bits blue, red lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color5650 {
    /// The underlying 16-bit value
    value: u16,
}

impl Color5650 {
    /// Creates a new [`Color5650`] from the raw 16-bit value
    #[inline]
    pub const fn from_raw(value: u16) -> Self {
        Self { value }
    }

    /// Returns the raw 16-bit value
    #[inline]
    pub const fn raw_value(&self) -> u16 {
        self.value
    }

    /// Extracts the expanded 8-bit red component
    #[inline]
    pub const fn red(&self) -> u8 {
        expand_channel::<5>(self.value)
    }

    /// Extracts the expanded 8-bit green component
    #[inline]
    pub const fn green(&self) -> u8 {
        expand_channel::<6>(self.value >> 5)
    }

    /// Extracts the expanded 8-bit blue component
    #[inline]
    pub const fn blue(&self) -> u8 {
        expand_channel::<5>(self.value >> 11)
    }

    /// Converts this colour to a [`Color8888`] with full opacity (alpha=255)
    ///
    /// # Examples
    ///
    /// ```
    /// use gu_texture_common::color_16bit::Color5650;
    ///
    /// let rgba = Color5650::from_raw(0x001F).to_color_8888();
    /// assert_eq!((rgba.r, rgba.g, rgba.b, rgba.a), (255, 0, 0, 255));
    /// ```
    #[inline]
    pub const fn to_color_8888(&self) -> Color8888 {
        Color8888::new(self.red(), self.green(), self.blue(), 255)
    }
}

/// Represents a 16-bit RGBA5551 colour (5 bits per colour channel, 1 bit alpha, red lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color5551 {
    /// The underlying 16-bit value
    value: u16,
}

impl Color5551 {
    /// Creates a new [`Color5551`] from the raw 16-bit value
    #[inline]
    pub const fn from_raw(value: u16) -> Self {
        Self { value }
    }

    /// Returns the raw 16-bit value
    #[inline]
    pub const fn raw_value(&self) -> u16 {
        self.value
    }

    /// Extracts the expanded 8-bit red component
    #[inline]
    pub const fn red(&self) -> u8 {
        expand_channel::<5>(self.value)
    }

    /// Extracts the expanded 8-bit green component
    #[inline]
    pub const fn green(&self) -> u8 {
        expand_channel::<5>(self.value >> 5)
    }

    /// Extracts the expanded 8-bit blue component
    #[inline]
    pub const fn blue(&self) -> u8 {
        expand_channel::<5>(self.value >> 10)
    }

    /// Extracts the expanded 8-bit alpha component (either 0 or 255)
    #[inline]
    pub const fn alpha(&self) -> u8 {
        expand_channel::<1>(self.value >> 15)
    }

    /// Converts this colour to a [`Color8888`]
    #[inline]
    pub const fn to_color_8888(&self) -> Color8888 {
        Color8888::new(self.red(), self.green(), self.blue(), self.alpha())
    }
}

/// Represents a 16-bit RGBA4444 colour (4 bits per channel, red lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color4444 {
    /// The underlying 16-bit value
    value: u16,
}

impl Color4444 {
    /// Creates a new [`Color4444`] from the raw 16-bit value
    #[inline]
    pub const fn from_raw(value: u16) -> Self {
        Self { value }
    }

    /// Returns the raw 16-bit value
    #[inline]
    pub const fn raw_value(&self) -> u16 {
        self.value
    }

    /// Extracts the expanded 8-bit red component
    #[inline]
    pub const fn red(&self) -> u8 {
        expand_channel::<4>(self.value)
    }

    /// Extracts the expanded 8-bit green component
    #[inline]
    pub const fn green(&self) -> u8 {
        expand_channel::<4>(self.value >> 4)
    }

    /// Extracts the expanded 8-bit blue component
    #[inline]
    pub const fn blue(&self) -> u8 {
        expand_channel::<4>(self.value >> 8)
    }

    /// Extracts the expanded 8-bit alpha component
    #[inline]
    pub const fn alpha(&self) -> u8 {
        expand_channel::<4>(self.value >> 12)
    }

    /// Converts this colour to a [`Color8888`]
    #[inline]
    pub const fn to_color_8888(&self) -> Color8888 {
        Color8888::new(self.red(), self.green(), self.blue(), self.alpha())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0x00)]
    #[case(1, 0x0F)]
    #[case(0x10, 0x87)]
    #[case(0x1F, 0xFF)]
    fn expands_5bit_channel(#[case] value: u16, #[case] expected: u8) {
        assert_eq!(expand_channel::<5>(value), expected);
    }

    #[rstest]
    #[case(0, 0x00)]
    #[case(1, 0x07)]
    #[case(0x3F, 0xFF)]
    fn expands_6bit_channel(#[case] value: u16, #[case] expected: u8) {
        assert_eq!(expand_channel::<6>(value), expected);
    }

    #[rstest]
    #[case(0, 0x00)]
    #[case(1, 0x1F)]
    #[case(0xF, 0xFF)]
    fn expands_4bit_channel(#[case] value: u16, #[case] expected: u8) {
        assert_eq!(expand_channel::<4>(value), expected);
    }

    #[test]
    fn color_5650_is_always_opaque() {
        for raw in [0x0000, 0xFFFF, 0x1234, 0x8000] {
            assert_eq!(Color5650::from_raw(raw).to_color_8888().a, 255);
        }
    }

    #[test]
    fn color_5650_channel_positions() {
        // red = 1, green = 2, blue = 3
        let raw = 1 | (2 << 5) | (3 << 11);
        let color = Color5650::from_raw(raw).to_color_8888();
        assert_eq!(color, Color8888::new(0x0F, 0x0B, 0x1F, 0xFF));
    }

    #[test]
    fn color_5551_channel_positions() {
        let raw = 0x1F | (0x10 << 10) | 0x8000;
        let color = Color5551::from_raw(raw).to_color_8888();
        assert_eq!(color, Color8888::new(0xFF, 0x00, 0x87, 0xFF));

        let transparent = Color5551::from_raw(0x7FFF).to_color_8888();
        assert_eq!(transparent.a, 0);
    }

    #[test]
    fn color_5551_alpha_bit_stays_out_of_blue() {
        let opaque_black = Color5551::from_raw(0x8000).to_color_8888();
        assert_eq!(opaque_black, Color8888::new(0, 0, 0, 0xFF));

        let lowest_blue = Color5551::from_raw(1 << 10).to_color_8888();
        assert_eq!(lowest_blue, Color8888::new(0, 0, 0x0F, 0));
    }

    #[test]
    fn color_4444_channel_positions() {
        let raw = 0x1 | (0x2 << 4) | (0xF << 8) | (0x8 << 12);
        let color = Color4444::from_raw(raw).to_color_8888();
        assert_eq!(color, Color8888::new(0x1F, 0x2F, 0xFF, 0x8F));
    }
}
