/// Represents a single normalized RGBA8888 colour.
///
/// When packed into a [`u32`] the channels are laid out as `0xAABBGGRR`, which is also the
/// byte order (`R`, `G`, `B`, `A`) of a 32-bit pixel in device memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Color8888 {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Alpha component (0-255)
    pub a: u8,
}

impl Color8888 {
    /// Fully transparent black, returned for lookups that fall outside a colour table.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Constructs a new [`Color8888`] from the specified red, green, blue, and alpha components.
    ///
    /// Each parameter represents the intensity of its corresponding colour channel (0–255).
    ///
    /// # Examples
    ///
    /// ```
    /// use gu_texture_common::color_8888::Color8888;
    ///
    /// let pixel = Color8888::new(255, 0, 0, 255);
    /// assert_eq!(pixel.r, 255);
    /// assert_eq!(pixel.g, 0);
    /// assert_eq!(pixel.b, 0);
    /// assert_eq!(pixel.a, 255);
    /// ```
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpacks a `0xAABBGGRR` value.
    ///
    /// # Examples
    ///
    /// ```
    /// use gu_texture_common::color_8888::Color8888;
    ///
    /// let pixel = Color8888::from_packed(0x8000_00FF);
    /// assert_eq!(pixel, Color8888::new(255, 0, 0, 128));
    /// ```
    #[inline]
    pub const fn from_packed(value: u32) -> Self {
        let [r, g, b, a] = value.to_le_bytes();
        Self { r, g, b, a }
    }

    /// Packs this colour as `0xAABBGGRR`.
    #[inline]
    pub const fn packed(&self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    /// Returns the colour with the alpha channel cleared, packed as `0x00BBGGRR`.
    #[inline]
    pub const fn without_alpha(&self) -> u32 {
        self.packed() & 0x00FF_FFFF
    }
}

impl From<u32> for Color8888 {
    #[inline]
    fn from(value: u32) -> Self {
        Self::from_packed(value)
    }
}

impl From<Color8888> for u32 {
    #[inline]
    fn from(value: Color8888) -> Self {
        value.packed()
    }
}
