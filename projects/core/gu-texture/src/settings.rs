//! Construction settings and their builder.

use crate::geometry::{next_pow2, DEFAULT_MAX_DECIMATION, DEFAULT_MAX_DIMENSION};

/// Settings controlling how a [`TextureBuilder`] prepares a texture.
///
/// Use [`TextureSettingsBuilder`] to create these; [`Default`] matches the reference hardware.
///
/// [`TextureBuilder`]: crate::texture::TextureBuilder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSettings {
    /// Largest width or height the device accepts. Always a power of two.
    pub max_dimension: u32,
    /// Largest decimation factor tried for oversized images. Always a power of two.
    pub max_decimation: u32,
    /// Repack 8-bit indexed images that use at most 16 colours into 4-bit indices.
    pub compact_palettes: bool,
    /// Apply the tiling transform to textures whose height allows it.
    pub swizzle: bool,
}

impl Default for TextureSettings {
    fn default() -> Self {
        TextureSettingsBuilder::new().build()
    }
}

/// Builder for [`TextureSettings`] with convenient configuration methods.
#[derive(Debug, Clone, Copy)]
pub struct TextureSettingsBuilder {
    max_dimension: Option<u32>,
    max_decimation: Option<u32>,
    compact_palettes: Option<bool>,
    swizzle: Option<bool>,
}

impl TextureSettingsBuilder {
    /// Create a new settings builder.
    pub fn new() -> Self {
        Self {
            max_dimension: None,
            max_decimation: None,
            compact_palettes: None,
            swizzle: None,
        }
    }

    /// Set the largest width or height the device accepts.
    ///
    /// Values that are not a power of two are rounded up to one.
    pub fn max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = Some(max_dimension);
        self
    }

    /// Set the largest decimation factor tried before an oversized image is rejected.
    ///
    /// Values that are not a power of two are rounded up to one.
    pub fn max_decimation(mut self, max_decimation: u32) -> Self {
        self.max_decimation = Some(max_decimation);
        self
    }

    /// Set whether 8-bit indexed images using 16 colours or fewer are repacked to 4 bits.
    pub fn compact_palettes(mut self, compact: bool) -> Self {
        self.compact_palettes = Some(compact);
        self
    }

    /// Set whether the tiling transform is applied.
    pub fn swizzle(mut self, swizzle: bool) -> Self {
        self.swizzle = Some(swizzle);
        self
    }

    /// Build the settings using the configured values.
    pub fn build(self) -> TextureSettings {
        TextureSettings {
            max_dimension: next_pow2(self.max_dimension.unwrap_or(DEFAULT_MAX_DIMENSION)),
            max_decimation: next_pow2(self.max_decimation.unwrap_or(DEFAULT_MAX_DECIMATION)),
            compact_palettes: self.compact_palettes.unwrap_or(true),
            swizzle: self.swizzle.unwrap_or(true),
        }
    }
}

impl Default for TextureSettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
