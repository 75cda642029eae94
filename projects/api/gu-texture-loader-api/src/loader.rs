//! The interface implemented by image decoders.

use crate::error::LoaderError;
use alloc::vec::Vec;
use gu_texture::texture::SourceImage;
use gu_texture_common::format::{PaletteFormat, PixelFormat};

/// A colour table decoded alongside an indexed image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPalette {
    /// Encoding of each entry.
    pub format: PaletteFormat,
    /// Either 16 or 256.
    pub entry_count: u32,
    /// `entry_count` encoded colours, little endian.
    pub colors: Vec<u8>,
}

/// The output of an [`ImageLoader`]: raw pixel rows ready to be built into a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bytes between the starts of consecutive rows.
    pub pitch: u32,
    /// Layout of each pixel.
    pub format: PixelFormat,
    /// The pixel rows.
    pub pixels: Vec<u8>,
    /// The colour table, required for indexed formats.
    pub palette: Option<DecodedPalette>,
}

impl DecodedImage {
    /// A direct colour image with tightly packed rows.
    pub fn direct(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pitch: format.row_bytes(width as usize) as u32,
            format,
            pixels,
            palette: None,
        }
    }

    /// An indexed image with tightly packed rows and its colour table.
    pub fn indexed(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
        palette: DecodedPalette,
    ) -> Self {
        Self {
            palette: Some(palette),
            ..Self::direct(width, height, format, pixels)
        }
    }

    /// Borrows the pixel rows as a builder input.
    pub fn source_image(&self) -> SourceImage<'_> {
        SourceImage::new(self.width, self.height, self.pitch, self.format, &self.pixels)
    }
}

/// A decoder for one image file format.
///
/// Implementations must validate everything they read from `input`; data may come from
/// untrusted sources.
pub trait ImageLoader {
    /// Short name used in errors and logs.
    fn name(&self) -> &str;

    /// Returns `true` if `input` looks like a file this loader understands.
    ///
    /// Usually checks a magic number; it should not decode the whole file.
    fn can_load(&self, input: &[u8]) -> bool;

    /// File extensions this loader handles, lowercase and without a leading dot.
    ///
    /// An empty string in the slice matches every extension.
    fn supported_extensions(&self) -> &[&str];

    /// Decodes `input`.
    fn load(&self, input: &[u8]) -> Result<DecodedImage, LoaderError>;
}
