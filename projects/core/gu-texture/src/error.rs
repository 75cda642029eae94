//! Error types for palette and texture construction.

use crate::swizzle::SwizzleError;
use gu_texture_common::allocate::AllocateError;
use gu_texture_common::format::PixelFormat;
use thiserror::Error;

/// Errors that can occur while creating or duplicating a [`Palette`].
///
/// [`Palette`]: crate::palette::Palette
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    /// Palettes hold either 16 or 256 entries.
    #[error("Invalid palette entry count: {0}. Must be 16 or 256.")]
    InvalidEntryCount(u32),

    /// The numeric palette format id is not one of the defined formats.
    #[error("Invalid palette format id: {0}")]
    InvalidFormat(u32),

    /// The initial colour data does not cover every entry.
    #[error("Initial palette data too short: need {needed} bytes, got {actual} bytes")]
    InitialDataTooShort {
        /// The required size in bytes
        needed: usize,
        /// The actual size in bytes
        actual: usize,
    },

    /// Memory allocation failed.
    #[error("Memory allocation failed: {0}")]
    Allocate(#[from] AllocateError),
}

/// Errors that can occur while building a [`Texture`] or swapping its palette.
///
/// [`Texture`]: crate::texture::Texture
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextureError {
    /// Width or height is zero.
    #[error("Texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },

    /// The numeric pixel format id is not one of the defined formats.
    #[error("Invalid pixel format id: {0}")]
    InvalidPixelFormat(u32),

    /// The source pitch cannot hold a full row of pixels.
    #[error("Source pitch too small: need at least {needed} bytes per row, got {actual}")]
    PitchTooSmall {
        /// Minimum pitch in bytes
        needed: usize,
        /// The supplied pitch in bytes
        actual: usize,
    },

    /// The source buffer ends before the last row.
    #[error("Source buffer too short: need {needed} bytes, got {actual} bytes")]
    SourceTooShort {
        /// Minimum buffer size in bytes
        needed: usize,
        /// The supplied buffer size in bytes
        actual: usize,
    },

    /// Indexed pixel data was supplied without a colour table.
    #[error("{0:?} pixels require a palette")]
    MissingPalette(PixelFormat),

    /// Even the largest decimation factor cannot bring the image within the device limit.
    #[error("A {width}x{height} image cannot be reduced to {max_dimension}x{max_dimension} with a decimation factor of at most {max_factor}")]
    Unrepresentable {
        /// Working width in pixels
        width: u32,
        /// Working height in pixels
        height: u32,
        /// Largest dimension the device accepts
        max_dimension: u32,
        /// Largest decimation factor attempted
        max_factor: u32,
    },

    /// The tiling transform was given an unsuitable buffer.
    #[error("Swizzle error: {0}")]
    Swizzle(#[from] SwizzleError),

    /// Creating a colour table failed.
    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),

    /// Memory allocation failed.
    #[error("Memory allocation failed: {0}")]
    Allocate(#[from] AllocateError),
}
