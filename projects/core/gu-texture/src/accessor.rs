//! Random access to individual pixels in linear or swizzled buffers.
//!
//! Positions are translated to a byte column (`x * bits_per_pixel / 8`) and then mapped
//! through the buffer's [`TilingMode`]. For swizzled buffers the byte at column `bx` of row `y`
//! lives at
//!
//! ```text
//! (y % 8) * 16 + (y / 8) * pitch * 8 + (bx / 16) * 128 + (bx % 16)
//! ```
//!
//! which is the layout produced by [`swizzle`](crate::swizzle::swizzle). Two 4-bit pixels share
//! a byte; the even column is stored in the low nibble.

use crate::geometry::{BLOCK_HEIGHT_ROWS, BLOCK_SIZE_BYTES, BLOCK_WIDTH_BYTES};
use gu_texture_common::format::{PixelFormat, TilingMode};

/// Returns the offset of byte column `byte_x` in row `y`.
#[inline]
pub const fn byte_offset(tiling: TilingMode, pitch: usize, byte_x: usize, y: usize) -> usize {
    match tiling {
        TilingMode::Linear => y * pitch + byte_x,
        TilingMode::Swizzled => {
            (y % BLOCK_HEIGHT_ROWS) * BLOCK_WIDTH_BYTES
                + (y / BLOCK_HEIGHT_ROWS) * pitch * BLOCK_HEIGHT_ROWS
                + (byte_x / BLOCK_WIDTH_BYTES) * BLOCK_SIZE_BYTES
                + (byte_x % BLOCK_WIDTH_BYTES)
        }
    }
}

/// Returns the offset of the first byte of pixel `(x, y)`.
///
/// For [`PixelFormat::Clut4`] this is the byte shared with the neighbouring pixel.
#[inline]
pub const fn pixel_offset(
    format: PixelFormat,
    tiling: TilingMode,
    pitch: usize,
    x: usize,
    y: usize,
) -> usize {
    byte_offset(tiling, pitch, x * format.bits_per_pixel() / 8, y)
}

/// Reads the value stored for pixel `(x, y)`.
///
/// Returns the little endian colour value for direct formats and the palette index for
/// indexed formats. Returns [`None`] if the pixel lies outside `bytes`.
#[inline]
pub fn read_stored(
    bytes: &[u8],
    format: PixelFormat,
    tiling: TilingMode,
    pitch: usize,
    x: usize,
    y: usize,
) -> Option<u32> {
    let offset = pixel_offset(format, tiling, pitch, x, y);
    match format.color_encoding() {
        Some(encoding) => encoding.read_raw(bytes.get(offset..)?),
        None => {
            let byte = *bytes.get(offset)?;
            Some(match format {
                PixelFormat::Clut4 if x & 1 == 1 => (byte >> 4) as u32,
                PixelFormat::Clut4 => (byte & 0x0F) as u32,
                _ => byte as u32,
            })
        }
    }
}

/// Writes `value` as the stored value of pixel `(x, y)`.
///
/// Only the bits that fit the format are written. Returns `false` if the pixel lies outside
/// `bytes`.
#[inline]
pub fn write_stored(
    bytes: &mut [u8],
    format: PixelFormat,
    tiling: TilingMode,
    pitch: usize,
    x: usize,
    y: usize,
    value: u32,
) -> bool {
    let offset = pixel_offset(format, tiling, pitch, x, y);
    let bytes_per_pixel = format.bits_per_pixel().div_ceil(8);
    let Some(target) = bytes.get_mut(offset..offset + bytes_per_pixel) else {
        return false;
    };

    match format {
        PixelFormat::Clut4 if x & 1 == 1 => {
            target[0] = (target[0] & 0x0F) | ((value as u8 & 0x0F) << 4);
        }
        PixelFormat::Clut4 => {
            target[0] = (target[0] & 0xF0) | (value as u8 & 0x0F);
        }
        _ => target.copy_from_slice(&value.to_le_bytes()[..bytes_per_pixel]),
    }
    true
}
