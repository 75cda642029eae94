//! Fitting oversized images within the device's maximum texture size.
//!
//! Images larger than the device limit are decimated by power-of-two factors using
//! nearest-neighbour sampling: destination pixel `(x, y)` takes source pixel
//! `(x * factor_x, y * factor_y)`. Each axis picks the smallest factor that fits.

use crate::surface::PixelSurface;
use gu_texture_common::allocate::{AllocateError, TextureAllocator};
use gu_texture_common::format::PixelFormat;

/// Returns the smallest power-of-two factor that brings `dimension` within `max_dimension`.
///
/// Returns [`None`] if a factor larger than `max_factor` would be required.
///
/// # Examples
///
/// ```
/// use gu_texture::size_adapter::decimation_factor;
///
/// assert_eq!(decimation_factor(480, 512, 512), Some(1));
/// assert_eq!(decimation_factor(600, 512, 512), Some(2));
/// assert_eq!(decimation_factor(5000, 512, 4), None);
/// ```
pub fn decimation_factor(dimension: u32, max_dimension: u32, max_factor: u32) -> Option<u32> {
    let mut factor = 1u32;
    while dimension.div_ceil(factor) > max_dimension {
        factor = factor.checked_mul(2)?;
        if factor > max_factor {
            return None;
        }
    }
    Some(factor)
}

/// Returns the per-axis decimation factors for a `width` by `height` image.
///
/// Returns [`None`] if either axis cannot be brought within `max_dimension`.
pub fn decimation_factors(
    width: u32,
    height: u32,
    max_dimension: u32,
    max_factor: u32,
) -> Option<(u32, u32)> {
    Some((
        decimation_factor(width, max_dimension, max_factor)?,
        decimation_factor(height, max_dimension, max_factor)?,
    ))
}

/// Produces a new surface sampling every `factor_x`-th column and `factor_y`-th row of `source`.
///
/// The result is `ceil(width / factor_x)` by `ceil(height / factor_y)` pixels.
pub(crate) fn decimate<A: TextureAllocator + ?Sized>(
    allocator: &A,
    source: &PixelSurface,
    factor_x: usize,
    factor_y: usize,
) -> Result<PixelSurface, AllocateError> {
    let format = source.format();
    let width = source.width().div_ceil(factor_x);
    let height = source.height().div_ceil(factor_y);
    let mut target = PixelSurface::new_zeroed(allocator, format, width, height)?;

    match format {
        PixelFormat::Clut4 => {
            for y in 0..height {
                for x in 0..width {
                    let value = source.get(x * factor_x, y * factor_y).unwrap_or(0);
                    target.set(x, y, value);
                }
            }
        }
        _ => {
            let bytes_per_pixel = format.bits_per_pixel() / 8;
            for y in 0..height {
                let source_row = source.row(y * factor_y);
                let target_row = target.row_mut(y);
                for (x, pixel) in target_row
                    .chunks_exact_mut(bytes_per_pixel)
                    .take(width)
                    .enumerate()
                {
                    let offset = x * factor_x * bytes_per_pixel;
                    pixel.copy_from_slice(&source_row[offset..offset + bytes_per_pixel]);
                }
            }
        }
    }

    Ok(target)
}
