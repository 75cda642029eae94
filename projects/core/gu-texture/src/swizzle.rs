//! # Swizzle Transform
//!
//! Rearranges a linear pixel buffer into the block layout the device samples fastest.
//!
//! The buffer is viewed as stripes of 8 rows. Each stripe is cut into blocks 16 bytes wide and
//! 8 rows tall, and each block is written out as 128 contiguous bytes, one 16 byte row after
//! the other. Blocks are emitted left to right within a stripe, stripes top to bottom.
//!
//! ```text
//! Linear (pitch = 32, one stripe):      Swizzled:
//! row 0: A0 B0                          A0 A1 A2 .. A7 B0 B1 .. B7
//! row 1: A1 B1
//! ..
//! row 7: A7 B7
//! ```
//!
//! The transform only reorders bytes, so it applies to every pixel format alike. It needs a
//! pitch that is a multiple of 16 and a row count that is a multiple of 8.

use crate::geometry::{BLOCK_HEIGHT_ROWS, BLOCK_SIZE_BYTES, BLOCK_WIDTH_BYTES};
use multiversion::multiversion;
use thiserror::Error;

/// Errors from [`swizzle`] and [`unswizzle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwizzleError {
    /// The pitch is not a multiple of 16 bytes or the row count is not a multiple of 8.
    #[error("Cannot swizzle {rows} rows with a pitch of {pitch} bytes")]
    InvalidGeometry {
        /// Bytes per row
        pitch: usize,
        /// Number of rows
        rows: usize,
    },

    /// An input or output buffer is smaller than `pitch * rows`.
    #[error("Buffer too small: need {needed} bytes, got {actual} bytes")]
    BufferTooSmall {
        /// The required size in bytes
        needed: usize,
        /// The actual size in bytes
        actual: usize,
    },
}

/// Returns `true` if a buffer of this shape can be swizzled.
#[inline]
pub const fn can_swizzle(pitch: usize, rows: usize) -> bool {
    pitch % BLOCK_WIDTH_BYTES == 0 && rows % BLOCK_HEIGHT_ROWS == 0
}

/// Swizzles `pitch * rows` bytes of linear `input` into `output`.
///
/// # Errors
///
/// - [`SwizzleError::InvalidGeometry`] if the shape is not swizzlable
/// - [`SwizzleError::BufferTooSmall`] if either buffer is shorter than `pitch * rows`
///
/// # Examples
///
/// ```
/// use gu_texture::swizzle::{swizzle, unswizzle};
///
/// let linear: Vec<u8> = (0..=255).collect();
/// let mut swizzled = vec![0u8; 256];
/// let mut restored = vec![0u8; 256];
///
/// swizzle(&linear, &mut swizzled, 32, 8)?;
/// assert_eq!(&swizzled[16..20], &[32, 33, 34, 35]);
///
/// unswizzle(&swizzled, &mut restored, 32, 8)?;
/// assert_eq!(restored, linear);
/// # Ok::<(), gu_texture::swizzle::SwizzleError>(())
/// ```
pub fn swizzle(
    input: &[u8],
    output: &mut [u8],
    pitch: usize,
    rows: usize,
) -> Result<(), SwizzleError> {
    let len = validate(input.len(), output.len(), pitch, rows)?;
    swizzle_blocks(&input[..len], &mut output[..len], pitch);
    Ok(())
}

/// Reverses [`swizzle`], writing linear rows of `pitch` bytes into `output`.
///
/// # Errors
///
/// Same as [`swizzle`].
pub fn unswizzle(
    input: &[u8],
    output: &mut [u8],
    pitch: usize,
    rows: usize,
) -> Result<(), SwizzleError> {
    let len = validate(input.len(), output.len(), pitch, rows)?;
    unswizzle_blocks(&input[..len], &mut output[..len], pitch);
    Ok(())
}

fn validate(
    input_len: usize,
    output_len: usize,
    pitch: usize,
    rows: usize,
) -> Result<usize, SwizzleError> {
    if !can_swizzle(pitch, rows) {
        return Err(SwizzleError::InvalidGeometry { pitch, rows });
    }

    let needed = pitch
        .checked_mul(rows)
        .ok_or(SwizzleError::InvalidGeometry { pitch, rows })?;
    let actual = input_len.min(output_len);
    if actual < needed {
        return Err(SwizzleError::BufferTooSmall { needed, actual });
    }
    Ok(needed)
}

// Both buffers are exactly `pitch * rows` bytes, with pitch and rows already validated.
#[multiversion(targets(
    // x86-64-v3 without lahfsahf
    "x86_64+avx+avx2+bmi1+bmi2+cmpxchg16b+f16c+fma+fxsr+lzcnt+movbe+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3+xsave",
    // x86-64-v2 without lahfsahf
    "x86_64+cmpxchg16b+fxsr+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3",
))]
fn swizzle_blocks(input: &[u8], output: &mut [u8], pitch: usize) {
    let stripe_bytes = pitch * BLOCK_HEIGHT_ROWS;
    let mut blocks = output.chunks_exact_mut(BLOCK_SIZE_BYTES);

    for stripe in input.chunks_exact(stripe_bytes) {
        for column in (0..pitch).step_by(BLOCK_WIDTH_BYTES) {
            let Some(block) = blocks.next() else {
                return;
            };
            for (block_row, row) in block
                .chunks_exact_mut(BLOCK_WIDTH_BYTES)
                .zip(stripe.chunks_exact(pitch))
            {
                block_row.copy_from_slice(&row[column..column + BLOCK_WIDTH_BYTES]);
            }
        }
    }
}

#[multiversion(targets(
    // x86-64-v3 without lahfsahf
    "x86_64+avx+avx2+bmi1+bmi2+cmpxchg16b+f16c+fma+fxsr+lzcnt+movbe+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3+xsave",
    // x86-64-v2 without lahfsahf
    "x86_64+cmpxchg16b+fxsr+popcnt+sse+sse2+sse3+sse4.1+sse4.2+ssse3",
))]
fn unswizzle_blocks(input: &[u8], output: &mut [u8], pitch: usize) {
    let stripe_bytes = pitch * BLOCK_HEIGHT_ROWS;
    let mut blocks = input.chunks_exact(BLOCK_SIZE_BYTES);

    for stripe in output.chunks_exact_mut(stripe_bytes) {
        for column in (0..pitch).step_by(BLOCK_WIDTH_BYTES) {
            let Some(block) = blocks.next() else {
                return;
            };
            for (block_row, row) in block
                .chunks_exact(BLOCK_WIDTH_BYTES)
                .zip(stripe.chunks_exact_mut(pitch))
            {
                row[column..column + BLOCK_WIDTH_BYTES].copy_from_slice(block_row);
            }
        }
    }
}
