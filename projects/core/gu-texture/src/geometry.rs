//! Fixed layout constraints of the graphics device.

/// Width of a tiling block in bytes.
pub const BLOCK_WIDTH_BYTES: usize = 16;

/// Height of a tiling stripe in rows.
pub const BLOCK_HEIGHT_ROWS: usize = 8;

/// Bytes in a single tiling block.
pub const BLOCK_SIZE_BYTES: usize = BLOCK_WIDTH_BYTES * BLOCK_HEIGHT_ROWS;

/// Row pitches are padded to a multiple of this many bytes.
pub const PITCH_ALIGNMENT: usize = BLOCK_WIDTH_BYTES;

/// Heights are padded to a multiple of this many rows.
pub const ROW_ALIGNMENT: usize = BLOCK_HEIGHT_ROWS;

/// Largest texture dimension accepted by the reference hardware.
pub const DEFAULT_MAX_DIMENSION: u32 = 512;

/// Largest decimation factor tried before giving up on an oversized image.
pub const DEFAULT_MAX_DECIMATION: u32 = 512;

/// Rounds `value` up to the next power of two. Zero rounds up to one.
///
/// Values above `2^31` saturate at `2^31`, the largest power of two a `u32` holds.
///
/// # Examples
///
/// ```
/// use gu_texture::geometry::next_pow2;
///
/// assert_eq!(next_pow2(0), 1);
/// assert_eq!(next_pow2(18), 32);
/// assert_eq!(next_pow2(512), 512);
/// assert_eq!(next_pow2(u32::MAX), 1 << 31);
/// ```
#[inline]
pub const fn next_pow2(value: u32) -> u32 {
    match value.checked_next_power_of_two() {
        Some(pow2) => pow2,
        None => 1 << 31,
    }
}

/// Rounds `value` up to a multiple of `alignment`.
#[inline]
pub const fn align_up(value: usize, alignment: usize) -> usize {
    value.div_ceil(alignment) * alignment
}
