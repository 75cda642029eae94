//! Linear pixel buffers with device-friendly padding.

use crate::accessor::{read_stored, write_stored};
use crate::geometry::{align_up, PITCH_ALIGNMENT};
use core::fmt;
use gu_texture_common::allocate::{allocate_zeroed, AllocateError, TextureAllocator};
use gu_texture_common::format::{PixelFormat, TilingMode};
use safe_allocator_api::RawAlloc;

/// A block of pixels of a single [`PixelFormat`].
///
/// The pitch is always a multiple of 16 bytes. Padding bytes, both at the end of a row and in
/// rows past the image content, are zero.
pub(crate) struct PixelSurface {
    format: PixelFormat,
    width: usize,
    height: usize,
    pitch: usize,
    data: RawAlloc,
}

impl PixelSurface {
    /// Allocates a zero filled surface of `width` by `height` pixels.
    pub(crate) fn new_zeroed<A: TextureAllocator + ?Sized>(
        allocator: &A,
        format: PixelFormat,
        width: usize,
        height: usize,
    ) -> Result<Self, AllocateError> {
        let pitch = align_up(format.row_bytes(width), PITCH_ALIGNMENT);
        let data = allocate_zeroed(allocator, pitch * height)?;
        Ok(Self {
            format,
            width,
            height,
            pitch,
            data,
        })
    }

    /// Allocates a surface and copies `height` rows of `source`, `source_pitch` bytes apart.
    ///
    /// The caller guarantees `source` holds every row.
    pub(crate) fn copy_from<A: TextureAllocator + ?Sized>(
        allocator: &A,
        format: PixelFormat,
        width: usize,
        height: usize,
        padded_height: usize,
        source: &[u8],
        source_pitch: usize,
    ) -> Result<Self, AllocateError> {
        let mut surface = Self::new_zeroed(allocator, format, width, padded_height)?;
        let row_bytes = format.row_bytes(width);
        for (y, row) in source
            .chunks(source_pitch)
            .take(height)
            .enumerate()
        {
            surface.row_mut(y)[..row_bytes].copy_from_slice(&row[..row_bytes]);
        }
        Ok(surface)
    }

    #[inline]
    pub(crate) fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub(crate) fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub(crate) fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub(crate) fn pitch(&self) -> usize {
        self.pitch
    }

    /// Size of the pixel data in bytes, `pitch * height`.
    #[inline]
    pub(crate) fn byte_len(&self) -> usize {
        self.pitch * self.height
    }

    #[inline]
    pub(crate) fn bytes(&self) -> &[u8] {
        &self.data.as_slice()[..self.byte_len()]
    }

    #[inline]
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        let len = self.byte_len();
        &mut self.data.as_mut_slice()[..len]
    }

    #[inline]
    pub(crate) fn row(&self, y: usize) -> &[u8] {
        &self.bytes()[y * self.pitch..(y + 1) * self.pitch]
    }

    #[inline]
    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let pitch = self.pitch;
        &mut self.bytes_mut()[y * pitch..(y + 1) * pitch]
    }

    /// Reads pixel `(x, y)` assuming linear layout.
    #[inline]
    pub(crate) fn get(&self, x: usize, y: usize) -> Option<u32> {
        read_stored(self.bytes(), self.format, TilingMode::Linear, self.pitch, x, y)
    }

    /// Writes pixel `(x, y)` assuming linear layout.
    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, value: u32) -> bool {
        let (format, pitch) = (self.format, self.pitch);
        write_stored(self.bytes_mut(), format, TilingMode::Linear, pitch, x, y, value)
    }
}

impl fmt::Debug for PixelSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelSurface")
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pitch", &self.pitch)
            .finish_non_exhaustive()
    }
}
