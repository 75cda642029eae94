//! Shared colour tables for indexed textures.
//!
//! A [`Palette`] owns 16 or 256 colours in one of the [`PaletteFormat`] encodings. Textures
//! share palettes through [`PaletteRef`], a counted handle: every holder owns exactly one
//! reference, obtained via [`PaletteRef::add_ref`], and the colour memory is returned to its
//! allocator when the last reference is released.
//!
//! ## Useful APIs
//!
//! [`PaletteRef::create`]: Creates a palette, optionally seeded with colour data.
//! [`PaletteRef::duplicate`]: Deep copy with its own reference count.
//! [`Palette::get_color`]: Normalized lookup with index masking.

use crate::error::PaletteError;
use alloc::rc::Rc;
use core::fmt;
use core::ops::Deref;
use gu_texture_common::allocate::{allocate_zeroed, CacheLineAllocator, TextureAllocator};
use gu_texture_common::color_8888::Color8888;
use gu_texture_common::format::PaletteFormat;
use safe_allocator_api::RawAlloc;

/// A colour table holding 16 or 256 entries of a single [`PaletteFormat`].
pub struct Palette {
    format: PaletteFormat,
    entry_count: u32,
    data: RawAlloc,
}

impl Palette {
    /// Creates a palette using the default allocator.
    ///
    /// See [`Palette::new_in`].
    pub fn new(
        format: PaletteFormat,
        entry_count: u32,
        initial: Option<&[u8]>,
    ) -> Result<Self, PaletteError> {
        Self::new_in(&CacheLineAllocator, format, entry_count, initial)
    }

    /// Creates a palette with memory obtained from `allocator`.
    ///
    /// # Parameters
    ///
    /// - `allocator`: Source of the colour memory
    /// - `format`: Encoding of each entry
    /// - `entry_count`: Either 16 or 256
    /// - `initial`: Colour data to copy in. Only the first `entry_count` entries are used.
    ///   When [`None`], every entry starts out as zero.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::InvalidEntryCount`] if `entry_count` is neither 16 nor 256
    /// - [`PaletteError::InitialDataTooShort`] if `initial` does not cover every entry
    /// - [`PaletteError::Allocate`] if the allocator fails
    pub fn new_in<A: TextureAllocator + ?Sized>(
        allocator: &A,
        format: PaletteFormat,
        entry_count: u32,
        initial: Option<&[u8]>,
    ) -> Result<Self, PaletteError> {
        if entry_count != 16 && entry_count != 256 {
            return Err(PaletteError::InvalidEntryCount(entry_count));
        }

        let byte_len = entry_count as usize * format.bytes_per_entry();
        if let Some(initial) = initial {
            if initial.len() < byte_len {
                return Err(PaletteError::InitialDataTooShort {
                    needed: byte_len,
                    actual: initial.len(),
                });
            }
        }

        let mut data = allocate_zeroed(allocator, byte_len)?;
        if let Some(initial) = initial {
            data.as_mut_slice()[..byte_len].copy_from_slice(&initial[..byte_len]);
        }

        tracing::trace!(?format, entry_count, "created palette");
        Ok(Self {
            format,
            entry_count,
            data,
        })
    }

    /// Creates an independent copy of this palette with memory from `allocator`.
    pub fn duplicate_in<A: TextureAllocator + ?Sized>(
        &self,
        allocator: &A,
    ) -> Result<Self, PaletteError> {
        Self::new_in(allocator, self.format, self.entry_count, Some(self.as_bytes()))
    }

    /// Encoding of each entry.
    #[inline]
    pub fn format(&self) -> PaletteFormat {
        self.format
    }

    /// Number of entries, either 16 or 256.
    #[inline]
    pub fn entry_count(&self) -> u32 {
        self.entry_count
    }

    /// Mask applied to indices, `entry_count - 1`.
    #[inline]
    pub fn index_mask(&self) -> u32 {
        self.entry_count - 1
    }

    /// Size of the colour data in bytes.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.entry_count as usize * self.format.bytes_per_entry()
    }

    /// The encoded colour data, `entry_count` entries in little endian order.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data.as_slice()[..self.byte_len()]
    }

    /// Returns the encoded value stored at `index`, or 0 if `index` is past the last entry.
    #[inline]
    pub fn get_color_raw(&self, index: u32) -> u32 {
        if index > self.index_mask() {
            return 0;
        }

        let encoding = self.format.color_encoding();
        let offset = index as usize * encoding.bytes_per_color();
        encoding
            .read_raw(&self.as_bytes()[offset..])
            .unwrap_or(0)
    }

    /// Returns the normalized colour at `index`, or [`Color8888::TRANSPARENT`] if `index` is
    /// past the last entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use gu_texture::palette::Palette;
    /// use gu_texture_common::color_8888::Color8888;
    /// use gu_texture_common::format::PaletteFormat;
    ///
    /// let mut colors = [0u8; 32];
    /// colors[2..4].copy_from_slice(&0x001Fu16.to_le_bytes());
    /// let palette = Palette::new(PaletteFormat::Rgb5650, 16, Some(&colors))?;
    ///
    /// assert_eq!(palette.get_color(1), Color8888::new(255, 0, 0, 255));
    /// assert_eq!(palette.get_color(16), Color8888::TRANSPARENT);
    /// # Ok::<(), gu_texture::error::PaletteError>(())
    /// ```
    #[inline]
    pub fn get_color(&self, index: u32) -> Color8888 {
        if index > self.index_mask() {
            return Color8888::TRANSPARENT;
        }

        self.format.color_encoding().decode(self.get_color_raw(index))
    }

    /// Overwrites the encoded value at `index`.
    ///
    /// Only the low 16 bits of `raw` are stored for 16-bit formats.
    /// Returns `false` without writing if `index` is past the last entry.
    pub fn set_color_raw(&mut self, index: u32, raw: u32) -> bool {
        if index > self.index_mask() {
            return false;
        }

        let bytes_per_entry = self.format.bytes_per_entry();
        let offset = index as usize * bytes_per_entry;
        let encoded = raw.to_le_bytes();
        self.data.as_mut_slice()[offset..offset + bytes_per_entry]
            .copy_from_slice(&encoded[..bytes_per_entry]);
        true
    }
}

impl Drop for Palette {
    fn drop(&mut self) {
        tracing::trace!(format = ?self.format, entry_count = self.entry_count, "released palette");
    }
}

impl fmt::Debug for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Palette")
            .field("format", &self.format)
            .field("entry_count", &self.entry_count)
            .finish_non_exhaustive()
    }
}

/// A counted reference to a shared [`Palette`].
///
/// This type deliberately does not implement [`Clone`]; every additional holder must call
/// [`PaletteRef::add_ref`]. Dropping a handle, or calling [`PaletteRef::release`], gives up
/// that holder's reference.
#[derive(Debug)]
pub struct PaletteRef(Rc<Palette>);

impl PaletteRef {
    /// Creates a palette using the default allocator and returns the first reference to it.
    ///
    /// See [`Palette::new_in`] for parameters and errors.
    pub fn create(
        format: PaletteFormat,
        entry_count: u32,
        initial: Option<&[u8]>,
    ) -> Result<Self, PaletteError> {
        Self::create_in(&CacheLineAllocator, format, entry_count, initial)
    }

    /// Creates a palette with memory from `allocator` and returns the first reference to it.
    pub fn create_in<A: TextureAllocator + ?Sized>(
        allocator: &A,
        format: PaletteFormat,
        entry_count: u32,
        initial: Option<&[u8]>,
    ) -> Result<Self, PaletteError> {
        Palette::new_in(allocator, format, entry_count, initial).map(Self::from_palette)
    }

    /// Creates a palette from a numeric [`PaletteFormat`] id.
    ///
    /// # Errors
    ///
    /// [`PaletteError::InvalidFormat`] if `format_id` is not a defined format, otherwise as
    /// [`Palette::new_in`].
    pub fn create_from_id(
        format_id: u32,
        entry_count: u32,
        initial: Option<&[u8]>,
    ) -> Result<Self, PaletteError> {
        let format = PaletteFormat::try_from(format_id).map_err(PaletteError::InvalidFormat)?;
        Self::create(format, entry_count, initial)
    }

    /// Takes ownership of `palette` and returns the first reference to it.
    pub fn from_palette(palette: Palette) -> Self {
        Self(Rc::new(palette))
    }

    /// Creates an independent copy using the default allocator.
    ///
    /// The copy has the same format, entry count and colours, and a reference count of 1.
    pub fn duplicate(&self) -> Result<Self, PaletteError> {
        self.duplicate_in(&CacheLineAllocator)
    }

    /// Creates an independent copy with memory from `allocator`.
    pub fn duplicate_in<A: TextureAllocator + ?Sized>(
        &self,
        allocator: &A,
    ) -> Result<Self, PaletteError> {
        self.0.duplicate_in(allocator).map(Self::from_palette)
    }

    /// Acquires another reference to the same palette.
    #[inline]
    pub fn add_ref(&self) -> Self {
        Self(Rc::clone(&self.0))
    }

    /// Gives up this reference. The palette is freed when no references remain.
    #[inline]
    pub fn release(self) {
        drop(self);
    }

    /// Number of live references to the palette.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Returns `true` if both handles refer to the same palette.
    #[inline]
    pub fn ptr_eq(&self, other: &PaletteRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Mutable access to the colours, available only while this is the sole reference.
    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut Palette> {
        Rc::get_mut(&mut self.0)
    }
}

impl Deref for PaletteRef {
    type Target = Palette;

    #[inline]
    fn deref(&self) -> &Palette {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(8)]
    #[case(17)]
    #[case(255)]
    #[case(512)]
    fn rejects_invalid_entry_counts(#[case] entry_count: u32) {
        let result = PaletteRef::create(PaletteFormat::Rgba8888, entry_count, None);
        assert_eq!(
            result.err(),
            Some(PaletteError::InvalidEntryCount(entry_count))
        );
    }

    #[test]
    fn rejects_invalid_format_id() {
        let result = PaletteRef::create_from_id(4, 16, None);
        assert_eq!(result.err(), Some(PaletteError::InvalidFormat(4)));
    }

    #[test]
    fn rejects_short_initial_data() {
        let colors = [0u8; 31];
        let result = PaletteRef::create(PaletteFormat::Rgba4444, 16, Some(&colors));
        assert_eq!(
            result.err(),
            Some(PaletteError::InitialDataTooShort {
                needed: 32,
                actual: 31
            })
        );
    }

    #[test]
    fn starts_zeroed_without_initial_data() {
        let palette = PaletteRef::create(PaletteFormat::Rgba8888, 256, None).unwrap();
        assert_eq!(palette.byte_len(), 1024);
        assert!(palette.as_bytes().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn copies_initial_data() {
        let colors = rgba8888_ramp(16);
        let palette = PaletteRef::create(PaletteFormat::Rgba8888, 16, Some(&colors)).unwrap();

        assert_eq!(palette.as_bytes(), &colors[..]);
        assert_eq!(palette.get_color_raw(3), u32::from_le_bytes([3, 3, 3, 0xFF]));
        assert_eq!(palette.get_color(3), Color8888::new(3, 3, 3, 0xFF));
    }

    #[rstest]
    #[case(16)]
    #[case(256)]
    fn out_of_range_lookups(#[case] entry_count: u32) {
        let colors = rgba8888_ramp(entry_count as usize);
        let palette = PaletteRef::create(PaletteFormat::Rgba8888, entry_count, Some(&colors))
            .unwrap();

        assert_eq!(palette.index_mask(), entry_count - 1);
        assert_eq!(palette.get_color_raw(entry_count), 0);
        assert_eq!(palette.get_color(entry_count), Color8888::TRANSPARENT);
        assert_eq!(palette.get_color(u32::MAX), Color8888::TRANSPARENT);
    }

    #[test]
    fn decodes_16bit_entries() {
        let mut colors = [0u8; 32];
        colors[0..2].copy_from_slice(&0x8000u16.to_le_bytes());
        colors[2..4].copy_from_slice(&0x7C00u16.to_le_bytes());
        let palette = PaletteRef::create(PaletteFormat::Rgba5551, 16, Some(&colors)).unwrap();

        assert_eq!(palette.get_color(0), Color8888::new(0, 0, 0, 255));
        assert_eq!(palette.get_color(1), Color8888::new(0, 0, 255, 0));
    }

    #[test]
    fn add_ref_and_release_track_holders() {
        let palette = PaletteRef::create(PaletteFormat::Rgba8888, 16, None).unwrap();
        assert_eq!(palette.ref_count(), 1);

        let second = palette.add_ref();
        assert_eq!(palette.ref_count(), 2);
        assert!(second.ptr_eq(&palette));

        second.release();
        assert_eq!(palette.ref_count(), 1);
    }

    #[test]
    fn duplicate_is_independent() {
        let colors = rgba8888_ramp(16);
        let original = PaletteRef::create(PaletteFormat::Rgba8888, 16, Some(&colors)).unwrap();
        let _holder = original.add_ref();

        let mut copy = original.duplicate().unwrap();
        assert_eq!(copy.ref_count(), 1);
        assert!(!copy.ptr_eq(&original));
        assert_eq!(copy.as_bytes(), original.as_bytes());
        assert_eq!(copy.format(), original.format());
        assert_eq!(copy.entry_count(), original.entry_count());

        assert!(copy.get_mut().unwrap().set_color_raw(0, 0xDEADBEEF));
        assert_eq!(copy.get_color_raw(0), 0xDEADBEEF);
        assert_eq!(original.get_color_raw(0), u32::from_le_bytes([0, 0, 0, 0xFF]));
    }

    #[test]
    fn get_mut_requires_sole_reference() {
        let mut palette = PaletteRef::create(PaletteFormat::Rgb5650, 16, None).unwrap();
        let other = palette.add_ref();
        assert!(palette.get_mut().is_none());

        other.release();
        assert!(palette.get_mut().is_some());
    }

    #[test]
    fn set_color_raw_truncates_to_entry_size() {
        let mut palette = Palette::new(PaletteFormat::Rgb5650, 16, None).unwrap();
        assert!(palette.set_color_raw(15, 0x1234_F800));
        assert_eq!(palette.get_color_raw(15), 0xF800);
        assert!(!palette.set_color_raw(16, 1));
    }

    #[test]
    fn allocation_failure_is_reported() {
        let allocator = FailingAllocator::after(0);
        let result = PaletteRef::create_in(&allocator, PaletteFormat::Rgba8888, 16, None);
        assert!(matches!(result, Err(PaletteError::Allocate(_))));
    }
}
