//! Repacking 8-bit indexed images that use few colours into 4-bit indices.
//!
//! An image whose visible pixels use at most 16 distinct palette indices is rewritten so each
//! pixel stores a 4-bit slot instead. A [`RemapTable`] records which original index each slot
//! stands for, and a 16-entry secondary palette built from it is what the device samples.
//!
//! Slots are handed out in first-seen order while scanning rows top to bottom.

use crate::palette::Palette;
use crate::surface::PixelSurface;
use gu_texture_common::allocate::{AllocateError, TextureAllocator};
use gu_texture_common::format::PixelFormat;

/// Largest number of distinct indices a compacted image can hold.
pub const MAX_COMPACTED_COLORS: usize = 16;

/// Maps 4-bit slots back to the 8-bit palette indices they replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemapTable {
    indices: [u8; MAX_COMPACTED_COLORS],
    len: u8,
}

impl RemapTable {
    /// Number of slots in use.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns `true` if no slots are in use.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The original indices, in slot order.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.indices[..self.len()]
    }

    /// Returns the original index behind `slot`, or [`None`] if the slot is unused.
    #[inline]
    pub fn get(&self, slot: u32) -> Option<u8> {
        self.as_slice().get(slot as usize).copied()
    }

    /// Returns the original index behind `slot`, treating unused slots as index 0.
    #[inline]
    pub fn original_index(&self, slot: u32) -> u32 {
        self.get(slot).unwrap_or(0) as u32
    }

    /// Assigns the next free slot to `index` and returns it, or [`None`] if all slots are taken.
    fn push(&mut self, index: u8) -> Option<u8> {
        let slot = self.len;
        *self.indices.get_mut(slot as usize)? = index;
        self.len += 1;
        Some(slot)
    }
}

/// The result of analysing an image for compaction.
#[derive(Debug, Clone)]
pub struct CompactionPlan {
    slots: [Option<u8>; 256],
    remap: RemapTable,
}

impl CompactionPlan {
    /// The slot assigned to original index `index`, if it appears in the image.
    #[inline]
    pub fn slot_for(&self, index: u8) -> Option<u8> {
        self.slots[index as usize]
    }

    /// The slot to original index mapping.
    #[inline]
    pub fn remap(&self) -> &RemapTable {
        &self.remap
    }
}

/// Scans the top-left `width` by `height` pixels of an 8-bit indexed image.
///
/// `pixels` is linear with rows `pitch` bytes apart. Returns [`None`] as soon as a 17th distinct
/// index is encountered, or if the image is too small for the given geometry.
///
/// # Examples
///
/// ```
/// use gu_texture::palette_compactor::plan_compaction;
///
/// let pixels = [9u8, 4, 9, 4, 200, 4];
/// let plan = plan_compaction(&pixels, 3, 3, 2).unwrap();
/// assert_eq!(plan.remap().as_slice(), &[9, 4, 200]);
/// assert_eq!(plan.slot_for(200), Some(2));
/// ```
pub fn plan_compaction(
    pixels: &[u8],
    pitch: usize,
    width: usize,
    height: usize,
) -> Option<CompactionPlan> {
    let mut plan = CompactionPlan {
        slots: [None; 256],
        remap: RemapTable::default(),
    };

    for y in 0..height {
        let row = pixels.get(y * pitch..y * pitch + width)?;
        for &index in row {
            if plan.slots[index as usize].is_none() {
                plan.slots[index as usize] = Some(plan.remap.push(index)?);
            }
        }
    }

    Some(plan)
}

/// Analyses the visible region of `surface`, see [`plan_compaction`].
pub(crate) fn plan_surface(
    surface: &PixelSurface,
    width: usize,
    height: usize,
) -> Option<CompactionPlan> {
    if surface.format() != PixelFormat::Clut8 {
        return None;
    }
    plan_compaction(surface.bytes(), surface.pitch(), width, height)
}

/// Rewrites every pixel of an 8-bit indexed `source` as its 4-bit slot.
///
/// Indices the plan does not know, such as those in padding, map to slot 0.
pub(crate) fn repack<A: TextureAllocator + ?Sized>(
    allocator: &A,
    source: &PixelSurface,
    plan: &CompactionPlan,
) -> Result<PixelSurface, AllocateError> {
    let (width, height) = (source.width(), source.height());
    let mut target = PixelSurface::new_zeroed(allocator, PixelFormat::Clut4, width, height)?;

    for y in 0..height {
        let source_row = &source.row(y)[..width];
        let target_row = target.row_mut(y);
        for (pair, packed) in source_row.chunks(2).zip(target_row.iter_mut()) {
            let low = plan.slot_for(pair[0]).unwrap_or(0);
            let high = pair.get(1).and_then(|&index| plan.slot_for(index)).unwrap_or(0);
            *packed = low | (high << 4);
        }
    }

    Ok(target)
}

/// Fills the first slots of `secondary` with the colours `remap` points to in `primary`.
///
/// Slots past the end of `remap` are left untouched. Both palettes must share a format.
pub(crate) fn fill_secondary(primary: &Palette, remap: &RemapTable, secondary: &mut Palette) {
    for (slot, &index) in remap.as_slice().iter().enumerate() {
        secondary.set_color_raw(slot as u32, primary.get_color_raw(index as u32));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(10)]
    #[case(16)]
    fn accepts_up_to_16_colours(#[case] distinct: usize) {
        let pixels = clut8_pattern(20, 4, distinct);
        let plan = plan_compaction(&pixels, 20, 20, 4).unwrap();
        assert_eq!(plan.remap().len(), distinct);
    }

    #[rstest]
    #[case(17)]
    #[case(64)]
    #[case(256)]
    fn rejects_more_than_16_colours(#[case] distinct: usize) {
        let pixels = clut8_pattern(32, 8, distinct);
        assert!(plan_compaction(&pixels, 32, 32, 8).is_none());
    }

    #[test]
    fn slots_follow_first_appearance() {
        let pixels = [50u8, 50, 3, 7, 3, 50];
        let plan = plan_compaction(&pixels, 3, 3, 2).unwrap();

        assert_eq!(plan.remap().as_slice(), &[50, 3, 7]);
        assert_eq!(plan.slot_for(50), Some(0));
        assert_eq!(plan.slot_for(3), Some(1));
        assert_eq!(plan.slot_for(7), Some(2));
        assert_eq!(plan.slot_for(8), None);
    }

    #[test]
    fn ignores_bytes_outside_the_visible_region() {
        // Each row has 2 visible pixels followed by 2 padding bytes.
        let pixels = [1u8, 2, 99, 98, 2, 1, 97, 96];
        let plan = plan_compaction(&pixels, 4, 2, 2).unwrap();
        assert_eq!(plan.remap().as_slice(), &[1, 2]);
    }

    #[test]
    fn remap_table_lookups() {
        let pixels = [5u8, 6];
        let plan = plan_compaction(&pixels, 2, 2, 1).unwrap();
        let remap = plan.remap();

        assert_eq!(remap.get(1), Some(6));
        assert_eq!(remap.get(2), None);
        assert_eq!(remap.original_index(1), 6);
        assert_eq!(remap.original_index(15), 0);
        assert!(!remap.is_empty());
    }

    #[test]
    fn repack_stores_slots_as_nibbles() {
        let pixels = [40u8, 41, 42, 42, 41, 40];
        let source =
            PixelSurface::copy_from(&CacheLineAllocator, PixelFormat::Clut8, 3, 2, 8, &pixels, 3)
                .unwrap();
        let plan = plan_surface(&source, 3, 2).unwrap();
        let packed = repack(&CacheLineAllocator, &source, &plan).unwrap();

        assert_eq!(packed.format(), PixelFormat::Clut4);
        assert_eq!(packed.pitch(), 16);
        assert_eq!(packed.height(), 8);
        assert_eq!(&packed.row(0)[..2], &[0x10, 0x02]);
        assert_eq!(&packed.row(1)[..2], &[0x12, 0x00]);
        for y in 0..2 {
            for x in 0..3 {
                let slot = packed.get(x, y).unwrap();
                assert_eq!(
                    plan.remap().original_index(slot),
                    pixels[y * 3 + x] as u32
                );
            }
        }
    }

    #[test]
    fn fills_secondary_from_primary() {
        let primary = ramp_palette_256();
        let pixels = [200u8, 17, 3];
        let plan = plan_compaction(&pixels, 3, 3, 1).unwrap();
        let mut secondary = Palette::new(PaletteFormat::Rgba8888, 16, None).unwrap();

        fill_secondary(&primary, plan.remap(), &mut secondary);

        assert_eq!(secondary.get_color(0), primary.get_color(200));
        assert_eq!(secondary.get_color(1), primary.get_color(17));
        assert_eq!(secondary.get_color(2), primary.get_color(3));
        assert_eq!(secondary.get_color_raw(3), 0);
    }

    #[test]
    fn only_plans_8bit_surfaces() {
        let surface =
            PixelSurface::new_zeroed(&CacheLineAllocator, PixelFormat::Clut4, 8, 8).unwrap();
        assert!(plan_surface(&surface, 8, 8).is_none());
    }
}
