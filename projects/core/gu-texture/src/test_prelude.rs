//! Common test imports and utilities for the gu-texture crate.
//!
//! This module provides a centralized location for commonly used test imports and helpers
//! to reduce duplication across test modules.

#![allow(unused_imports)]

pub use crate::error::{PaletteError, TextureError};
pub use crate::palette::{Palette, PaletteRef};
pub use crate::settings::{TextureSettings, TextureSettingsBuilder};
pub use crate::texture::{SourceImage, Texture, TextureBuilder};
pub use alloc::vec;
pub use alloc::vec::Vec;
pub use core::cell::Cell;
pub use gu_texture_common::allocate::{AllocateError, CacheLineAllocator, TextureAllocator};
pub use gu_texture_common::color_8888::Color8888;
pub use gu_texture_common::format::{PaletteFormat, PixelFormat, TilingMode};
pub use safe_allocator_api::RawAlloc;

/// Allocator that serves a fixed number of requests and then refuses every later one.
#[derive(Debug, Clone)]
pub struct FailingAllocator {
    remaining: Cell<usize>,
}

impl FailingAllocator {
    /// Allows `successes` allocations before failing.
    pub fn after(successes: usize) -> Self {
        Self {
            remaining: Cell::new(successes),
        }
    }
}

impl TextureAllocator for FailingAllocator {
    fn allocate(&self, num_bytes: usize) -> Result<RawAlloc, AllocateError> {
        match self.remaining.get() {
            0 => Err(AllocateError::Refused {
                requested: num_bytes,
            }),
            remaining => {
                self.remaining.set(remaining - 1);
                CacheLineAllocator.allocate(num_bytes)
            }
        }
    }
}

/// Builds `count` RGBA8888 palette entries where entry `i` is `(i, i, i, 0xFF)`.
pub fn rgba8888_ramp(count: usize) -> Vec<u8> {
    (0..count)
        .flat_map(|index| [index as u8, index as u8, index as u8, 0xFF])
        .collect()
}

/// Creates a 256 entry RGBA8888 palette from [`rgba8888_ramp`].
pub fn ramp_palette_256() -> PaletteRef {
    PaletteRef::create(PaletteFormat::Rgba8888, 256, Some(&rgba8888_ramp(256))).unwrap()
}

/// Builds a tightly packed 8-bit indexed image using `distinct` colours in a repeating pattern.
pub fn clut8_pattern(width: usize, height: usize, distinct: usize) -> Vec<u8> {
    (0..width * height)
        .map(|index| ((index % distinct) * 7 % 256) as u8)
        .collect()
}

/// Builds a tightly packed RGBA8888 image where each pixel encodes its own coordinates.
pub fn rgba8888_coordinates(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&coordinate_color(x, y).to_le_bytes());
        }
    }
    pixels
}

/// The packed colour stored at `(x, y)` by [`rgba8888_coordinates`].
pub fn coordinate_color(x: usize, y: usize) -> u32 {
    0xFF00_0000 | ((y as u32 & 0xFFF) << 12) | (x as u32 & 0xFFF)
}
