#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![no_std]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

/// Random access to pixels in linear and swizzled buffers.
pub mod accessor;
pub mod error;
pub mod geometry;
pub mod palette;
pub mod palette_compactor;
pub mod render;
pub mod settings;
pub mod size_adapter;
pub mod swizzle;
pub mod texture;

mod surface;

// Re-export the main entry points
pub use error::{PaletteError, TextureError};
pub use palette::{Palette, PaletteRef};
pub use palette_compactor::RemapTable;
pub use render::{activate, DeviceImage, Renderer};
pub use settings::{TextureSettings, TextureSettingsBuilder};
pub use texture::{SourceImage, Texture, TextureBuilder};

// Re-export the shared format and allocation types
pub use gu_texture_common::allocate::{AllocateError, CacheLineAllocator, TextureAllocator};
pub use gu_texture_common::color_8888::Color8888;
pub use gu_texture_common::format::{PaletteFormat, PixelFormat, TilingMode};

#[cfg(test)]
pub(crate) mod test_prelude;
