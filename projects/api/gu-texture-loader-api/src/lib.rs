#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![no_std]
#![warn(missing_docs)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod error;
pub mod loader;
pub mod registry;

pub use error::LoaderError;
pub use loader::{DecodedImage, DecodedPalette, ImageLoader};
pub use registry::LoaderRegistry;
