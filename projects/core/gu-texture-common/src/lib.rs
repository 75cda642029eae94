#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]

pub mod allocate;
pub mod color_16bit;
pub mod color_8888;
pub mod format;

#[cfg(test)]
mod tests;
