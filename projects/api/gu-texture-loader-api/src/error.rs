//! Error types for loading images through the registry.

use alloc::string::String;
use gu_texture::error::{PaletteError, TextureError};
use thiserror::Error;

/// Errors that can occur while decoding an image or building a texture from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    /// No registered loader accepted the input.
    #[error("No registered loader recognises this data")]
    NoLoader,

    /// A loader accepted the input but could not decode it.
    #[error("Loader '{loader}' failed to decode the image: {reason}")]
    Decode {
        /// Name of the loader that failed
        loader: String,
        /// Description of the failure
        reason: String,
    },

    /// The decoded colour table could not be created.
    #[error(transparent)]
    Palette(#[from] PaletteError),

    /// The decoded pixels could not be built into a texture.
    #[error(transparent)]
    Texture(#[from] TextureError),
}

impl LoaderError {
    /// Creates a [`LoaderError::Decode`] for the loader named `loader`.
    pub fn decode(loader: &str, reason: impl Into<String>) -> Self {
        Self::Decode {
            loader: loader.into(),
            reason: reason.into(),
        }
    }
}
