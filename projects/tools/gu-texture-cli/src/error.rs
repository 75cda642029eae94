use gu_texture::error::{PaletteError, TextureError};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error("--palette-format is required when --palette is given")]
    MissingPaletteFormat,
}
