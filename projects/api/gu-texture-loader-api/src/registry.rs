//! An explicit, ordered collection of [`ImageLoader`]s.
//!
//! Registries are ordinary values: build one at startup, register the loaders the application
//! ships with and pass it to whatever needs to open images. Loaders are probed in registration
//! order.

use crate::error::LoaderError;
use crate::loader::{DecodedImage, ImageLoader};
use alloc::boxed::Box;
use alloc::vec::Vec;
use gu_texture::palette::PaletteRef;
use gu_texture::texture::{Texture, TextureBuilder};
use gu_texture_common::allocate::TextureAllocator;

/// Finds the right [`ImageLoader`] for a file and builds textures from it.
#[derive(Default)]
pub struct LoaderRegistry {
    loaders: Vec<Box<dyn ImageLoader>>,
}

impl LoaderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `loader`. It is probed after every loader registered before it.
    pub fn register<L: ImageLoader + 'static>(&mut self, loader: L) {
        tracing::debug!(loader = loader.name(), "registered image loader");
        self.loaders.push(Box::new(loader));
    }

    /// Appends `loader` and returns the registry, for chained construction.
    pub fn with_loader<L: ImageLoader + 'static>(mut self, loader: L) -> Self {
        self.register(loader);
        self
    }

    /// Number of registered loaders.
    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    /// Returns `true` if no loaders are registered.
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// Names of the registered loaders, in probe order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.loaders.iter().map(|loader| loader.name())
    }

    /// Returns the first loader that accepts `input`.
    ///
    /// When `extension` is given, loaders that do not list it are skipped. Extensions are
    /// compared case-insensitively and may include a leading dot.
    pub fn find(&self, input: &[u8], extension: Option<&str>) -> Option<&dyn ImageLoader> {
        let extension = extension.map(|extension| extension.trim_start_matches('.'));
        self.loaders
            .iter()
            .map(|loader| loader.as_ref())
            .filter(|loader| extension.is_none_or(|extension| handles_extension(*loader, extension)))
            .find(|loader| loader.can_load(input))
    }

    /// Decodes `input` with the first loader that accepts it.
    ///
    /// # Errors
    ///
    /// [`LoaderError::NoLoader`] if no loader accepts the input, otherwise whatever the chosen
    /// loader reports.
    pub fn decode(&self, input: &[u8], extension: Option<&str>) -> Result<DecodedImage, LoaderError> {
        let loader = self.find(input, extension).ok_or(LoaderError::NoLoader)?;
        tracing::debug!(loader = loader.name(), len = input.len(), "decoding image");
        loader.load(input)
    }

    /// Decodes `input` and builds a texture with the default settings.
    pub fn load_texture(&self, input: &[u8], extension: Option<&str>) -> Result<Texture, LoaderError> {
        self.load_texture_with(&TextureBuilder::default(), input, extension)
    }

    /// Decodes `input` and builds a texture with `builder`.
    ///
    /// A decoded colour table becomes a new palette owned by the texture.
    ///
    /// # Errors
    ///
    /// Decode failures as [`LoaderRegistry::decode`], plus [`LoaderError::Palette`] and
    /// [`LoaderError::Texture`] if the decoded data cannot be built.
    pub fn load_texture_with<A: TextureAllocator + Clone>(
        &self,
        builder: &TextureBuilder<A>,
        input: &[u8],
        extension: Option<&str>,
    ) -> Result<Texture<A>, LoaderError> {
        let image = self.decode(input, extension)?;
        let palette = image
            .palette
            .as_ref()
            .map(|palette| {
                PaletteRef::create_in(
                    builder.allocator(),
                    palette.format,
                    palette.entry_count,
                    Some(&palette.colors),
                )
            })
            .transpose()?;

        Ok(builder.build(&image.source_image(), palette.as_ref())?)
    }
}

fn handles_extension(loader: &dyn ImageLoader, extension: &str) -> bool {
    loader
        .supported_extensions()
        .iter()
        .any(|supported| supported.is_empty() || supported.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DecodedPalette;
    use alloc::vec;
    use core::cell::Cell;
    use gu_texture::error::TextureError;
    use gu_texture_common::format::{PaletteFormat, PixelFormat};
    use rstest::rstest;

    /// Accepts data starting with `magic` and decodes the remainder as a 4x4 image.
    struct FakeLoader {
        name: &'static str,
        magic: &'static [u8],
        extensions: &'static [&'static str],
        format: PixelFormat,
        loads: Cell<usize>,
    }

    impl FakeLoader {
        fn new(name: &'static str, magic: &'static [u8], extensions: &'static [&'static str]) -> Self {
            Self {
                name,
                magic,
                extensions,
                format: PixelFormat::Rgba4444,
                loads: Cell::new(0),
            }
        }

        fn with_format(mut self, format: PixelFormat) -> Self {
            self.format = format;
            self
        }
    }

    impl ImageLoader for FakeLoader {
        fn name(&self) -> &str {
            self.name
        }

        fn can_load(&self, input: &[u8]) -> bool {
            input.starts_with(self.magic)
        }

        fn supported_extensions(&self) -> &[&str] {
            self.extensions
        }

        fn load(&self, input: &[u8]) -> Result<DecodedImage, LoaderError> {
            self.loads.set(self.loads.get() + 1);
            let body = &input[self.magic.len()..];
            match self.format {
                PixelFormat::Clut8 => Ok(DecodedImage::indexed(
                    4,
                    4,
                    PixelFormat::Clut8,
                    body.to_vec(),
                    DecodedPalette {
                        format: PaletteFormat::Rgba8888,
                        entry_count: 16,
                        colors: (0..16u8).flat_map(|i| [i, 0, 0, 0xFF]).collect(),
                    },
                )),
                format if body.len() < format.row_bytes(4) * 4 => {
                    Err(LoaderError::decode(self.name, "truncated pixel data"))
                }
                format => Ok(DecodedImage::direct(4, 4, format, body.to_vec())),
            }
        }
    }

    fn file(magic: &[u8], body_len: usize) -> Vec<u8> {
        let mut data = magic.to_vec();
        data.extend((0..body_len).map(|i| i as u8));
        data
    }

    #[test]
    fn empty_registry_finds_nothing() {
        let registry = LoaderRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.find(b"ABCD", None).is_none());
        assert_eq!(registry.decode(b"ABCD", None).err(), Some(LoaderError::NoLoader));
    }

    #[test]
    fn probes_in_registration_order() {
        let registry = LoaderRegistry::new()
            .with_loader(FakeLoader::new("first", b"AB", &["img"]))
            .with_loader(FakeLoader::new("second", b"A", &["img"]));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["first", "second"]);
        assert_eq!(registry.find(b"ABC", None).map(|l| l.name()), Some("first"));
        assert_eq!(registry.find(b"AXC", None).map(|l| l.name()), Some("second"));
    }

    #[rstest]
    #[case(Some("tga"), Some("targa"))]
    #[case(Some("TGA"), Some("targa"))]
    #[case(Some(".tga"), Some("targa"))]
    #[case(Some("png"), Some("any"))]
    #[case(None, Some("targa"))]
    fn filters_by_extension(#[case] extension: Option<&str>, #[case] expected: Option<&str>) {
        let registry = LoaderRegistry::new()
            .with_loader(FakeLoader::new("targa", b"T", &["tga", "tpic"]))
            .with_loader(FakeLoader::new("any", b"T", &[""]));

        assert_eq!(
            registry.find(b"T...", extension).map(|l| l.name()),
            expected
        );
    }

    #[test]
    fn extension_mismatch_means_no_loader() {
        let registry = LoaderRegistry::new().with_loader(FakeLoader::new("targa", b"T", &["tga"]));
        assert!(registry.find(b"T...", Some("bmp")).is_none());
    }

    #[test]
    fn loads_direct_texture() {
        let registry = LoaderRegistry::new().with_loader(FakeLoader::new("raw", b"RAW", &["raw"]));
        let texture = registry
            .load_texture(&file(b"RAW", 32), Some("raw"))
            .unwrap();

        assert_eq!(texture.pixel_format(), PixelFormat::Rgba4444);
        assert_eq!(texture.get_pixel_raw(1, 0), Some(u16::from_le_bytes([2, 3]) as u32));
        assert!(texture.palette().is_none());
    }

    #[test]
    fn loads_indexed_texture_with_its_palette() {
        let registry = LoaderRegistry::new()
            .with_loader(FakeLoader::new("pal", b"PAL", &["pal"]).with_format(PixelFormat::Clut8));
        // Indices 0..16, one per pixel.
        let texture = registry.load_texture(&file(b"PAL", 16), None).unwrap();

        let palette = texture.palette().unwrap();
        assert_eq!(palette.ref_count(), 1);
        assert_eq!(palette.entry_count(), 16);
        assert_eq!(texture.pixel_format(), PixelFormat::Clut4);
        assert_eq!(texture.get_pixel_raw(3, 1), Some(7));
        assert_eq!(texture.get_pixel(3, 1), Some(palette.get_color(7)));
    }

    #[test]
    fn reports_decode_failures() {
        let registry = LoaderRegistry::new().with_loader(FakeLoader::new("raw", b"RAW", &["raw"]));
        assert_eq!(
            registry.load_texture(&file(b"RAW", 10), None).err(),
            Some(LoaderError::decode("raw", "truncated pixel data"))
        );
    }

    #[test]
    fn reports_build_failures() {
        let registry = LoaderRegistry::new()
            .with_loader(FakeLoader::new("pal", b"PAL", &["pal"]).with_format(PixelFormat::Clut8));
        // Only 3 of the 16 index bytes are present.
        assert_eq!(
            registry.load_texture(&file(b"PAL", 3), None).err(),
            Some(LoaderError::Texture(TextureError::SourceTooShort {
                needed: 16,
                actual: 3
            }))
        );
    }
}
