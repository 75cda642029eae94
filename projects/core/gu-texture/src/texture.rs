//! Building device-ready textures from decoded bitmaps.
//!
//! [`TextureBuilder::build`] runs a decoded image through the preparation pipeline:
//!
//! 1. Copy rows into a buffer whose pitch is a multiple of 16 bytes and whose height is a
//!    multiple of 8 rows.
//! 2. Decimate by power-of-two factors if either dimension exceeds the device limit.
//! 3. Repack 8-bit indexed images that use at most 16 colours into 4-bit indices, with a
//!    16-entry secondary palette.
//! 4. Swizzle the buffer if its height allows it.
//!
//! Each stage allocates its output before the previous buffer is dropped. If any stage fails,
//! every buffer and palette reference acquired so far is released and the error is returned.

use crate::error::TextureError;
use crate::palette::{Palette, PaletteRef};
use crate::palette_compactor::{self, RemapTable};
use crate::render::DeviceImage;
use crate::settings::TextureSettings;
use crate::size_adapter;
use crate::surface::PixelSurface;
use crate::swizzle::{can_swizzle, swizzle, unswizzle, SwizzleError};
use crate::{accessor, geometry};
use alloc::vec::Vec;
use core::fmt;
use gu_texture_common::allocate::{CacheLineAllocator, TextureAllocator};
use gu_texture_common::color_8888::Color8888;
use gu_texture_common::format::{PixelFormat, TilingMode};

/// A decoded bitmap borrowed for the duration of a build.
#[derive(Debug, Clone, Copy)]
pub struct SourceImage<'a> {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Distance between the starts of consecutive rows, in bytes.
    pub pitch: u32,
    /// Layout of each pixel.
    pub format: PixelFormat,
    /// Pixel rows. The last row only needs to hold the visible pixels.
    pub pixels: &'a [u8],
}

impl<'a> SourceImage<'a> {
    /// Describes an image whose rows are `pitch` bytes apart.
    pub fn new(width: u32, height: u32, pitch: u32, format: PixelFormat, pixels: &'a [u8]) -> Self {
        Self {
            width,
            height,
            pitch,
            format,
            pixels,
        }
    }

    /// Describes an image whose rows directly follow each other.
    pub fn packed(width: u32, height: u32, format: PixelFormat, pixels: &'a [u8]) -> Self {
        let pitch = format.row_bytes(width as usize) as u32;
        Self::new(width, height, pitch, format, pixels)
    }

    /// Checks that the image describes a readable buffer.
    fn validate(&self) -> Result<(), TextureError> {
        if self.width == 0 || self.height == 0 {
            return Err(TextureError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }

        let row_bytes = self.format.row_bytes(self.width as usize);
        let pitch = self.pitch as usize;
        if pitch < row_bytes {
            return Err(TextureError::PitchTooSmall {
                needed: row_bytes,
                actual: pitch,
            });
        }

        let needed = pitch * (self.height as usize - 1) + row_bytes;
        if self.pixels.len() < needed {
            return Err(TextureError::SourceTooShort {
                needed,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }
}

/// Prepares [`Texture`]s according to a set of [`TextureSettings`].
#[derive(Debug, Clone)]
pub struct TextureBuilder<A: TextureAllocator + Clone = CacheLineAllocator> {
    settings: TextureSettings,
    allocator: A,
}

impl TextureBuilder {
    /// Creates a builder using the default allocator.
    pub fn new(settings: TextureSettings) -> Self {
        Self::new_in(settings, CacheLineAllocator)
    }
}

impl Default for TextureBuilder {
    fn default() -> Self {
        Self::new(TextureSettings::default())
    }
}

impl<A: TextureAllocator + Clone> TextureBuilder<A> {
    /// Creates a builder whose textures allocate from `allocator`.
    pub fn new_in(settings: TextureSettings, allocator: A) -> Self {
        Self {
            settings,
            allocator,
        }
    }

    /// The settings applied to every build.
    pub fn settings(&self) -> &TextureSettings {
        &self.settings
    }

    /// The allocator textures are built with.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Builds a texture from `source`.
    ///
    /// Indexed formats require a `palette`; the texture acquires its own reference to it. A
    /// palette passed with a direct colour format is kept but never sampled.
    ///
    /// # Errors
    ///
    /// - [`TextureError::ZeroDimension`], [`TextureError::PitchTooSmall`] or
    ///   [`TextureError::SourceTooShort`] if `source` is malformed
    /// - [`TextureError::MissingPalette`] if an indexed image has no palette
    /// - [`TextureError::Unrepresentable`] if the image is too large to decimate
    /// - [`TextureError::Allocate`] or [`TextureError::Palette`] if memory runs out
    pub fn build(
        &self,
        source: &SourceImage<'_>,
        palette: Option<&PaletteRef>,
    ) -> Result<Texture<A>, TextureError> {
        source.validate()?;
        let format = source.format;
        if format.is_indexed() && palette.is_none() {
            return Err(TextureError::MissingPalette(format));
        }

        let palette = palette.map(PaletteRef::add_ref);
        let allocator = &self.allocator;
        let (width, height) = (source.width as usize, source.height as usize);
        let mut surface = PixelSurface::copy_from(
            allocator,
            format,
            width,
            height,
            geometry::align_up(height, geometry::ROW_ALIGNMENT),
            source.pixels,
            source.pitch as usize,
        )?;

        let mut content_width = width;
        let mut content_height = height;
        let max_dimension = self.settings.max_dimension as usize;
        if surface.width() > max_dimension || surface.height() > max_dimension {
            let (working_width, working_height) = (surface.width() as u32, surface.height() as u32);
            let (factor_x, factor_y) = size_adapter::decimation_factors(
                working_width,
                working_height,
                self.settings.max_dimension,
                self.settings.max_decimation,
            )
            .ok_or(TextureError::Unrepresentable {
                width: working_width,
                height: working_height,
                max_dimension: self.settings.max_dimension,
                max_factor: self.settings.max_decimation,
            })?;

            tracing::debug!(
                working_width,
                working_height,
                factor_x,
                factor_y,
                "decimating oversized texture"
            );
            let (factor_x, factor_y) = (factor_x as usize, factor_y as usize);
            surface = size_adapter::decimate(allocator, &surface, factor_x, factor_y)?;
            content_width = content_width.div_ceil(factor_x);
            content_height = content_height.div_ceil(factor_y);
        }

        let mut compacted = None;
        let compaction_palette = palette.as_ref().filter(|_| self.settings.compact_palettes);
        if let Some(primary) = compaction_palette {
            match palette_compactor::plan_surface(&surface, content_width, content_height) {
                Some(plan) => {
                    let mut secondary = Palette::new_in(allocator, primary.format(), 16, None)?;
                    palette_compactor::fill_secondary(primary, plan.remap(), &mut secondary);
                    surface = palette_compactor::repack(allocator, &surface, &plan)?;
                    tracing::debug!(colors = plan.remap().len(), "compacted 8-bit palette to 4-bit");
                    compacted = Some(CompactedPalette {
                        remap: *plan.remap(),
                        palette: secondary,
                    });
                }
                None if format == PixelFormat::Clut8 => {
                    tracing::debug!("more than 16 colours in use, keeping 8-bit indices");
                }
                None => {}
            }
        }

        let mut tiling = TilingMode::Linear;
        if self.settings.swizzle && can_swizzle(surface.pitch(), surface.height()) {
            let mut tiled = PixelSurface::new_zeroed(
                allocator,
                surface.format(),
                surface.width(),
                surface.height(),
            )?;
            swizzle(surface.bytes(), tiled.bytes_mut(), surface.pitch(), surface.height())?;
            surface = tiled;
            tiling = TilingMode::Swizzled;
        } else {
            tracing::debug!(
                height = surface.height(),
                enabled = self.settings.swizzle,
                "leaving texture linear"
            );
        }

        let working_width = surface.width() as u32;
        let working_height = surface.height() as u32;
        let device_width = geometry::next_pow2(working_width);
        let device_height = geometry::next_pow2(working_height);
        tracing::debug!(
            width = source.width,
            height = source.height,
            working_width,
            working_height,
            device_width,
            device_height,
            format = ?surface.format(),
            ?tiling,
            "built texture"
        );

        Ok(Texture {
            width: source.width,
            height: source.height,
            content_width: content_width as u32,
            content_height: content_height as u32,
            device_width,
            device_height,
            tiling,
            surface,
            palette,
            compacted,
            allocator: self.allocator.clone(),
        })
    }

    /// Builds a texture from raw parts, taking the pixel format as its numeric id.
    ///
    /// # Errors
    ///
    /// [`TextureError::InvalidPixelFormat`] if `format_id` is not a defined format, otherwise as
    /// [`TextureBuilder::build`].
    pub fn build_raw(
        &self,
        width: u32,
        height: u32,
        pitch: u32,
        pixels: &[u8],
        format_id: u32,
        palette: Option<&PaletteRef>,
    ) -> Result<Texture<A>, TextureError> {
        let format = PixelFormat::try_from(format_id).map_err(TextureError::InvalidPixelFormat)?;
        self.build(&SourceImage::new(width, height, pitch, format, pixels), palette)
    }
}

/// The 4-bit colour table produced by palette compaction.
#[derive(Debug)]
struct CompactedPalette {
    remap: RemapTable,
    palette: Palette,
}

/// A texture prepared for the graphics device.
///
/// Three sizes describe a texture:
///
/// - The original size, as passed to the builder.
/// - The working size, the dimensions of the stored pixel buffer after padding and
///   decimation.
/// - The device size, the working size rounded up to powers of two, which is what the sampler
///   is programmed with. [`Texture::scale_u`] and [`Texture::scale_v`] map texture coordinates
///   onto the working area.
pub struct Texture<A: TextureAllocator + Clone = CacheLineAllocator> {
    width: u32,
    height: u32,
    content_width: u32,
    content_height: u32,
    device_width: u32,
    device_height: u32,
    tiling: TilingMode,
    surface: PixelSurface,
    palette: Option<PaletteRef>,
    compacted: Option<CompactedPalette>,
    allocator: A,
}

impl Texture {
    /// Builds a texture with the default settings and allocator.
    ///
    /// # Examples
    ///
    /// ```
    /// use gu_texture::texture::Texture;
    ///
    /// // 18x18 RGBA8888 image with tightly packed rows.
    /// let pixels = vec![0xFFu8; 18 * 18 * 4];
    /// let texture = Texture::build(18, 18, 18 * 4, &pixels, 3, None)?;
    ///
    /// assert_eq!((texture.get_width(), texture.get_height()), (18, 18));
    /// assert_eq!(texture.pitch(), 80);
    /// assert_eq!((texture.device_width(), texture.device_height()), (32, 32));
    /// # Ok::<(), gu_texture::error::TextureError>(())
    /// ```
    pub fn build(
        width: u32,
        height: u32,
        pitch: u32,
        pixels: &[u8],
        format_id: u32,
        palette: Option<&PaletteRef>,
    ) -> Result<Self, TextureError> {
        TextureBuilder::default().build_raw(width, height, pitch, pixels, format_id, palette)
    }
}

impl<A: TextureAllocator + Clone> Texture<A> {
    /// Width passed to the builder.
    #[inline]
    pub fn get_width(&self) -> u32 {
        self.width
    }

    /// Height passed to the builder.
    #[inline]
    pub fn get_height(&self) -> u32 {
        self.height
    }

    /// Width of the area holding image pixels, after decimation.
    #[inline]
    pub fn content_width(&self) -> u32 {
        self.content_width
    }

    /// Height of the area holding image pixels, after decimation.
    #[inline]
    pub fn content_height(&self) -> u32 {
        self.content_height
    }

    /// Width of the stored pixel buffer.
    #[inline]
    pub fn working_width(&self) -> u32 {
        self.surface.width() as u32
    }

    /// Height of the stored pixel buffer, including padding rows.
    #[inline]
    pub fn working_height(&self) -> u32 {
        self.surface.height() as u32
    }

    /// Power-of-two width the sampler is programmed with.
    #[inline]
    pub fn device_width(&self) -> u32 {
        self.device_width
    }

    /// Power-of-two height the sampler is programmed with.
    #[inline]
    pub fn device_height(&self) -> u32 {
        self.device_height
    }

    /// Bytes per stored row. Always a multiple of 16.
    #[inline]
    pub fn pitch(&self) -> u32 {
        self.surface.pitch() as u32
    }

    /// Row length in pixels as programmed into the device.
    #[inline]
    pub fn buffer_width(&self) -> u32 {
        self.surface.format().pixels_in(self.surface.pitch()) as u32
    }

    /// Layout of the stored pixels. [`PixelFormat::Clut4`] after palette compaction.
    #[inline]
    pub fn pixel_format(&self) -> PixelFormat {
        self.surface.format()
    }

    /// Arrangement of the stored pixels.
    #[inline]
    pub fn tiling(&self) -> TilingMode {
        self.tiling
    }

    /// Horizontal texture coordinate scale, `working_width / device_width`.
    #[inline]
    pub fn scale_u(&self) -> f32 {
        self.working_width() as f32 / self.device_width as f32
    }

    /// Vertical texture coordinate scale, `working_height / device_height`.
    #[inline]
    pub fn scale_v(&self) -> f32 {
        self.working_height() as f32 / self.device_height as f32
    }

    /// The primary palette, if any.
    #[inline]
    pub fn palette(&self) -> Option<&PaletteRef> {
        self.palette.as_ref()
    }

    /// The slot to original index mapping, if the palette was compacted.
    #[inline]
    pub fn remap_table(&self) -> Option<&RemapTable> {
        self.compacted.as_ref().map(|compacted| &compacted.remap)
    }

    /// The 16-entry secondary palette, if the palette was compacted.
    #[inline]
    pub fn compacted_palette(&self) -> Option<&Palette> {
        self.compacted.as_ref().map(|compacted| &compacted.palette)
    }

    /// Whether palette compaction was applied.
    #[inline]
    pub fn is_compacted(&self) -> bool {
        self.compacted.is_some()
    }

    /// The stored pixel bytes, `pitch * working_height` long, in [`Texture::tiling`] order.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        self.surface.bytes()
    }

    /// The allocator this texture uses for palette replacement.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Returns the stored value of pixel `(x, y)`: a colour value, an 8-bit index, or for
    /// compacted textures the 4-bit slot.
    ///
    /// Returns [`None`] outside the working area.
    pub fn get_pixel_stored(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.working_width() || y >= self.working_height() {
            return None;
        }
        accessor::read_stored(
            self.surface.bytes(),
            self.surface.format(),
            self.tiling,
            self.surface.pitch(),
            x as usize,
            y as usize,
        )
    }

    /// Returns the raw value of pixel `(x, y)`.
    ///
    /// For compacted textures this is the original 8-bit palette index the stored slot stands
    /// for. Otherwise it is the same as [`Texture::get_pixel_stored`].
    ///
    /// Padding outside the content area of a compacted texture stores slot 0, so it reads as
    /// the first remapped index rather than index 0. This matches what the device samples
    /// there.
    pub fn get_pixel_raw(&self, x: u32, y: u32) -> Option<u32> {
        let stored = self.get_pixel_stored(x, y)?;
        Some(match &self.compacted {
            Some(compacted) => compacted.remap.original_index(stored),
            None => stored,
        })
    }

    /// Returns the normalized colour of pixel `(x, y)`.
    ///
    /// Indexed pixels are resolved through the primary palette; indices past the end of the
    /// palette read as [`Color8888::TRANSPARENT`]. Returns [`None`] outside the working area.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color8888> {
        let raw = self.get_pixel_raw(x, y)?;
        Some(match self.surface.format().color_encoding() {
            Some(encoding) => encoding.decode(raw),
            None => self
                .palette
                .as_ref()
                .map_or(Color8888::TRANSPARENT, |palette| palette.get_color(raw)),
        })
    }

    /// Copies the stored pixels into a new buffer in linear row order.
    ///
    /// The result is `pitch * working_height` bytes.
    ///
    /// # Errors
    ///
    /// [`SwizzleError`] if swizzled storage does not have a swizzlable shape.
    pub fn to_linear_bytes(&self) -> Result<Vec<u8>, SwizzleError> {
        let bytes = self.surface.bytes();
        match self.tiling {
            TilingMode::Linear => Ok(bytes.to_vec()),
            TilingMode::Swizzled => {
                let mut linear = alloc::vec![0u8; bytes.len()];
                unswizzle(bytes, &mut linear, self.surface.pitch(), self.surface.height())?;
                Ok(linear)
            }
        }
    }

    /// Replaces the primary palette.
    ///
    /// Passing [`None`] or the palette already held does nothing. Otherwise the texture
    /// acquires a reference to `palette` and releases its previous one. For compacted textures
    /// the secondary palette is refilled from the new colours, and recreated if the palette
    /// format changed.
    ///
    /// # Errors
    ///
    /// [`TextureError::Palette`] if a new secondary palette cannot be allocated. The texture is
    /// left unchanged in that case.
    pub fn set_palette(&mut self, palette: Option<&PaletteRef>) -> Result<(), TextureError> {
        let Some(palette) = palette else {
            return Ok(());
        };
        if self
            .palette
            .as_ref()
            .is_some_and(|current| current.ptr_eq(palette))
        {
            return Ok(());
        }

        if let Some(compacted) = &mut self.compacted {
            if compacted.palette.format() != palette.format() {
                compacted.palette = Palette::new_in(&self.allocator, palette.format(), 16, None)?;
            }
            palette_compactor::fill_secondary(palette, &compacted.remap, &mut compacted.palette);
        }

        self.palette = Some(palette.add_ref());
        tracing::trace!(format = ?palette.format(), "replaced texture palette");
        Ok(())
    }

    /// Refills the secondary palette from the current primary colours.
    pub(crate) fn refresh_compacted_palette(&mut self) {
        if let (Some(primary), Some(compacted)) = (&self.palette, &mut self.compacted) {
            palette_compactor::fill_secondary(primary, &compacted.remap, &mut compacted.palette);
        }
    }

    /// The palette the device samples: the secondary one when compacted, else the primary.
    pub fn device_palette(&self) -> Option<&Palette> {
        match &self.compacted {
            Some(compacted) => Some(&compacted.palette),
            None => self.palette.as_deref(),
        }
    }

    /// Describes the stored pixels for binding to the device.
    pub fn device_image(&self) -> DeviceImage<'_> {
        DeviceImage {
            format: self.pixel_format(),
            tiling: self.tiling,
            width: self.device_width,
            height: self.device_height,
            buffer_width: self.buffer_width(),
            scale_u: self.scale_u(),
            scale_v: self.scale_v(),
            pixels: self.pixels(),
        }
    }

    /// Releases the texture, its pixel memory and its palette reference.
    #[inline]
    pub fn release(self) {
        drop(self);
    }
}

impl<A: TextureAllocator + Clone> fmt::Debug for Texture<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("surface", &self.surface)
            .field("device_width", &self.device_width)
            .field("device_height", &self.device_height)
            .field("tiling", &self.tiling)
            .field("palette", &self.palette)
            .field("compacted", &self.compacted)
            .finish_non_exhaustive()
    }
}
