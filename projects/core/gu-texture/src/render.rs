//! Handing textures to the graphics device.
//!
//! The device itself sits behind the [`Renderer`] trait. [`activate`] makes a texture current:
//! it binds the pixel data, refreshes the 4-bit colour table of compacted textures from the
//! primary palette, and binds whichever palette the device should sample.

use crate::palette::Palette;
use crate::texture::Texture;
use gu_texture_common::allocate::TextureAllocator;
use gu_texture_common::format::{PixelFormat, TilingMode};

/// Everything the device needs to sample a texture's pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceImage<'a> {
    /// Layout of each stored pixel.
    pub format: PixelFormat,
    /// Arrangement of the stored pixels.
    pub tiling: TilingMode,
    /// Power-of-two width programmed into the sampler.
    pub width: u32,
    /// Power-of-two height programmed into the sampler.
    pub height: u32,
    /// Row length in pixels.
    pub buffer_width: u32,
    /// Horizontal coordinate scale.
    pub scale_u: f32,
    /// Vertical coordinate scale.
    pub scale_v: f32,
    /// The stored pixel bytes.
    pub pixels: &'a [u8],
}

/// The graphics device's texture state.
pub trait Renderer {
    /// Programs the sampler with `image`.
    fn bind_texture(&mut self, image: &DeviceImage<'_>);

    /// Uploads `palette` as the current colour table.
    fn bind_palette(&mut self, palette: &Palette);

    /// Turns texturing off.
    fn disable_texturing(&mut self);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    #[inline]
    fn bind_texture(&mut self, image: &DeviceImage<'_>) {
        (**self).bind_texture(image)
    }

    #[inline]
    fn bind_palette(&mut self, palette: &Palette) {
        (**self).bind_palette(palette)
    }

    #[inline]
    fn disable_texturing(&mut self) {
        (**self).disable_texturing()
    }
}

/// Makes `texture` the current texture of `renderer`, or disables texturing for [`None`].
pub fn activate<A, R>(texture: Option<&mut Texture<A>>, renderer: &mut R)
where
    A: TextureAllocator + Clone,
    R: Renderer + ?Sized,
{
    let Some(texture) = texture else {
        renderer.disable_texturing();
        return;
    };

    texture.refresh_compacted_palette();
    renderer.bind_texture(&texture.device_image());
    if let Some(palette) = texture.device_palette() {
        renderer.bind_palette(palette);
    }
}
