#![no_main]

// Compacting an 8-bit image down to 4 bits must not change the colour of any content pixel.

use gu_texture::{PaletteFormat, PaletteRef, PixelFormat, SourceImage, TextureBuilder};
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct CompactionInput {
    pub width: u8,
    pub height: u8,
    pub palette: Vec<u8>,
    pub indices: Vec<u8>,
}

fuzz_target!(|input: CompactionInput| {
    let width = u32::from(input.width % 64) + 1;
    let height = u32::from(input.height % 64) + 1;
    if input.indices.is_empty() {
        return;
    }

    // Few distinct indices make compaction likely.
    let pixels: Vec<u8> = (0..(width * height) as usize)
        .map(|i| input.indices[i % input.indices.len()])
        .collect();

    let mut colors = input.palette.clone();
    colors.resize(256 * 2, 0);
    let palette = PaletteRef::create(PaletteFormat::Rgba4444, 256, Some(&colors)).unwrap();

    let source = SourceImage::packed(width, height, PixelFormat::Clut8, &pixels);
    let texture = TextureBuilder::default()
        .build(&source, Some(&palette))
        .unwrap();

    for y in 0..height {
        for x in 0..width {
            let index = pixels[(y * width + x) as usize];
            assert_eq!(texture.get_pixel_raw(x, y), Some(u32::from(index)));
            assert_eq!(
                texture.get_pixel(x, y),
                Some(palette.get_color(u32::from(index))),
                "Colour changed at ({x}, {y}), compacted: {}",
                texture.is_compacted()
            );
        }
    }
});
