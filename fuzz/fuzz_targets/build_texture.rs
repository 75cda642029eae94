#![no_main]

// Arbitrary dimensions, pitches and formats must either build a texture whose geometry holds
// together or fail with an error. Nothing may panic.

use gu_texture::{PaletteFormat, PaletteRef, PixelFormat, TextureBuilder, TextureSettingsBuilder};
use libfuzzer_sys::{arbitrary, fuzz_target};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct BuildInput {
    pub width: u16,
    pub height: u16,
    pub pitch_slack: u8,
    pub format_id: u8,
    pub max_dimension: u16,
    pub swizzle: bool,
    pub compact: bool,
    pub pixels: Vec<u8>,
}

fuzz_target!(|input: BuildInput| {
    let width = u32::from(input.width % 1024);
    let height = u32::from(input.height % 1024);
    let format_id = u32::from(input.format_id % 8);
    let pitch = PixelFormat::from_id(format_id)
        .map(|format| format.row_bytes(width as usize) as u32 + u32::from(input.pitch_slack))
        .unwrap_or(u32::from(input.pitch_slack));

    let settings = TextureSettingsBuilder::new()
        .max_dimension(u32::from(input.max_dimension) << (input.max_dimension % 17))
        .compact_palettes(input.compact)
        .swizzle(input.swizzle)
        .build();
    let builder = TextureBuilder::new(settings);

    let colors: Vec<u8> = (0..=255u8).flat_map(|i| [i, 255 - i, i, 0xFF]).collect();
    let palette = PaletteRef::create(PaletteFormat::Rgba8888, 256, Some(&colors)).unwrap();

    let Ok(texture) =
        builder.build_raw(width, height, pitch, &input.pixels, format_id, Some(&palette))
    else {
        assert_eq!(palette.ref_count(), 1, "Failed build kept a palette reference");
        return;
    };

    assert_eq!(palette.ref_count(), 2);
    assert!(texture.device_width().is_power_of_two());
    assert!(texture.device_height().is_power_of_two());
    assert!(texture.device_width() >= texture.working_width());
    assert!(texture.device_height() >= texture.working_height());
    assert!(texture.device_width() <= settings.max_dimension);
    assert!(texture.device_height() <= settings.max_dimension);
    assert_eq!(texture.pitch() % 16, 0);
    assert!(texture.content_width() <= texture.working_width());
    assert!(texture.content_height() <= texture.working_height());

    // Every content pixel must be readable.
    for y in 0..texture.content_height() {
        for x in 0..texture.content_width() {
            assert!(texture.get_pixel(x, y).is_some());
        }
    }

    texture.release();
    assert_eq!(palette.ref_count(), 1);
});
