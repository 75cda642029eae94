use crate::error::CliError;
use crate::util::{parse_palette_format, parse_pixel_format, parse_sample};
use argh::FromArgs;
use gu_texture::{
    PaletteFormat, PaletteRef, PixelFormat, SourceImage, Texture, TextureBuilder,
    TextureSettingsBuilder,
};
use std::{fs, path::PathBuf, time::Instant};

#[derive(FromArgs, Debug)]
/// Build a device texture from a raw pixel dump
#[argh(subcommand, name = "build")]
pub struct BuildCmd {
    /// raw pixel rows
    #[argh(option)]
    pub input: PathBuf,

    /// image width in pixels
    #[argh(option)]
    pub width: u32,

    /// image height in pixels
    #[argh(option)]
    pub height: u32,

    /// pixel format (5650, 5551, 4444, 8888, clut4, clut8)
    #[argh(option, from_str_fn(parse_pixel_format))]
    pub format: PixelFormat,

    /// bytes between rows [default: tightly packed]
    #[argh(option)]
    pub pitch: Option<u32>,

    /// raw palette entries, required for clut4 and clut8
    #[argh(option)]
    pub palette: Option<PathBuf>,

    /// palette entry format (5650, 5551, 4444, 8888)
    #[argh(option, from_str_fn(parse_palette_format))]
    pub palette_format: Option<PaletteFormat>,

    /// number of palette entries, 16 or 256 [default: 256]
    #[argh(option, default = "256")]
    pub palette_entries: u32,

    /// write the device-ready pixel data to this file
    #[argh(option)]
    pub output: Option<PathBuf>,

    /// largest texture dimension the device accepts [default: 512]
    #[argh(option)]
    pub max_dimension: Option<u32>,

    /// keep 8-bit indices even when 16 colours suffice
    #[argh(switch)]
    pub no_compact: bool,

    /// keep the pixel data in linear order
    #[argh(switch)]
    pub no_swizzle: bool,

    /// print the colour at x,y (repeatable)
    #[argh(option, from_str_fn(parse_sample))]
    pub sample: Vec<(u32, u32)>,
}

pub fn handle_build_command(cmd: BuildCmd) -> Result<(), CliError> {
    let pixels = fs::read(&cmd.input)?;
    tracing::info!(input = %cmd.input.display(), len = pixels.len(), "read pixel dump");
    let palette = load_palette(&cmd)?;

    let mut settings = TextureSettingsBuilder::new()
        .compact_palettes(!cmd.no_compact)
        .swizzle(!cmd.no_swizzle);
    if let Some(max_dimension) = cmd.max_dimension {
        settings = settings.max_dimension(max_dimension);
    }
    let builder = TextureBuilder::new(settings.build());

    let source = match cmd.pitch {
        Some(pitch) => SourceImage::new(cmd.width, cmd.height, pitch, cmd.format, &pixels),
        None => SourceImage::packed(cmd.width, cmd.height, cmd.format, &pixels),
    };

    let start = Instant::now();
    let texture = builder.build(&source, palette.as_ref())?;
    println!("Built texture in {:.2?}", start.elapsed());
    print_summary(&texture);

    for &(x, y) in &cmd.sample {
        match (texture.get_pixel_raw(x, y), texture.get_pixel(x, y)) {
            (Some(raw), Some(color)) => println!(
                "  ({x}, {y}): raw {raw:#x}, rgba({}, {}, {}, {})",
                color.r, color.g, color.b, color.a
            ),
            _ => println!("  ({x}, {y}): outside the texture"),
        }
    }

    if let Some(output) = &cmd.output {
        fs::write(output, texture.pixels())?;
        println!("Wrote {} bytes to {}", texture.pixels().len(), output.display());
    }

    Ok(())
}

fn load_palette(cmd: &BuildCmd) -> Result<Option<PaletteRef>, CliError> {
    let Some(path) = &cmd.palette else {
        return Ok(None);
    };
    let format = cmd.palette_format.ok_or(CliError::MissingPaletteFormat)?;
    let colors = fs::read(path)?;
    Ok(Some(PaletteRef::create(
        format,
        cmd.palette_entries,
        Some(&colors),
    )?))
}

fn print_summary(texture: &Texture) {
    println!(
        "Original size: {}x{}",
        texture.get_width(),
        texture.get_height()
    );
    println!(
        "Working size:  {}x{} (content {}x{})",
        texture.working_width(),
        texture.working_height(),
        texture.content_width(),
        texture.content_height()
    );
    println!(
        "Device size:   {}x{} (scale {:.4}, {:.4})",
        texture.device_width(),
        texture.device_height(),
        texture.scale_u(),
        texture.scale_v()
    );
    println!(
        "Format:        {:?}, {:?}, pitch {} bytes ({} pixels)",
        texture.pixel_format(),
        texture.tiling(),
        texture.pitch(),
        texture.buffer_width()
    );
    if let Some(remap) = texture.remap_table() {
        println!("Compacted to {} colours: {:?}", remap.len(), remap.as_slice());
    }
}
