use argh::FromArgs;
use gu_texture::{PaletteFormat, PixelFormat};

#[derive(FromArgs, Debug)]
/// List the supported pixel and palette formats
#[argh(subcommand, name = "formats")]
pub struct FormatsCmd {}

pub fn handle_formats_command(_cmd: FormatsCmd) {
    println!("Pixel formats:");
    for format in PixelFormat::all_values() {
        let palette = if format.is_indexed() {
            " (requires palette)"
        } else {
            ""
        };
        println!(
            "  #{} {:?}: {} bits per pixel{}",
            format.id(),
            format,
            format.bits_per_pixel(),
            palette
        );
    }

    println!("Palette formats:");
    for format in PaletteFormat::all_values() {
        println!(
            "  #{} {:?}: {} bytes per entry",
            format.id(),
            format,
            format.bytes_per_entry()
        );
    }
}
