use gu_texture::{PaletteFormat, PixelFormat};

/// Parses a pixel format from its name (`5650`, `5551`, `4444`, `8888`, `clut4`, `clut8`) or
/// its numeric id prefixed with `#`.
pub fn parse_pixel_format(value: &str) -> Result<PixelFormat, String> {
    let format = match value.to_lowercase().as_str() {
        "5650" | "rgb5650" => Some(PixelFormat::Rgb5650),
        "5551" | "rgba5551" => Some(PixelFormat::Rgba5551),
        "4444" | "rgba4444" => Some(PixelFormat::Rgba4444),
        "8888" | "rgba8888" => Some(PixelFormat::Rgba8888),
        "clut4" | "t4" => Some(PixelFormat::Clut4),
        "clut8" | "t8" => Some(PixelFormat::Clut8),
        other => other
            .strip_prefix('#')
            .and_then(|id| id.parse().ok())
            .and_then(PixelFormat::from_id),
    };
    format.ok_or_else(|| {
        format!(
            "Invalid pixel format: {value}. Valid formats are: 5650, 5551, 4444, 8888, clut4, clut8"
        )
    })
}

/// Parses a palette entry format (`5650`, `5551`, `4444`, `8888`).
pub fn parse_palette_format(value: &str) -> Result<PaletteFormat, String> {
    match value.to_lowercase().as_str() {
        "5650" | "rgb5650" => Ok(PaletteFormat::Rgb5650),
        "5551" | "rgba5551" => Ok(PaletteFormat::Rgba5551),
        "4444" | "rgba4444" => Ok(PaletteFormat::Rgba4444),
        "8888" | "rgba8888" => Ok(PaletteFormat::Rgba8888),
        _ => Err(format!(
            "Invalid palette format: {value}. Valid formats are: 5650, 5551, 4444, 8888"
        )),
    }
}

/// Parses a pixel coordinate written as `x,y`.
pub fn parse_sample(value: &str) -> Result<(u32, u32), String> {
    let invalid = || format!("Invalid sample position: {value}. Expected x,y");
    let (x, y) = value.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse().map_err(|_| invalid())?;
    let y = y.trim().parse().map_err(|_| invalid())?;
    Ok((x, y))
}
