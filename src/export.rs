//! Export engine: render a [`Composition`] to PNG, JPEG or SVG bytes and name the file.
//!
//! Raster formats are drawn into an RGB buffer with the bitmap backend and encoded
//! with `image`, which is where `jpegQuality` applies. SVG is written directly.

use crate::settings::ImageFormat;
use crate::viz::{Composition, RenderOptions, canvas_size, draw_composition, fonts};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::fs;
use std::path::{Path, PathBuf};

/// `{base}-{YYYY-MM-DD}.{png|jpg|svg}`. Path separators and whitespace in `base`
/// become `-`; an empty base becomes `chart`.
pub fn export_filename(base: &str, date: NaiveDate, format: ImageFormat) -> String {
    let mut stem = String::new();
    for c in base.trim().chars() {
        let c = if c.is_whitespace() || matches!(c, '/' | '\\' | ':') {
            '-'
        } else {
            c
        };
        if !(c == '-' && stem.ends_with('-')) {
            stem.push(c);
        }
    }
    let stem = stem.trim_matches('-');
    let stem = if stem.is_empty() { "chart" } else { stem };
    format!("{stem}-{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// Encoded image plus its pixel size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Encode a tightly packed RGB8 buffer.
pub fn encode_rgb(
    buf: &[u8],
    width: u32,
    height: u32,
    format: ImageFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        ImageFormat::Png => PngEncoder::new(&mut out)
            .write_image(buf, width, height, ExtendedColorType::Rgb8)
            .context("encode png")?,
        ImageFormat::Jpeg => JpegEncoder::new_with_quality(&mut out, jpeg_quality.clamp(1, 100))
            .write_image(buf, width, height, ExtendedColorType::Rgb8)
            .context("encode jpeg")?,
        ImageFormat::Svg => return Err(anyhow!("svg is not a raster format")),
    }
    Ok(out)
}

/// Render with the format, resolution and quality from the composition's settings.
/// `font` is a preferred TTF path, used the first time fonts are loaded.
pub fn render(comp: &Composition, font: Option<&Path>) -> Result<RenderedImage> {
    let text = fonts::ensure_fonts(font);
    let quality = &comp.settings.export_quality;
    let (width, height) = canvas_size(comp.settings);
    log::debug!(
        "rendering {}x{} {:?} ({}x)",
        width,
        height,
        quality.format,
        quality.resolution.factor()
    );

    let bytes = match quality.format {
        ImageFormat::Svg => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
                let opts = RenderOptions {
                    text,
                    supports_transparency: true,
                };
                draw_composition(&root, comp, opts)?;
            }
            svg.into_bytes()
        }
        ImageFormat::Png | ImageFormat::Jpeg => {
            let mut buf = vec![0u8; width as usize * height as usize * 3];
            {
                let root =
                    BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
                let opts = RenderOptions {
                    text,
                    supports_transparency: false,
                };
                draw_composition(&root, comp, opts)?;
            }
            encode_rgb(&buf, width, height, quality.format, quality.jpeg_quality)?
        }
    };

    Ok(RenderedImage {
        format: quality.format,
        width,
        height,
        bytes,
    })
}

/// Render and write `{dir}/{export_filename(base, date, format)}`. Returns the path.
pub fn render_to_file(
    comp: &Composition,
    dir: &Path,
    base: &str,
    date: NaiveDate,
    font: Option<&Path>,
) -> Result<PathBuf> {
    let image = render(comp, font)?;
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(export_filename(base, date, image.format));
    fs::write(&path, &image.bytes).with_context(|| format!("write {}", path.display()))?;
    log::info!("exported {} ({} bytes)", path.display(), image.bytes.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_uses_date_and_extension() {
        let d = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert_eq!(
            export_filename("C-Chain  tx/count", d, ImageFormat::Jpeg),
            "C-Chain-tx-count-2024-07-01.jpg"
        );
        assert_eq!(export_filename("  ", d, ImageFormat::Svg), "chart-2024-07-01.svg");
    }

    #[test]
    fn png_encoding_produces_signature() {
        let buf = vec![255u8; 4 * 3 * 3];
        let png = encode_rgb(&buf, 4, 3, ImageFormat::Png, 90).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
