// File: crates/timechart-core/src/render.rs
// Summary: Headless rendering of any drawing closure to PNG bytes, PNG files or RGBA buffers (CPU raster).

use std::path::Path;

use anyhow::{anyhow, Result};
use skia_safe as skia;

use crate::style::ChartStyle;
use crate::types::{HEIGHT, WIDTH};

pub struct RenderOptions {
    pub width: i32,
    pub height: i32,
    pub background: skia::Color,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { width: WIDTH, height: HEIGHT, background: ChartStyle::day().background }
    }
}

impl RenderOptions {
    pub fn new(width: i32, height: i32, style: &ChartStyle) -> Self {
        Self { width, height, background: style.background }
    }
}

fn render_surface(opts: &RenderOptions, draw: impl FnOnce(&skia::Canvas)) -> Result<skia::Surface> {
    let mut surface = skia::surfaces::raster_n32_premul((opts.width, opts.height))
        .ok_or_else(|| anyhow!("failed to create {}x{} raster surface", opts.width, opts.height))?;
    let canvas = surface.canvas();
    canvas.clear(opts.background);
    draw(canvas);
    Ok(surface)
}

/// Renders `draw` onto a cleared surface and encodes it as PNG.
pub fn render_to_png_bytes(opts: &RenderOptions, draw: impl FnOnce(&skia::Canvas)) -> Result<Vec<u8>> {
    let mut surface = render_surface(opts, draw)?;
    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or_else(|| anyhow!("encode PNG failed"))?;
    Ok(data.as_bytes().to_vec())
}

/// Like [`render_to_png_bytes`], writing the PNG to `path` (parent dirs are created).
pub fn render_to_png(opts: &RenderOptions, path: impl AsRef<Path>, draw: impl FnOnce(&skia::Canvas)) -> Result<()> {
    let bytes = render_to_png_bytes(opts, draw)?;
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Unpremultiplied RGBA8 pixels: `(pixels, width, height, stride)`.
pub fn render_to_rgba8(opts: &RenderOptions, draw: impl FnOnce(&skia::Canvas)) -> Result<(Vec<u8>, u32, u32, usize)> {
    let mut surface = render_surface(opts, draw)?;
    let info = skia::ImageInfo::new(
        (opts.width, opts.height),
        skia::ColorType::RGBA8888,
        skia::AlphaType::Unpremul,
        None,
    );
    let stride = opts.width as usize * 4;
    let mut pixels = vec![0u8; stride * opts.height as usize];
    if !surface.read_pixels(&info, &mut pixels, stride, (0, 0)) {
        return Err(anyhow!("reading back surface pixels failed"));
    }
    Ok((pixels, opts.width as u32, opts.height as u32, stride))
}
