// File: crates/timechart-core/src/text.rs
// Summary: Label font with sensible family fallbacks; measures and draws aligned single-line labels.

use skia_safe as skia;

const SANS_FAMILIES: [&str; 6] = ["Segoe UI", "Arial", "Helvetica", "Roboto", "DejaVu Sans", "sans-serif"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Clone)]
pub struct LabelFont {
    font: skia::Font,
}

impl LabelFont {
    pub fn new(size: f32, bold: bool) -> Self {
        let style = if bold { skia::FontStyle::bold() } else { skia::FontStyle::normal() };
        let mgr = skia::FontMgr::default();
        let typeface = SANS_FAMILIES
            .iter()
            .find_map(|family| mgr.match_family_style(family, style));

        let font = match typeface {
            Some(tf) => skia::Font::from_typeface(tf, size.max(1.0)),
            None => {
                let mut f = skia::Font::default();
                f.set_size(size.max(1.0));
                f
            }
        };
        Self { font }
    }

    pub fn size(&self) -> f32 {
        self.font.size()
    }

    pub fn set_size(&mut self, size: f32) {
        self.font.set_size(size.max(1.0));
    }

    pub fn measure_width(&self, text: &str) -> f32 {
        let (advance, _bounds) = self.font.measure_str(text, None);
        advance
    }

    /// Height of the text's ink bounds.
    pub fn measure_height(&self, text: &str) -> f32 {
        let (_advance, bounds) = self.font.measure_str(text, None);
        bounds.height()
    }

    /// Draws `text` with its baseline at `y`, aligned around `x`.
    pub fn draw(&self, canvas: &skia::Canvas, text: &str, x: f32, y: f32, align: Align, paint: &skia::Paint) {
        let shift = match align {
            Align::Left => 0.0,
            Align::Center => 0.5 * self.measure_width(text),
            Align::Right => self.measure_width(text),
        };
        canvas.draw_str(text, (x - shift, y), &self.font, paint);
    }
}
