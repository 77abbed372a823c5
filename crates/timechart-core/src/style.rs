// File: crates/timechart-core/src/style.rs
// Summary: Day/Night chart styles: colors and pixel dimensions for painters, labels and the finder.

use skia_safe as skia;

#[derive(Clone, Copy, Debug)]
pub struct ChartStyle {
    pub name: &'static str,
    pub background: skia::Color,

    pub line_width: f32,
    pub point_radius: f32,
    pub point_color: skia::Color,

    pub selection_width: f32,
    pub selection_color: skia::Color,
    /// Overlay blended on top of non-selected bars.
    pub selection_mask: skia::Color,

    pub labels_text_size: f32,
    pub labels_color: skia::Color,
    pub labels_dot_color: skia::Color,
    pub x_label_padding: f32,
    pub y_label_margin_bottom: f32,
    pub y_label_margin_side: f32,

    pub guides_count: usize,
    pub guides_width: f32,
    pub guides_color: skia::Color,

    pub pie_min_text_size: f32,
    pub pie_max_text_size: f32,
    pub pie_label_color: skia::Color,

    pub finder_foreground: skia::Color,
    pub finder_frame: skia::Color,
    pub finder_frame_width: f32,
    pub finder_handle_touch_offset: f32,
    pub finder_handles_min_distance: f32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::day()
    }
}

impl ChartStyle {
    pub fn day() -> Self {
        Self {
            name: "day",
            background: skia::Color::from_argb(255, 255, 255, 255),
            line_width: 2.0,
            point_radius: 4.0,
            point_color: skia::Color::from_argb(255, 255, 255, 255),
            selection_width: 1.0,
            selection_color: skia::Color::from_argb(255, 223, 230, 235),
            selection_mask: skia::Color::from_argb(128, 255, 255, 255),
            labels_text_size: 12.0,
            labels_color: skia::Color::from_argb(255, 150, 162, 170),
            labels_dot_color: skia::Color::from_argb(255, 200, 205, 210),
            x_label_padding: 10.0,
            y_label_margin_bottom: 5.0,
            y_label_margin_side: 2.0,
            guides_count: 6,
            guides_width: 1.0,
            guides_color: skia::Color::from_argb(255, 241, 241, 242),
            pie_min_text_size: 12.0,
            pie_max_text_size: 24.0,
            pie_label_color: skia::Color::from_argb(255, 255, 255, 255),
            finder_foreground: skia::Color::from_argb(153, 226, 238, 249),
            finder_frame: skia::Color::from_argb(255, 192, 209, 225),
            finder_frame_width: 10.0,
            finder_handle_touch_offset: 20.0,
            finder_handles_min_distance: 20.0,
        }
    }

    pub fn night() -> Self {
        Self {
            name: "night",
            background: skia::Color::from_argb(255, 36, 47, 62),
            point_color: skia::Color::from_argb(255, 36, 47, 62),
            selection_color: skia::Color::from_argb(255, 60, 74, 90),
            selection_mask: skia::Color::from_argb(128, 36, 47, 62),
            labels_color: skia::Color::from_argb(255, 84, 103, 120),
            labels_dot_color: skia::Color::from_argb(255, 60, 74, 90),
            guides_color: skia::Color::from_argb(255, 49, 61, 76),
            finder_foreground: skia::Color::from_argb(153, 48, 66, 89),
            finder_frame: skia::Color::from_argb(255, 86, 98, 109),
            ..Self::day()
        }
    }
}

/// Return a list of built-in style presets.
pub fn presets() -> Vec<ChartStyle> {
    vec![ChartStyle::day(), ChartStyle::night()]
}

/// Find a style by its `name`, falling back to day.
pub fn find(name: &str) -> ChartStyle {
    for s in presets() { if s.name.eq_ignore_ascii_case(name) { return s; } }
    ChartStyle::day()
}

/// Source color (`0xRRGGBB`) as an opaque Skia color.
#[inline]
pub fn source_color(rgb: u32) -> skia::Color {
    skia::Color::from_argb(255, (rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// `0..=1` opacity as an 8-bit alpha.
#[inline]
pub fn to_alpha(alpha: f32) -> u8 {
    (255.0 * alpha.clamp(0.0, 1.0)).round() as u8
}

/// Source-over blend of `mask` on top of the opaque `color`.
pub fn overlay(color: skia::Color, mask: skia::Color) -> skia::Color {
    let a = mask.a() as f32 / 255.0;
    let mix = |c: u8, m: u8| (c as f32 * (1.0 - a) + m as f32 * a).round() as u8;
    skia::Color::from_argb(color.a(), mix(color.r(), mask.r()), mix(color.g(), mask.g()), mix(color.b(), mask.b()))
}
