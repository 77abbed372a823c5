// File: crates/timechart-core/src/painter/mod.rs
// Summary: Per-chart-type drawing strategies behind a common capability set, dispatched by chart type.

mod area;
mod bars;
mod lines;
mod pie;

use std::sync::Arc;

use skia_safe as skia;

use crate::geometry::{Range, RectI32};
use crate::model::{Chart, ChartType};
use crate::style::ChartStyle;

pub use area::{stacked_values, AreaPainter};
pub use bars::BarsPainter;
pub use lines::{independent_scales, LinesPainter};
pub use pie::PiePainter;

/// Everything a painter needs for one frame.
pub struct DrawContext<'a> {
    pub canvas: &'a skia::Canvas,
    /// Content box of the surface, in pixels.
    pub content: RectI32,
    /// Chart space → surface transform.
    pub matrix: &'a skia::Matrix,
    /// First and last index to draw (inclusive).
    pub from: usize,
    pub to: usize,
    /// Current (animated) visibility per source, `0..=1`.
    pub states: &'a [f32],
    pub selected: Option<usize>,
    /// Cheaper, visually equivalent drawing.
    pub simplified: bool,
}

pub enum Painter {
    Lines(LinesPainter),
    Bars(BarsPainter),
    Area(AreaPainter),
    Pie(PiePainter),
}

impl Painter {
    pub fn new(chart: Arc<Chart>, style: &ChartStyle) -> Self {
        match chart.chart_type() {
            ChartType::Lines => Painter::Lines(LinesPainter::new(chart, style, false)),
            ChartType::LinesIndependentScale => Painter::Lines(LinesPainter::new(chart, style, true)),
            ChartType::Bars => Painter::Bars(BarsPainter::new(chart, style)),
            ChartType::Area => Painter::Area(AreaPainter::new(chart, style, false)),
            ChartType::AreaSquare => Painter::Area(AreaPainter::new(chart, style, true)),
            ChartType::Pie => Painter::Pie(PiePainter::new(chart, style)),
        }
    }

    /// Y extent of the window `[from, to]` over sources whose `visibility` is set.
    /// `animate` and `now` only matter to painters with their own transitions.
    pub fn calculate_y_range(&mut self, from: usize, to: usize, visibility: &[bool], animate: bool, now: i64) -> Range {
        match self {
            Painter::Lines(p) => p.calculate_y_range(from, to, visibility),
            Painter::Bars(p) => p.calculate_y_range(from, to, visibility),
            Painter::Area(_) => Range::new(0.0, 100.0),
            Painter::Pie(p) => p.calculate_y_range(from, to, visibility, animate, now),
        }
    }

    pub fn draw(&mut self, ctx: &DrawContext<'_>) {
        match self {
            Painter::Lines(p) => p.draw(ctx),
            Painter::Bars(p) => p.draw(ctx),
            Painter::Area(p) => p.draw(ctx),
            Painter::Pie(p) => p.draw(ctx),
        }
    }

    /// The Y range must be used as is, without guide rounding or top padding.
    pub fn use_exact_range(&self) -> bool {
        matches!(self, Painter::Area(_) | Painter::Pie(_))
    }

    pub fn allow_x_selection(&self) -> bool {
        !matches!(self, Painter::Pie(_))
    }

    /// Source drawn under the surface point `(x, y)`, if any.
    pub fn pick_source(&self, content: &RectI32, x: f32, y: f32) -> Option<usize> {
        match self {
            Painter::Pie(p) => p.pick_source(content, x, y),
            _ => None,
        }
    }

    pub fn set_selected_source(&mut self, selected: Option<usize>, now: i64) {
        if let Painter::Pie(p) = self {
            p.set_selected_source(selected, now);
        }
    }

    /// Per-source value multipliers when sources are drawn on independent scales.
    pub fn sources_scales(&self) -> Option<&[f32]> {
        match self {
            Painter::Lines(p) if p.is_independent() => Some(p.scales()),
            _ => None,
        }
    }

    pub fn update(&mut self, now: i64) {
        if let Painter::Pie(p) = self {
            p.update(now);
        }
    }

    pub fn is_animating(&self) -> bool {
        match self {
            Painter::Pie(p) => p.is_animating(),
            _ => false,
        }
    }
}

pub(crate) fn stroke_paint(width: f32) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(width);
    paint
}

pub(crate) fn fill_paint() -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint
}

/// Vertical selection guide through index `selected`, if inside `[from, to]`.
pub(crate) fn draw_selection_line(ctx: &DrawContext<'_>, paint: &skia::Paint) {
    if let Some(selected) = ctx.selected {
        if ctx.from <= selected && selected <= ctx.to {
            let x = crate::geometry::map_x(ctx.matrix, selected as f32);
            ctx.canvas.draw_line((x, ctx.content.top as f32), (x, ctx.content.bottom as f32), paint);
        }
    }
}
