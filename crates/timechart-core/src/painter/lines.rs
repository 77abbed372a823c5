// File: crates/timechart-core/src/painter/lines.rs
// Summary: Polyline painter for one or many sources, on a shared or per-source (independent) scale.

use std::sync::Arc;

use skia_safe as skia;

use crate::geometry::Range;
use crate::model::Chart;
use crate::style::{source_color, to_alpha, ChartStyle};

use super::{draw_selection_line, fill_paint, stroke_paint, DrawContext};

pub struct LinesPainter {
    chart: Arc<Chart>,
    independent: bool,
    scales: Vec<f32>,

    line_width: f32,
    point_radius: f32,
    point_color: skia::Color,
    selection_width: f32,
    selection_color: skia::Color,

    points: Vec<skia::Point>,
}

impl LinesPainter {
    pub fn new(chart: Arc<Chart>, style: &ChartStyle, independent: bool) -> Self {
        let scales = if independent { independent_scales(&chart) } else { vec![1.0; chart.source_count()] };
        Self {
            chart,
            independent,
            scales,
            line_width: style.line_width,
            point_radius: style.point_radius,
            point_color: style.point_color,
            selection_width: style.selection_width,
            selection_color: style.selection_color,
            points: Vec::new(),
        }
    }

    pub fn is_independent(&self) -> bool {
        self.independent
    }

    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    pub fn calculate_y_range(&self, from: usize, to: usize, visibility: &[bool]) -> Range {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;

        for (s, source) in self.chart.sources().iter().enumerate() {
            if !visibility.get(s).copied().unwrap_or(false) {
                continue;
            }
            let scale = self.scales[s];
            for &y in &source.y[from..=to] {
                let value = y as f32 * scale;
                min = min.min(value);
                max = max.max(value);
            }
        }

        if min.is_finite() { Range::new(min, max) } else { Range::new(0.0, 1.0) }
    }

    pub fn draw(&mut self, ctx: &DrawContext<'_>) {
        let mut selection = stroke_paint(self.selection_width);
        selection.set_color(self.selection_color);
        draw_selection_line(ctx, &selection);

        let mut paint = stroke_paint(self.line_width);
        paint.set_stroke_join(skia::paint::Join::Round);

        for (s, source) in self.chart.sources().iter().enumerate() {
            let state = ctx.states[s];
            if state <= 0.0 {
                continue;
            }
            paint.set_color(source_color(source.color));
            paint.set_alpha(to_alpha(state));

            let scale = self.scales[s];
            let ys = &source.y[ctx.from..=ctx.to];
            if ctx.simplified {
                // Disconnected segments: every inner point is emitted twice
                self.points.clear();
                for (i, pair) in ys.windows(2).enumerate() {
                    let x = (ctx.from + i) as f32;
                    self.points.push(ctx.matrix.map_xy(x, pair[0] as f32 * scale));
                    self.points.push(ctx.matrix.map_xy(x + 1.0, pair[1] as f32 * scale));
                }
                ctx.canvas.draw_points(skia::canvas::PointMode::Lines, &self.points, &paint);
            } else {
                let mut path = skia::Path::new();
                for (i, &y) in ys.iter().enumerate() {
                    let p = ctx.matrix.map_xy((ctx.from + i) as f32, y as f32 * scale);
                    if i == 0 { path.move_to(p); } else { path.line_to(p); }
                }
                ctx.canvas.draw_path(&path, &paint);
            }
        }

        self.draw_selected_points(ctx);
    }

    fn draw_selected_points(&self, ctx: &DrawContext<'_>) {
        let Some(selected) = ctx.selected else { return };
        if selected < ctx.from || selected > ctx.to {
            return;
        }

        let mut fill = fill_paint();
        let mut stroke = stroke_paint(self.line_width);

        for (s, source) in self.chart.sources().iter().enumerate() {
            let state = ctx.states[s];
            if state <= 0.0 {
                continue;
            }
            let center = ctx.matrix.map_xy(selected as f32, source.y[selected] as f32 * self.scales[s]);
            // Points fade slower than lines
            let alpha = to_alpha(state.sqrt().sqrt());

            fill.set_color(self.point_color);
            fill.set_alpha(alpha);
            ctx.canvas.draw_circle(center, self.point_radius, &fill);

            stroke.set_color(source_color(source.color));
            stroke.set_alpha(alpha);
            ctx.canvas.draw_circle(center, self.point_radius, &stroke);
        }
    }
}

/// Per-source multipliers bringing each source's maximum to the magnitude of
/// the largest source: `10^floor(log10(max_all / max_s))`. Empty or all-zero
/// sources keep a scale of 1.
pub fn independent_scales(chart: &Chart) -> Vec<f32> {
    let maxima: Vec<u32> = chart.sources().iter().map(|s| s.y.iter().copied().max().unwrap_or(0)).collect();
    let reference = maxima.iter().copied().max().unwrap_or(0) as f64;

    maxima
        .iter()
        .map(|&max| {
            if max == 0 || reference == 0.0 {
                return 1.0;
            }
            let ratio = reference / max as f64;
            10f64.powi(ratio.log10().floor() as i32) as f32
        })
        .collect()
}
