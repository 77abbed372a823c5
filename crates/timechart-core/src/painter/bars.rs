// File: crates/timechart-core/src/painter/bars.rs
// Summary: Stacked bar painter; one vertical stroke per source and index.

use std::sync::Arc;

use skia_safe as skia;

use crate::animation::accelerate;
use crate::geometry::{scale_x, Range};
use crate::model::Chart;
use crate::style::{overlay, source_color, ChartStyle};

use super::{stroke_paint, DrawContext};

/// Extra stroke width closing the gaps between neighbouring bars.
const BAR_OVERLAP: f32 = 1.1;

pub struct BarsPainter {
    chart: Arc<Chart>,
    selection_mask: skia::Color,
    sums: Vec<f32>,
    points: Vec<skia::Point>,
    selected_points: Vec<skia::Point>,
}

impl BarsPainter {
    pub fn new(chart: Arc<Chart>, style: &ChartStyle) -> Self {
        Self {
            chart,
            selection_mask: style.selection_mask,
            sums: Vec::new(),
            points: Vec::new(),
            selected_points: Vec::new(),
        }
    }

    /// `0..max(sum of visible sources)` over the window.
    pub fn calculate_y_range(&self, from: usize, to: usize, visibility: &[bool]) -> Range {
        let visible: Vec<_> = self
            .chart
            .sources()
            .iter()
            .enumerate()
            .filter(|(s, _)| visibility.get(*s).copied().unwrap_or(false))
            .map(|(_, source)| source)
            .collect();

        let max = (from..=to)
            .map(|i| visible.iter().map(|s| s.y[i] as f64).sum::<f64>())
            .fold(0.0, f64::max) as f32;

        Range::new(0.0, if max > 0.0 { max } else { 1.0 })
    }

    pub fn draw(&mut self, ctx: &DrawContext<'_>) {
        let width = scale_x(ctx.matrix).abs() + BAR_OVERLAP;
        let mut paint = stroke_paint(width);
        paint.set_anti_alias(false);
        paint.set_stroke_cap(skia::paint::Cap::Butt);

        self.sums.clear();
        self.sums.resize(ctx.to - ctx.from + 1, 0.0);

        for (s, source) in self.chart.sources().iter().enumerate() {
            let state = ctx.states[s];
            if state <= 0.0 {
                continue;
            }
            let state = accelerate(state, 0.75);

            self.points.clear();
            self.selected_points.clear();
            for (k, i) in (ctx.from..=ctx.to).enumerate() {
                let bottom = self.sums[k];
                let top = bottom + source.y[i] as f32 * state;
                self.sums[k] = top;

                let target = if ctx.selected == Some(i) { &mut self.selected_points } else { &mut self.points };
                target.push(ctx.matrix.map_xy(i as f32, bottom));
                target.push(ctx.matrix.map_xy(i as f32, top));
            }

            let color = source_color(source.color);
            let has_selection = ctx.selected.is_some_and(|i| ctx.from <= i && i <= ctx.to);

            paint.set_color(if has_selection { overlay(color, self.selection_mask) } else { color });
            ctx.canvas.draw_points(skia::canvas::PointMode::Lines, &self.points, &paint);

            if !self.selected_points.is_empty() {
                paint.set_color(color);
                ctx.canvas.draw_points(skia::canvas::PointMode::Lines, &self.selected_points, &paint);
            }
        }
    }
}
