// File: crates/timechart-core/src/painter/area.rs
// Summary: 100% stacked area painter, drawn as smooth polygons or as steps (one interval per value).
// Notes:
// - The Y range is always `0..100` and used exactly.
// - Every index is rescaled so that visible sources sum to `100 * max(state)`;
//   a fully hidden chart draws nothing.

use std::sync::Arc;

use skia_safe as skia;

use crate::model::Chart;
use crate::style::{source_color, ChartStyle};

use super::{draw_selection_line, fill_paint, stroke_paint, DrawContext};

/// Canvas up-scale used by the simplified mode, shrinking the rasterized path area.
const SIMPLIFIED_FACTOR: f32 = 2.0;

/// Extra depth below the lowest point of each polygon, in chart units.
const BOTTOM_OVERLAP: f32 = 10.0;

pub struct AreaPainter {
    chart: Arc<Chart>,
    square: bool,
    selection_width: f32,
    selection_color: skia::Color,
    scales: Vec<f32>,
    sums: Vec<f32>,
}

impl AreaPainter {
    pub fn new(chart: Arc<Chart>, style: &ChartStyle, square: bool) -> Self {
        let len = chart.len();
        Self {
            chart,
            square,
            selection_width: style.selection_width,
            selection_color: style.selection_color,
            scales: vec![0.0; len],
            sums: vec![0.0; len],
        }
    }

    pub fn draw(&mut self, ctx: &DrawContext<'_>) {
        ctx.canvas.save();

        let mut matrix = *ctx.matrix;
        if ctx.simplified {
            matrix.post_scale((1.0 / SIMPLIFIED_FACTOR, 1.0 / SIMPLIFIED_FACTOR), None);
            ctx.canvas.scale((SIMPLIFIED_FACTOR, SIMPLIFIED_FACTOR));
        }
        self.draw_areas(ctx, &matrix);

        ctx.canvas.restore();

        let mut selection = stroke_paint(self.selection_width);
        selection.set_color(self.selection_color);
        draw_selection_line(ctx, &selection);
    }

    fn draw_areas(&mut self, ctx: &DrawContext<'_>, matrix: &skia::Matrix) {
        let max_state = ctx.states.iter().copied().fold(0.0, f32::max);
        if max_state == 0.0 {
            return;
        }
        let total = 100.0 * max_state;
        let (from, to) = (ctx.from, ctx.to);

        for i in from..=to {
            self.scales[i] = index_scale(&self.chart, i, ctx.states, total);
        }
        self.sums[from..=to].fill(total);

        let mut paint = fill_paint();
        paint.set_anti_alias(!ctx.simplified);

        let count = self.chart.source_count();
        for s in (0..count).rev() {
            let state = ctx.states[s];
            if state == 0.0 {
                continue;
            }
            let source = &self.chart.sources()[s];
            let mut path = skia::Path::new();

            // Top edge: the previous polygon's bottom, or the flat 100% line
            if s == count - 1 {
                path.move_to((from as f32, total));
                path.line_to((to as f32, total));
            } else {
                self.add_edge(&mut path, from, to);
            }

            let mut min_value = total;
            for i in (from..=to).rev() {
                self.sums[i] -= source.y[i] as f32 * state * self.scales[i];
                min_value = min_value.min(self.sums[i]);
            }
            let bottom = (min_value - BOTTOM_OVERLAP).max(0.0);

            path.line_to((to as f32, bottom));
            path.line_to((from as f32, bottom));
            path.close();
            path.transform(matrix);

            paint.set_color(source_color(source.color));
            ctx.canvas.draw_path(&path, &paint);
        }
    }

    fn add_edge(&self, path: &mut skia::Path, from: usize, to: usize) {
        if self.square {
            // Steps cover `[i, i + 1]` for every `i < to`
            for i in from..to {
                let y = self.sums[i];
                if i == from { path.move_to((i as f32, y)); } else { path.line_to((i as f32, y)); }
                path.line_to(((i + 1) as f32, y));
            }
        } else {
            for i in from..=to {
                let y = self.sums[i];
                if i == from { path.move_to((i as f32, y)); } else { path.line_to((i as f32, y)); }
            }
        }
    }
}

fn index_scale(chart: &Chart, i: usize, states: &[f32], total: f32) -> f32 {
    let sum: f32 = chart.sources().iter().zip(states).map(|(s, &state)| s.y[i] as f32 * state).sum();
    if sum > 0.0 { total / sum } else { 0.0 }
}

/// Rescaled (stacked-area) values of every source at `index` for the given
/// visibility `states`. Visible values sum to `100 * max(states)`; an index
/// where every visible value is zero yields zeros.
pub fn stacked_values(chart: &Chart, index: usize, states: &[f32]) -> Vec<f32> {
    let total = 100.0 * states.iter().copied().fold(0.0, f32::max);
    if total == 0.0 {
        return vec![0.0; chart.source_count()];
    }
    let scale = index_scale(chart, index, states, total);
    chart
        .sources()
        .iter()
        .zip(states)
        .map(|(s, &state)| s.y[index] as f32 * state * scale)
        .collect()
}
