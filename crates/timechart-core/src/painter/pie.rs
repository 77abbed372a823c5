// File: crates/timechart-core/src/painter/pie.rs
// Summary: Pie painter: per-source shares of the window sum, animated wedges, percent labels and wedge picking.
// Notes:
// - Shares sum the half-open window `[from, to)`, so a chart shown as
//   intervals needs a trailing point to reach its last value.
// - Angles are degrees, clockwise from the X axis (screen space); the first
//   wedge starts at 12 o'clock.

use std::sync::Arc;

use skia_safe as skia;

use crate::animation::AnimatedState;
use crate::geometry::{Range, RectI32};
use crate::model::Chart;
use crate::style::{source_color, to_alpha, ChartStyle};
use crate::text::{Align, LabelFont};

use super::{fill_paint, DrawContext};

const ARC_ANGLE_OFFSET: f32 = -90.0;
/// Part of the radius reserved for pulling out the selected wedge.
const SELECTED_ARC_OFFSET: f32 = 0.075;
const SIMPLIFIED_FACTOR: f32 = 2.0;

pub struct PiePainter {
    chart: Arc<Chart>,

    /// Current, start and end fractions (`0..=1`) per source.
    percents: Vec<f32>,
    percents_start: Vec<f32>,
    percents_end: Vec<f32>,

    start_angles: Vec<f32>,
    sweep_angles: Vec<f32>,

    initialized: bool,
    changes: AnimatedState,
    selections: Vec<AnimatedState>,
    selected: Option<usize>,

    font: LabelFont,
    min_text_size: f32,
    max_text_size: f32,
    label_color: skia::Color,
}

impl PiePainter {
    pub fn new(chart: Arc<Chart>, style: &ChartStyle) -> Self {
        let count = chart.source_count();
        Self {
            chart,
            percents: vec![0.0; count],
            percents_start: vec![0.0; count],
            percents_end: vec![0.0; count],
            start_angles: vec![ARC_ANGLE_OFFSET; count],
            sweep_angles: vec![0.0; count],
            initialized: false,
            changes: AnimatedState::settled(1.0),
            selections: (0..count).map(|_| AnimatedState::settled(0.0)).collect(),
            selected: None,
            font: LabelFont::new(style.pie_max_text_size, true),
            min_text_size: style.pie_min_text_size,
            max_text_size: style.pie_max_text_size,
            label_color: style.pie_label_color,
        }
    }

    /// Recomputes the target shares for `[from, to)`. The first computation,
    /// or any with `animate == false`, jumps; later changes animate.
    pub fn calculate_y_range(&mut self, from: usize, to: usize, visibility: &[bool], animate: bool, now: i64) -> Range {
        let next = self.compute_percents(from, to, visibility);

        if next != self.percents_end {
            self.percents_start.copy_from_slice(&self.percents);
            self.percents_end = next;

            if self.initialized && animate {
                self.changes.set_to(0.0);
                self.changes.animate_to(1.0, now);
            } else {
                self.changes.set_to(1.0);
            }
            self.apply_animation();
        }
        self.initialized = true;

        Range::new(0.0, 100.0)
    }

    /// Current (possibly mid-animation) share of every source, in percent.
    pub fn percentages(&self) -> Vec<f32> {
        self.percents.iter().map(|p| 100.0 * p).collect()
    }

    pub fn selected_source(&self) -> Option<usize> {
        self.selected
    }

    pub fn set_selected_source(&mut self, selected: Option<usize>, now: i64) {
        self.selected = selected;
        for (s, anim) in self.selections.iter_mut().enumerate() {
            anim.animate_to(if Some(s) == selected { 1.0 } else { 0.0 }, now);
        }
    }

    pub fn update(&mut self, now: i64) {
        self.changes.update(now);
        self.apply_animation();
        for anim in &mut self.selections {
            anim.update(now);
        }
    }

    pub fn is_animating(&self) -> bool {
        !self.changes.is_finished() || self.selections.iter().any(|a| !a.is_finished())
    }

    /// Wedge under `(x, y)`; the pie is the circle inscribed into `content`.
    pub fn pick_source(&self, content: &RectI32, x: f32, y: f32) -> Option<usize> {
        let radius = 0.5 * content.width().min(content.height()) as f32;
        let dx = x - content.center_x();
        let dy = y - content.center_y();

        if dx.hypot(dy) > radius {
            return None;
        }
        let angle = dy.atan2(dx).to_degrees();

        (0..self.chart.source_count()).find(|&s| {
            self.sweep_angles[s] > 0.0
                && is_between(self.start_angles[s], self.start_angles[s] + self.sweep_angles[s], angle)
        })
    }

    pub fn draw(&mut self, ctx: &DrawContext<'_>) {
        let content = &ctx.content;
        let max_radius = 0.5 * content.width().min(content.height()) as f32;
        let radius = max_radius * (1.0 - SELECTED_ARC_OFFSET);
        let offset = max_radius - radius;
        let (cx, cy) = (content.center_x(), content.center_y());

        self.draw_pie(ctx, radius, offset, cx, cy);

        let mut paint = fill_paint();
        paint.set_color(self.label_color);

        for s in 0..self.chart.source_count() {
            let percent = self.percents[s];
            if percent == 0.0 {
                continue;
            }
            self.font.set_size(self.text_size(percent));
            let label = format!("{:.0}%", 100.0 * percent);

            let angle = (self.start_angles[s] + 0.5 * self.sweep_angles[s]).to_radians();
            let label_radius = self.label_radius(radius, percent) + self.selections[s].get() * offset;

            let x = cx + angle.cos() * label_radius;
            let y = cy + angle.sin() * label_radius + 0.5 * self.font.measure_height(&label);

            paint.set_alpha(to_alpha(ctx.states[s]));
            self.font.draw(ctx.canvas, &label, x, y, Align::Center, &paint);
        }
    }

    fn draw_pie(&self, ctx: &DrawContext<'_>, radius: f32, offset: f32, cx: f32, cy: f32) {
        let canvas = ctx.canvas;
        canvas.save();

        let (mut radius, mut offset) = (radius, offset);
        if ctx.simplified {
            canvas.translate((cx, cy));
            canvas.scale((SIMPLIFIED_FACTOR, SIMPLIFIED_FACTOR));
            canvas.translate((-cx, -cy));
            radius /= SIMPLIFIED_FACTOR;
            offset /= SIMPLIFIED_FACTOR;
        }

        let mut paint = fill_paint();
        paint.set_anti_alias(!ctx.simplified);

        for (s, source) in self.chart.sources().iter().enumerate() {
            let sweep = self.sweep_angles[s];
            if sweep == 0.0 {
                continue;
            }
            paint.set_color(source_color(source.color));

            let state = self.selections[s].get();
            let mid = (self.start_angles[s] + 0.5 * sweep).to_radians();
            let dx = mid.cos() * offset * state;
            let dy = mid.sin() * offset * state;

            // Slight overlap between wedges; a selected wedge gets a small gap instead
            let sweep_offset = -0.4 + if sweep < 360.0 { 2.4 * state } else { 0.0 };

            let oval = skia::Rect::from_ltrb(cx - radius + dx, cy - radius + dy, cx + radius + dx, cy + radius + dy);
            canvas.draw_arc(
                oval,
                self.start_angles[s] + 0.5 * sweep_offset,
                (sweep - sweep_offset).max(0.0),
                true,
                &paint,
            );
        }

        canvas.restore();
    }

    fn text_size(&self, percent: f32) -> f32 {
        let state = (4.0 * percent).min(1.0);
        self.min_text_size * (1.0 - state) + self.max_text_size * state
    }

    // Larger wedges place their label closer to the center
    fn label_radius(&self, radius: f32, percent: f32) -> f32 {
        let digit_w = self.font.measure_width("0");
        let digit_h = self.font.measure_height("0");
        let extra = 0.5 * digit_w.hypot(digit_h);
        radius - self.min_text_size - extra - (3.0 * percent - 0.3).max(0.0) * self.font.size()
    }

    fn apply_animation(&mut self) {
        let state = self.changes.get();
        let mut sum = 0.0;
        for s in 0..self.percents.len() {
            let percent = self.percents_start[s] * (1.0 - state) + self.percents_end[s] * state;
            self.percents[s] = percent;
            self.start_angles[s] = sum * 360.0 + ARC_ANGLE_OFFSET;
            self.sweep_angles[s] = percent * 360.0;
            sum += percent;
        }
    }

    fn compute_percents(&self, from: usize, to: usize, visibility: &[bool]) -> Vec<f32> {
        let sums: Vec<f64> = self
            .chart
            .sources()
            .iter()
            .enumerate()
            .map(|(s, source)| {
                if visibility.get(s).copied().unwrap_or(false) {
                    source.y[from..to].iter().map(|&v| v as f64).sum()
                } else {
                    0.0
                }
            })
            .collect();
        let total: f64 = sums.iter().sum();

        sums.iter().map(|&sum| if total == 0.0 { 0.0 } else { (sum / total) as f32 }).collect()
    }
}

/// Whether `angle` lies on the clockwise arc from `from` to `to` (degrees).
fn is_between(from: f32, to: f32, angle: f32) -> bool {
    let end = if to < from { to - from + 360.0 } else { to - from };
    let test = if angle < from { angle - from + 360.0 } else { angle - from };
    test < end
}
