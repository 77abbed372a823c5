// File: crates/timechart-core/src/axes.rs
// Summary: Chart with adaptive X labels and animated Y guides on top of the chart state machine.
// Notes:
// - Y ranges (except exact ones) are widened to round guide values and kept
//   unchanged for small moves of the top, so guides do not jitter while dragging.
// - A superseded guide set fades out while the new one fades in.
// - X labels fade in and out by level as the window zooms.

use std::rc::Rc;
use std::sync::Arc;

use skia_safe as skia;
use tracing::debug;

use crate::animation::AnimatedState;
use crate::error::DataModelError;
use crate::geometry::{map_x, map_y, Range};
use crate::grid::linspace;
use crate::host::{Clock, FrameScheduler, LabelCallbacks};
use crate::labels::LabelsHelper;
use crate::model::{Chart, ChartType};
use crate::style::{source_color, to_alpha, ChartStyle};
use crate::text::{Align, LabelFont};
use crate::time::GroupBy;
use crate::types::Insets;
use crate::view::ChartView;

/// Bottom label band height, in label text sizes.
const X_LABELS_BAND: f32 = 1.33;
/// Level fractions between which a label slides from its own position to
/// the middle of its neighbours.
const UNEVEN_FROM: f32 = 0.5;
const UNEVEN_TO: f32 = 0.66;

struct XLabel {
    title: String,
    level: f32,
    width: f32,
    state: AnimatedState,
}

struct YGuides {
    values: Vec<f32>,
    positions: Vec<f32>,
    /// One title column per independently scaled source, or a single column.
    titles: Vec<Vec<String>>,
    show_titles: bool,
    state: AnimatedState,
}

impl YGuides {
    fn empty() -> Self {
        Self {
            values: Vec::new(),
            positions: Vec::new(),
            titles: Vec::new(),
            show_titles: false,
            state: AnimatedState::settled(1.0),
        }
    }

    fn transform(&mut self, matrix: &skia::Matrix) {
        self.positions.clear();
        self.positions.extend(self.values.iter().map(|&v| map_y(matrix, v)));
    }
}

pub struct LabeledChart {
    view: ChartView,
    callbacks: LabelCallbacks,
    font: LabelFont,
    helper: LabelsHelper,

    x_labels: Option<Vec<XLabel>>,
    x_level: f32,

    y_guides: Option<YGuides>,
    y_guides_old: Vec<YGuides>,
}

impl LabeledChart {
    pub fn new(style: ChartStyle, clock: Rc<dyn Clock>) -> Self {
        let mut view = ChartView::new(style, clock);
        let top = style.labels_text_size + style.y_label_margin_bottom;
        let bottom = X_LABELS_BAND * style.labels_text_size;
        view.set_insets(Insets::new(0, 0, top as u32, bottom as u32));

        Self {
            view,
            callbacks: LabelCallbacks::default(),
            font: LabelFont::new(style.labels_text_size, false),
            helper: LabelsHelper::default(),
            x_labels: None,
            x_level: 0.0,
            y_guides: None,
            y_guides_old: Vec::new(),
        }
    }

    pub fn with_scheduler(mut self, scheduler: Rc<dyn FrameScheduler>) -> Self {
        self.view = self.view.with_scheduler(scheduler);
        self
    }

    pub fn with_callbacks(mut self, callbacks: LabelCallbacks) -> Self {
        self.callbacks = callbacks;
        self.x_labels = None;
        self
    }

    /// Aligns X label levels to calendar groups (when the chart spans one).
    pub fn set_group_by(&mut self, group_by: Option<GroupBy>) {
        self.helper.set_group_by(group_by);
        self.x_labels = None;
        self.view.request_frame();
    }

    pub fn view(&self) -> &ChartView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ChartView {
        &mut self.view
    }

    pub fn set_chart(&mut self, chart: impl Into<Arc<Chart>>) -> Result<(), DataModelError> {
        let chart = chart.into();
        chart.validate()?;

        self.x_labels = None;
        self.x_level = 0.0;
        self.y_guides = None;
        self.y_guides_old.clear();
        self.view.set_chart(chart)
    }

    pub fn set_range(&mut self, from: f32, to: f32, animate_x: bool, animate_y: bool) {
        self.view.set_range(from, to, animate_x, animate_y);
    }

    pub fn set_source_visibility(&mut self, index: usize, visible: bool, animate: bool) {
        self.view.set_source_visibility(index, visible, animate);
    }

    pub fn set_sources_visibility(&mut self, visibility: &[bool], animate: bool) {
        self.view.set_sources_visibility(visibility, animate);
    }

    pub fn sources_visibility(&self) -> Vec<bool> {
        self.view.sources_visibility()
    }

    pub fn set_size(&mut self, width: i32, height: i32) {
        if (width, height) != (self.view.width(), self.view.height()) {
            self.x_labels = None;
        }
        self.view.set_size(width, height);
    }

    pub fn set_padding(&mut self, padding: Insets) {
        self.x_labels = None;
        self.view.set_padding(padding);
    }

    pub fn visible_y_max(&self) -> f32 {
        self.view.visible_y_max()
    }

    /// Values of the current Y guides, bottom to top.
    pub fn y_guide_values(&self) -> Vec<f32> {
        self.y_guides.as_ref().map(|g| g.values.clone()).unwrap_or_default()
    }

    /// Label level of every X position (empty before the first step or for pies).
    pub fn x_label_levels(&self) -> Vec<f32> {
        self.x_labels.as_ref().map(|l| l.iter().map(|x| x.level).collect()).unwrap_or_default()
    }

    /// Positions whose X label is currently (at least partly) shown.
    pub fn visible_x_labels(&self) -> Vec<usize> {
        let Some(labels) = &self.x_labels else { return Vec::new() };
        labels
            .iter()
            .enumerate()
            .filter(|(_, l)| l.state.is_set() && l.state.get() > 0.0 && self.x_level <= 2.0 * l.level)
            .map(|(i, _)| i)
            .collect()
    }

    /// Display threshold of the current window.
    pub fn x_label_level(&self) -> f32 {
        self.x_level
    }

    /// Rounds `range` to label-aligned positions of the current chart.
    pub fn snap_range(&self, range: Range) -> Range {
        match &self.x_labels {
            Some(labels) if !labels.is_empty() => {
                let levels: Vec<f32> = labels.iter().map(|l| l.level).collect();
                self.helper.snap(&levels, range)
            }
            _ => Range::new(range.from.round(), range.to.round()),
        }
    }

    pub fn step(&mut self, now: i64) -> bool {
        let animating = self.advance(now);
        self.view.finish_frame(animating);
        animating
    }

    fn advance(&mut self, now: i64) -> bool {
        if !self.view.is_ready() {
            return false;
        }
        self.prepare_x_labels();

        if let Some(pending) = self.view.take_pending() {
            let y = self.view.compute_y_range(&pending, now);
            let (y, small_change) = self.adjust_y_range(y);
            self.view.apply_range(&pending, y, now);
            if !small_change {
                self.prepare_y_guides(y, now);
            }
        }

        let mut animating = self.view.update_states(now);

        self.x_level = self.helper.compute_level(self.view.x_range().size());
        animating |= self.update_x_labels(now);
        animating |= self.update_y_guides(now);
        animating
    }

    fn prepare_x_labels(&mut self) {
        if self.x_labels.is_some() {
            return;
        }
        let Some(chart) = self.view.chart().cloned() else { return };
        if chart.chart_type() == ChartType::Pie {
            self.x_labels = Some(Vec::new());
            self.view.set_extra_span(0.0);
            return;
        }

        let titles: Vec<String> = chart.x().iter().map(|&x| (self.callbacks.format_date)(x)).collect();
        let widths: Vec<f32> = titles.iter().map(|t| self.measure(t)).collect();
        let max_width = widths.iter().copied().fold(0.0, f32::max);

        let style = self.view.style();
        self.helper.init(self.view.content().width() as f32, max_width, style.x_label_padding);
        let levels = self.helper.compute_levels(&chart);

        debug!(labels = titles.len(), max_width, intervals = self.helper.max_intervals(), "x labels prepared");
        self.x_labels = Some(
            titles
                .into_iter()
                .zip(widths)
                .zip(levels)
                .map(|((title, width), level)| XLabel { title, level, width, state: AnimatedState::new() })
                .collect(),
        );
        self.view.set_extra_span(max_width);
    }

    fn measure(&self, text: &str) -> f32 {
        match &self.callbacks.measure {
            Some(measure) => measure(text),
            None => self.font.measure_width(text),
        }
    }

    /// Rounds the range to whole guide steps and detects small changes of
    /// the top, which keep the previous range.
    fn adjust_y_range(&self, y: Range) -> (Range, bool) {
        let exact = self.view.painter().is_some_and(|p| p.use_exact_range());
        let (mut from, mut to) = (y.from, y.to);

        if !exact {
            let intervals = (self.view.style().guides_count.max(2) - 1) as f32;
            let step = (to - from) / intervals;
            let factor10 = (step.log10() - 0.5).floor() as i32;
            let round = 10f32.powi(factor10.max(0)) * intervals;

            from = (from / round).floor() * round;
            to = (to / round).ceil() * round;
            if to <= from {
                to = from + round;
            }
        }

        let end = self.view.y_range_end();
        if !end.is_valid() {
            return (Range::new(from, to), false);
        }

        let span = to - from;
        let from_changes = (from - end.from) / span;
        let to_changes = (to - end.to) / span;
        let band = self.view.padding().plus(&self.view.insets()).top;
        let to_threshold = band as f32 / self.view.height().max(1) as f32;

        // The bottom is where X labels sit, it may not move at all
        if from_changes == 0.0 && to_changes.abs() <= to_threshold {
            (end, true)
        } else {
            (Range::new(from, to), false)
        }
    }

    fn prepare_y_guides(&mut self, y: Range, now: i64) {
        let Some(chart) = self.view.chart().cloned() else { return };
        let animate = self.y_guides.is_some();

        if chart.chart_type() == ChartType::Pie {
            self.y_guides = Some(YGuides::empty());
            return;
        }

        if let Some(mut old) = self.y_guides.take() {
            old.state.animate_to(0.0, now);
            self.y_guides_old.push(old);
        }

        let count = self.view.style().guides_count;
        let scales: Vec<f32> = match self.view.painter().and_then(|p| p.sources_scales()) {
            Some(scales) => scales.to_vec(),
            None => vec![1.0],
        };
        let values: Vec<f32> =
            linspace(y.from as f64, y.to as f64, count).into_iter().map(|v| v.trunc() as f32).collect();
        let max_value = y.to;

        let titles = scales
            .iter()
            .map(|&scale| {
                let max = (max_value / scale).round() as i64;
                values.iter().map(|&v| (self.callbacks.format_value)((v / scale).round() as i64, max)).collect()
            })
            .collect();

        let mut state = AnimatedState::new();
        if animate {
            state.set_to(0.0);
            state.animate_to(1.0, now);
        } else {
            state.set_to(1.0);
        }

        debug!(from = y.from, to = y.to, count, animate, "y guides prepared");
        self.y_guides = Some(YGuides {
            values,
            positions: Vec::with_capacity(count),
            titles,
            show_titles: self.view.has_visible_sources(),
            state,
        });
    }

    fn update_x_labels(&mut self, now: i64) -> bool {
        let ext = self.view.x_range_ext();
        let level = self.x_level;
        let Some(labels) = self.x_labels.as_mut() else { return false };

        let mut animating = false;
        for (i, label) in labels.iter_mut().enumerate() {
            let pos = i as f32;
            if pos < ext.from || pos > ext.to {
                label.state.reset();
                continue;
            }
            let target = if label.level >= level { 1.0 } else { 0.0 };
            if label.state.is_set() {
                label.state.update(now);
                label.state.animate_to(target, now);
            } else {
                label.state.set_to(target);
            }
            animating |= !label.state.is_finished();
        }
        animating
    }

    fn update_y_guides(&mut self, now: i64) -> bool {
        let matrix = *self.view.matrix();
        let mut animating = false;

        if let Some(guides) = self.y_guides.as_mut() {
            guides.state.update(now);
            guides.transform(&matrix);
            animating |= !guides.state.is_finished();
        }
        for guides in &mut self.y_guides_old {
            guides.state.update(now);
            guides.transform(&matrix);
        }
        self.y_guides_old.retain(|g| !g.state.is_finished());
        animating || !self.y_guides_old.is_empty()
    }

    pub fn draw(&mut self, canvas: &skia::Canvas) {
        if !self.view.is_ready() {
            return;
        }
        self.view.draw(canvas);

        let content = self.view.content();
        let (left, right) = (content.left as f32, content.right as f32);

        for guides in self.y_guides_old.iter().chain(self.y_guides.iter()) {
            self.draw_y_guides(canvas, guides, left, right);
        }
        for guides in self.y_guides_old.iter().chain(self.y_guides.iter()) {
            self.draw_y_labels(canvas, guides, left, right);
        }
        self.draw_x_labels(canvas, left, right);
    }

    fn draw_y_guides(&self, canvas: &skia::Canvas, guides: &YGuides, left: f32, right: f32) {
        let style = self.view.style();
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);
        paint.set_stroke_width(style.guides_width);
        paint.set_color(style.guides_color);
        paint.set_alpha_f(style.guides_color.a() as f32 / 255.0 * guides.state.get());

        for &y in &guides.positions {
            canvas.draw_line((left, y), (right, y), &paint);
        }
    }

    fn draw_y_labels(&self, canvas: &skia::Canvas, guides: &YGuides, left: f32, right: f32) {
        if !guides.show_titles || guides.titles.is_empty() {
            return;
        }
        let style = self.view.style();
        let alpha = guides.state.get();
        let margin = style.y_label_margin_side;

        let Some(chart) = self.view.chart() else { return };
        if guides.titles.len() > 1 && chart.source_count() > 1 {
            let states = self.view.sources_states();
            let columns = [(0, Align::Left, left + margin), (1, Align::Right, right - margin)];
            for (s, align, x) in columns {
                let color = source_color(chart.sources()[s].color);
                self.draw_y_column(canvas, guides, s, color, alpha * states[s], align, x);
            }
        } else {
            let max_alpha = style.labels_color.a() as f32 / 255.0;
            self.draw_y_column(canvas, guides, 0, style.labels_color, max_alpha * alpha, Align::Left, left + margin);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_y_column(
        &self,
        canvas: &skia::Canvas,
        guides: &YGuides,
        column: usize,
        color: skia::Color,
        alpha: f32,
        align: Align,
        x: f32,
    ) {
        let alpha = to_alpha(alpha);
        if alpha == 0 {
            return;
        }
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);
        paint.set_color(color);
        paint.set_alpha(alpha);

        let margin_bottom = self.view.style().y_label_margin_bottom;
        for (title, &y) in guides.titles[column].iter().zip(&guides.positions) {
            self.font.draw(canvas, title, x, y - margin_bottom, align, &paint);
        }
    }

    fn draw_x_labels(&self, canvas: &skia::Canvas, left: f32, right: f32) {
        let Some(labels) = &self.x_labels else { return };
        if labels.is_empty() {
            return;
        }
        let ext = self.view.x_range_ext();
        let from = ext.from.ceil().max(0.0) as usize;
        let to = (ext.to.floor().max(0.0) as usize).min(labels.len() - 1);

        for i in from..=to {
            let label = &labels[i];
            if !label.state.is_set() || label.state.get() == 0.0 || label.level <= 0.0 {
                continue;
            }
            // Deeper levels would stack up while fading
            if self.x_level > 2.0 * label.level {
                continue;
            }
            self.draw_x_dot(canvas, i, left, right, label.state.get());
            self.draw_x_label(canvas, labels, i, left, right);
        }
    }

    fn draw_x_dot(&self, canvas: &skia::Canvas, pos: usize, left: f32, right: f32, alpha: f32) {
        let x = map_x(self.view.matrix(), pos as f32);
        if !(left - 0.5 < x && x < right + 0.5) {
            return;
        }
        let y = self
            .y_guides
            .as_ref()
            .and_then(|g| g.positions.first().copied())
            .unwrap_or(self.view.content().bottom as f32);

        let style = self.view.style();
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);
        paint.set_stroke_width(2.0 * style.guides_width);
        paint.set_stroke_cap(skia::paint::Cap::Round);
        paint.set_color(style.labels_dot_color);
        paint.set_alpha_f(style.guides_color.a() as f32 / 255.0 * alpha);
        canvas.draw_point((x, y), &paint);
    }

    fn draw_x_label(&self, canvas: &skia::Canvas, labels: &[XLabel], pos: usize, left: f32, right: f32) {
        let label = &labels[pos];
        let level = self.x_level;

        // Labels of the same level are spread evenly even if their positions are not
        let prev = find_neighbour_label(labels, pos, -1);
        let next = find_neighbour_label(labels, pos, 1);
        let uneven = match (prev, next) {
            (Some(p), Some(n)) => 0.5 * (p + n) as f32,
            _ => pos as f32,
        };
        let exact = pos as f32;
        let adjusted = if level <= UNEVEN_FROM * label.level {
            exact
        } else if level >= UNEVEN_TO * label.level {
            uneven
        } else {
            exact + (level / label.level - UNEVEN_FROM) * (uneven - exact) / (UNEVEN_TO - UNEVEN_FROM)
        };

        let width = self.view.width() as f32;
        let x = map_x(self.view.matrix(), adjusted);
        let y = (self.view.height() - self.view.padding().bottom as i32) as f32;

        // Labels slide from left-aligned to right-aligned across the content
        let shift = ((x - left) / (right - left)).clamp(0.0, 1.0);
        let x_shifted = x - label.width * shift;

        let edge_state = if x < left {
            (x + label.width) / (left + label.width)
        } else if x > right {
            (width + label.width - x) / (width + label.width - right)
        } else {
            1.0
        };
        let stack_state = if label.level >= level { 1.0 } else { 2.0 - level / label.level };
        let alpha = label.state.get() * edge_state.max(0.0) * (stack_state * stack_state).clamp(0.0, 1.0);

        let style = self.view.style();
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);
        paint.set_color(style.labels_color);
        paint.set_alpha_f(style.labels_color.a() as f32 / 255.0 * alpha);
        self.font.draw(canvas, &label.title, x_shifted, y, Align::Left, &paint);
    }
}

/// Nearest position in `direction` whose level is at least the level at `from`.
fn find_neighbour_label(labels: &[XLabel], from: usize, direction: isize) -> Option<usize> {
    let level = labels[from].level;
    let mut i = from as isize + direction;
    while 0 <= i && (i as usize) < labels.len() {
        if labels[i as usize].level >= level {
            return Some(i as usize);
        }
        i += direction;
    }
    None
}
