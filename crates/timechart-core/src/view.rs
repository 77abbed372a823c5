// File: crates/timechart-core/src/view.rs
// Summary: Chart state machine: visible X/Y ranges, per-source visibility, transform and frame stepping.
// Notes:
// - Ready = chart assigned, chart span > 1 position and a non-empty content box.
// - Mutations never draw; they record targets (or a pending range) and ask the
//   host for a frame. `step` applies them and advances every animation.
// - The transform is rebuilt exactly once per `step`.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use skia_safe as skia;
use tracing::{debug, trace, warn};

use crate::animation::{AnimatedState, FRAME_INTERVAL};
use crate::error::DataModelError;
use crate::geometry::{chart_matrix, map_x, Range, RectI32};
use crate::host::{Clock, FrameScheduler};
use crate::model::{Chart, ChartType};
use crate::painter::{DrawContext, Painter};
use crate::style::ChartStyle;
use crate::types::Insets;

/// Receives the visible X range `(from, to)` after every transform rebuild.
pub type RangeListener = Box<dyn FnMut(f32, f32)>;

/// A requested X window waiting for the next `step`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingRange {
    pub range: Range,
    pub animate_x: bool,
    pub animate_y: bool,
}

pub struct ChartView {
    style: ChartStyle,
    clock: Rc<dyn Clock>,
    scheduler: Option<Rc<dyn FrameScheduler>>,
    range_listener: Option<RangeListener>,

    chart: Option<Arc<Chart>>,
    painter: Option<Painter>,
    chart_range: Range,

    width: i32,
    height: i32,
    padding: Insets,
    insets: Insets,
    /// Extra pixels drawn beyond both content edges.
    extra_span: f32,

    pending: Option<PendingRange>,
    sources_states: Vec<AnimatedState>,

    x_range: Range,
    x_range_ext: Range,
    x_range_start: Range,
    x_range_end: Range,
    x_range_state: AnimatedState,

    y_range: Range,
    y_range_start: Range,
    y_range_end: Range,
    y_range_state: AnimatedState,

    matrix: skia::Matrix,
    extra_matrix: Option<skia::Matrix>,

    selected_x: Option<usize>,
    selected_source: Option<usize>,
    simplified: bool,
    animating: bool,
}

impl ChartView {
    pub fn new(style: ChartStyle, clock: Rc<dyn Clock>) -> Self {
        Self {
            style,
            clock,
            scheduler: None,
            range_listener: None,
            chart: None,
            painter: None,
            chart_range: Range::EMPTY,
            width: 0,
            height: 0,
            padding: Insets::default(),
            insets: Insets::default(),
            extra_span: 0.0,
            pending: None,
            sources_states: Vec::new(),
            x_range: Range::EMPTY,
            x_range_ext: Range::EMPTY,
            x_range_start: Range::EMPTY,
            x_range_end: Range::EMPTY,
            x_range_state: AnimatedState::new(),
            y_range: Range::EMPTY,
            y_range_start: Range::EMPTY,
            y_range_end: Range::EMPTY,
            y_range_state: AnimatedState::new(),
            matrix: skia::Matrix::new_identity(),
            extra_matrix: None,
            selected_x: None,
            selected_source: None,
            simplified: false,
            animating: false,
        }
    }

    pub fn with_scheduler(mut self, scheduler: Rc<dyn FrameScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn on_range_changed(&mut self, listener: impl FnMut(f32, f32) + 'static) {
        self.range_listener = Some(Box::new(listener));
    }

    pub fn set_size(&mut self, width: i32, height: i32) {
        self.width = width.max(0);
        self.height = height.max(0);
        self.request_frame();
    }

    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = padding;
        self.request_frame();
    }

    /// Assigns a new chart, discarding every derived state of the previous one.
    /// All sources become visible and the full span is the pending window.
    pub fn set_chart(&mut self, chart: impl Into<Arc<Chart>>) -> Result<(), DataModelError> {
        let mut chart = chart.into();
        chart.validate()?;
        // Pie windows are half-open, the extra step makes the last value reachable
        if chart.chart_type() == ChartType::Pie {
            chart = Arc::new(chart.with_trailing_point());
        }

        self.x_range.reset();
        self.x_range_ext.reset();
        self.x_range_end.reset();
        self.x_range_state.reset();
        self.y_range.reset();
        self.y_range_end.reset();
        self.y_range_state.reset();
        self.selected_x = None;
        self.selected_source = None;
        self.animating = false;

        self.chart_range = Range::new(0.0, (chart.len() - 1) as f32);
        self.sources_states = (0..chart.source_count()).map(|_| AnimatedState::settled(1.0)).collect();
        self.painter = Some(Painter::new(chart.clone(), &self.style));
        self.pending = Some(PendingRange { range: self.chart_range, animate_x: false, animate_y: false });

        debug!(id = chart.id(), points = chart.len(), sources = chart.source_count(), "chart assigned");
        self.chart = Some(chart);
        self.request_frame();
        Ok(())
    }

    /// Requests the visible window `[from, to]`, in fractional positions.
    /// Ends are swapped when reversed and clamped into the chart span; a window
    /// collapsing to a single position is dropped. Only the latest request is kept.
    pub fn set_range(&mut self, from: f32, to: f32, animate_x: bool, animate_y: bool) {
        if self.chart.is_none() {
            debug!(from, to, "range ignored, no chart assigned");
            return;
        }
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        let range = Range::new(self.chart_range.fit(from), self.chart_range.fit(to));
        if !range.is_valid() {
            warn!(from, to, "range dropped, clamped window is empty");
            return;
        }
        self.pending = Some(PendingRange { range, animate_x, animate_y });
        self.request_frame();
    }

    pub fn set_source_visibility(&mut self, index: usize, visible: bool, animate: bool) {
        if index >= self.sources_states.len() {
            warn!(index, "source visibility ignored, no such source");
            return;
        }
        self.apply_visibility(index, visible, animate);
        self.request_y_update(animate);
    }

    /// Sets every source at once; extra or missing entries are ignored.
    pub fn set_sources_visibility(&mut self, visibility: &[bool], animate: bool) {
        for (index, &visible) in visibility.iter().enumerate().take(self.sources_states.len()) {
            self.apply_visibility(index, visible, animate);
        }
        self.request_y_update(animate);
    }

    fn apply_visibility(&mut self, index: usize, visible: bool, animate: bool) {
        let target = if visible { 1.0 } else { 0.0 };
        let now = self.clock.now_millis();
        let state = &mut self.sources_states[index];
        if animate {
            state.animate_to(target, now);
        } else {
            state.set_to(target);
        }
    }

    // Visibility changes the Y extent of the current window
    fn request_y_update(&mut self, animate: bool) {
        let pending = match self.pending {
            Some(pending) => PendingRange { animate_y: animate, ..pending },
            None => {
                let range = if self.x_range_end.is_valid() { self.x_range_end } else { self.chart_range };
                PendingRange { range, animate_x: animate, animate_y: animate }
            }
        };
        self.pending = Some(pending);
        self.request_frame();
    }

    /// Visibility targets; a source being hidden is already reported as hidden.
    pub fn sources_visibility(&self) -> Vec<bool> {
        self.sources_states.iter().map(|s| s.target() == 1.0).collect()
    }

    pub fn has_visible_sources(&self) -> bool {
        self.sources_states.iter().any(|s| s.target() == 1.0)
    }

    /// Current (animated) visibility of every source.
    pub fn sources_states(&self) -> Vec<f32> {
        self.sources_states.iter().map(AnimatedState::get).collect()
    }

    pub fn set_simplified_drawing(&mut self, simplified: bool) {
        if self.simplified != simplified {
            self.simplified = simplified;
            self.request_frame();
        }
    }

    pub fn set_extra_transform(&mut self, matrix: Option<skia::Matrix>) {
        self.extra_matrix = matrix;
        self.request_frame();
    }

    /// Selects the position nearest to the surface X coordinate `pos_x`.
    /// Ignored by chart types without X selection or before the first step.
    pub fn set_selected_x(&mut self, pos_x: f32) -> Option<usize> {
        let allowed = self.painter.as_ref().is_some_and(Painter::allow_x_selection);
        if !allowed || !self.x_range.is_valid() {
            return None;
        }
        let inverse = self.matrix.invert()?;
        let chart_x = map_x(&inverse, pos_x);
        let index = self.chart_range.fit(chart_x).round() as usize;
        self.selected_x = Some(index);
        self.request_frame();
        self.selected_x
    }

    pub fn clear_selection(&mut self) {
        self.selected_x = None;
        self.request_frame();
    }

    pub fn selected_x(&self) -> Option<usize> {
        self.selected_x
    }

    /// Toggles the selection of the source drawn under `(x, y)`; picking the
    /// selected source again, or nothing, clears it.
    pub fn select_source_at(&mut self, x: f32, y: f32) -> Option<usize> {
        let content = self.content();
        let Some(painter) = self.painter.as_mut() else { return None };

        let picked = painter.pick_source(&content, x, y);
        let selected = if picked == self.selected_source { None } else { picked };
        if selected != self.selected_source {
            self.selected_source = selected;
            painter.set_selected_source(selected, self.clock.now_millis());
            self.request_frame();
        }
        self.selected_source
    }

    pub fn selected_source(&self) -> Option<usize> {
        self.selected_source
    }

    pub fn chart(&self) -> Option<&Arc<Chart>> {
        self.chart.as_ref()
    }

    pub fn painter(&self) -> Option<&Painter> {
        self.painter.as_ref()
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }

    /// Label insets reserved by an overlay layer, inside the padding.
    pub fn insets(&self) -> Insets {
        self.insets
    }

    /// Full span of the assigned chart, `[0, N-1]`.
    pub fn chart_range(&self) -> Range {
        self.chart_range
    }

    /// Currently drawn X window.
    pub fn x_range(&self) -> Range {
        self.x_range
    }

    /// X window the view is animating to.
    pub fn x_range_end(&self) -> Range {
        self.x_range_end
    }

    /// Currently drawn X window widened by the side drawing span.
    pub fn x_range_ext(&self) -> Range {
        self.x_range_ext
    }

    pub fn y_range(&self) -> Range {
        self.y_range
    }

    pub fn y_range_end(&self) -> Range {
        self.y_range_end
    }

    /// Top of the Y range the view is animating to.
    pub fn visible_y_max(&self) -> f32 {
        self.y_range_end.to
    }

    pub fn matrix(&self) -> &skia::Matrix {
        &self.matrix
    }

    pub fn pending(&self) -> Option<PendingRange> {
        self.pending
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Surface box the chart is drawn into: size minus padding minus label insets.
    pub fn content(&self) -> RectI32 {
        let pad = self.padding.plus(&self.insets);
        RectI32::from_ltrb(
            pad.left as i32,
            pad.top as i32,
            self.width - pad.right as i32,
            self.height - pad.bottom as i32,
        )
    }

    pub fn is_ready(&self) -> bool {
        let content = self.content();
        self.chart.is_some() && self.chart_range.is_valid() && content.width() > 0 && content.height() > 0
    }

    /// Applies pending mutations and advances all animations to `now`.
    /// Returns whether another frame is needed; if so, one is also scheduled.
    pub fn step(&mut self, now: i64) -> bool {
        let animating = self.advance(now);
        self.finish_frame(animating);
        animating
    }

    pub fn draw(&mut self, canvas: &skia::Canvas) {
        if !self.is_ready() {
            return;
        }
        let from = self.x_range_ext.from.floor().max(0.0) as usize;
        let to = (self.x_range_ext.to.ceil().max(0.0) as usize).min(self.chart_range.to as usize);
        if to <= from {
            return;
        }
        let content = self.content();
        let states = self.sources_states();

        let Some(painter) = self.painter.as_mut() else { return };
        let ctx = DrawContext {
            canvas,
            content,
            matrix: &self.matrix,
            from,
            to,
            states: &states,
            selected: self.selected_x,
            simplified: self.simplified || self.animating,
        };
        painter.draw(&ctx);
    }

    // ---- building blocks for the label layer and the finder -------------------

    pub(crate) fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    pub(crate) fn set_insets(&mut self, insets: Insets) {
        self.insets = insets;
    }

    pub(crate) fn set_extra_span(&mut self, extra: f32) {
        self.extra_span = extra;
    }

    pub(crate) fn painter_mut(&mut self) -> Option<&mut Painter> {
        self.painter.as_mut()
    }

    pub(crate) fn request_frame(&self) {
        if let Some(scheduler) = &self.scheduler {
            scheduler.schedule_frame(Duration::ZERO);
        }
    }

    pub(crate) fn finish_frame(&self, animating: bool) {
        if animating {
            if let Some(scheduler) = &self.scheduler {
                scheduler.schedule_frame(FRAME_INTERVAL);
            }
        }
    }

    /// Pending range + state update, without frame scheduling.
    pub(crate) fn advance(&mut self, now: i64) -> bool {
        if !self.is_ready() {
            return false;
        }
        if let Some(pending) = self.take_pending() {
            let y_range = self.compute_y_range(&pending, now);
            self.apply_range(&pending, y_range, now);
        }
        self.update_states(now)
    }

    pub(crate) fn take_pending(&mut self) -> Option<PendingRange> {
        self.pending.take().filter(|p| p.range.is_valid())
    }

    /// Y extent of the pending window according to the painter, at least one unit tall.
    pub(crate) fn compute_y_range(&mut self, pending: &PendingRange, now: i64) -> Range {
        let visibility = self.sources_visibility();
        let last = self.chart_range.to as usize;
        let from = (pending.range.from.floor().max(0.0) as usize).min(last);
        let to = (pending.range.to.ceil().max(0.0) as usize).min(last);

        let Some(painter) = self.painter.as_mut() else { return Range::new(0.0, 1.0) };
        let mut y = painter.calculate_y_range(from, to, &visibility, pending.animate_y, now);
        if y.from >= y.to {
            y.to = y.from + 1.0;
        }
        y
    }

    /// Retargets the X and Y ranges. A range is animated only when asked to,
    /// when its target changes and when there is a drawn range to start from.
    pub(crate) fn apply_range(&mut self, pending: &PendingRange, y: Range, now: i64) {
        let x = pending.range;
        debug!(from = x.from, to = x.to, y_from = y.from, y_to = y.to, "range applied");

        if pending.animate_x && self.x_range.is_valid() {
            if self.x_range_end != x {
                self.x_range_start = self.x_range;
                self.x_range_state.set_to(0.0);
                self.x_range_state.animate_to(1.0, now);
            }
        } else {
            self.x_range = x;
            self.x_range_state.reset();
        }
        self.x_range_end = x;

        if pending.animate_y && self.y_range.is_valid() {
            if self.y_range_end != y {
                self.y_range_start = self.y_range;
                self.y_range_state.set_to(0.0);
                self.y_range_state.animate_to(1.0, now);
            }
        } else {
            self.y_range = y;
            self.y_range_state.reset();
        }
        self.y_range_end = y;
    }

    /// Advances every animated state, rebuilds the transform and notifies the
    /// range listener. Returns whether any state is still animating.
    pub(crate) fn update_states(&mut self, now: i64) -> bool {
        for state in &mut self.sources_states {
            state.update(now);
        }

        if !self.x_range_state.is_finished() {
            self.x_range_state.update(now);
            self.x_range = Range::interpolate(&self.x_range_start, &self.x_range_end, self.x_range_state.get());
        }
        if !self.y_range_state.is_finished() {
            self.y_range_state.update(now);
            self.y_range = Range::interpolate(&self.y_range_start, &self.y_range_end, self.y_range_state.get());
        }
        if let Some(painter) = self.painter.as_mut() {
            painter.update(now);
        }

        self.update_transform();

        if let Some(listener) = self.range_listener.as_mut() {
            listener(self.x_range.from, self.x_range.to);
        }

        let animating = !self.x_range_state.is_finished()
            || !self.y_range_state.is_finished()
            || self.sources_states.iter().any(|s| !s.is_finished())
            || self.painter.as_ref().is_some_and(Painter::is_animating);

        trace!(now, animating, from = self.x_range.from, to = self.x_range.to, "step");
        self.animating = animating;
        animating
    }

    fn update_transform(&mut self) {
        let content = self.content();
        let mut matrix = chart_matrix(&content, &self.x_range, &self.y_range);
        if let Some(extra) = &self.extra_matrix {
            matrix.post_concat(extra);
        }
        self.matrix = matrix;

        // Keep drawing beyond both content edges
        let scale_x = content.width() as f32 / (self.x_range.size() - 1.0);
        let extra_left = ((content.left as f32 + self.extra_span) / scale_x).ceil();
        let extra_right = ((self.width - content.right) as f32 + self.extra_span) / scale_x;
        self.x_range_ext = Range::new(
            self.chart_range.fit(self.x_range.from - extra_left),
            self.chart_range.fit(self.x_range.to + extra_right.ceil()),
        );
    }
}
