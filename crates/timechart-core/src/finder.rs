// File: crates/timechart-core/src/finder.rs
// Summary: Finder strip: full-span overview with draggable window handles driving a primary chart.
// Notes:
// - Handles live in the finder's chart positions; the primary chart receives
//   every handle move as its visible range.
// - While dragging the primary's X range follows the pointer exactly (no X
//   animation); on release the window snaps and animates into place.

use std::rc::Rc;
use std::sync::Arc;

use skia_safe as skia;
use tracing::debug;

use crate::animation::AnimatedState;
use crate::axes::LabeledChart;
use crate::error::DataModelError;
use crate::geometry::{map_x, Range};
use crate::host::{Clock, FrameScheduler};
use crate::model::{Chart, ChartType};
use crate::style::ChartStyle;
use crate::time::GroupBy;
use crate::view::ChartView;

/// Calendar-group constraints on the finder window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupConfig {
    pub group_by: GroupBy,
    /// Minimum and maximum window length, in groups.
    pub min: i32,
    pub max: i32,
    /// Initial window length, in groups.
    pub initial: i32,
    /// Snap released handles to group starts.
    pub snap: bool,
    /// Start of the initial window; `None` places it at the end of the data.
    pub initial_date: Option<i64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FinderConfig {
    pub groups: Option<GroupConfig>,
}

impl FinderConfig {
    pub fn groups(group_by: GroupBy, min: i32, max: i32, initial: i32, snap: bool) -> Self {
        let max = max.max(min.max(1));
        let groups = GroupConfig {
            group_by,
            min: min.max(1),
            max,
            initial: initial.clamp(min.max(1), max),
            snap,
            initial_date: None,
        };
        Self { groups: Some(groups) }
    }

    pub fn with_initial_date(mut self, date: i64) -> Self {
        if let Some(groups) = self.groups.as_mut() {
            groups.initial_date = Some(date);
        }
        self
    }
}

/// Part of the finder window grabbed by a drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    Left,
    Right,
    Both,
}

pub struct ChartFinder {
    view: ChartView,
    config: FinderConfig,

    handle: Range,
    handle_start: Range,
    handle_end: Range,
    handle_state: AnimatedState,

    dragging: Option<Handle>,
    last_x: f32,
}

impl ChartFinder {
    pub fn new(style: ChartStyle, clock: Rc<dyn Clock>) -> Self {
        Self {
            view: ChartView::new(style, clock),
            config: FinderConfig::default(),
            handle: Range::EMPTY,
            handle_start: Range::EMPTY,
            handle_end: Range::EMPTY,
            handle_state: AnimatedState::new(),
            dragging: None,
            last_x: 0.0,
        }
    }

    pub fn with_scheduler(mut self, scheduler: Rc<dyn FrameScheduler>) -> Self {
        self.view = self.view.with_scheduler(scheduler);
        self
    }

    pub fn with_config(mut self, config: FinderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    pub fn view(&self) -> &ChartView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ChartView {
        &mut self.view
    }

    /// Current window, in chart positions.
    pub fn handle_range(&self) -> Range {
        self.handle
    }

    pub fn dragging(&self) -> Option<Handle> {
        self.dragging
    }

    /// Assigns `chart` to both the finder and `primary`, then places the
    /// initial window. A pie is shown as square areas here, with the same
    /// trailing point the pie view adds, so both spans line up.
    pub fn set_chart(&mut self, chart: impl Into<Arc<Chart>>, primary: &mut LabeledChart) -> Result<(), DataModelError> {
        let chart = chart.into();
        chart.validate()?;

        let overview = if chart.chart_type() == ChartType::Pie {
            Arc::new(chart.with_trailing_point().with_type(ChartType::AreaSquare))
        } else {
            chart.clone()
        };

        self.view.set_chart(overview)?;
        primary.set_chart(chart)?;

        self.dragging = None;
        self.handle_state.reset();
        self.set_initial_handle(primary);
        Ok(())
    }

    fn set_initial_handle(&mut self, primary: &mut LabeledChart) {
        let span = self.view.chart_range();
        let mut handle = span;

        if let (Some(groups), Some(chart)) = (self.config.groups, self.view.chart().cloned()) {
            let resolution = chart.resolution();
            let distance = (groups.initial as i64 * groups.group_by.steps_count(resolution)) as f32;

            let (mut from, mut to) = match groups.initial_date {
                Some(date) => {
                    let from = resolution.distance(chart.x()[0], date).max(0.0);
                    (from, from + distance)
                }
                None => (span.to - distance, span.to),
            };
            if to > span.to {
                to = span.to;
                from = to - distance;
            }
            handle = Range::new(span.fit(from), span.fit(to));

            if groups.snap {
                handle = self.snap_to_groups(handle, &groups, Handle::Both);
            }
        }

        self.handle = handle;
        self.handle_end = handle;
        primary.set_range(handle.from, handle.to, false, false);
    }

    /// Moves the handles to a window set on the primary chart elsewhere.
    /// Ignored while a drag is in progress.
    pub fn sync_handles(&mut self, from: f32, to: f32) {
        if self.dragging.is_some() {
            return;
        }
        let span = self.view.chart_range();
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        let range = Range::new(span.fit(from), span.fit(to));
        if !range.is_valid() {
            return;
        }
        self.handle_state.reset();
        self.handle = range;
        self.handle_end = range;
        self.view.request_frame();
    }

    /// Picks the handle under surface X `x`. Returns whether a drag started.
    pub fn drag_start(&mut self, x: f32, primary: &mut LabeledChart) -> bool {
        if self.dragging.is_some() {
            return true;
        }
        let style = self.view.style();
        let touch = style.finder_handle_touch_offset;

        let matrix = self.view.matrix();
        let left = map_x(matrix, self.handle.from);
        let right = map_x(matrix, self.handle.to);
        let mid = 0.5 * (left + right);

        let mid_dist = (mid - x).abs();
        let left_dist = (left - x).abs();
        let right_dist = (right - x).abs();

        let picked = if mid_dist <= 0.5 * touch {
            Some(Handle::Both)
        } else if left_dist < right_dist && left_dist <= touch {
            Some(Handle::Left)
        } else if left_dist >= right_dist && right_dist <= touch {
            Some(Handle::Right)
        } else if left < x && x < right {
            Some(Handle::Both)
        } else {
            None
        };

        let Some(handle) = picked else { return false };
        debug!(?handle, x, "finder drag started");

        // Settle a running snap animation at its target
        if !self.handle_state.is_finished() {
            self.handle_state.reset();
            self.handle = self.handle_end;
        }
        self.dragging = Some(handle);
        self.last_x = x;

        primary.view_mut().set_simplified_drawing(true);
        self.view.set_simplified_drawing(true);
        true
    }

    /// Moves the dragged handle(s) to follow surface X `x`.
    pub fn drag_move(&mut self, x: f32, primary: &mut LabeledChart) -> bool {
        let Some(handle) = self.dragging else { return false };
        let Some(chart) = self.view.chart().cloned() else { return false };

        let span = self.view.chart_range();
        let width = self.view.content().width() as f32;
        let scale = width / (self.view.x_range().size() - 1.0);
        if !(scale.is_finite() && scale > 0.0) {
            return false;
        }
        let delta = (x - self.last_x) / scale;
        self.last_x = x;

        let min_range = self.view.style().finder_handles_min_distance / scale;
        let mut from = self.handle.from;
        let mut to = self.handle.to;

        match handle {
            Handle::Left => {
                from += delta;
                if to - from < min_range {
                    from = to - min_range;
                }
                from = span.fit(from);

                if let Some(groups) = self.config.groups {
                    // Left edge stays within [min, max] groups before the right edge
                    let to_time = chart.x()[to.round() as usize];
                    let min_time = groups.group_by.add(to_time, -groups.max);
                    let max_time = groups.group_by.add(to_time, -groups.min);
                    let min = to + chart.resolution().distance(to_time, min_time);
                    let max = to + chart.resolution().distance(to_time, max_time);
                    from = from.clamp(min, max.max(min));
                }
            }
            Handle::Right => {
                to += delta;
                if to - from < min_range {
                    to = from + min_range;
                }
                to = span.fit(to);

                if let Some(groups) = self.config.groups {
                    let from_time = chart.x()[from.round() as usize];
                    let min_time = groups.group_by.add(from_time, groups.min);
                    let max_time = groups.group_by.add(from_time, groups.max);
                    let min = from + chart.resolution().distance(from_time, min_time);
                    let max = from + chart.resolution().distance(from_time, max_time);
                    to = to.clamp(min, max.max(min));
                }
            }
            Handle::Both => {
                from += delta;
                to += delta;
                if from < span.from {
                    to += span.from - from;
                    from = span.from;
                } else if to > span.to {
                    from -= to - span.to;
                    to = span.to;
                }
            }
        }

        self.handle = Range::new(span.fit(from), span.fit(to));
        self.handle_end = self.handle;
        primary.set_range(self.handle.from, self.handle.to, false, true);
        self.view.request_frame();
        true
    }

    /// Ends the drag: snaps the window (to groups when configured, otherwise
    /// to the primary's label positions) and animates both views there.
    pub fn drag_end(&mut self, primary: &mut LabeledChart) {
        let Some(handle) = self.dragging.take() else { return };

        let target = match self.config.groups {
            Some(groups) if groups.snap => self.snap_to_groups(self.handle, &groups, handle),
            Some(_) => self.handle,
            None => primary.snap_range(self.handle),
        };
        debug!(?handle, from = target.from, to = target.to, "finder drag ended");

        if target.is_valid() && target != self.handle {
            self.animate_handle(target, primary);
        }

        primary.view_mut().set_simplified_drawing(false);
        self.view.set_simplified_drawing(false);
    }

    fn animate_handle(&mut self, target: Range, primary: &mut LabeledChart) {
        primary.set_range(target.from, target.to, true, true);

        self.handle_start = self.handle;
        self.handle_end = target;
        self.handle_state.set_to(0.0);
        self.handle_state.animate_to(1.0, self.view.now());
        self.view.request_frame();
    }

    fn snap_to_groups(&self, range: Range, groups: &GroupConfig, handle: Handle) -> Range {
        let Some(chart) = self.view.chart() else { return range };
        let times = chart.x();
        let group_by = groups.group_by;

        let mut from = self.closest_group_start(chart, range.from, group_by);
        let mut to = self.closest_group_start(chart, range.to, group_by);

        let intervals = group_by.distance(times[from], times[to]).round() as i32;
        let steps = group_by.steps_count(chart.resolution()) as f32;

        // Keep a valid number of groups
        if intervals < groups.min {
            if handle == Handle::Left {
                from = self.closest_group_start(chart, from as f32 - steps, group_by);
            } else {
                to = self.closest_group_start(chart, to as f32 + steps, group_by);
            }
        } else if intervals > groups.max {
            if handle == Handle::Left {
                from = self.closest_group_start(chart, from as f32 + steps, group_by);
            } else {
                to = self.closest_group_start(chart, to as f32 - steps, group_by);
            }
        }

        Range::new(from as f32, to as f32)
    }

    fn closest_group_start(&self, chart: &Chart, pos: f32, group_by: GroupBy) -> usize {
        let span = self.view.chart_range();
        let exact = span.fit(pos).round() as usize;
        let time = chart.x()[exact];

        let next_start = |direction: i32| {
            let start = group_by.closest_start(time, direction);
            let next = exact as f32 + chart.resolution().distance(time, start);
            span.fit(next).round() as usize
        };
        let (min, max) = (next_start(-1), next_start(1));
        if max == min {
            return min;
        }
        let state = (pos - min as f32) / (max - min) as f32;
        if state < 0.5 { min } else { max }
    }

    pub fn step(&mut self, now: i64) -> bool {
        let mut animating = self.view.advance(now);

        if !self.handle_state.is_finished() {
            self.handle_state.update(now);
            self.handle = Range::interpolate(&self.handle_start, &self.handle_end, self.handle_state.get());
            animating |= !self.handle_state.is_finished();
        }

        self.view.finish_frame(animating);
        animating
    }

    pub fn draw(&mut self, canvas: &skia::Canvas) {
        if !self.view.is_ready() {
            return;
        }
        let content = self.view.content();
        let height = self.view.height() as f32;
        let matrix = *self.view.matrix();
        let span = self.view.chart_range();
        let x_range = self.view.x_range();

        let left = map_x(&matrix, x_range.from).round();
        let right = map_x(&matrix, x_range.to).round();

        canvas.save();
        canvas.clip_rect(skia::Rect::from_ltrb(left, 0.0, right, height), None, None);

        self.view.draw(canvas);

        let style = *self.view.style();
        let frame = style.finder_frame_width;
        let left_pos = map_x(&matrix, self.handle.from).round();
        let right_pos = map_x(&matrix, self.handle.to).round();
        let start = map_x(&matrix, span.from).max(0.0);
        let end = map_x(&matrix, span.to).min(self.view.width() as f32);
        let (top, bottom) = (content.top as f32, content.bottom as f32);

        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);
        paint.set_style(skia::paint::Style::Fill);

        // Dimmed area outside the window
        paint.set_color(style.finder_foreground);
        canvas.draw_rect(skia::Rect::from_ltrb(start, top, left_pos + frame, bottom), &paint);
        canvas.draw_rect(skia::Rect::from_ltrb(right_pos - frame, top, end, bottom), &paint);

        // Handle frame: thick side bars, thin top and bottom borders
        let border = (0.2 * frame).max(1.0);
        paint.set_color(style.finder_frame);
        canvas.draw_rect(skia::Rect::from_ltrb(left_pos, 0.0, left_pos + frame, height), &paint);
        canvas.draw_rect(skia::Rect::from_ltrb(right_pos - frame, 0.0, right_pos, height), &paint);
        canvas.draw_rect(skia::Rect::from_ltrb(left_pos + frame, 0.0, right_pos - frame, border), &paint);
        canvas.draw_rect(skia::Rect::from_ltrb(left_pos + frame, height - border, right_pos - frame, height), &paint);

        canvas.restore();
    }
}
