// File: crates/timechart-core/src/binding.rs
// Summary: Primary chart bound to a finder strip; forwards mutations, drags, stepping and drawing to both.

use std::rc::Rc;
use std::sync::Arc;

use skia_safe as skia;

use crate::axes::LabeledChart;
use crate::error::DataModelError;
use crate::finder::{ChartFinder, FinderConfig};
use crate::host::{Clock, FrameScheduler};
use crate::model::Chart;
use crate::style::ChartStyle;

pub struct FinderBinding {
    primary: LabeledChart,
    finder: ChartFinder,
}

/// Binds `finder` to `primary`; the pair is driven through the returned binding.
pub fn bind_finder(primary: LabeledChart, finder: ChartFinder) -> FinderBinding {
    FinderBinding { primary, finder }
}

impl FinderBinding {
    /// Chart + finder sharing `style`, `clock` and an optional frame scheduler.
    pub fn new(
        style: ChartStyle,
        clock: Rc<dyn Clock>,
        scheduler: Option<Rc<dyn FrameScheduler>>,
        config: FinderConfig,
    ) -> Self {
        let mut primary = LabeledChart::new(style, clock.clone());
        let mut finder = ChartFinder::new(style, clock).with_config(config);
        if let Some(scheduler) = scheduler {
            primary = primary.with_scheduler(scheduler.clone());
            finder = finder.with_scheduler(scheduler);
        }
        bind_finder(primary, finder)
    }

    pub fn primary(&self) -> &LabeledChart {
        &self.primary
    }

    pub fn primary_mut(&mut self) -> &mut LabeledChart {
        &mut self.primary
    }

    pub fn finder(&self) -> &ChartFinder {
        &self.finder
    }

    pub fn finder_mut(&mut self) -> &mut ChartFinder {
        &mut self.finder
    }

    pub fn set_chart(&mut self, chart: impl Into<Arc<Chart>>) -> Result<(), DataModelError> {
        self.finder.set_chart(chart, &mut self.primary)
    }

    /// Sets the primary window and moves the finder handles along.
    pub fn set_range(&mut self, from: f32, to: f32, animate_x: bool, animate_y: bool) {
        self.primary.set_range(from, to, animate_x, animate_y);
        if let Some(pending) = self.primary.view().pending() {
            self.finder.sync_handles(pending.range.from, pending.range.to);
        }
    }

    pub fn set_source_visibility(&mut self, index: usize, visible: bool, animate: bool) {
        self.finder.view_mut().set_source_visibility(index, visible, animate);
        self.primary.set_source_visibility(index, visible, animate);
    }

    pub fn set_sources_visibility(&mut self, visibility: &[bool], animate: bool) {
        self.finder.view_mut().set_sources_visibility(visibility, animate);
        self.primary.set_sources_visibility(visibility, animate);
    }

    pub fn sources_visibility(&self) -> Vec<bool> {
        self.primary.sources_visibility()
    }

    pub fn visible_y_max(&self) -> f32 {
        self.primary.visible_y_max()
    }

    pub fn drag_start(&mut self, x: f32) -> bool {
        self.finder.drag_start(x, &mut self.primary)
    }

    pub fn drag_move(&mut self, x: f32) -> bool {
        self.finder.drag_move(x, &mut self.primary)
    }

    pub fn drag_end(&mut self) {
        self.finder.drag_end(&mut self.primary);
    }

    /// Steps both views; true while either still animates.
    pub fn step(&mut self, now: i64) -> bool {
        let primary = self.primary.step(now);
        let finder = self.finder.step(now);
        primary || finder
    }

    pub fn draw_chart(&mut self, canvas: &skia::Canvas) {
        self.primary.draw(canvas);
    }

    pub fn draw_finder(&mut self, canvas: &skia::Canvas) {
        self.finder.draw(canvas);
    }
}
