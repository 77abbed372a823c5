// File: crates/timechart-core/src/labels.rs
// Summary: X-label density levels: which positions show a label at which zoom level.
// Notes:
// - A position with `level >= current_level` is shown; `current_level` grows
//   with the visible window size, so coarser zooms show fewer labels.
// - Evenly distributed levels always give the first and last positions the
//   same, maximal level so both edges stay labelled together.

use crate::geometry::Range;
use crate::model::Chart;
use crate::time::GroupBy;

/// Minimum number of intervals assumed to fit on screen (3 labels).
const MIN_INTERVALS: f32 = 2.0;

#[derive(Clone, Debug)]
pub struct LabelsHelper {
    max_intervals: f32,
    chart_width: f32,
    label_width: f32,
    padding: f32,
    group_by: Option<GroupBy>,
}

impl Default for LabelsHelper {
    fn default() -> Self {
        Self {
            max_intervals: MIN_INTERVALS,
            chart_width: 0.0,
            label_width: 0.0,
            padding: 0.0,
            group_by: None,
        }
    }
}

impl LabelsHelper {
    /// Helper for a known maximum interval count (M), bypassing width metrics.
    pub fn with_max_intervals(max_intervals: f32) -> Self {
        Self { max_intervals: max_intervals.max(MIN_INTERVALS), ..Self::default() }
    }

    /// Derives the maximum number of label intervals fitting into `width`.
    pub fn init(&mut self, width: f32, label_width: f32, padding: f32) {
        self.chart_width = width;
        self.label_width = label_width;
        self.padding = padding;

        let fit = (width - label_width) / (label_width + padding);
        self.max_intervals = if fit.is_finite() { fit.max(MIN_INTERVALS) } else { MIN_INTERVALS };
    }

    pub fn set_group_by(&mut self, group_by: Option<GroupBy>) {
        self.group_by = group_by;
    }

    pub fn max_intervals(&self) -> f32 {
        self.max_intervals
    }

    /// Display threshold for a window spanning `size` positions.
    pub fn compute_level(&self, size: f32) -> f32 {
        if self.max_intervals == 0.0 { 1.0 } else { (size - 1.0) / self.max_intervals }
    }

    /// Levels for every x position of `chart`.
    pub fn compute_levels(&self, chart: &Chart) -> Vec<f32> {
        match self.group_by {
            Some(group_by) => self
                .grouped_levels(chart, group_by)
                .unwrap_or_else(|| self.evenly_distributed_levels(chart.len())),
            None => self.evenly_distributed_levels(chart.len()),
        }
    }

    /// Splits `size` positions into whole intervals fitting one screen, gives every
    /// interval boundary the interval length as level and fills the interiors by
    /// recursive halving.
    pub fn evenly_distributed_levels(&self, size: usize) -> Vec<f32> {
        if size < 2 {
            return vec![1.0; size];
        }
        let mut levels = vec![0.0; size];

        let intervals = self.fit_intervals(size);
        let steps = (size - 1) / intervals;
        // Trailing intervals take one extra step each to span the whole size
        let with_extra = (size - 1) % intervals;

        let mut prev: Option<usize> = None;
        for i in 0..=intervals {
            let pos = i * steps + (with_extra + i).saturating_sub(intervals);
            levels[pos] = steps as f32;

            if let Some(prev) = prev {
                fill_levels_in_halves(&mut levels, steps as f32, prev, pos);
            }
            prev = Some(pos);
        }

        levels
    }

    /// Rounds a fractional window to the nearest positions whose level is at or
    /// above the window's current level. Edges always qualify.
    pub fn snap(&self, levels: &[f32], range: Range) -> Range {
        let n = levels.len();
        if n < 2 {
            return range;
        }
        let level = self.compute_level(range.size());
        let is_anchor = |i: usize| i == 0 || i == n - 1 || levels[i] >= level;

        let mut from = nearest_anchor(n, range.from, &is_anchor);
        let mut to = nearest_anchor(n, range.to, &is_anchor);

        if to <= from {
            match (from + 1..n).find(|&i| is_anchor(i)) {
                Some(next) => to = next,
                None => from = (0..to).rev().find(|&i| is_anchor(i)).unwrap_or(0),
            }
        }

        Range::new(from as f32, to as f32)
    }

    // Number of whole intervals fitting into a single screen
    fn fit_intervals(&self, size: usize) -> usize {
        let span = (size - 1) as f32;
        let steps = (span / self.max_intervals).ceil().max(1.0);
        ((span / steps).floor() as usize).max(1)
    }

    /// Group starts get evenly distributed levels (scaled to the width needed to
    /// show every group label), positions inside a group get halving levels.
    /// Returns `None` when the chart does not span a whole group.
    fn grouped_levels(&self, chart: &Chart, group_by: GroupBy) -> Option<Vec<f32>> {
        let size = chart.len();
        let x = chart.x();
        let resolution = chart.resolution();
        let from_date = x[0];
        let to_date = x[size - 1];

        if to_date < group_by.add(from_date, 1) {
            return None;
        }

        // Extending the range to whole groups, starting and ending at group starts
        let from_ext = group_by.closest_start(group_by.add(from_date, -1), 1);
        let to_ext = group_by.closest_start(group_by.add(to_date, 1), -1);
        let size_ext = resolution.distance(from_ext, to_ext).round() as usize + 1;

        let starts: Vec<usize> = (0..size_ext)
            .filter(|&i| group_by.is_start(resolution.add(from_ext, i as i64)))
            .collect();

        // Extra starts on both ends are not part of the chart
        let groups_ext = starts.len();
        if groups_ext < 3 {
            return None;
        }
        let groups_levels = self.evenly_distributed_levels(groups_ext - 2);

        let mut groups_levels_ext = vec![1.0; groups_ext];
        groups_levels_ext[1..groups_ext - 1].copy_from_slice(&groups_levels);

        // Level at which every group label fits at minimal spacing
        let groups_count = group_by.distance(from_date, to_date);
        let baseline_width = groups_count * (self.label_width + self.padding) + self.label_width;
        let multiplier = if baseline_width > 0.0 {
            self.compute_level(size as f32) * self.chart_width / baseline_width
        } else {
            1.0
        };

        let mut levels_ext = vec![0.0; size_ext];
        for (i, &pos) in starts.iter().enumerate() {
            // Levels are assigned right to left
            let shifted = (groups_ext - 1 - i) % groups_ext;
            levels_ext[pos] = groups_levels_ext[shifted] * multiplier;

            if i != 0 {
                let prev = starts[i - 1];
                let level = levels_ext[prev].min(levels_ext[pos]);
                fill_levels_in_halves(&mut levels_ext, level, prev, pos);
            }
        }

        let offset = resolution.distance(from_ext, from_date).round() as usize;
        levels_ext.get(offset..offset + size).map(<[f32]>::to_vec)
    }
}

fn fill_levels_in_halves(levels: &mut [f32], prev_level: f32, from: usize, to: usize) {
    let level = 0.5 * prev_level;

    if to - from <= 3 || level <= 1.0 {
        for l in &mut levels[from + 1..to] {
            *l = 1.0;
        }
    } else {
        let mid = (from + to) / 2;
        levels[mid] = level;
        fill_levels_in_halves(levels, level, from, mid);
        fill_levels_in_halves(levels, level, mid, to);
    }
}

fn nearest_anchor(n: usize, pos: f32, is_anchor: &impl Fn(usize) -> bool) -> usize {
    let pos = pos.clamp(0.0, (n - 1) as f32);
    let left = (0..=pos.floor() as usize).rev().find(|&i| is_anchor(i)).unwrap_or(0);
    let right = (pos.ceil() as usize..n).find(|&i| is_anchor(i)).unwrap_or(n - 1);
    if pos - left as f32 <= right as f32 - pos { left } else { right }
}
