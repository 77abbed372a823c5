// File: crates/timechart-core/tests/painters.rs
// Purpose: Per-chart-type aggregation: Y ranges, stacked area shares, pie percentages and wedge picking.

use std::rc::Rc;
use std::sync::Arc;

use proptest::prelude::*;
use timechart_core::painter::{independent_scales, stacked_values, BarsPainter, LinesPainter, PiePainter};
use timechart_core::{
    Chart, ChartStyle, ChartType, ChartView, ManualClock, Painter, Range, RectI32, Resolution, Source,
};

const DAY: i64 = 86_400_000;
const START: i64 = 1_546_300_800_000;

fn chart(chart_type: ChartType, sources: Vec<Vec<u32>>) -> Arc<Chart> {
    let len = sources.first().map_or(2, Vec::len);
    let x = (0..len).map(|i| START + i as i64 * DAY).collect();
    let sources = sources
        .into_iter()
        .enumerate()
        .map(|(s, y)| Source::new(format!("S{s}"), 0x3497ed + s as u32, y))
        .collect();
    Arc::new(Chart::new("test", chart_type, Resolution::Day, x, sources).expect("valid chart"))
}

fn sum(values: &[f32]) -> f32 {
    values.iter().sum()
}

#[test]
fn lines_range_covers_visible_sources_only() {
    let data = chart(ChartType::Lines, vec![vec![5, 9, 3, 7], vec![50, 60, 40, 45]]);
    let painter = LinesPainter::new(data, &ChartStyle::day(), false);

    assert_eq!(painter.calculate_y_range(0, 3, &[true, true]), Range::new(3.0, 60.0));
    assert_eq!(painter.calculate_y_range(1, 2, &[true, false]), Range::new(3.0, 9.0));
    assert_eq!(painter.calculate_y_range(0, 3, &[false, false]), Range::new(0.0, 1.0));
}

#[test]
fn independent_scales_align_magnitudes() {
    let data = chart(ChartType::LinesIndependentScale, vec![vec![100, 1_000], vec![3, 12], vec![0, 0]]);
    assert_eq!(independent_scales(&data), vec![1.0, 10.0, 1.0]);

    let painter = Painter::new(data, &ChartStyle::day());
    assert_eq!(painter.sources_scales(), Some(&[1.0, 10.0, 1.0][..]));
}

#[test]
fn bars_range_is_the_largest_visible_sum() {
    let data = chart(ChartType::Bars, vec![vec![1, 4, 2], vec![3, 1, 8], vec![0, 0, 0]]);
    let painter = BarsPainter::new(data, &ChartStyle::day());

    assert_eq!(painter.calculate_y_range(0, 2, &[true, true, true]), Range::new(0.0, 10.0));
    assert_eq!(painter.calculate_y_range(0, 1, &[true, true, true]), Range::new(0.0, 5.0));
    assert_eq!(painter.calculate_y_range(0, 2, &[false, false, true]), Range::new(0.0, 1.0));
}

#[test]
fn area_uses_a_fixed_exact_range() {
    let data = chart(ChartType::Area, vec![vec![1, 2, 3], vec![3, 2, 1]]);
    let mut painter = Painter::new(data, &ChartStyle::day());
    assert!(painter.use_exact_range());
    assert_eq!(painter.calculate_y_range(0, 2, &[true, false], false, 0), Range::new(0.0, 100.0));
}

#[test]
fn area_shares_sum_to_one_hundred() {
    let data = chart(ChartType::Area, vec![vec![1, 0, 30], vec![3, 0, 10], vec![6, 0, 60]]);

    let values = stacked_values(&data, 0, &[1.0, 1.0, 1.0]);
    assert!((sum(&values) - 100.0).abs() < 1e-3);
    assert!((values[2] - 60.0).abs() < 1e-3);

    let values = stacked_values(&data, 2, &[1.0, 0.0, 1.0]);
    assert!((sum(&values) - 100.0).abs() < 1e-3);
    assert_eq!(values[1], 0.0);

    // Every visible value is zero
    assert_eq!(stacked_values(&data, 1, &[1.0, 1.0, 1.0]), vec![0.0; 3]);
    assert_eq!(stacked_values(&data, 0, &[0.0, 0.0, 0.0]), vec![0.0; 3]);
}

#[test]
fn pie_percentages_sum_to_one_hundred_or_zero() {
    let data = chart(ChartType::Pie, vec![vec![10, 10, 99], vec![30, 30, 0], vec![60, 60, 0]]);
    let mut pie = PiePainter::new(data, &ChartStyle::day());

    // Half-open window: the last position is not summed
    pie.calculate_y_range(0, 2, &[true, true, true], false, 0);
    let percents = pie.percentages();
    assert!((sum(&percents) - 100.0).abs() < 1e-3);
    assert!((percents[0] - 10.0).abs() < 1e-3);

    pie.calculate_y_range(0, 2, &[false, false, false], false, 0);
    assert_eq!(pie.percentages(), vec![0.0; 3]);
}

#[test]
fn pie_view_counts_the_last_value() {
    let data = chart(ChartType::Pie, vec![vec![0, 0, 100], vec![100, 0, 0]]);
    let mut view = ChartView::new(ChartStyle::day(), Rc::new(ManualClock::new(0)));
    view.set_size(400, 400);
    view.set_chart(data).unwrap();
    view.step(0);

    assert_eq!(view.chart().map(|c| c.len()), Some(4));
    let Some(Painter::Pie(pie)) = view.painter() else { panic!("pie painter expected") };
    let percents = pie.percentages();
    assert!((percents[0] - 50.0).abs() < 1e-3, "got {percents:?}");
    assert!((percents[1] - 50.0).abs() < 1e-3, "got {percents:?}");
}

#[test]
fn pie_percentages_animate_monotonically() {
    let data = chart(ChartType::Pie, vec![vec![10, 10], vec![30, 30], vec![60, 60]]);
    let mut pie = PiePainter::new(data, &ChartStyle::day());
    pie.calculate_y_range(0, 1, &[true, true, true], true, 0);
    assert!(!pie.is_animating(), "first computation jumps");

    pie.calculate_y_range(0, 1, &[true, true, false], true, 1_000);
    assert!(pie.is_animating());

    let mut prev = pie.percentages();
    for now in (1_000..=1_300).step_by(10) {
        pie.update(now);
        let next = pie.percentages();
        assert!(next[2] <= prev[2] + 1e-4, "hidden share shrinks");
        assert!(next[0] >= prev[0] - 1e-4, "remaining shares grow");
        assert!((sum(&next) - 100.0).abs() < 1e-2);
        prev = next;
    }
    assert!(!pie.is_animating());
    assert!((prev[0] - 25.0).abs() < 1e-3 && (prev[1] - 75.0).abs() < 1e-3);
}

#[test]
fn pie_picks_wedges_by_angle_and_radius() {
    let data = chart(ChartType::Pie, vec![vec![1, 1], vec![1, 1]]);
    let mut pie = PiePainter::new(data, &ChartStyle::day());
    pie.calculate_y_range(0, 1, &[true, true], false, 0);

    let content = RectI32::from_ltwh(0, 0, 200, 200);
    // First wedge starts at 12 o'clock and runs clockwise
    assert_eq!(pie.pick_source(&content, 150.0, 100.0), Some(0));
    assert_eq!(pie.pick_source(&content, 50.0, 100.0), Some(1));
    assert_eq!(pie.pick_source(&content, 199.0, 199.0), None, "outside the circle");

    pie.set_selected_source(Some(1), 0);
    assert_eq!(pie.selected_source(), Some(1));
    assert!(pie.is_animating());
    pie.update(300);
    assert!(!pie.is_animating());
}

#[test]
fn capabilities_by_chart_type() {
    let style = ChartStyle::day();
    let lines = Painter::new(chart(ChartType::Lines, vec![vec![1, 2]]), &style);
    let pie = Painter::new(chart(ChartType::Pie, vec![vec![1, 2]]), &style);

    assert!(lines.allow_x_selection() && !lines.use_exact_range());
    assert!(!pie.allow_x_selection() && pie.use_exact_range());
    assert_eq!(lines.sources_scales(), None);
}

proptest! {
    #[test]
    fn stacked_shares_always_total_one_hundred(
        values in prop::collection::vec(1u32..1_000_000, 4),
        hidden in prop::collection::vec(prop::bool::ANY, 4),
    ) {
        prop_assume!(hidden.iter().any(|h| !h));
        let data = chart(ChartType::Area, values.iter().map(|&v| vec![v, v / 2 + 1]).collect());
        let states: Vec<f32> = hidden.iter().map(|&h| if h { 0.0 } else { 1.0 }).collect();

        for index in 0..2 {
            let shares = stacked_values(&data, index, &states);
            prop_assert!((sum(&shares) - 100.0).abs() < 1e-2, "sum {}", sum(&shares));
        }
    }
}
