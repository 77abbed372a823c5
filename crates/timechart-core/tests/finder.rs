// File: crates/timechart-core/tests/finder.rs
// Purpose: Finder strip driving a primary chart: handle hit-testing, drags, minimum width,
// snapping on release, group constraints and handle sync.

use std::rc::Rc;

use timechart_core::{
    bind_finder, Chart, ChartFinder, ChartStyle, ChartType, Clock, FinderBinding, FinderConfig, GroupBy, Handle,
    LabelCallbacks, LabeledChart, ManualClock, Range, Resolution, Source,
};

const HOUR: i64 = 3_600_000;
const DAY: i64 = 24 * HOUR;
// 2019-01-01T00:00:00Z
const START: i64 = 1_546_300_800_000;

fn daily_chart(n: usize) -> Chart {
    Chart::new(
        "daily",
        ChartType::Lines,
        Resolution::Day,
        (0..n).map(|i| START + i as i64 * DAY).collect(),
        vec![Source::new("A", 0x3cc23f, (0..n as u32).map(|i| (i * 13) % 97).collect())],
    )
    .expect("valid chart")
}

fn hourly_chart(n: usize) -> Chart {
    Chart::new(
        "hourly",
        ChartType::Bars,
        Resolution::Hour,
        (0..n).map(|i| START + i as i64 * HOUR).collect(),
        vec![Source::new("A", 0x64adf0, vec![5; n])],
    )
    .expect("valid chart")
}

fn binding(clock: &ManualClock, config: FinderConfig) -> FinderBinding {
    let clock: Rc<dyn Clock> = Rc::new(clock.clone());
    let callbacks = LabelCallbacks { measure: Some(Box::new(|t: &str| 7.0 * t.len() as f32)), ..Default::default() };

    let mut primary = LabeledChart::new(ChartStyle::day(), clock.clone()).with_callbacks(callbacks);
    primary.set_size(720, 480);
    let mut finder = ChartFinder::new(ChartStyle::day(), clock).with_config(config);
    finder.view_mut().set_size(720, 96);
    bind_finder(primary, finder)
}

/// Finder pixels per chart position for a 100-point chart on a 720 px strip.
const SCALE: f32 = 720.0 / 99.0;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn initial_window_is_the_full_span() {
    let clock = ManualClock::new(0);
    let mut b = binding(&clock, FinderConfig::default());
    b.set_chart(daily_chart(100)).unwrap();
    b.step(0);

    assert_eq!(b.finder().handle_range(), Range::new(0.0, 99.0));
    assert_eq!(b.primary().view().x_range(), Range::new(0.0, 99.0));
    assert_eq!(b.finder().view().x_range(), Range::new(0.0, 99.0));
}

#[test]
fn primary_range_moves_the_handles() {
    let clock = ManualClock::new(0);
    let mut b = binding(&clock, FinderConfig::default());
    b.set_chart(daily_chart(100)).unwrap();
    b.step(0);

    b.set_range(40.0, 20.0, false, false);
    assert_eq!(b.finder().handle_range(), Range::new(20.0, 40.0));
    b.step(10);
    assert_eq!(b.primary().view().x_range(), Range::new(20.0, 40.0));
    // The finder always shows the full span
    assert_eq!(b.finder().view().x_range(), Range::new(0.0, 99.0));
}

#[test]
fn middle_drag_moves_the_whole_window() {
    let clock = ManualClock::new(0);
    let mut b = binding(&clock, FinderConfig::default());
    b.set_chart(daily_chart(100)).unwrap();
    b.step(0);
    b.set_range(20.0, 40.0, false, false);
    b.step(10);

    let mid = 30.0 * SCALE;
    assert!(b.drag_start(mid));
    assert_eq!(b.finder().dragging(), Some(Handle::Both));
    assert!(b.drag_move(mid + 10.0 * SCALE));

    let handle = b.finder().handle_range();
    assert!(approx(handle.from, 30.0) && approx(handle.to, 50.0), "got {handle:?}");

    // X follows the pointer exactly
    b.step(20);
    let x = b.primary().view().x_range();
    assert!(approx(x.from, 30.0) && approx(x.to, 50.0), "got {x:?}");
}

#[test]
fn middle_drag_stops_at_the_chart_edges() {
    let clock = ManualClock::new(0);
    let mut b = binding(&clock, FinderConfig::default());
    b.set_chart(daily_chart(100)).unwrap();
    b.step(0);
    b.set_range(70.0, 90.0, false, false);
    b.step(10);

    assert!(b.drag_start(80.0 * SCALE));
    b.drag_move(80.0 * SCALE + 50.0 * SCALE);
    let handle = b.finder().handle_range();
    assert!(approx(handle.to, 99.0) && approx(handle.from, 79.0), "got {handle:?}");
}

#[test]
fn left_handle_keeps_a_minimum_distance() {
    let clock = ManualClock::new(0);
    let mut b = binding(&clock, FinderConfig::default());
    b.set_chart(daily_chart(100)).unwrap();
    b.step(0);
    b.set_range(20.0, 40.0, false, false);
    b.step(10);

    let left = 20.0 * SCALE;
    assert!(b.drag_start(left + 1.0));
    assert_eq!(b.finder().dragging(), Some(Handle::Left));
    b.drag_move(600.0);

    let min_range = ChartStyle::day().finder_handles_min_distance / SCALE;
    let handle = b.finder().handle_range();
    assert!(approx(handle.to, 40.0));
    assert!(handle.to - handle.from >= min_range - 1e-3, "got {handle:?}");
}

#[test]
fn pointer_outside_the_window_does_not_drag() {
    let clock = ManualClock::new(0);
    let mut b = binding(&clock, FinderConfig::default());
    b.set_chart(daily_chart(100)).unwrap();
    b.step(0);
    b.set_range(20.0, 40.0, false, false);
    b.step(10);

    assert!(!b.drag_start(700.0));
    assert!(!b.drag_move(710.0));
    assert_eq!(b.finder().handle_range(), Range::new(20.0, 40.0));
}

#[test]
fn release_snaps_to_label_positions() {
    let clock = ManualClock::new(0);
    let mut b = binding(&clock, FinderConfig::default());
    b.set_chart(daily_chart(100)).unwrap();
    b.step(0);
    b.set_range(20.0, 40.0, false, false);
    b.step(10);

    assert!(b.drag_start(30.0 * SCALE));
    b.drag_move(30.0 * SCALE + 3.3 * SCALE);
    b.step(20);
    b.drag_end();
    assert_eq!(b.finder().dragging(), None);

    let mut now = 30;
    while b.step(now) {
        now += 10;
        assert!(now < 2_000, "animations must settle");
    }

    let handle = b.finder().handle_range();
    assert_eq!(handle.from.fract(), 0.0, "got {handle:?}");
    assert_eq!(handle.to.fract(), 0.0, "got {handle:?}");
    assert_eq!(b.primary().view().x_range(), handle);
}

#[test]
fn primary_updates_are_ignored_while_dragging() {
    let clock = ManualClock::new(0);
    let mut b = binding(&clock, FinderConfig::default());
    b.set_chart(daily_chart(100)).unwrap();
    b.step(0);
    b.set_range(20.0, 40.0, false, false);
    b.step(10);

    assert!(b.drag_start(30.0 * SCALE));
    b.set_range(0.0, 10.0, false, false);
    assert_eq!(b.finder().handle_range(), Range::new(20.0, 40.0));
}

#[test]
fn grouped_window_starts_at_the_data_end() {
    let clock = ManualClock::new(0);
    let config = FinderConfig::groups(GroupBy::Day, 1, 3, 2, true);
    let mut b = binding(&clock, config);
    b.set_chart(hourly_chart(24 * 7)).unwrap();
    b.step(0);

    // Two days back from the last hour, snapped to midnight
    assert_eq!(b.finder().handle_range(), Range::new(120.0, 167.0));
    assert_eq!(b.primary().view().x_range(), Range::new(120.0, 167.0));
}

#[test]
fn grouped_window_honours_an_initial_date() {
    let clock = ManualClock::new(0);
    let config = FinderConfig::groups(GroupBy::Day, 1, 3, 1, false).with_initial_date(START + 2 * DAY);
    let mut b = binding(&clock, config);
    b.set_chart(hourly_chart(24 * 7)).unwrap();
    b.step(0);

    assert_eq!(b.finder().handle_range(), Range::new(48.0, 72.0));
}

#[test]
fn pie_chart_gets_an_area_overview() {
    let clock = ManualClock::new(0);
    let mut b = binding(&clock, FinderConfig::default());
    let pie = daily_chart(10).with_type(ChartType::Pie);
    b.set_chart(pie).unwrap();
    b.step(0);

    let overview = b.finder().view().chart().map(|c| c.chart_type());
    assert_eq!(overview, Some(ChartType::AreaSquare));
    // Trailing point: every value has its own interval
    assert_eq!(b.primary().view().chart().map(|c| c.len()), Some(11));
    assert_eq!(b.finder().handle_range(), Range::new(0.0, 10.0));
}

#[test]
fn visibility_reaches_both_views() {
    let clock = ManualClock::new(0);
    let mut b = binding(&clock, FinderConfig::default());
    let chart = Chart::new(
        "two",
        ChartType::Lines,
        Resolution::Day,
        (0..10).map(|i| START + i * DAY).collect(),
        vec![Source::new("A", 1, vec![10; 10]), Source::new("B", 2, vec![90; 10])],
    )
    .unwrap();
    b.set_chart(chart).unwrap();
    b.step(0);

    b.set_source_visibility(1, false, false);
    b.step(10);
    assert_eq!(b.sources_visibility(), vec![true, false]);
    assert_eq!(b.finder().view().sources_visibility(), vec![true, false]);
    assert_eq!(b.finder().view().visible_y_max(), 11.0);
}
