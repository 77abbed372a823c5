// File: crates/timechart-core/tests/labels.rs
// Purpose: X label levels (edge invariant, density) and window snapping; default formatters.

use proptest::prelude::*;
use timechart_core::format::{format_compact, format_date_short, format_number};
use timechart_core::{LabelsHelper, Range};

#[test]
fn levels_for_a_small_chart() {
    let helper = LabelsHelper::with_max_intervals(4.0);
    let levels = helper.evenly_distributed_levels(9);
    assert_eq!(levels, vec![2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
}

#[test]
fn level_grows_with_window_size() {
    let helper = LabelsHelper::with_max_intervals(5.0);
    assert_eq!(helper.compute_level(11.0), 2.0);
    assert!(helper.compute_level(51.0) > helper.compute_level(11.0));
}

#[test]
fn init_never_goes_below_two_intervals() {
    let mut helper = LabelsHelper::default();
    helper.init(50.0, 40.0, 10.0);
    assert_eq!(helper.max_intervals(), 2.0);

    helper.init(720.0, 40.0, 10.0);
    assert!((helper.max_intervals() - 13.6).abs() < 1e-4);
}

#[test]
fn snap_rounds_to_label_positions() {
    let helper = LabelsHelper::with_max_intervals(4.0);
    let levels = helper.evenly_distributed_levels(9);

    assert_eq!(helper.snap(&levels, Range::new(0.6, 7.4)), Range::new(0.0, 8.0));
    assert_eq!(helper.snap(&levels, Range::new(1.2, 5.9)), Range::new(2.0, 6.0));
}

#[test]
fn snap_keeps_a_non_empty_window() {
    let helper = LabelsHelper::with_max_intervals(4.0);
    let levels = helper.evenly_distributed_levels(9);
    let snapped = helper.snap(&levels, Range::new(3.9, 4.1));
    assert!(snapped.is_valid(), "got {snapped:?}");
}

#[test]
fn default_formatters() {
    assert_eq!(format_number(1_234_567), "1 234 567");
    assert_eq!(format_number(-999), "-999");
    assert_eq!(format_compact(15_000, 20_000), "15K");
    assert_eq!(format_compact(2_500_000, 3_000_000), "2.5M");
    assert_eq!(format_compact(0, 3_000_000), "0");
    // 2019-01-01T00:00:00Z
    assert_eq!(format_date_short(1_546_300_800_000), "Jan 1");
}

proptest! {
    #[test]
    fn edges_carry_the_maximal_level(size in 2usize..2_000, max_intervals in 2f32..20.0) {
        let helper = LabelsHelper::with_max_intervals(max_intervals);
        let levels = helper.evenly_distributed_levels(size);
        prop_assert_eq!(levels.len(), size);

        let first = levels[0];
        let last = levels[size - 1];
        prop_assert_eq!(first, last);
        prop_assert!(levels.iter().all(|&l| l <= first && l >= 1.0));
    }

    #[test]
    fn snapped_windows_stay_inside_the_chart(size in 2usize..500, a in 0f32..1.0, b in 0f32..1.0) {
        let helper = LabelsHelper::with_max_intervals(6.0);
        let levels = helper.evenly_distributed_levels(size);
        let last = (size - 1) as f32;
        let range = Range::new(a.min(b) * last, a.max(b) * last);

        let snapped = helper.snap(&levels, range);
        prop_assert!(snapped.from >= 0.0 && snapped.to <= last);
        prop_assert!(snapped.to > snapped.from);
        prop_assert_eq!(snapped.from.fract(), 0.0);
    }
}
