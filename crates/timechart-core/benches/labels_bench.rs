use criterion::{black_box, criterion_group, criterion_main, Criterion};
use timechart_core::{Chart, ChartType, GroupBy, LabelsHelper, Range, Resolution, Source};

const HOUR: i64 = 3_600_000;
const START: i64 = 1_546_300_800_000;

fn hourly_chart(n: usize) -> Chart {
    let x = (0..n).map(|i| START + i as i64 * HOUR).collect();
    let y = (0..n as u32).map(|i| (i * 31) % 1_000).collect();
    Chart::new("bench", ChartType::Lines, Resolution::Hour, x, vec![Source::new("A", 0x3cc23f, y)])
        .expect("valid chart")
}

fn bench_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("label_levels");
    for &n in &[1_000usize, 100_000usize] {
        group.bench_function(format!("even_{n}"), |b| {
            let helper = LabelsHelper::with_max_intervals(12.0);
            b.iter(|| black_box(helper.evenly_distributed_levels(black_box(n))));
        });

        group.bench_function(format!("grouped_day_{n}"), |b| {
            let chart = hourly_chart(n);
            let mut helper = LabelsHelper::default();
            helper.init(720.0, 42.0, 10.0);
            helper.set_group_by(Some(GroupBy::Day));
            b.iter(|| black_box(helper.compute_levels(&chart)));
        });
    }
    group.finish();
}

fn bench_snap(c: &mut Criterion) {
    let helper = LabelsHelper::with_max_intervals(12.0);
    let levels = helper.evenly_distributed_levels(10_000);
    c.bench_function("snap_10k", |b| {
        b.iter(|| black_box(helper.snap(&levels, black_box(Range::new(1_234.4, 5_678.6)))));
    });
}

criterion_group!(benches, bench_levels, bench_snap);
criterion_main!(benches);
