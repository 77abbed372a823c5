// File: crates/timechart-core/tests/snapshot.rs
// Purpose: Golden snapshot harness with bless flow.
// Behavior:
// - Renders deterministic charts (no text, to avoid font variance across platforms).
// - If env UPDATE_SNAPSHOTS=1, (re)writes the snapshot files.
// - Else, if a snapshot exists, compares decoded pixels for an exact match.
// - Else, logs a note and skips without failing to ease the first run.

use std::path::PathBuf;
use std::rc::Rc;

use timechart_core::{
    render_to_png_bytes, Chart, ChartStyle, ChartType, ChartView, ManualClock, RenderOptions, Resolution, Source,
};

const DAY: i64 = 86_400_000;
const START: i64 = 1_546_300_800_000;

fn render_bytes(chart_type: ChartType, selected_x: Option<f32>) -> Vec<u8> {
    let x = (0..12).map(|i| START + i * DAY).collect();
    let sources = vec![
        Source::new("A", 0x3cc23f, vec![3, 5, 4, 8, 6, 9, 7, 10, 8, 12, 9, 11]),
        Source::new("B", 0xed685f, vec![6, 4, 5, 3, 4, 2, 5, 3, 6, 4, 5, 3]),
    ];
    let chart = Chart::new("golden", chart_type, Resolution::Day, x, sources).expect("valid chart");

    let clock = ManualClock::new(0);
    let mut view = ChartView::new(ChartStyle::day(), Rc::new(clock));
    view.set_size(320, 200);
    view.set_chart(chart).expect("set chart");
    view.step(0);
    if let Some(x) = selected_x {
        view.set_selected_x(x);
    }

    let opts = RenderOptions { width: 320, height: 200, ..RenderOptions::default() };
    render_to_png_bytes(&opts, |canvas| view.draw(canvas)).expect("render")
}

fn check_snapshot(name: &str, bytes: &[u8]) {
    let snap_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__");
    let snap_path = snap_dir.join(name);

    let update = std::env::var("UPDATE_SNAPSHOTS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if update {
        std::fs::create_dir_all(&snap_dir).expect("create snapshots dir");
        std::fs::write(&snap_path, bytes).expect("write snapshot");
        eprintln!("[snapshot] Updated {} ({} bytes)", snap_path.display(), bytes.len());
        return;
    }

    if snap_path.exists() {
        let want = std::fs::read(&snap_path).expect("read snapshot");
        // Compare decoded pixel buffers to avoid PNG encoder variance
        let got_img = image::load_from_memory(bytes).expect("decode got").to_rgba8();
        let want_img = image::load_from_memory(&want).expect("decode want").to_rgba8();
        assert_eq!(got_img.dimensions(), want_img.dimensions());
        assert_eq!(
            got_img.as_raw(),
            want_img.as_raw(),
            "rendered pixels differ from golden snapshot: {}",
            snap_path.display()
        );
    } else {
        eprintln!("[snapshot] Missing snapshot {}; set UPDATE_SNAPSHOTS=1 to bless.", snap_path.display());
    }
}

#[test]
fn golden_lines_with_selection() {
    let bytes = render_bytes(ChartType::Lines, Some(160.0));
    check_snapshot("lines_selected.png", &bytes);
}

#[test]
fn golden_stacked_bars() {
    let bytes = render_bytes(ChartType::Bars, None);
    check_snapshot("bars.png", &bytes);
}

#[test]
fn golden_stacked_area() {
    let bytes = render_bytes(ChartType::Area, None);
    check_snapshot("area.png", &bytes);
}

#[test]
fn rendering_is_deterministic() {
    let first = render_bytes(ChartType::Area, Some(100.0));
    let second = render_bytes(ChartType::Area, Some(100.0));
    let a = image::load_from_memory(&first).expect("decode").to_rgba8();
    let b = image::load_from_memory(&second).expect("decode").to_rgba8();
    assert_eq!(a.as_raw(), b.as_raw());
}
