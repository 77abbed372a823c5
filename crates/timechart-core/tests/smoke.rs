// File: crates/timechart-core/tests/smoke.rs
// Purpose: End-to-end render smoke tests: every chart type with labels and finder, to PNG and RGBA.

use std::rc::Rc;

use timechart_core::style;
use timechart_core::types::FINDER_HEIGHT;
use timechart_core::{
    render_to_png, render_to_png_bytes, render_to_rgba8, Chart, ChartStyle, ChartType, FinderBinding, FinderConfig,
    ManualClock, RenderOptions, Resolution, Source,
};

const DAY: i64 = 86_400_000;
const START: i64 = 1_546_300_800_000;

fn sample_chart(chart_type: ChartType) -> Chart {
    let n = 60usize;
    let x = (0..n).map(|i| START + i as i64 * DAY).collect();
    let sources = vec![
        Source::new("Joined", 0x3cc23f, (0..n as u32).map(|i| 40 + (i * 17) % 60).collect()),
        Source::new("Left", 0xed685f, (0..n as u32).map(|i| 20 + (i * 11) % 35).collect()),
        Source::new("Idle", 0x64adf0, (0..n as u32).map(|i| 5 + (i * 5) % 20).collect()),
    ];
    Chart::new(format!("{chart_type:?}"), chart_type, Resolution::Day, x, sources).expect("valid chart")
}

fn settled(style: ChartStyle, chart_type: ChartType) -> FinderBinding {
    let clock = ManualClock::new(0);
    let mut binding = FinderBinding::new(style, Rc::new(clock), None, FinderConfig::default());
    binding.primary_mut().set_size(720, 480);
    binding.finder_mut().view_mut().set_size(720, FINDER_HEIGHT);
    binding.set_chart(sample_chart(chart_type)).expect("set chart");
    binding.set_range(20.0, 45.0, false, false);
    binding.step(0);
    binding
}

const ALL_TYPES: [ChartType; 6] = [
    ChartType::Lines,
    ChartType::LinesIndependentScale,
    ChartType::Bars,
    ChartType::Area,
    ChartType::AreaSquare,
    ChartType::Pie,
];

#[test]
fn render_every_chart_type_to_png() {
    let opts = RenderOptions::default();
    for chart_type in ALL_TYPES {
        let mut binding = settled(ChartStyle::day(), chart_type);
        binding.primary_mut().view_mut().set_selected_x(360.0);

        let bytes = render_to_png_bytes(&opts, |canvas| binding.draw_chart(canvas)).expect("render chart");
        assert!(bytes.starts_with(&[137, 80, 78, 71]), "{chart_type:?}: should be PNG header");

        let finder_opts = RenderOptions { height: FINDER_HEIGHT, ..RenderOptions::default() };
        let bytes = render_to_png_bytes(&finder_opts, |canvas| binding.draw_finder(canvas)).expect("render finder");
        assert!(bytes.starts_with(&[137, 80, 78, 71]), "{chart_type:?}: finder should be PNG");
    }
}

#[test]
fn render_night_style_to_file() {
    let style = ChartStyle::night();
    let mut binding = settled(style, ChartType::Bars);
    let out = std::path::PathBuf::from("target/test_out/night_bars.png");

    render_to_png(&RenderOptions::new(720, 480, &style), &out, |canvas| binding.draw_chart(canvas))
        .expect("render should succeed");
    let meta = std::fs::metadata(&out).expect("output exists");
    assert!(meta.len() > 0, "png should be non-empty");
}

#[test]
fn render_mid_animation_in_simplified_mode() {
    let mut binding = settled(ChartStyle::day(), ChartType::Area);
    binding.set_source_visibility(0, false, true);
    binding.step(100);
    assert!(binding.primary().view().is_animating());

    let bytes = render_to_png_bytes(&RenderOptions::default(), |canvas| binding.draw_chart(canvas)).expect("render");
    assert!(bytes.starts_with(&[137, 80, 78, 71]));
}

#[test]
fn rgba_buffer_has_background_and_ink() {
    let style = ChartStyle::day();
    let mut binding = settled(style, ChartType::Bars);
    let (pixels, width, height, stride) =
        render_to_rgba8(&RenderOptions::default(), |canvas| binding.draw_chart(canvas)).expect("render rgba");

    assert_eq!((width, height), (720, 480));
    assert_eq!(stride, 720 * 4);
    assert_eq!(pixels.len(), stride * height as usize);

    let bg = style.background;
    let background = [bg.r(), bg.g(), bg.b(), bg.a()];
    let inked = pixels.chunks_exact(4).filter(|px| *px != background).count();
    assert!(inked > 1_000, "bars should cover part of the surface, got {inked} pixels");
}

#[test]
fn unsized_chart_draws_nothing() {
    let clock = ManualClock::new(0);
    let mut binding = FinderBinding::new(ChartStyle::day(), Rc::new(clock), None, FinderConfig::default());
    binding.set_chart(sample_chart(ChartType::Lines)).expect("set chart");
    assert!(!binding.step(0));

    let (pixels, ..) =
        render_to_rgba8(&RenderOptions::default(), |canvas| binding.draw_chart(canvas)).expect("render rgba");
    assert!(pixels.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn style_lookup_falls_back_to_day() {
    let names: Vec<_> = style::presets().iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["day", "night"]);
    assert_eq!(style::find("NIGHT").name, "night");
    assert_eq!(style::find("sepia").name, "day");
}

#[test]
fn extra_transform_moves_the_drawing() {
    let style = ChartStyle::day();
    let mut binding = settled(style, ChartType::Bars);
    let (plain, ..) = render_to_rgba8(&RenderOptions::default(), |canvas| binding.draw_chart(canvas)).expect("render");

    let shifted = skia_safe::Matrix::translate((0.0, 200.0));
    binding.primary_mut().view_mut().set_extra_transform(Some(shifted));
    binding.step(10);
    let (moved, ..) = render_to_rgba8(&RenderOptions::default(), |canvas| binding.draw_chart(canvas)).expect("render");
    assert_ne!(plain, moved);
}
