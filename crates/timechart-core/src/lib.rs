// File: crates/timechart-core/src/lib.rs
// Summary: Core library entry point; exports the animated chart engine, finder strip and headless rendering.

pub mod animation;
pub mod axes;
pub mod binding;
pub mod error;
pub mod finder;
pub mod format;
pub mod geometry;
pub mod grid;
pub mod host;
pub mod labels;
pub mod model;
pub mod painter;
pub mod render;
pub mod style;
pub mod text;
pub mod time;
pub mod types;
pub mod view;

pub use animation::{AnimatedState, ANIMATION_DURATION_MS, FRAME_INTERVAL};
pub use axes::LabeledChart;
pub use binding::{bind_finder, FinderBinding};
pub use error::DataModelError;
pub use finder::{ChartFinder, FinderConfig, GroupConfig, Handle};
pub use geometry::{Range, RectI32};
pub use host::{Clock, FrameScheduler, LabelCallbacks, ManualClock, MonotonicClock, NoopScheduler};
pub use labels::LabelsHelper;
pub use model::{Chart, ChartType, Source};
pub use painter::Painter;
pub use render::{render_to_png, render_to_png_bytes, render_to_rgba8, RenderOptions};
pub use style::ChartStyle;
pub use time::{GroupBy, Resolution};
pub use types::Insets;
pub use view::ChartView;
