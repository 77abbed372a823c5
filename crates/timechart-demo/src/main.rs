// File: crates/timechart-demo/src/main.rs
// Summary: Demo loads a time-series CSV (date + one column per source), binds a chart to a finder
//          and writes PNG frames of a scripted session driven by a manual clock.
// Notes:
// - Usage: timechart-demo [CSV] [lines|lines-independent|bars|area|area-square|pie] [day|night]
// - Frames land in target/out/<csv stem>/frame_NNNN.png (chart on top, finder below).

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use timechart_core::format::{format_date_short, format_time};
use timechart_core::geometry::map_x;
use timechart_core::style;
use timechart_core::types::{FINDER_HEIGHT, HEIGHT, WIDTH};
use timechart_core::{
    bind_finder, render_to_png, Chart, ChartFinder, ChartType, Clock, FinderBinding, FrameScheduler, LabelCallbacks,
    LabeledChart, ManualClock, NoopScheduler, RenderOptions, Resolution, Source, FRAME_INTERVAL,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const PALETTE: [u32; 6] = [0x3cc23f, 0xed685f, 0x64adf0, 0xf5bd25, 0x9b59d0, 0x36a2a6];

/// Upper bound on frames stepped while waiting for animations to settle.
const MAX_SETTLE_FRAMES: usize = 200;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().map(PathBuf::from).unwrap_or_else(default_input);
    let chart_type = match args.next() {
        Some(name) => parse_chart_type(&name)?,
        None => ChartType::Lines,
    };
    let style = style::find(&args.next().unwrap_or_else(|| "day".to_string()));

    if !path.exists() {
        bail!("file not found: {}", path.display());
    }
    let chart = load_chart_csv(&path, chart_type).with_context(|| format!("failed to load CSV '{}'", path.display()))?;
    info!(points = chart.len(), sources = chart.source_count(), ?chart_type, style = style.name, "chart loaded");

    let clock = ManualClock::new(0);
    let shared: Rc<dyn Clock> = Rc::new(clock.clone());
    let scheduler: Rc<dyn FrameScheduler> = Rc::new(NoopScheduler);

    let mut primary = LabeledChart::new(style, shared.clone())
        .with_scheduler(scheduler.clone())
        .with_callbacks(label_callbacks(chart.resolution()));
    primary.set_size(WIDTH, HEIGHT);
    let mut finder = ChartFinder::new(style, shared).with_scheduler(scheduler);
    finder.view_mut().set_size(WIDTH, FINDER_HEIGHT);
    let mut binding = bind_finder(primary, finder);

    let sources = chart.source_count();
    binding.set_chart(chart)?;

    let mut session = Session {
        binding,
        clock,
        opts: RenderOptions::new(WIDTH, HEIGHT + FINDER_HEIGHT, &style),
        out_dir: out_dir_for(&path),
        frames: 0,
    };
    session.run(sources)?;

    info!(frames = session.frames, dir = %session.out_dir.display(), "done");
    Ok(())
}

struct Session {
    binding: FinderBinding,
    clock: ManualClock,
    opts: RenderOptions,
    out_dir: PathBuf,
    frames: usize,
}

impl Session {
    fn run(&mut self, sources: usize) -> Result<()> {
        self.settle()?;

        // Programmatic zoom to the last 30% of the data; the finder follows
        let last = self.binding.primary().view().chart_range().to;
        self.binding.set_range(0.7 * last, last, true, true);
        self.settle()?;

        if sources > 1 {
            info!("toggling the first source");
            self.binding.set_source_visibility(0, false, true);
            self.settle()?;
            self.binding.set_source_visibility(0, true, true);
            self.settle()?;
        }

        info!("dragging the window to the left");
        let handle = self.binding.finder().handle_range();
        let matrix = *self.binding.finder().view().matrix();
        let mut x = map_x(&matrix, 0.5 * (handle.from + handle.to));
        if self.binding.drag_start(x) {
            for _ in 0..8 {
                x -= 30.0;
                self.binding.drag_move(x);
                self.frame()?;
            }
            self.binding.drag_end();
            self.settle()?;
        }

        info!("widening the window with the left handle");
        let handle = self.binding.finder().handle_range();
        let mut x = map_x(&matrix, handle.from);
        if self.binding.drag_start(x) {
            for _ in 0..5 {
                x -= 20.0;
                self.binding.drag_move(x);
                self.frame()?;
            }
            self.binding.drag_end();
            self.settle()?;
        }
        Ok(())
    }

    /// Advances the clock by one frame interval and steps both views.
    fn frame(&mut self) -> Result<bool> {
        let now = self.clock.advance(FRAME_INTERVAL.as_millis() as i64);
        let animating = self.binding.step(now);
        self.render()?;
        Ok(animating)
    }

    fn settle(&mut self) -> Result<()> {
        for _ in 0..MAX_SETTLE_FRAMES {
            if !self.frame()? {
                return Ok(());
            }
        }
        warn!(frames = MAX_SETTLE_FRAMES, "animations did not settle");
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let path = self.out_dir.join(format!("frame_{:04}.png", self.frames));
        let binding = &mut self.binding;
        render_to_png(&self.opts, &path, |canvas| {
            binding.draw_chart(canvas);
            canvas.save();
            canvas.translate((0.0, HEIGHT as f32));
            binding.draw_finder(canvas);
            canvas.restore();
        })?;
        debug!(path = %path.display(), "frame written");
        self.frames += 1;
        Ok(())
    }
}

/// Intraday charts label their positions with the time of day.
fn label_callbacks(resolution: Resolution) -> LabelCallbacks {
    let format_date: Box<dyn Fn(i64) -> String> = match resolution {
        Resolution::Day => Box::new(format_date_short),
        Resolution::Hour | Resolution::FiveMin => Box::new(format_time),
    };
    LabelCallbacks { format_date, ..LabelCallbacks::default() }
}

fn default_input() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/followers.csv")
}

/// Produce an output dir like target/out/<stem>
fn out_dir_for(input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("chart");
    PathBuf::from("target/out").join(stem)
}

fn parse_chart_type(name: &str) -> Result<ChartType> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "lines" => ChartType::Lines,
        "lines-independent" => ChartType::LinesIndependentScale,
        "bars" => ChartType::Bars,
        "area" => ChartType::Area,
        "area-square" => ChartType::AreaSquare,
        "pie" => ChartType::Pie,
        other => bail!("unknown chart type '{other}'"),
    })
}

/// Loads `date,<source>,<source>...` rows. Dates are `YYYY-MM-DD` (UTC midnight)
/// or epoch milliseconds; missing or malformed values count as 0.
fn load_chart_csv(path: &Path, chart_type: ChartType) -> Result<Chart> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.iter().map(str::to_string).collect::<Vec<_>>();
    if headers.len() < 2 {
        bail!("expected a date column and at least one source column, got {headers:?}");
    }
    debug!(?headers, "csv headers");

    let mut x = Vec::new();
    let mut columns: Vec<Vec<u32>> = vec![Vec::new(); headers.len() - 1];
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let date = rec.get(0).unwrap_or_default();
        let time = parse_time(date).with_context(|| format!("row {}: bad date '{date}'", row + 1))?;
        x.push(time);

        for (s, column) in columns.iter_mut().enumerate() {
            let value = rec.get(s + 1).and_then(|v| v.parse::<u32>().ok());
            if value.is_none() {
                warn!(row = row + 1, source = headers[s + 1].as_str(), "missing value, using 0");
            }
            column.push(value.unwrap_or(0));
        }
    }

    if x.len() < 2 {
        bail!("need at least 2 rows, got {}", x.len());
    }
    let resolution = detect_resolution(x[1] - x[0])?;

    let sources = headers[1..]
        .iter()
        .zip(columns)
        .enumerate()
        .map(|(s, (name, y))| Source::new(name.clone(), PALETTE[s % PALETTE.len()], y))
        .collect();

    let id = path.file_stem().and_then(|s| s.to_str()).unwrap_or("chart");
    Ok(Chart::new(id, chart_type, resolution, x, sources)?)
}

fn parse_time(s: &str) -> Option<i64> {
    if let Ok(millis) = s.parse::<i64>() {
        return Some(millis);
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

fn detect_resolution(step: i64) -> Result<Resolution> {
    for resolution in [Resolution::Day, Resolution::Hour, Resolution::FiveMin] {
        if step == resolution.duration_millis() {
            return Ok(resolution);
        }
    }
    bail!("unsupported sampling step of {step} ms (expected 1 day, 1 hour or 5 minutes)")
}
