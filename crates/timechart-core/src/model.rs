// File: crates/timechart-core/src/model.rs
// Summary: Immutable chart dataset: x timestamps plus index-aligned value sources.
// Notes:
// - Fields are private so that every `Chart` in circulation has passed
//   validation; use `Chart::new` to construct one.
// - Values are non-negative by type (`u32`); aggregations widen to f64.

use crate::error::DataModelError;
use crate::time::Resolution;

/// Drawing strategy selected for a chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartType {
    Lines,
    LinesIndependentScale,
    Bars,
    /// 100% stacked area.
    Area,
    /// 100% stacked area drawn as steps, one interval per value.
    AreaSquare,
    Pie,
}

/// One named, colored series sharing the chart's x-axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Source {
    pub name: String,
    /// Opaque RGB, `0xRRGGBB`.
    pub color: u32,
    pub y: Vec<u32>,
}

impl Source {
    pub fn new(name: impl Into<String>, color: u32, y: Vec<u32>) -> Self {
        Self { name: name.into(), color, y }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Chart {
    id: String,
    chart_type: ChartType,
    resolution: Resolution,
    x: Vec<i64>,
    sources: Vec<Source>,
}

impl Chart {
    /// Builds a chart, enforcing: at least 2 x values, strictly increasing x,
    /// and every source index-aligned with x.
    pub fn new(
        id: impl Into<String>,
        chart_type: ChartType,
        resolution: Resolution,
        x: Vec<i64>,
        sources: Vec<Source>,
    ) -> Result<Self, DataModelError> {
        let chart = Self { id: id.into(), chart_type, resolution, x, sources };
        chart.validate()?;
        Ok(chart)
    }

    pub fn validate(&self) -> Result<(), DataModelError> {
        if self.x.len() < 2 {
            return Err(DataModelError::TooFewPoints { count: self.x.len() });
        }
        if let Some(index) = self.x.windows(2).position(|w| w[1] <= w[0]) {
            return Err(DataModelError::NotIncreasing { index: index + 1 });
        }
        for source in &self.sources {
            if source.y.len() != self.x.len() {
                return Err(DataModelError::LengthMismatch {
                    source_name: source.name.clone(),
                    expected: self.x.len(),
                    actual: source.y.len(),
                });
            }
        }
        Ok(())
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn chart_type(&self) -> ChartType { self.chart_type }
    pub fn resolution(&self) -> Resolution { self.resolution }
    pub fn x(&self) -> &[i64] { &self.x }
    pub fn sources(&self) -> &[Source] { &self.sources }

    /// Number of x positions (N).
    pub fn len(&self) -> usize { self.x.len() }

    /// Always false for a validated chart.
    pub fn is_empty(&self) -> bool { self.x.is_empty() }

    pub fn source_count(&self) -> usize { self.sources.len() }

    /// Same data drawn with another strategy.
    pub fn with_type(&self, chart_type: ChartType) -> Self {
        Self { chart_type, ..self.clone() }
    }

    /// Copy with one extra x step (zero values) appended, so that a window over
    /// intervals can reach the last original value.
    pub fn with_trailing_point(&self) -> Self {
        let mut x = self.x.clone();
        let last = x[x.len() - 1];
        x.push(self.resolution.add(last, 1));

        let sources = self
            .sources
            .iter()
            .map(|s| {
                let mut y = s.y.clone();
                y.push(0);
                Source { y, ..s.clone() }
            })
            .collect();

        Self { x, sources, ..self.clone() }
    }
}
