// File: crates/timechart-core/src/geometry.rs
// Summary: Value ranges, pixel rectangles and point-mapping helpers over Skia matrices.

use skia_safe as skia;

/// Mutable `[from, to]` pair over fractional chart positions (or Y values).
/// Contract: a range of `size() <= 1` is "no valid range" and is never drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub from: f32,
    pub to: f32,
}

impl Default for Range {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Range {
    pub const EMPTY: Range = Range { from: 0.0, to: -1.0 };

    pub const fn new(from: f32, to: f32) -> Self {
        Self { from, to }
    }

    pub fn reset(&mut self) {
        *self = Self::EMPTY;
    }

    /// Clamps `value` into `[from, to]`.
    #[inline]
    pub fn fit(&self, value: f32) -> f32 {
        clamp(value, self.from, self.to)
    }

    /// Linear interpolation of both ends, `state` in `[0, 1]`.
    pub fn interpolate(start: &Range, end: &Range, state: f32) -> Range {
        Range {
            from: start.from + (end.from - start.from) * state,
            to: start.to + (end.to - start.to) * state,
        }
    }

    /// Number of positions spanned, `to - from + 1`.
    #[inline]
    pub fn size(&self) -> f32 {
        self.to - self.from + 1.0
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.size() > 1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RectI32 {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl RectI32 {
    pub const fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }
    pub const fn from_ltwh(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self { left, top, right: left + width, bottom: top + height }
    }
    pub const fn width(&self) -> i32 { self.right - self.left }
    pub const fn height(&self) -> i32 { self.bottom - self.top }
    pub fn center_x(&self) -> f32 { 0.5 * (self.left + self.right) as f32 }
    pub fn center_y(&self) -> f32 { 0.5 * (self.top + self.bottom) as f32 }
}

#[inline]
pub fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo { lo } else if v > hi { hi } else { v }
}

/// Screen X of chart position `x`.
#[inline]
pub fn map_x(matrix: &skia::Matrix, x: f32) -> f32 {
    matrix.map_xy(x, 0.0).x
}

/// Screen Y of chart value `y`.
#[inline]
pub fn map_y(matrix: &skia::Matrix, y: f32) -> f32 {
    matrix.map_xy(0.0, y).y
}

/// Pixels per chart position along X.
#[inline]
pub fn scale_x(matrix: &skia::Matrix) -> f32 {
    map_x(matrix, 1.0) - map_x(matrix, 0.0)
}

/// Builds the chart-space → surface transform: `(x, y)` in `x_range`/`y_range`
/// lands on `content`, Y pointing up.
pub fn chart_matrix(content: &RectI32, x_range: &Range, y_range: &Range) -> skia::Matrix {
    let scale_x = content.width() as f32 / (x_range.size() - 1.0);
    let scale_y = content.height() as f32 / (y_range.size() - 1.0);

    let left = content.left as f32 - x_range.from * scale_x;
    let bottom = content.bottom as f32 + y_range.from * scale_y;

    let mut matrix = skia::Matrix::scale((scale_x, -scale_y));
    matrix.post_translate((left, bottom));
    matrix
}
