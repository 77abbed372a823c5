// File: crates/timechart-core/src/types.rs
// Summary: Shared types and constants (default surface sizes, paddings).

/// Default chart surface width in pixels.
pub const WIDTH: i32 = 720;
/// Default chart surface height in pixels.
pub const HEIGHT: i32 = 480;
/// Default finder strip height in pixels.
pub const FINDER_HEIGHT: i32 = 96;

/// Screen margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    /// Create new insets (non-negative by type).
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Component-wise sum, used to stack padding and label insets.
    pub const fn plus(&self, other: &Insets) -> Insets {
        Insets::new(
            self.left + other.left,
            self.right + other.right,
            self.top + other.top,
            self.bottom + other.bottom,
        )
    }
}
