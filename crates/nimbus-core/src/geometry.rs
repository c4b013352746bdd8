//! Layout geometry in floating point layout units.

/// A position in layout units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A measured extent in layout units.
///
/// Sizes coming from the host may be unmeasured (zero) or garbage (NaN,
/// infinite) for a while after startup or a resize.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size::new(0.0, 0.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        is_valid_extent(self.width) && is_valid_extent(self.height)
    }

    /// Returns the size only if it is valid.
    pub fn valid(self) -> Option<Size> {
        self.is_valid().then_some(self)
    }

    /// Top-left position that centers `inner` inside `self`.
    pub fn center_of(&self, inner: Size) -> Point {
        Point::new(
            (self.width - inner.width) / 2.0,
            (self.height - inner.height) / 2.0,
        )
    }
}

fn is_valid_extent(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
