#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are in host pixels with the origin at the top-left of the
//! viewport. Unlike cell grids, pixel geometry is fractional, so everything
//! here is `f32`.

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Replace negative or non-finite extents with zero.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            width: non_negative(self.width),
            height: non_negative(self.height),
        }
    }
}

/// Vertical padding of the panel element.
///
/// Only the vertical edges participate in height budgeting, so horizontal
/// padding is not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub top: f32,
    pub bottom: f32,
}

impl Padding {
    #[inline]
    pub const fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    /// Sum of the top and bottom padding.
    #[inline]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Optional clamp rectangle supplied with an anchor.
///
/// The left edge is implicitly `0`. Any missing edge falls back to the
/// viewport when resolved.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Limits {
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
}

impl Limits {
    /// Limits with every edge set.
    pub const fn new(top: f32, right: f32, bottom: f32) -> Self {
        Self {
            top: Some(top),
            right: Some(right),
            bottom: Some(bottom),
        }
    }
}

/// Reference point the panel follows, recomputed by the owner on demand.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
    pub limits: Option<Limits>,
}

impl Anchor {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, limits: None }
    }

    #[must_use]
    pub const fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    #[inline]
    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Top edge of the allotted area (`0` when absent).
    pub fn limit_top(&self) -> f32 {
        self.limits.and_then(|l| l.top).unwrap_or(0.0)
    }

    /// Right edge of the allotted area, defaulting to the viewport width.
    pub fn limit_right(&self, viewport: Size) -> f32 {
        self.limits
            .and_then(|l| l.right)
            .unwrap_or(viewport.width)
    }

    /// Bottom edge of the allotted area, defaulting to the viewport height.
    pub fn limit_bottom(&self, viewport: Size) -> f32 {
        self.limits
            .and_then(|l| l.bottom)
            .unwrap_or(viewport.height)
    }

    /// Height between the top and bottom limits.
    pub fn allotted_height(&self, viewport: Size) -> f32 {
        self.limit_bottom(viewport) - self.limit_top()
    }
}

#[inline]
pub(crate) fn non_negative(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
