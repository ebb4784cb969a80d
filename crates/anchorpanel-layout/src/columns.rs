//! Multi-column packing.
//!
//! When content is taller than the height the panel may use, it can be split
//! into up to [`MAX_COLUMNS`] columns instead of scrolling. The decision only
//! needs two numbers: the content's natural (unclipped) height and the
//! allowed height.

use anchorpanel_core::{Anchor, Padding, Size};
use std::fmt;

/// Upper bound on the number of columns.
pub const MAX_COLUMNS: u8 = 3;

/// Column count in `1..=MAX_COLUMNS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Columns(u8);

impl Columns {
    pub const ONE: Columns = Columns(1);

    /// Clamp `n` into the valid range.
    pub const fn clamped(n: u8) -> Self {
        if n < 1 {
            Self(1)
        } else if n > MAX_COLUMNS {
            Self(MAX_COLUMNS)
        } else {
            Self(n)
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Whether the content is split at all.
    #[inline]
    pub const fn is_multi(self) -> bool {
        self.0 > 1
    }
}

impl Default for Columns {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Columns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Height the panel may use.
///
/// `(allotted - padding) * percent / 100`, where the allotted height spans
/// the anchor's top and bottom limits (viewport when absent). May be zero or
/// negative for degenerate geometry; [`column_count`] copes with that.
pub fn max_height(allotted_height: f32, padding: Padding, height_percent: f32) -> f32 {
    (allotted_height - padding.vertical()) * (height_percent / 100.0)
}

/// [`max_height`] for an anchor inside `viewport`.
pub fn max_height_for(anchor: &Anchor, viewport: Size, padding: Padding, height_percent: f32) -> f32 {
    max_height(anchor.allotted_height(viewport), padding, height_percent)
}

/// Number of columns needed to show `virtual_height` within `max_height`.
///
/// `ceil(virtual / max)` clamped to `1..=3`. A non-positive or non-finite
/// `max_height` yields a single column, as does a NaN `virtual_height`.
/// Unbounded content takes every column.
pub fn column_count(virtual_height: f32, max_height: f32) -> Columns {
    if !(max_height.is_finite() && max_height > 0.0) || virtual_height.is_nan() {
        return Columns::ONE;
    }
    let ratio = (virtual_height / max_height).ceil();
    if ratio <= 1.0 {
        Columns::ONE
    } else if ratio >= f32::from(MAX_COLUMNS) {
        Columns(MAX_COLUMNS)
    } else {
        Columns(ratio as u8)
    }
}
