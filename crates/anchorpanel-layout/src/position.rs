//! Anchor-relative clamped positioning.
//!
//! The panel is centered on the anchor point, then pushed back inside the
//! limit rectangle: right/bottom overflow shifts it left/up, and the left/top
//! edge never goes below `0`. When the anchor itself sits on or beyond a
//! limit edge the panel is hidden instead of being clamped.
//!
//! # Example
//!
//! ```
//! use anchorpanel_core::{Anchor, Limits, Size};
//! use anchorpanel_layout::position::place;
//!
//! let anchor = Anchor::new(100.0, 100.0).with_limits(Limits::new(0.0, 800.0, 600.0));
//! let placement = place(&anchor, Size::new(200.0, 150.0), Size::new(1920.0, 1080.0), 200.0);
//! assert_eq!((placement.left, placement.top), (0.0, 25.0));
//! assert!(placement.visible);
//! ```

use anchorpanel_core::{Anchor, Size};

/// Result of a positioning pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Left edge of the panel box.
    pub left: f32,
    /// Top edge of the panel box.
    pub top: f32,
    /// Height constraint republished on every pass.
    pub max_height: f32,
    /// `false` when the anchor lies on or outside the limit rectangle.
    pub visible: bool,
}

impl Placement {
    /// Style properties a host applies to the panel element.
    ///
    /// `display` is only present when the panel is hidden.
    pub fn style_properties(&self) -> Vec<(&'static str, String)> {
        let mut props = vec![
            ("left", format!("{}px", self.left)),
            ("top", format!("{}px", self.top)),
            ("--max-height", format!("{}px", self.max_height.max(0.0))),
        ];
        if !self.visible {
            props.push(("display", "none".to_owned()));
        }
        props
    }
}

/// Place a panel of size `panel` around `anchor`.
///
/// Limits missing from the anchor fall back to `viewport`. A negative
/// `max_height` is published as `0`.
pub fn place(anchor: &Anchor, panel: Size, viewport: Size, max_height: f32) -> Placement {
    let panel = panel.sanitized();
    let limit_right = anchor.limit_right(viewport);
    let limit_bottom = anchor.limit_bottom(viewport);

    let left = clamp_axis(anchor.x - panel.width / 2.0, panel.width, limit_right);
    let top = clamp_axis(anchor.y - panel.height / 2.0, panel.height, limit_bottom);

    let visible = anchor_inside(anchor.x, limit_right) && anchor_inside(anchor.y, limit_bottom);

    if !visible {
        tracing::debug!(
            target: "anchorpanel.position",
            x = anchor.x,
            y = anchor.y,
            limit_right,
            limit_bottom,
            "anchor outside limits, hiding panel"
        );
    }

    Placement {
        left,
        top,
        max_height: if max_height.is_finite() {
            max_height.max(0.0)
        } else {
            0.0
        },
        visible,
    }
}

/// Shift `start` so `start + extent` stays within `limit`, then floor at 0.
fn clamp_axis(start: f32, extent: f32, limit: f32) -> f32 {
    let mut start = start;
    if start + extent > limit {
        start = limit - extent;
    }
    if start < 0.0 || start.is_nan() {
        start = 0.0;
    }
    start
}

/// Strictly between `0` and `limit`. NaN counts as outside.
fn anchor_inside(coord: f32, limit: f32) -> bool {
    coord > 0.0 && coord < limit
}
