#![no_main]

use anchorpanel_core::{Anchor, Limits, Padding, Size};
use anchorpanel_layout::{MAX_COLUMNS, column_count, max_height_for, place};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    x: f32,
    y: f32,
    limits: Option<(Option<f32>, Option<f32>, Option<f32>)>,
    panel: (f32, f32),
    viewport: (f32, f32),
    padding: (f32, f32),
    height_percent: f32,
    virtual_height: f32,
}

fuzz_target!(|input: Input| {
    let mut anchor = Anchor::new(input.x, input.y);
    if let Some((top, right, bottom)) = input.limits {
        anchor = anchor.with_limits(Limits { top, right, bottom });
    }
    let viewport = Size::new(input.viewport.0, input.viewport.1);
    let padding = Padding::new(input.padding.0, input.padding.1);

    let max_height = max_height_for(&anchor, viewport, padding, input.height_percent);
    let columns = column_count(input.virtual_height, max_height);
    assert!((1..=MAX_COLUMNS).contains(&columns.get()));

    let placement = place(&anchor, Size::new(input.panel.0, input.panel.1), viewport, max_height);
    // Coordinates are never negative or NaN; max height is published floored.
    assert!(placement.left >= 0.0);
    assert!(placement.top >= 0.0);
    assert!(placement.max_height >= 0.0);
    if placement.visible {
        assert!(anchor.x > 0.0 && anchor.y > 0.0);
    }
});
