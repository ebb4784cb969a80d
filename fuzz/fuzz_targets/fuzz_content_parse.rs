#![no_main]

use anchorpanel_core::Category;
use anchorpanel_runtime::{Content, ScrollOffset, TransientState};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary markup must parse into a consistent snapshot.
    let markup = String::from_utf8_lossy(data);
    let content = Content::parse(Category::Items, markup.to_string());

    for (i, control) in content.controls().iter().enumerate() {
        assert_eq!(control.id.0, i, "control ids must be dense");
        if let Some(row) = control.row {
            assert!(row < content.rows().len(), "row index OOB");
        }
    }
    for (i, row) in content.rows().iter().enumerate() {
        for id in [row.checkbox, row.suboption].into_iter().flatten() {
            let control = content.control(id).expect("row control exists");
            assert_eq!(control.row, Some(i), "row control points back at its row");
        }
        assert!(content.row_state(i).is_some());
    }
    assert_eq!(content.scroll_offset().is_some(), content.has_scroll_container());

    // Restoring onto any snapshot never panics and only lands where possible.
    let state = TransientState {
        scroll: Some(ScrollOffset::new(1.0, 2.0)),
        focus: Some("search".to_owned()),
    };
    let mut fresh = Content::parse(Category::Items, markup.to_string());
    let restored = state.restore(&mut fresh);
    assert_eq!(restored.scroll, fresh.has_scroll_container());
    assert_eq!(restored.focus, fresh.input_named("search").is_some());
});
