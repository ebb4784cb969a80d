#![forbid(unsafe_code)]

//! Layout solvers for anchored panels.
//!
//! Two pure computations, both free of I/O so they can run in any frame:
//!
//! - [`columns`]: how many columns overflowing content is split into.
//! - [`position`]: where the panel box goes relative to its anchor, or
//!   whether it is hidden.

pub mod columns;
pub mod position;

pub use anchorpanel_core::geometry::{Anchor, Limits, Padding, Point, Size};
pub use columns::{Columns, MAX_COLUMNS, column_count, max_height, max_height_for};
pub use position::{Placement, place};
