#![forbid(unsafe_code)]

//! anchorpanel runtime
//!
//! Drives an anchored panel through its lifecycle: render passes against an
//! async template backend, transient state carried across content swaps,
//! per-snapshot event handlers and deferred repositioning.
//!
//! # Key Components
//!
//! - [`Panel`] - the panel itself; all public operations live here
//! - [`Content`] - parsed snapshot of installed markup
//! - [`TransientState`] - scroll offset and focus carried between snapshots
//! - [`Bindings`] / [`bind`] - declarative handlers resolved per snapshot
//! - [`RepositionScheduler`] - coalesces geometry changes into one frame
//! - [`Controller`], [`TemplateBackend`], [`Surface`], [`CategoryView`],
//!   [`FrameScheduler`] - host seams
//!
//! # Role in anchorpanel
//! `anchorpanel-runtime` sits on top of `anchorpanel-core` (plain data) and
//! `anchorpanel-layout` (pure solvers). It is the only crate that suspends
//! and the only one that talks to the host.

pub mod binder;
pub mod content;
pub mod error;
pub mod host;
pub mod panel;
pub mod pipeline;
pub mod preserve;
pub mod scheduler;

pub use binder::{
    Bindings, BoundHandlers, EventKind, EventTarget, Handler, HandlerContext, Interaction, Target,
    UiEvent, add_drag_listeners, add_enter_key_listeners, add_send_item_to_chat_listeners,
    base_bindings, bind,
};
pub use content::{
    Content, ContentStyle, Control, ControlId, ControlKind, ItemName, RowState, ScrollOffset,
    ToggleRow,
};
pub use error::{PanelError, TemplateError};
pub use host::{CategoryView, ContentMetrics, Controller, Surface, TemplateBackend};
pub use panel::{MAX_FOLLOW_UPS, Panel};
pub use pipeline::{RenderContext, RenderOptions, RenderReport, RenderStage, template_path};
pub use preserve::{Restored, TransientState};
pub use scheduler::{FrameScheduler, RepositionScheduler, SchedulerStats};
