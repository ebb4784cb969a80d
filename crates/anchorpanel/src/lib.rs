#![forbid(unsafe_code)]

//! anchorpanel public facade crate.
//!
//! Re-exports the types a host needs from the internal crates and offers a
//! prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use anchorpanel_core::{
    Anchor, Category, Limits, MenuEntry, Padding, PanelSettings, Point, RuleToggle, SettingKey,
    SettingValue, SettingsError, Size, SubItem, Subject, ToggleDomains, ToggleSuboption,
};

// --- Layout re-exports -----------------------------------------------------

pub use anchorpanel_layout::{Columns, Placement, column_count, place};

// --- Runtime re-exports ----------------------------------------------------

pub use anchorpanel_runtime::{
    Bindings, CategoryView, Content, ContentMetrics, ControlId, Controller, EventKind,
    FrameScheduler, Interaction, Panel, PanelError, RenderContext, RenderReport, ScrollOffset,
    Surface, Target, TemplateBackend, TemplateError, UiEvent,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for anchorpanel hosts.
#[derive(Debug)]
pub enum Error {
    /// Settings could not be loaded.
    Settings(SettingsError),
    /// A render pass did not install content.
    Panel(PanelError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settings(err) => write!(f, "settings: {err}"),
            Self::Panel(err) => write!(f, "panel: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Settings(err) => Some(err),
            Self::Panel(err) => Some(err),
        }
    }
}

impl From<SettingsError> for Error {
    fn from(err: SettingsError) -> Self {
        Self::Settings(err)
    }
}

impl From<PanelError> for Error {
    fn from(err: PanelError) -> Self {
        Self::Panel(err)
    }
}

impl From<TemplateError> for Error {
    fn from(err: TemplateError) -> Self {
        Self::Panel(err.into())
    }
}

/// Standard result type for anchorpanel APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Anchor, Category, CategoryView, Controller, Error, Interaction, Panel, PanelSettings,
        Result, Size, Subject, Surface, TemplateBackend,
    };

    pub use crate::{core, layout, runtime};
}

pub use anchorpanel_core as core;
pub use anchorpanel_layout as layout;
pub use anchorpanel_runtime as runtime;
