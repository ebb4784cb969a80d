#![forbid(unsafe_code)]

//! Core: geometry, category registry, subject boundary and settings.
//!
//! # Role in anchorpanel
//! `anchorpanel-core` holds the plain data every other crate agrees on. It
//! has no notion of rendering or scheduling; the layout crate computes on
//! these types and the runtime drives them.
//!
//! # Primary responsibilities
//! - **Geometry**: pixel [`Point`], [`Size`], [`Padding`] and the externally
//!   supplied [`Anchor`] with its optional [`Limits`].
//! - **Category registry**: the ordered [`REGISTRY`] and [`menu_entries`].
//! - **Subject**: the [`Subject`] trait through which the panel reads domain
//!   facts and forwards mutations.
//! - **Settings**: [`PanelSettings`] loadable from TOML or JSON.

pub mod category;
pub mod geometry;
pub mod settings;
pub mod subject;

pub use category::{Category, CategoryDef, MenuEntry, ParseCategoryError, REGISTRY, is_disabled, menu_entries};
pub use geometry::{Anchor, Limits, Padding, Point, Size};
pub use settings::{PanelSettings, SettingKey, SettingValue, SettingsError};
pub use subject::{RuleToggle, SubItem, Subject, ToggleDomains, ToggleSuboption, toggles_for_placement};
