//! Panel settings as data.
//!
//! The owner of a panel resolves these from its own storage; this module only
//! describes them, supplies defaults, and loads them from TOML or JSON.
//!
//! ```toml
//! sidebar_font_size = 14
//! sidebar_height = 60
//! multi_columns = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings consumed by the panel engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    /// Base font size of the panel content, in pixels.
    #[serde(alias = "sidebarFontSize")]
    pub sidebar_font_size: f32,
    /// Share of the allotted height the panel may use, `0..=100`.
    #[serde(alias = "sidebarHeight")]
    pub sidebar_height: f32,
    /// Split overflowing content into up to three columns.
    #[serde(alias = "multiColumns")]
    pub multi_columns: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            sidebar_font_size: 14.0,
            sidebar_height: 100.0,
            multi_columns: false,
        }
    }
}

/// Key of a single setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    SidebarFontSize,
    SidebarHeight,
    MultiColumns,
}

/// Value of a single setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingValue {
    Number(f32),
    Flag(bool),
}

impl PanelSettings {
    /// Resolve one setting by key.
    pub fn get(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::SidebarFontSize => SettingValue::Number(self.sidebar_font_size),
            SettingKey::SidebarHeight => SettingValue::Number(self.sidebar_height),
            SettingKey::MultiColumns => SettingValue::Flag(self.multi_columns),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// List out-of-range values. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(self.sidebar_font_size.is_finite() && self.sidebar_font_size > 0.0) {
            errors.push(format!(
                "sidebar_font_size must be positive, got {}",
                self.sidebar_font_size
            ));
        }
        if !(0.0..=100.0).contains(&self.sidebar_height) {
            errors.push(format!(
                "sidebar_height must be in [0, 100], got {}",
                self.sidebar_height
            ));
        }
        errors
    }

    /// Copy with every value forced into range.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let sidebar_font_size = if self.sidebar_font_size.is_finite() && self.sidebar_font_size > 0.0
        {
            self.sidebar_font_size
        } else {
            defaults.sidebar_font_size
        };
        let sidebar_height = if self.sidebar_height.is_nan() {
            defaults.sidebar_height
        } else {
            self.sidebar_height.clamp(0.0, 100.0)
        };
        Self {
            sidebar_font_size,
            sidebar_height,
            multi_columns: self.multi_columns,
        }
    }
}

/// Errors raised while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
