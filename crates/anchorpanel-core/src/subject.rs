//! Boundary to the domain object a panel presents.
//!
//! The panel never interprets domain rules. It reads a handful of facts
//! (sub-items, rule toggles, whether spellcasting exists) and forwards user
//! intent through the two mutators on [`Subject`].

use serde::Serialize;
use std::collections::BTreeMap;

/// An embedded item owned by the subject (inventory entry, action, spell...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubItem {
    pub id: String,
    pub name: String,
}

impl SubItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One selectable sub-option of a rule toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleSuboption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// A synthetic rule toggle exposed by the subject.
///
/// Toggles are grouped by `domain`; `placement` names the category grouping
/// (`"actions"`, `"inventory"`...) under which the toggle is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleToggle {
    pub domain: String,
    pub option: String,
    pub label: String,
    pub placement: Option<String>,
    pub item_id: Option<String>,
    pub checked: bool,
    pub suboptions: Vec<ToggleSuboption>,
}

/// Rule toggles keyed by domain, then by option.
pub type ToggleDomains = BTreeMap<String, BTreeMap<String, RuleToggle>>;

/// The domain object presented by a panel.
///
/// Mutators take `&self`: the subject is shared with its owner and is
/// expected to route updates through its own document layer.
pub trait Subject {
    /// Resolve a sub-item by id. `None` for deleted or unknown ids.
    fn sub_item(&self, id: &str) -> Option<SubItem>;

    /// Number of physical items carried.
    fn inventory_size(&self) -> usize;

    /// Whether the subject has any spellcasting entry with spells.
    fn has_spellcasting(&self) -> bool;

    /// All rule toggles, grouped by domain.
    fn rule_toggles(&self) -> ToggleDomains;

    /// Flip a rule toggle, optionally scoped to a sub-item and sub-option.
    fn toggle_roll_option(
        &self,
        domain: &str,
        option: &str,
        item_id: Option<&str>,
        checked: bool,
        suboption: Option<&str>,
    );

    /// Commit a numeric property update on a sub-item.
    fn update_property(&self, item_id: &str, property: &str, value: f64);
}

/// Toggles across every domain whose placement matches `placement`.
///
/// Order follows domain name, then option name.
pub fn toggles_for_placement(subject: &dyn Subject, placement: &str) -> Vec<RuleToggle> {
    subject
        .rule_toggles()
        .into_values()
        .flat_map(BTreeMap::into_values)
        .filter(|toggle| toggle.placement.as_deref() == Some(placement))
        .collect()
}
