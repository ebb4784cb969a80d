//! Category registry and menu entries.
//!
//! A panel shows exactly one category at a time. The registry is a static,
//! ordered table; the only dynamic part is the `disabled` predicate, which is
//! evaluated against the current subject every time the menu strip is built.

use crate::subject::Subject;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The mutually exclusive content modes a panel can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Actions,
    Items,
    Spells,
    Skills,
    Extras,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Category; 5] = [
        Category::Actions,
        Category::Items,
        Category::Spells,
        Category::Skills,
        Category::Extras,
    ];

    /// Stable identifier used in markup, templates and localisation keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Actions => "actions",
            Self::Items => "items",
            Self::Spells => "spells",
            Self::Skills => "skills",
            Self::Extras => "extras",
        }
    }

    /// Registry definition for this category.
    pub fn def(self) -> &'static CategoryDef {
        // REGISTRY is ordered like `ALL`.
        &REGISTRY[self as usize]
    }

    /// Toggle-option domain placement shown inside this category, if any.
    pub const fn toggle_placement(self) -> Option<&'static str> {
        match self {
            Self::Actions => Some("actions"),
            Self::Spells => Some("spellcasting"),
            Self::Items => Some("inventory"),
            Self::Skills => Some("proficiencies"),
            Self::Extras => None,
        }
    }

    /// Localisation key of the menu label.
    pub fn label_key(self) -> String {
        format!("sidebars.{}.title", self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Unknown category identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category `{0}`")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseCategoryError(s.to_owned()))
    }
}

/// Static description of a category.
pub struct CategoryDef {
    pub id: Category,
    pub icon: &'static str,
    pub disabled: fn(&dyn Subject) -> bool,
}

impl fmt::Debug for CategoryDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryDef")
            .field("id", &self.id)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

fn never(_: &dyn Subject) -> bool {
    false
}

fn no_inventory(subject: &dyn Subject) -> bool {
    subject.inventory_size() < 1
}

fn no_spells(subject: &dyn Subject) -> bool {
    !subject.has_spellcasting()
}

/// The category table, in menu order.
pub static REGISTRY: [CategoryDef; 5] = [
    CategoryDef {
        id: Category::Actions,
        icon: "fa-solid fa-sword",
        disabled: never,
    },
    CategoryDef {
        id: Category::Items,
        icon: "fa-solid fa-backpack",
        disabled: no_inventory,
    },
    CategoryDef {
        id: Category::Spells,
        icon: "fa-solid fa-wand-magic-sparkles",
        disabled: no_spells,
    },
    CategoryDef {
        id: Category::Skills,
        icon: "fa-solid fa-hand",
        disabled: never,
    },
    CategoryDef {
        id: Category::Extras,
        icon: "fa-solid fa-cubes",
        disabled: never,
    },
];

/// Whether `category` is unavailable for `subject`.
pub fn is_disabled(category: Category, subject: &dyn Subject) -> bool {
    (category.def().disabled)(subject)
}

/// One entry of the category menu strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    #[serde(rename = "type")]
    pub id: Category,
    pub icon: &'static str,
    pub label: String,
    pub disabled: bool,
    pub active: bool,
}

/// Build the menu strip for `subject`, marking `active` when given.
///
/// Disabled categories still get an entry.
pub fn menu_entries(subject: &dyn Subject, active: Option<Category>) -> Vec<MenuEntry> {
    REGISTRY
        .iter()
        .map(|def| MenuEntry {
            id: def.id,
            icon: def.icon,
            label: def.id.label_key(),
            disabled: (def.disabled)(subject),
            active: active == Some(def.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::{SubItem, ToggleDomains};

    struct Fixture {
        inventory: usize,
        spells: bool,
    }

    impl Subject for Fixture {
        fn sub_item(&self, _id: &str) -> Option<SubItem> {
            None
        }
        fn inventory_size(&self) -> usize {
            self.inventory
        }
        fn has_spellcasting(&self) -> bool {
            self.spells
        }
        fn rule_toggles(&self) -> ToggleDomains {
            ToggleDomains::new()
        }
        fn toggle_roll_option(&self, _: &str, _: &str, _: Option<&str>, _: bool, _: Option<&str>) {}
        fn update_property(&self, _: &str, _: &str, _: f64) {}
    }

    #[test]
    fn registry_order_matches_all() {
        for (def, category) in REGISTRY.iter().zip(Category::ALL) {
            assert_eq!(def.id, category);
            assert_eq!(category.def().id, category);
        }
    }

    #[test]
    fn parse_round_trips_identifiers() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
        assert_eq!(
            "loot".parse::<Category>(),
            Err(ParseCategoryError("loot".into()))
        );
    }

    #[test]
    fn empty_subject_disables_items_and_spells() {
        let subject = Fixture {
            inventory: 0,
            spells: false,
        };
        let disabled: Vec<_> = menu_entries(&subject, None)
            .into_iter()
            .filter(|e| e.disabled)
            .map(|e| e.id)
            .collect();
        assert_eq!(disabled, [Category::Items, Category::Spells]);
    }

    #[test]
    fn active_entry_is_marked_once() {
        let subject = Fixture {
            inventory: 3,
            spells: true,
        };
        let entries = menu_entries(&subject, Some(Category::Skills));
        assert_eq!(entries.len(), 5);
        assert_eq!(entries.iter().filter(|e| e.active).count(), 1);
        assert!(entries[3].active);
        assert!(entries.iter().all(|e| !e.disabled));
        assert_eq!(entries[3].label, "sidebars.skills.title");
    }

    #[test]
    fn extras_has_no_toggle_placement() {
        assert_eq!(Category::Extras.toggle_placement(), None);
        assert_eq!(Category::Spells.toggle_placement(), Some("spellcasting"));
    }

    #[test]
    fn menu_entry_serializes_type_key() {
        let entry = MenuEntry {
            id: Category::Items,
            icon: "i",
            label: "l".into(),
            disabled: false,
            active: true,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "items");
        assert_eq!(json["active"], true);
    }
}
