//! Content snapshots.
//!
//! A [`Content`] is the installed subtree of a panel: the markup the host
//! displays plus everything the engine needs to know about it without a
//! live document. Markup is parsed once with `scraper`; interactive
//! elements become [`Control`]s addressed by [`ControlId`], toggle rows are
//! grouped, and item name cells are remembered for truncation tooltips.
//!
//! The snapshot is also the source of truth for transient UI state (scroll
//! offset, focused field, live control values). Hosts report changes through
//! the panel and mirror the snapshot when installing it.

use anchorpanel_core::Category;
use anchorpanel_layout::Columns;
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;

use crate::binder::BoundHandlers;

/// Class of the scroll container element.
pub const SCROLL_CONTAINER_CLASS: &str = "item-list";
/// Class of the category menu strip.
pub const MENU_CLASS: &str = "sidebars";

/// Index of a control within one snapshot, in document order.
///
/// Ids are only meaningful for the snapshot that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(pub usize);

/// What kind of element a control is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    /// `<input>` with its `type` (defaults to `text`).
    Input { input_type: String },
    Select,
    Textarea,
    Button,
    /// Any other element carrying `data-action` or an item row.
    Element,
}

impl ControlKind {
    /// Text-like inputs commit on Enter.
    pub fn accepts_text(&self) -> bool {
        match self {
            Self::Input { input_type } => {
                matches!(input_type.as_str(), "text" | "number" | "search")
            }
            _ => false,
        }
    }
}

/// An interactive element of the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub id: ControlId,
    pub tag: String,
    pub kind: ControlKind,
    pub name: Option<String>,
    /// Value of `data-action`.
    pub action: Option<String>,
    /// `data-*` attributes with the prefix stripped (`data-item-id` → `item-id`).
    pub dataset: BTreeMap<String, String>,
    pub classes: Vec<String>,
    /// Current value (inputs, selects).
    pub value: Option<String>,
    /// Current checked state (checkboxes, radios).
    pub checked: bool,
    /// Closest `data-item-id` on the element or its ancestors.
    pub item_id: Option<String>,
    /// Toggle row this control belongs to.
    pub row: Option<usize>,
}

impl Control {
    pub fn data(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// An `.item[data-item-id]` row.
    pub fn is_item_row(&self) -> bool {
        self.has_class("item") && self.dataset.contains_key("item-id")
    }

    /// A numeric field bound to a sub-item property.
    pub fn is_item_property_input(&self) -> bool {
        matches!(self.kind, ControlKind::Input { .. })
            && self.dataset.contains_key("item-id")
            && self.dataset.contains_key("item-property")
    }
}

/// A `[data-item-id][data-domain][data-option]` element grouping a toggle
/// checkbox with its optional sub-option select.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleRow {
    pub dataset: BTreeMap<String, String>,
    pub checkbox: Option<ControlId>,
    pub suboption: Option<ControlId>,
}

/// Live view of a toggle row at interaction time.
#[derive(Debug, Clone, PartialEq)]
pub struct RowState {
    pub domain: Option<String>,
    pub option: Option<String>,
    pub item_id: Option<String>,
    pub checked: Option<bool>,
    pub suboption: Option<String>,
}

/// Name cell of an item row, used for truncation tooltips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemName {
    pub item_id: String,
    pub text: String,
}

/// Scroll offset of the scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub left: f32,
    pub top: f32,
}

impl ScrollOffset {
    pub const fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }
}

/// Layout annotations published on the content root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentStyle {
    pub font_size: f32,
    /// Present only when the content is split into more than one column.
    pub columns: Option<Columns>,
    /// Menu strip taller than the content: dock it at the bottom.
    pub menu_at_bottom: bool,
}

impl Default for ContentStyle {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            columns: None,
            menu_at_bottom: false,
        }
    }
}

impl ContentStyle {
    /// CSS custom properties for the content root.
    pub fn css_properties(&self) -> Vec<(&'static str, String)> {
        let mut props = vec![("--font-size", format!("{}px", self.font_size))];
        if let Some(columns) = self.columns {
            props.push(("--nb-columns", columns.to_string()));
        }
        props
    }
}

/// The installed content subtree of a panel.
#[derive(Debug)]
pub struct Content {
    category: Category,
    markup: String,
    controls: Vec<Control>,
    rows: Vec<ToggleRow>,
    items: Vec<ItemName>,
    has_scroll_container: bool,
    scroll: ScrollOffset,
    focused: Option<String>,
    style: ContentStyle,
    tooltips: BTreeMap<String, String>,
    pub(crate) handlers: BoundHandlers,
}

impl Content {
    /// Parse `markup` into a snapshot for `category`.
    pub fn parse(category: Category, markup: impl Into<String>) -> Self {
        let markup = markup.into();
        let html = Html::parse_fragment(&markup);

        let mut controls = Vec::new();
        let mut rows: Vec<(_, ToggleRow)> = Vec::new();
        let mut items = Vec::new();
        let mut has_scroll_container = false;

        for node in html.root_element().descendants() {
            let Some(el) = ElementRef::wrap(node) else {
                continue;
            };
            let classes: Vec<String> = el.value().classes().map(str::to_owned).collect();
            if classes.iter().any(|c| c == SCROLL_CONTAINER_CLASS) {
                has_scroll_container = true;
            }

            let dataset = dataset_of(el);
            if classes.iter().any(|c| c == "item") {
                if let Some(item_id) = dataset.get("item-id") {
                    if let Some(name) = find_name_cell(el) {
                        items.push(ItemName {
                            item_id: item_id.clone(),
                            text: name,
                        });
                    }
                }
            }

            let Some(kind) = control_kind(el, &classes, &dataset) else {
                continue;
            };

            let id = ControlId(controls.len());
            let row = toggle_row_of(el).map(|row_el| {
                let index = match rows.iter().position(|(node_id, _)| *node_id == row_el.id()) {
                    Some(index) => index,
                    None => {
                        rows.push((
                            row_el.id(),
                            ToggleRow {
                                dataset: dataset_of(row_el),
                                checkbox: None,
                                suboption: None,
                            },
                        ));
                        rows.len() - 1
                    }
                };
                let row = &mut rows[index].1;
                match (&kind, dataset.get("action").map(String::as_str)) {
                    (ControlKind::Input { .. }, Some("toggle-roll-option")) => {
                        row.checkbox.get_or_insert(id);
                    }
                    (ControlKind::Select, Some("set-suboption")) => {
                        row.suboption.get_or_insert(id);
                    }
                    _ => {}
                }
                index
            });

            let value = match kind {
                ControlKind::Select => selected_option(el),
                ControlKind::Textarea => Some(el.text().collect::<String>()),
                _ => el.value().attr("value").map(str::to_owned),
            };

            controls.push(Control {
                id,
                tag: el.value().name().to_owned(),
                name: el.value().attr("name").map(str::to_owned),
                action: dataset.get("action").cloned(),
                item_id: closest_item_id(el),
                checked: el.value().attr("checked").is_some(),
                kind,
                dataset,
                classes,
                value,
                row,
            });
        }

        Self {
            category,
            markup,
            controls,
            rows: rows.into_iter().map(|(_, row)| row).collect(),
            items,
            has_scroll_container,
            scroll: ScrollOffset::default(),
            focused: None,
            style: ContentStyle::default(),
            tooltips: BTreeMap::new(),
            handlers: BoundHandlers::default(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.controls.get(id.0)
    }

    /// First control matching `pred`.
    pub fn find_control(&self, pred: impl Fn(&Control) -> bool) -> Option<&Control> {
        self.controls.iter().find(|c| pred(c))
    }

    /// First `<input>` whose `name` attribute equals `name`.
    pub fn input_named(&self, name: &str) -> Option<&Control> {
        self.find_control(|c| {
            matches!(c.kind, ControlKind::Input { .. }) && c.name.as_deref() == Some(name)
        })
    }

    pub fn rows(&self) -> &[ToggleRow] {
        &self.rows
    }

    pub fn items(&self) -> &[ItemName] {
        &self.items
    }

    pub fn has_scroll_container(&self) -> bool {
        self.has_scroll_container
    }

    /// Offset of the scroll container, `None` when there is none.
    pub fn scroll_offset(&self) -> Option<ScrollOffset> {
        self.has_scroll_container.then_some(self.scroll)
    }

    /// `name` of the focused input.
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn style(&self) -> &ContentStyle {
        &self.style
    }

    pub(crate) fn style_mut(&mut self) -> &mut ContentStyle {
        &mut self.style
    }

    pub fn tooltip(&self, item_id: &str) -> Option<&str> {
        self.tooltips.get(item_id).map(String::as_str)
    }

    pub fn tooltips(&self) -> &BTreeMap<String, String> {
        &self.tooltips
    }

    pub(crate) fn set_tooltip(&mut self, item_id: &str, text: String) {
        self.tooltips.insert(item_id.to_owned(), text);
    }

    /// Number of handlers attached to this snapshot.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Set the scroll offset. `false` when there is no scroll container.
    pub(crate) fn set_scroll(&mut self, offset: ScrollOffset) -> bool {
        if !self.has_scroll_container {
            return false;
        }
        self.scroll = offset;
        true
    }

    /// Focus the input named `name`. `false` when no such input exists.
    pub(crate) fn focus(&mut self, name: &str) -> bool {
        if self.input_named(name).is_none() {
            return false;
        }
        self.focused = Some(name.to_owned());
        true
    }

    pub(crate) fn blur(&mut self) {
        self.focused = None;
    }

    /// Record a new value and/or checked state for a control.
    pub(crate) fn apply_change(
        &mut self,
        id: ControlId,
        value: Option<&str>,
        checked: Option<bool>,
    ) -> bool {
        let Some(control) = self.controls.get_mut(id.0) else {
            return false;
        };
        if let Some(value) = value {
            control.value = Some(value.to_owned());
        }
        if let Some(checked) = checked {
            control.checked = checked;
        }
        true
    }

    /// Live state of toggle row `index`.
    pub fn row_state(&self, index: usize) -> Option<RowState> {
        let row = self.rows.get(index)?;
        let data = |key: &str| row.dataset.get(key).filter(|v| !v.is_empty()).cloned();
        Some(RowState {
            domain: data("domain"),
            option: data("option"),
            item_id: data("item-id"),
            checked: row
                .checkbox
                .and_then(|id| self.control(id))
                .map(|c| c.checked),
            suboption: row
                .suboption
                .and_then(|id| self.control(id))
                .and_then(|c| c.value.clone()),
        })
    }
}

fn dataset_of(el: ElementRef<'_>) -> BTreeMap<String, String> {
    el.value()
        .attrs()
        .filter_map(|(name, value)| {
            name.strip_prefix("data-")
                .map(|key| (key.to_owned(), value.to_owned()))
        })
        .collect()
}

fn control_kind(
    el: ElementRef<'_>,
    classes: &[String],
    dataset: &BTreeMap<String, String>,
) -> Option<ControlKind> {
    let kind = match el.value().name() {
        "input" => ControlKind::Input {
            input_type: el
                .value()
                .attr("type")
                .unwrap_or("text")
                .to_ascii_lowercase(),
        },
        "select" => ControlKind::Select,
        "textarea" => ControlKind::Textarea,
        "button" => ControlKind::Button,
        _ => {
            let item_row = classes.iter().any(|c| c == "item") && dataset.contains_key("item-id");
            if dataset.contains_key("action") || item_row {
                ControlKind::Element
            } else {
                return None;
            }
        }
    };
    Some(kind)
}

fn ancestors_and_self(el: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    std::iter::once(el).chain(el.ancestors().filter_map(ElementRef::wrap))
}

fn toggle_row_of(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    ancestors_and_self(el).find(|candidate| {
        let value = candidate.value();
        value.attr("data-item-id").is_some()
            && value.attr("data-domain").is_some()
            && value.attr("data-option").is_some()
    })
}

fn closest_item_id(el: ElementRef<'_>) -> Option<String> {
    ancestors_and_self(el)
        .find_map(|candidate| candidate.value().attr("data-item-id"))
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
}

fn find_name_cell(el: ElementRef<'_>) -> Option<String> {
    el.descendants()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().classes().any(|c| c == "name"))
        .map(|name| name.text().collect::<String>().trim().to_owned())
}

fn selected_option(select: ElementRef<'_>) -> Option<String> {
    let options: Vec<_> = select
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "option")
        .collect();
    let chosen = options
        .iter()
        .find(|el| el.value().attr("selected").is_some())
        .or_else(|| options.first())?;
    Some(
        chosen
            .value()
            .attr("value")
            .map(str::to_owned)
            .unwrap_or_else(|| chosen.text().collect::<String>().trim().to_owned()),
    )
}
