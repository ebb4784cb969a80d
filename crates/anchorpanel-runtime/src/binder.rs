//! Interaction handlers.
//!
//! Handlers are declared as [`Bindings`] (target + event + callback) and
//! resolved against one snapshot's controls by [`bind`]. The resolved
//! [`BoundHandlers`] live inside that snapshot, so replacing the content
//! drops every previous handler: binding again on each render never stacks
//! listeners.
//!
//! The base catalog covers category switching, rule toggles, numeric item
//! properties and item descriptions, plus the shared helpers (Enter commits,
//! send-to-chat, drag initiation). Category views add their own through
//! [`CategoryView::bind_category_listeners`](crate::CategoryView::bind_category_listeners).

use anchorpanel_core::{Category, SubItem, Subject, is_disabled};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::content::{Content, Control, ControlId, RowState};
use crate::host::Controller;

/// Event kinds a handler can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
    KeyEnter,
    DragStart,
}

/// An event reported by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Click,
    /// New value and/or checked state of a form control.
    Change {
        value: Option<String>,
        checked: Option<bool>,
    },
    KeyEnter,
    DragStart,
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Click => EventKind::Click,
            Self::Change { .. } => EventKind::Change,
            Self::KeyEnter => EventKind::KeyEnter,
            Self::DragStart => EventKind::DragStart,
        }
    }
}

/// An event on a control of the installed snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub control: ControlId,
    pub event: UiEvent,
}

impl Interaction {
    pub fn click(control: ControlId) -> Self {
        Self {
            control,
            event: UiEvent::Click,
        }
    }

    pub fn change(control: ControlId, value: impl Into<String>) -> Self {
        Self {
            control,
            event: UiEvent::Change {
                value: Some(value.into()),
                checked: None,
            },
        }
    }

    pub fn check(control: ControlId, checked: bool) -> Self {
        Self {
            control,
            event: UiEvent::Change {
                value: None,
                checked: Some(checked),
            },
        }
    }

    pub fn key_enter(control: ControlId) -> Self {
        Self {
            control,
            event: UiEvent::KeyEnter,
        }
    }

    pub fn drag_start(control: ControlId) -> Self {
        Self {
            control,
            event: UiEvent::DragStart,
        }
    }
}

/// Which controls a binding attaches to.
#[derive(Clone)]
pub enum Target {
    /// `[data-action='<name>']`
    Action(String),
    /// `input[data-item-id][data-item-property]`
    ItemPropertyInput,
    /// Text-like inputs.
    TextInput,
    /// `.item[data-item-id]`
    ItemRow,
    Matching(fn(&Control) -> bool),
}

impl Target {
    pub fn action(name: impl Into<String>) -> Self {
        Self::Action(name.into())
    }

    pub fn matches(&self, control: &Control) -> bool {
        match self {
            Self::Action(name) => control.action.as_deref() == Some(name.as_str()),
            Self::ItemPropertyInput => control.is_item_property_input(),
            Self::TextInput => control.kind.accepts_text(),
            Self::ItemRow => control.is_item_row(),
            Self::Matching(pred) => pred(control),
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Action(name) => f.debug_tuple("Action").field(name).finish(),
            Self::ItemPropertyInput => f.write_str("ItemPropertyInput"),
            Self::TextInput => f.write_str("TextInput"),
            Self::ItemRow => f.write_str("ItemRow"),
            Self::Matching(_) => f.write_str("Matching(..)"),
        }
    }
}

/// What a handler sees: the control (with its live value), the event, and
/// the toggle row the control sits in.
#[derive(Debug, Clone, PartialEq)]
pub struct EventTarget {
    pub control: Control,
    pub event: UiEvent,
    pub row: Option<RowState>,
}

/// Capabilities handed to handlers.
pub struct HandlerContext {
    controller: Rc<dyn Controller>,
    subject: Rc<dyn Subject>,
    active: Category,
    follow_ups: RefCell<Vec<UiEvent>>,
}

impl HandlerContext {
    pub(crate) fn new(controller: Rc<dyn Controller>, active: Category) -> Self {
        let subject = controller.subject();
        Self {
            controller,
            subject,
            active,
            follow_ups: RefCell::new(Vec::new()),
        }
    }

    pub fn controller(&self) -> &dyn Controller {
        self.controller.as_ref()
    }

    pub fn subject(&self) -> &dyn Subject {
        self.subject.as_ref()
    }

    /// Category of the snapshot the event came from.
    pub fn active(&self) -> Category {
        self.active
    }

    /// Resolve a sub-item on the current subject. Stale or missing ids
    /// resolve to `None`.
    pub fn resolve_item(&self, item_id: Option<&str>) -> Option<SubItem> {
        let id = item_id?;
        let item = self.subject.sub_item(id);
        if item.is_none() {
            tracing::debug!(target: "anchorpanel.bind", item_id = %id, "stale item reference ignored");
        }
        item
    }

    /// Queue another event on the same control, dispatched after the
    /// current handlers return.
    pub fn follow_up(&self, event: UiEvent) {
        self.follow_ups.borrow_mut().push(event);
    }

    pub(crate) fn take_follow_ups(&self) -> Vec<UiEvent> {
        std::mem::take(&mut *self.follow_ups.borrow_mut())
    }
}

pub type Handler = Rc<dyn Fn(&HandlerContext, &EventTarget)>;

struct Binding {
    target: Target,
    kind: EventKind,
    handler: Handler,
}

/// Declared handlers, not yet attached to any snapshot.
#[derive(Default)]
pub struct Bindings {
    entries: Vec<Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for `kind` on every control matching `target`.
    pub fn on<F>(&mut self, target: Target, kind: EventKind, handler: F) -> &mut Self
    where
        F: Fn(&HandlerContext, &EventTarget) + 'static,
    {
        self.entries.push(Binding {
            target,
            kind,
            handler: Rc::new(handler),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|b| (&b.target, b.kind)))
            .finish()
    }
}

/// Handlers attached to one snapshot's controls.
#[derive(Clone, Default)]
pub struct BoundHandlers {
    by_control: HashMap<ControlId, Vec<(EventKind, Handler)>>,
    count: usize,
}

impl BoundHandlers {
    /// Total attached (control, handler) pairs.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub(crate) fn handlers_for(&self, control: ControlId, kind: EventKind) -> Vec<Handler> {
        self.by_control
            .get(&control)
            .map(|list| {
                list.iter()
                    .filter(|(k, _)| *k == kind)
                    .map(|(_, h)| Rc::clone(h))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Debug for BoundHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundHandlers")
            .field("controls", &self.by_control.len())
            .field("count", &self.count)
            .finish()
    }
}

/// Attach `bindings` to the controls of `content`.
pub fn bind(content: &Content, bindings: Bindings) -> BoundHandlers {
    let mut bound = BoundHandlers::default();
    for binding in &bindings.entries {
        for control in content.controls() {
            if binding.target.matches(control) {
                bound
                    .by_control
                    .entry(control.id)
                    .or_default()
                    .push((binding.kind, Rc::clone(&binding.handler)));
                bound.count += 1;
            }
        }
    }
    tracing::debug!(
        target: "anchorpanel.bind",
        category = %content.category(),
        handlers = bound.count,
        "handlers attached"
    );
    bound
}

/// The fixed catalog every panel attaches.
pub fn base_bindings() -> Bindings {
    let mut bindings = Bindings::new();
    add_enter_key_listeners(&mut bindings);
    add_send_item_to_chat_listeners(&mut bindings);
    add_drag_listeners(&mut bindings);
    bindings
        .on(Target::action("item-description"), EventKind::Click, |cx, target| {
            if let Some(item) = cx.resolve_item(target.control.item_id.as_deref()) {
                cx.controller().show_item_description(&item);
            }
        })
        .on(Target::action("toggle-roll-option"), EventKind::Change, toggle_roll_option)
        .on(Target::action("open-sidebar"), EventKind::Click, open_category)
        .on(Target::ItemPropertyInput, EventKind::Change, update_item_property);
    bindings
}

/// Enter in a text-like input commits its current value as a change.
pub fn add_enter_key_listeners(bindings: &mut Bindings) {
    bindings.on(Target::TextInput, EventKind::KeyEnter, |cx, target| {
        cx.follow_up(UiEvent::Change {
            value: target.control.value.clone(),
            checked: None,
        });
    });
}

pub fn add_send_item_to_chat_listeners(bindings: &mut Bindings) {
    bindings.on(Target::action("send-to-chat"), EventKind::Click, |cx, target| {
        if let Some(item) = cx.resolve_item(target.control.item_id.as_deref()) {
            cx.controller().send_item_to_chat(&item);
        }
    });
}

pub fn add_drag_listeners(bindings: &mut Bindings) {
    bindings.on(Target::ItemRow, EventKind::DragStart, |cx, target| {
        if let Some(item) = cx.resolve_item(target.control.item_id.as_deref()) {
            cx.controller().begin_item_drag(&item);
        }
    });
}

fn open_category(cx: &HandlerContext, target: &EventTarget) {
    let Some(category) = target
        .control
        .data("sidebar")
        .and_then(|id| id.parse::<Category>().ok())
    else {
        tracing::debug!(target: "anchorpanel.bind", "open-category without a known category");
        return;
    };
    if category != cx.active() && is_disabled(category, cx.subject()) {
        tracing::debug!(target: "anchorpanel.bind", %category, "category disabled");
        return;
    }
    cx.controller().toggle_category(category);
}

fn toggle_roll_option(cx: &HandlerContext, target: &EventTarget) {
    let Some(row) = &target.row else {
        return;
    };
    let (Some(domain), Some(option), Some(checked)) =
        (row.domain.as_deref(), row.option.as_deref(), row.checked)
    else {
        return;
    };
    cx.subject().toggle_roll_option(
        domain,
        option,
        row.item_id.as_deref(),
        checked,
        row.suboption.as_deref(),
    );
}

fn update_item_property(cx: &HandlerContext, target: &EventTarget) {
    let control = &target.control;
    let (Some(item_id), Some(property)) = (control.data("item-id"), control.data("item-property"))
    else {
        return;
    };
    let Some(value) = control
        .value
        .as_deref()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
    else {
        tracing::debug!(target: "anchorpanel.bind", item_id, property, "non-numeric value ignored");
        return;
    };
    if cx.resolve_item(Some(item_id)).is_none() {
        return;
    }
    cx.subject().update_property(item_id, property, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKUP: &str = r#"
        <div class="inner">
            <a data-action="open-sidebar" data-sidebar="spells"></a>
            <div class="item-list">
                <div class="item" data-item-id="a"><span class="name">A</span>
                    <input type="number" data-item-id="a" data-item-property="system.quantity" value="1">
                    <a data-action="send-to-chat"></a>
                </div>
                <input type="checkbox" name="flag">
            </div>
        </div>
    "#;

    #[test]
    fn base_catalog_targets_expected_controls() {
        let content = Content::parse(Category::Items, MARKUP);
        let bound = bind(&content, base_bindings());
        // open-sidebar, item row drag, number input (enter + change), send-to-chat
        assert_eq!(bound.len(), 5);

        let checkbox = content.input_named("flag").unwrap();
        assert!(bound.handlers_for(checkbox.id, EventKind::Change).is_empty());

        let number = content.find_control(Control::is_item_property_input).unwrap();
        assert_eq!(bound.handlers_for(number.id, EventKind::Change).len(), 1);
        assert_eq!(bound.handlers_for(number.id, EventKind::KeyEnter).len(), 1);
        assert!(bound.handlers_for(number.id, EventKind::Click).is_empty());
    }

    #[test]
    fn binding_twice_gives_independent_tables() {
        let content = Content::parse(Category::Items, MARKUP);
        let first = bind(&content, base_bindings());
        let second = bind(&content, base_bindings());
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn custom_target_predicate() {
        let content = Content::parse(Category::Items, MARKUP);
        let mut bindings = Bindings::new();
        bindings.on(
            Target::Matching(|c| c.tag == "a"),
            EventKind::Click,
            |_, _| {},
        );
        assert_eq!(bind(&content, bindings).len(), 2);
    }

    #[test]
    fn interaction_constructors_set_kind() {
        let id = ControlId(0);
        assert_eq!(Interaction::click(id).event.kind(), EventKind::Click);
        assert_eq!(Interaction::change(id, "3").event.kind(), EventKind::Change);
        assert_eq!(Interaction::check(id, true).event.kind(), EventKind::Change);
        assert_eq!(Interaction::key_enter(id).event.kind(), EventKind::KeyEnter);
        assert_eq!(Interaction::drag_start(id).event.kind(), EventKind::DragStart);
    }
}
