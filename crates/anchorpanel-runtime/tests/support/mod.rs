//! In-memory host used by the panel integration tests.

#![allow(dead_code)]

use anchorpanel_core::{
    Anchor, Category, Padding, PanelSettings, RuleToggle, Size, SubItem, Subject, ToggleDomains,
    ToggleSuboption,
};
use anchorpanel_layout::Placement;
use anchorpanel_runtime::{
    Bindings, CategoryView, Content, ContentMetrics, Control, ControlId, Controller, EventKind,
    FrameScheduler, Panel, RenderContext, ScrollOffset, Surface, Target, TemplateBackend,
    TemplateError,
};
use async_trait::async_trait;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};

pub const ITEMS_BODY: &str = r#"
<ol class="items">
  <li class="item" data-item-id="sword">
    <span class="name">Longsword</span>
    <input type="number" name="qty" data-item-id="sword" data-item-property="system.quantity" value="1">
    <a data-action="item-description"></a>
    <a data-action="send-to-chat"></a>
    <a data-action="roll"></a>
  </li>
  <li class="item" data-item-id="ghost">
    <span class="name">Ghost</span>
    <a data-action="item-description"></a>
  </li>
</ol>
<input type="search" name="filter" value="">
"#;

pub const SPELLS_BODY: &str = r#"<ol class="spells"><li class="item" data-item-id="bolt"><span class="name">Bolt</span></li></ol>"#;

// --- subject ---

#[derive(Debug, Clone, PartialEq)]
pub struct ToggleCall {
    pub domain: String,
    pub option: String,
    pub item_id: Option<String>,
    pub checked: bool,
    pub suboption: Option<String>,
}

pub struct FakeSubject {
    pub items: RefCell<BTreeMap<String, String>>,
    pub inventory: Cell<usize>,
    pub spellcasting: Cell<bool>,
    pub toggles: RefCell<ToggleDomains>,
    pub toggle_calls: RefCell<Vec<ToggleCall>>,
    pub property_calls: RefCell<Vec<(String, String, f64)>>,
}

impl FakeSubject {
    pub fn new() -> Self {
        let items = [("sword", "Longsword"), ("bolt", "Bolt")]
            .into_iter()
            .map(|(id, name)| (id.to_owned(), name.to_owned()))
            .collect();

        let rage = RuleToggle {
            domain: "attack".into(),
            option: "rage".into(),
            label: "Rage".into(),
            placement: Some("actions".into()),
            item_id: None,
            checked: false,
            suboptions: vec![
                ToggleSuboption {
                    value: "a".into(),
                    label: "A".into(),
                    selected: false,
                },
                ToggleSuboption {
                    value: "b".into(),
                    label: "B".into(),
                    selected: true,
                },
            ],
        };
        let mut toggles = ToggleDomains::new();
        toggles
            .entry("attack".into())
            .or_default()
            .insert("rage".into(), rage);

        Self {
            items: RefCell::new(items),
            inventory: Cell::new(1),
            spellcasting: Cell::new(true),
            toggles: RefCell::new(toggles),
            toggle_calls: RefCell::new(Vec::new()),
            property_calls: RefCell::new(Vec::new()),
        }
    }
}

impl Subject for FakeSubject {
    fn sub_item(&self, id: &str) -> Option<SubItem> {
        self.items
            .borrow()
            .get(id)
            .map(|name| SubItem::new(id, name.as_str()))
    }

    fn inventory_size(&self) -> usize {
        self.inventory.get()
    }

    fn has_spellcasting(&self) -> bool {
        self.spellcasting.get()
    }

    fn rule_toggles(&self) -> ToggleDomains {
        self.toggles.borrow().clone()
    }

    fn toggle_roll_option(
        &self,
        domain: &str,
        option: &str,
        item_id: Option<&str>,
        checked: bool,
        suboption: Option<&str>,
    ) {
        self.toggle_calls.borrow_mut().push(ToggleCall {
            domain: domain.to_owned(),
            option: option.to_owned(),
            item_id: item_id.map(str::to_owned),
            checked,
            suboption: suboption.map(str::to_owned),
        });
    }

    fn update_property(&self, item_id: &str, property: &str, value: f64) {
        self.property_calls
            .borrow_mut()
            .push((item_id.to_owned(), property.to_owned(), value));
    }
}

// --- controller ---

pub struct FakeController {
    pub subject: Rc<FakeSubject>,
    pub anchor: Cell<Anchor>,
    pub settings: Cell<PanelSettings>,
    pub toggled: RefCell<Vec<Category>>,
    pub described: RefCell<Vec<String>>,
    pub sent: RefCell<Vec<String>>,
    pub dragged: RefCell<Vec<String>>,
}

impl FakeController {
    pub fn new() -> Self {
        Self {
            subject: Rc::new(FakeSubject::new()),
            anchor: Cell::new(Anchor::new(500.0, 400.0)),
            settings: Cell::new(PanelSettings::default()),
            toggled: RefCell::new(Vec::new()),
            described: RefCell::new(Vec::new()),
            sent: RefCell::new(Vec::new()),
            dragged: RefCell::new(Vec::new()),
        }
    }
}

impl Controller for FakeController {
    fn key(&self) -> &str {
        "hud"
    }

    fn subject(&self) -> Rc<dyn Subject> {
        self.subject.clone()
    }

    fn anchor(&self) -> Anchor {
        self.anchor.get()
    }

    fn settings(&self) -> PanelSettings {
        self.settings.get()
    }

    fn toggle_category(&self, category: Category) {
        self.toggled.borrow_mut().push(category);
    }

    fn show_item_description(&self, item: &SubItem) {
        self.described.borrow_mut().push(item.id.clone());
    }

    fn send_item_to_chat(&self, item: &SubItem) {
        self.sent.borrow_mut().push(item.id.clone());
    }

    fn begin_item_drag(&self, item: &SubItem) {
        self.dragged.borrow_mut().push(item.id.clone());
    }
}

// --- template backend ---

#[derive(Default)]
pub struct FakeBackend {
    pub bodies: RefCell<HashMap<Category, String>>,
    /// Yield once inside every call.
    pub suspend: Cell<bool>,
    pub fail_template: Cell<bool>,
    pub fail_load: Cell<bool>,
    pub loads: RefCell<Vec<Vec<String>>>,
    pub renders: RefCell<Vec<Category>>,
    pub contexts: RefCell<Vec<Value>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend
            .bodies
            .borrow_mut()
            .insert(Category::Items, ITEMS_BODY.to_owned());
        backend
            .bodies
            .borrow_mut()
            .insert(Category::Spells, SPELLS_BODY.to_owned());
        backend
    }

    async fn pause(&self) {
        if self.suspend.get() {
            tokio::task::yield_now().await;
        }
    }
}

fn render_menu(data: &Value) -> String {
    let mut out = String::new();
    for entry in data["sidebars"].as_array().into_iter().flatten() {
        let id = entry["type"].as_str().unwrap_or_default();
        let disabled = if entry["disabled"].as_bool() == Some(true) {
            " disabled"
        } else {
            ""
        };
        let active = if entry["active"].as_bool() == Some(true) {
            " active"
        } else {
            ""
        };
        out.push_str(&format!(
            r#"<a class="sidebar{disabled}{active}" data-action="open-sidebar" data-sidebar="{id}"></a>"#
        ));
    }
    out
}

fn render_toggles(data: &Value) -> String {
    let mut out = String::new();
    for toggle in data["toggles"].as_array().into_iter().flatten() {
        let domain = toggle["domain"].as_str().unwrap_or_default();
        let option = toggle["option"].as_str().unwrap_or_default();
        let item_id = toggle["item_id"].as_str().unwrap_or_default();
        let checked = if toggle["checked"].as_bool() == Some(true) {
            " checked"
        } else {
            ""
        };
        let mut select = String::new();
        let suboptions = toggle["suboptions"].as_array().cloned().unwrap_or_default();
        if !suboptions.is_empty() {
            select.push_str(r#"<select data-action="set-suboption">"#);
            for sub in &suboptions {
                let value = sub["value"].as_str().unwrap_or_default();
                let selected = if sub["selected"].as_bool() == Some(true) {
                    " selected"
                } else {
                    ""
                };
                select.push_str(&format!(r#"<option value="{value}"{selected}>{value}</option>"#));
            }
            select.push_str("</select>");
        }
        out.push_str(&format!(
            r#"<div class="roll-option" data-domain="{domain}" data-option="{option}" data-item-id="{item_id}"><input type="checkbox" data-action="toggle-roll-option"{checked}>{select}</div>"#
        ));
    }
    out
}

#[async_trait(?Send)]
impl TemplateBackend for FakeBackend {
    async fn load_templates(&self, paths: &[String]) -> Result<(), TemplateError> {
        self.pause().await;
        self.loads.borrow_mut().push(paths.to_vec());
        if self.fail_load.get() {
            return Err(TemplateError::new("partials", "preload failed"));
        }
        Ok(())
    }

    async fn render_template(
        &self,
        category: Category,
        context: &RenderContext,
    ) -> Result<String, TemplateError> {
        self.pause().await;
        self.renders.borrow_mut().push(category);
        self.contexts
            .borrow_mut()
            .push(serde_json::to_value(context).unwrap());
        if self.fail_template.get() {
            return Err(TemplateError::new(category.as_str(), "backend unavailable"));
        }
        Ok(self
            .bodies
            .borrow()
            .get(&category)
            .cloned()
            .unwrap_or_default())
    }

    async fn render_partial(&self, name: &str, data: &Value) -> Result<String, TemplateError> {
        self.pause().await;
        match name {
            "sidebars" => Ok(render_menu(data)),
            "rolloptions" => Ok(render_toggles(data)),
            other => Err(TemplateError::new(other, "unknown partial")),
        }
    }
}

// --- surface ---

#[derive(Debug, Clone, PartialEq)]
pub struct Installed {
    pub category: Category,
    pub scroll: Option<ScrollOffset>,
    pub focused: Option<String>,
}

#[derive(Debug)]
pub struct FakeSurface {
    pub viewport: Size,
    pub padding: Padding,
    pub panel_size: Size,
    pub metrics: ContentMetrics,
    pub installed: Vec<Installed>,
    pub layouts: Vec<Vec<(&'static str, String)>>,
    pub placements: Vec<Placement>,
    pub teardowns: Vec<bool>,
}

impl Default for FakeSurface {
    fn default() -> Self {
        Self {
            viewport: Size::new(1000.0, 800.0),
            padding: Padding::default(),
            panel_size: Size::new(200.0, 100.0),
            metrics: ContentMetrics {
                virtual_height: 100.0,
                inner_height: 300.0,
                menu_height: 120.0,
                truncated_items: Vec::new(),
            },
            installed: Vec::new(),
            layouts: Vec::new(),
            placements: Vec::new(),
            teardowns: Vec::new(),
        }
    }
}

impl Surface for FakeSurface {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn padding(&self) -> Padding {
        self.padding
    }

    fn install(&mut self, content: &Content) {
        self.installed.push(Installed {
            category: content.category(),
            scroll: content.scroll_offset(),
            focused: content.focused().map(str::to_owned),
        });
    }

    fn measure(&self, _content: &Content) -> ContentMetrics {
        self.metrics.clone()
    }

    fn apply_layout(&mut self, content: &Content) {
        self.layouts.push(content.style().css_properties());
    }

    fn panel_size(&self) -> Size {
        self.panel_size
    }

    fn place(&mut self, placement: &Placement) {
        self.placements.push(*placement);
    }

    fn teardown(&mut self, animate: bool) {
        self.teardowns.push(animate);
    }
}

// --- frames ---

#[derive(Default)]
pub struct Frames(pub Cell<u32>);

impl FrameScheduler for Frames {
    fn request_frame(&self) {
        self.0.set(self.0.get() + 1);
    }
}

// --- views ---

pub struct View {
    key: Category,
    rolls: Option<Rc<Cell<u32>>>,
    partials: Option<Vec<String>>,
}

impl View {
    pub fn new(key: Category) -> Rc<dyn CategoryView> {
        Rc::new(Self {
            key,
            rolls: None,
            partials: None,
        })
    }

    /// A view that counts clicks on `[data-action="roll"]`.
    pub fn counting(key: Category, rolls: Rc<Cell<u32>>) -> Rc<dyn CategoryView> {
        Rc::new(Self {
            key,
            rolls: Some(rolls),
            partials: None,
        })
    }

    /// A view that preloads its own partials.
    pub fn with_partials(key: Category, partials: &[&str]) -> Rc<dyn CategoryView> {
        Rc::new(Self {
            key,
            rolls: None,
            partials: Some(partials.iter().map(|p| (*p).to_owned()).collect()),
        })
    }
}

#[async_trait(?Send)]
impl CategoryView for View {
    fn key(&self) -> Category {
        self.key
    }

    fn partials(&self) -> Vec<String> {
        self.partials
            .clone()
            .unwrap_or_else(|| vec!["item_image".to_owned()])
    }

    async fn build_category_content(
        &self,
        subject: &dyn Subject,
        context: &mut RenderContext,
    ) -> Result<(), TemplateError> {
        context.insert("inventory", subject.inventory_size())
    }

    fn bind_category_listeners(&self, bindings: &mut Bindings) {
        if let Some(rolls) = &self.rolls {
            let rolls = Rc::clone(rolls);
            bindings.on(Target::action("roll"), EventKind::Click, move |_, _| {
                rolls.set(rolls.get() + 1);
            });
        }
    }
}

// --- harness ---

pub struct Harness {
    pub controller: Rc<FakeController>,
    pub backend: Rc<FakeBackend>,
    pub frames: Rc<Frames>,
    pub panel: Panel<FakeSurface>,
}

impl Harness {
    pub fn new(view: Rc<dyn CategoryView>) -> Self {
        let controller = Rc::new(FakeController::new());
        let backend = Rc::new(FakeBackend::new());
        let frames = Rc::new(Frames::default());
        let shared: Rc<dyn Controller> = controller.clone();
        let owner: Weak<dyn Controller> = Rc::downgrade(&shared);
        let panel = Panel::new(
            owner,
            view,
            backend.clone(),
            FakeSurface::default(),
            frames.clone(),
        );
        Self {
            controller,
            backend,
            frames,
            panel,
        }
    }

    pub fn subject(&self) -> &FakeSubject {
        &self.controller.subject
    }

    /// First control matching `pred` in the installed snapshot.
    pub fn find(&self, pred: impl Fn(&Control) -> bool) -> ControlId {
        let content = self.panel.content().expect("content installed");
        content.find_control(pred).expect("control present").id
    }

    pub fn action(&self, action: &str) -> ControlId {
        self.find(|c| c.action.as_deref() == Some(action))
    }

    pub fn action_on(&self, action: &str, item_id: &str) -> ControlId {
        self.find(|c| c.action.as_deref() == Some(action) && c.item_id.as_deref() == Some(item_id))
    }

    pub fn menu_entry(&self, category: Category) -> ControlId {
        self.find(|c| {
            c.action.as_deref() == Some("open-sidebar") && c.data("sidebar") == Some(category.as_str())
        })
    }

    pub fn named(&self, name: &str) -> ControlId {
        self.find(|c| c.name.as_deref() == Some(name))
    }
}
