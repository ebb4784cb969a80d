#![forbid(unsafe_code)]

//! The render pass state machine.
//!
//! One pass walks every stage in order:
//!
//! | Stage | Suspends | Work |
//! |---|---|---|
//! | `PreFirstRender` | yes, once | preload partial templates |
//! | `ConfigureOptions` | no | resolve font size and layout settings |
//! | `PrepareContext` | yes | build the template context for the category |
//! | `BuildContent` | yes | render body, menu strip and toggle rows |
//! | `InstallContent` | no | swap snapshots, carry transient state |
//! | `PostRender` | no | column hint, menu dock, tooltips, handlers |
//! | `Reposition` | no | schedule a deferred reposition |
//!
//! Passes for one panel are serialized by the panel's FIFO gate, so they
//! complete in request order. After every suspension the pass checks that
//! the panel was not closed meanwhile; a closed panel aborts with
//! [`PanelError::Closed`] before touching the installed snapshot.

use anchorpanel_core::{Category, PanelSettings, Subject, menu_entries, toggles_for_placement};
use anchorpanel_layout::{Columns, column_count, max_height_for};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::Instrument;

use crate::binder::{base_bindings, bind};
use crate::content::{Content, MENU_CLASS, SCROLL_CONTAINER_CLASS};
use crate::error::{PanelError, TemplateError};
use crate::host::{CategoryView, Surface, TemplateBackend};
use crate::panel::Panel;
use crate::preserve::{Restored, TransientState};

/// Partial rendering the category menu strip.
pub const MENU_PARTIAL: &str = "sidebars";
/// Partial rendering toggle rows.
pub const TOGGLES_PARTIAL: &str = "rolloptions";

/// Stages of a render pass, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RenderStage {
    PreFirstRender,
    ConfigureOptions,
    PrepareContext,
    BuildContent,
    InstallContent,
    PostRender,
    Reposition,
}

impl RenderStage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreFirstRender => "pre_first_render",
            Self::ConfigureOptions => "configure_options",
            Self::PrepareContext => "prepare_context",
            Self::BuildContent => "build_content",
            Self::InstallContent => "install_content",
            Self::PostRender => "post_render",
            Self::Reposition => "reposition",
        }
    }

    /// Whether this stage may await the template backend.
    pub const fn may_suspend(self) -> bool {
        matches!(
            self,
            Self::PreFirstRender | Self::PrepareContext | Self::BuildContent
        )
    }
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render-time options resolved from settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub font_size: f32,
    pub multi_columns: bool,
    pub sidebar_height: f32,
}

impl RenderOptions {
    pub fn from_settings(settings: &PanelSettings) -> Self {
        let settings = settings.sanitized();
        Self {
            font_size: settings.sidebar_font_size,
            multi_columns: settings.multi_columns,
            sidebar_height: settings.sidebar_height,
        }
    }
}

/// `<kind>/<key>` template path.
pub fn template_path(kind: &str, key: &str) -> String {
    format!("{kind}/{key}")
}

/// Data handed to the template backend for the category body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderContext {
    pub category: Category,
    /// Localisation prefix, `sidebars.<category>`.
    pub i18n: String,
    /// Partial name → template path.
    pub partials: BTreeMap<String, String>,
    pub font_size: f32,
    /// Category-specific data added by the view.
    #[serde(flatten)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl RenderContext {
    pub fn new(category: Category, options: &RenderOptions, partials: &[String]) -> Self {
        Self {
            category,
            i18n: format!("sidebars.{category}"),
            partials: partials
                .iter()
                .map(|name| (name.clone(), template_path("partials", name)))
                .collect(),
            font_size: options.font_size,
            data: serde_json::Map::new(),
        }
    }

    /// Add a serializable value under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Serialize) -> Result<(), TemplateError> {
        let key = key.into();
        let value = serde_json::to_value(value)
            .map_err(|err| TemplateError::new(format!("context.{key}"), err.to_string()))?;
        self.data.insert(key, value);
        Ok(())
    }

    /// Resolve a partial name to its path.
    pub fn partial(&self, name: &str) -> String {
        self.partials
            .get(name)
            .cloned()
            .unwrap_or_else(|| template_path("partials", name))
    }
}

/// Outcome of a successful pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    /// 1-based pass counter for this panel.
    pub pass: u64,
    pub category: Category,
    /// Computed column count; `None` when multi-column is off.
    pub columns: Option<Columns>,
    pub restored: Restored,
    pub menu_at_bottom: bool,
}

fn single_entry(key: &str, value: impl Serialize) -> Result<serde_json::Value, TemplateError> {
    let value = serde_json::to_value(value)
        .map_err(|err| TemplateError::new(key.to_owned(), err.to_string()))?;
    let mut map = serde_json::Map::new();
    map.insert(key.to_owned(), value);
    Ok(serde_json::Value::Object(map))
}

fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wrap the rendered pieces in the content root.
pub fn assemble_markup(
    category: Category,
    owner_key: &str,
    menu: &str,
    toggles: &str,
    body: &str,
) -> String {
    let owner = escape_attr(owner_key);
    format!(
        "<div class=\"inner {category} {owner}\" data-tooltip-direction=\"UP\" data-sidebar=\"{category}\">\
         <div class=\"{MENU_CLASS}\">{menu}</div>\
         <div class=\"{SCROLL_CONTAINER_CLASS}\">{toggles}{body}</div>\
         </div>"
    )
}

/// `BuildContent`: render body, menu strip and toggle rows.
pub async fn build_markup(
    backend: &dyn TemplateBackend,
    category: Category,
    owner_key: &str,
    subject: &dyn Subject,
    context: &RenderContext,
) -> Result<String, TemplateError> {
    let body = backend.render_template(category, context).await?;

    let menu_data = single_entry("sidebars", menu_entries(subject, Some(category)))?;
    let menu = backend.render_partial(MENU_PARTIAL, &menu_data).await?;

    let mut toggles = String::new();
    if let Some(placement) = category.toggle_placement() {
        let found = toggles_for_placement(subject, placement);
        if !found.is_empty() {
            let data = single_entry("toggles", &found)?;
            toggles = backend.render_partial(TOGGLES_PARTIAL, &data).await?;
        }
    }

    Ok(assemble_markup(category, owner_key, &menu, &toggles, &body))
}

fn enter(stage: RenderStage) {
    tracing::Span::current().record("stage", stage.as_str());
    tracing::debug!(target: "anchorpanel.render", stage = stage.as_str(), "stage");
}

impl<S: Surface> Panel<S> {
    /// Run one full pass. Callers must hold the render gate.
    pub(crate) async fn run_pass(&self) -> Result<RenderReport, PanelError> {
        let (pass, epoch) = {
            let mut state = self.state.borrow_mut();
            state.passes += 1;
            (state.passes, state.epoch)
        };
        let view = Rc::clone(&*self.view.borrow());
        let span = tracing::debug_span!(
            "panel.render",
            category = %view.key(),
            pass,
            stage = tracing::field::Empty,
        );

        let result = self.drive(view, pass, epoch).instrument(span).await;
        match &result {
            Ok(report) => tracing::debug!(
                target: "anchorpanel.render",
                pass,
                category = %report.category,
                "render pass complete"
            ),
            Err(PanelError::Template(err)) => tracing::warn!(
                target: "anchorpanel.render",
                pass,
                error = %err,
                "render pass failed, keeping previous content"
            ),
            Err(err) => tracing::debug!(target: "anchorpanel.render", pass, error = %err, "render pass aborted"),
        }
        result
    }

    fn ensure_current(&self, epoch: u64) -> Result<(), PanelError> {
        let state = self.state.borrow();
        if state.open && state.epoch == epoch {
            Ok(())
        } else {
            Err(PanelError::Closed)
        }
    }

    async fn drive(
        &self,
        view: Rc<dyn CategoryView>,
        pass: u64,
        epoch: u64,
    ) -> Result<RenderReport, PanelError> {
        let controller = self.controller.upgrade().ok_or(PanelError::Detached)?;
        let subject = controller.subject();
        let category = view.key();

        enter(RenderStage::PreFirstRender);
        let missing: Vec<String> = {
            let state = self.state.borrow();
            view.partials()
                .iter()
                .map(|name| template_path("partials", name))
                .filter(|path| !state.loaded_partials.contains(path))
                .collect()
        };
        if !missing.is_empty() {
            self.backend.load_templates(&missing).await?;
            self.ensure_current(epoch)?;
            self.state.borrow_mut().loaded_partials.extend(missing);
        }

        enter(RenderStage::ConfigureOptions);
        let options = RenderOptions::from_settings(&controller.settings());

        enter(RenderStage::PrepareContext);
        let mut context = RenderContext::new(category, &options, &view.partials());
        view.build_category_content(subject.as_ref(), &mut context)
            .await?;
        self.ensure_current(epoch)?;

        enter(RenderStage::BuildContent);
        let markup = build_markup(
            self.backend.as_ref(),
            category,
            controller.key(),
            subject.as_ref(),
            &context,
        )
        .await?;
        self.ensure_current(epoch)?;
        let mut content = Content::parse(category, markup);
        content.style_mut().font_size = options.font_size;

        // Everything below is synchronous: no close can interleave.
        enter(RenderStage::InstallContent);
        let anchor = controller.anchor();
        let (viewport, padding) = {
            let surface = self.surface.borrow();
            (surface.viewport(), surface.padding())
        };

        let mut state = self.state.borrow_mut();
        let transient = TransientState::capture(state.content.as_ref(), category);
        let restored = transient.restore(&mut content);
        let content = state.content.insert(content);
        self.surface.borrow_mut().install(content);

        enter(RenderStage::PostRender);
        let metrics = self.surface.borrow().measure(content);
        let columns = options.multi_columns.then(|| {
            let max = max_height_for(&anchor, viewport, padding, options.sidebar_height);
            column_count(metrics.virtual_height, max)
        });
        let menu_at_bottom = metrics.inner_height < metrics.menu_height;
        {
            let style = content.style_mut();
            style.columns = columns.filter(|c| c.is_multi());
            style.menu_at_bottom = menu_at_bottom;
        }
        let tooltips: Vec<(String, String)> = content
            .items()
            .iter()
            .filter(|item| metrics.truncated_items.contains(&item.item_id))
            .map(|item| (item.item_id.clone(), item.text.clone()))
            .collect();
        for (item_id, text) in tooltips {
            content.set_tooltip(&item_id, text);
        }
        self.surface.borrow_mut().apply_layout(content);

        let mut bindings = base_bindings();
        view.bind_category_listeners(&mut bindings);
        let handlers = bind(content, bindings);
        content.handlers = handlers;
        drop(state);

        enter(RenderStage::Reposition);
        self.notify_geometry_changed();

        Ok(RenderReport {
            pass,
            category,
            columns,
            restored,
            menu_at_bottom,
        })
    }
}
