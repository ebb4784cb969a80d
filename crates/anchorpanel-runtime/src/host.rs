//! Seams between the panel engine and its host.
//!
//! The engine never touches a real document, settings store or domain
//! model. Everything it consumes arrives through the traits here:
//!
//! - [`Controller`]: the owner that supplies subject, anchor and settings.
//! - [`TemplateBackend`]: turns contexts into markup; may suspend.
//! - [`Surface`]: the host-side panel element (install, measure, place).
//! - [`CategoryView`]: per-category content and listeners.

use anchorpanel_core::{Anchor, Category, Padding, PanelSettings, Size, SubItem, Subject};
use anchorpanel_layout::Placement;
use async_trait::async_trait;
use std::rc::Rc;

use crate::binder::Bindings;
use crate::content::Content;
use crate::error::TemplateError;
use crate::pipeline::RenderContext;

/// The owner of a panel.
///
/// Panels keep only a weak reference; when the owner goes away, render
/// passes fail with [`PanelError::Detached`](crate::PanelError::Detached)
/// and interactions are ignored.
pub trait Controller {
    /// Key of the owner, added as a class on the content root.
    fn key(&self) -> &str;

    fn subject(&self) -> Rc<dyn Subject>;

    /// Current anchor. Recomputed by the owner on every call.
    fn anchor(&self) -> Anchor;

    fn settings(&self) -> PanelSettings;

    /// Switch to, or away from, `category`.
    fn toggle_category(&self, category: Category);

    fn show_item_description(&self, _item: &SubItem) {}

    fn send_item_to_chat(&self, _item: &SubItem) {}

    fn begin_item_drag(&self, _item: &SubItem) {}
}

/// Markup producer. Calls may suspend.
#[async_trait(?Send)]
pub trait TemplateBackend {
    /// Preload partial templates by path.
    async fn load_templates(&self, paths: &[String]) -> Result<(), TemplateError>;

    /// Render the body of `category`.
    async fn render_template(
        &self,
        category: Category,
        context: &RenderContext,
    ) -> Result<String, TemplateError>;

    /// Render a named partial with arbitrary data.
    async fn render_partial(
        &self,
        name: &str,
        data: &serde_json::Value,
    ) -> Result<String, TemplateError>;
}

/// Measurements of installed content, taken by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentMetrics {
    /// Natural height of the scroll container if it could overflow.
    pub virtual_height: f32,
    /// Rendered height of the content root.
    pub inner_height: f32,
    /// Rendered height of the menu strip.
    pub menu_height: f32,
    /// Items whose name cell overflows its box.
    pub truncated_items: Vec<String>,
}

/// Host-side panel element.
pub trait Surface {
    fn viewport(&self) -> Size;

    fn padding(&self) -> Padding;

    /// Attach `content`, replacing whatever was attached before.
    ///
    /// The snapshot already carries restored scroll offset and focus.
    fn install(&mut self, content: &Content);

    fn measure(&self, content: &Content) -> ContentMetrics;

    /// Apply style annotations and tooltips computed after install.
    fn apply_layout(&mut self, content: &Content);

    /// Current bounding box of the panel element.
    fn panel_size(&self) -> Size;

    fn place(&mut self, placement: &Placement);

    /// Remove the panel element. `animate` is always `false`.
    fn teardown(&mut self, animate: bool);
}

/// One category variant of the panel.
#[async_trait(?Send)]
pub trait CategoryView {
    fn key(&self) -> Category;

    /// Partial templates to preload before this view first renders.
    fn partials(&self) -> Vec<String> {
        vec!["item_image".to_owned()]
    }

    /// Add category data to the prepared context.
    async fn build_category_content(
        &self,
        _subject: &dyn Subject,
        _context: &mut RenderContext,
    ) -> Result<(), TemplateError> {
        Ok(())
    }

    /// Register category-specific handlers. Called on every render.
    fn bind_category_listeners(&self, _bindings: &mut Bindings) {}
}
