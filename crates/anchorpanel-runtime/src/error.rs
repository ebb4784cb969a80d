//! Errors surfaced by the runtime.

/// A template backend rejected a render request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("template `{template}` failed: {message}")]
pub struct TemplateError {
    pub template: String,
    pub message: String,
}

impl TemplateError {
    pub fn new(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            message: message.into(),
        }
    }
}

/// Why a render pass did not install new content.
///
/// No variant installs new content. A template failure keeps the previous
/// snapshot; a closed panel has none.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// The owning controller has been dropped.
    #[error("panel owner is gone")]
    Detached,
    /// The panel was closed before or during the pass.
    #[error("panel is closed")]
    Closed,
}
