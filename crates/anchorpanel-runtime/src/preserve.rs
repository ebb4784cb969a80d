//! Transient state carried across a content swap.
//!
//! Only a swap between snapshots of the same category keeps the scroll
//! offset and focused field. Every restore step is optional: a missing
//! scroll container or a vanished input silently skips that step.

use anchorpanel_core::Category;

use crate::content::{Content, ScrollOffset};

/// State captured from the outgoing snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransientState {
    pub scroll: Option<ScrollOffset>,
    pub focus: Option<String>,
}

/// Which restore steps took effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Restored {
    pub scroll: bool,
    pub focus: bool,
}

impl Restored {
    pub fn any(&self) -> bool {
        self.scroll || self.focus
    }
}

impl TransientState {
    /// Capture from `previous` if it was built for `next`.
    pub fn capture(previous: Option<&Content>, next: Category) -> Self {
        match previous {
            Some(old) if old.category() == next => Self {
                scroll: old.scroll_offset(),
                focus: old.focused().map(str::to_owned),
            },
            Some(old) => {
                tracing::debug!(
                    target: "anchorpanel.render",
                    from = %old.category(),
                    to = %next,
                    "category changed, transient state dropped"
                );
                Self::default()
            }
            None => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scroll.is_none() && self.focus.is_none()
    }

    /// Reapply onto freshly attached `content`.
    pub fn restore(&self, content: &mut Content) -> Restored {
        let mut restored = Restored::default();
        if let Some(name) = &self.focus {
            restored.focus = content.focus(name);
            if !restored.focus {
                tracing::debug!(target: "anchorpanel.render", name = %name, "focused input gone");
            }
        }
        if let Some(offset) = self.scroll {
            restored.scroll = content.set_scroll(offset);
            if !restored.scroll {
                tracing::debug!(target: "anchorpanel.render", "no scroll container to restore into");
            }
        }
        restored
    }
}
