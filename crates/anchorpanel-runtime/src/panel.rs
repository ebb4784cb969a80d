#![forbid(unsafe_code)]

//! The anchored panel.
//!
//! A [`Panel`] owns one installed [`Content`] snapshot at a time and drives
//! it through render passes, deferred repositioning and event dispatch.
//!
//! # Ordering
//!
//! `open`, `refresh` and `switch_to` all wait on one FIFO gate, so passes
//! never overlap and finish in the order they were requested. `close` does
//! not wait: it tears the panel down immediately and any pass still in
//! flight aborts with [`PanelError::Closed`] at its next suspension point.
//!
//! # Borrowing
//!
//! Panel state sits in `RefCell`s that are never held across an `.await`
//! or while a handler runs, so handlers may call back into the panel
//! (e.g. `close`) without panicking.

use anchorpanel_layout::{Placement, max_height_for, place};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::rc::{Rc, Weak};
use tokio::sync::Mutex;

use crate::binder::{EventTarget, HandlerContext, Interaction, UiEvent};
use crate::content::{Content, ScrollOffset};
use crate::error::PanelError;
use crate::host::{CategoryView, Controller, Surface, TemplateBackend};
use crate::pipeline::RenderReport;
use crate::scheduler::{FrameScheduler, RepositionScheduler, SchedulerStats};

/// Upper bound on follow-up events chained from one interaction.
pub const MAX_FOLLOW_UPS: usize = 8;

#[derive(Debug, Default)]
pub(crate) struct PanelState {
    pub(crate) open: bool,
    /// Partial paths already handed to the backend.
    pub(crate) loaded_partials: BTreeSet<String>,
    pub(crate) content: Option<Content>,
    pub(crate) placement: Option<Placement>,
    pub(crate) passes: u64,
    /// Bumped on close; passes started under an older epoch abort.
    pub(crate) epoch: u64,
}

/// An anchored floating panel.
pub struct Panel<S: Surface> {
    pub(crate) controller: Weak<dyn Controller>,
    pub(crate) backend: Rc<dyn TemplateBackend>,
    pub(crate) frames: Rc<dyn FrameScheduler>,
    pub(crate) view: RefCell<Rc<dyn CategoryView>>,
    pub(crate) surface: RefCell<S>,
    pub(crate) scheduler: RepositionScheduler,
    gate: Mutex<()>,
    pub(crate) state: RefCell<PanelState>,
}

impl<S: Surface> Panel<S> {
    pub fn new(
        controller: Weak<dyn Controller>,
        view: Rc<dyn CategoryView>,
        backend: Rc<dyn TemplateBackend>,
        surface: S,
        frames: Rc<dyn FrameScheduler>,
    ) -> Self {
        Self {
            controller,
            backend,
            frames,
            view: RefCell::new(view),
            surface: RefCell::new(surface),
            scheduler: RepositionScheduler::new(),
            gate: Mutex::new(()),
            state: RefCell::new(PanelState::default()),
        }
    }

    // --- render entry points ---

    /// Open the panel and render the current view.
    pub async fn open(&self) -> Result<RenderReport, PanelError> {
        let _turn = self.gate.lock().await;
        self.state.borrow_mut().open = true;
        self.run_pass().await
    }

    /// Re-render the current view. Fails with `Closed` on a closed panel.
    pub async fn refresh(&self) -> Result<RenderReport, PanelError> {
        let _turn = self.gate.lock().await;
        if !self.is_open() {
            return Err(PanelError::Closed);
        }
        self.run_pass().await
    }

    /// Replace the category view and render it, opening the panel if needed.
    ///
    /// The view is swapped only once this request reaches the front of the
    /// queue, so concurrent switches apply in call order and the last one wins.
    pub async fn switch_to(&self, view: Rc<dyn CategoryView>) -> Result<RenderReport, PanelError> {
        let _turn = self.gate.lock().await;
        tracing::debug!(target: "anchorpanel.render", category = %view.key(), "switching view");
        *self.view.borrow_mut() = view;
        self.state.borrow_mut().open = true;
        self.run_pass().await
    }

    /// Tear the panel down immediately, without animation.
    pub fn close(&self) {
        {
            let mut state = self.state.borrow_mut();
            if !state.open && state.content.is_none() {
                return;
            }
            state.open = false;
            state.epoch += 1;
            state.content = None;
            state.placement = None;
        }
        self.scheduler.cancel();
        self.surface.borrow_mut().teardown(false);
        tracing::debug!(target: "anchorpanel.render", "panel closed");
    }

    // --- repositioning ---

    /// Mark the placement stale. Requests at most one frame until it fires.
    pub fn notify_geometry_changed(&self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.scheduler.invalidate(self.frames.as_ref())
    }

    /// Frame callback. Repositions if a reposition is pending.
    pub fn on_frame(&self) -> Option<Placement> {
        if !self.scheduler.take() {
            return None;
        }
        self.reposition_now()
    }

    /// Compute and apply the placement right away.
    ///
    /// `None` when the panel is closed, has no content or lost its owner.
    pub fn reposition_now(&self) -> Option<Placement> {
        {
            let state = self.state.borrow();
            if !state.open || state.content.is_none() {
                return None;
            }
        }
        let controller = self.controller.upgrade()?;
        let anchor = controller.anchor();
        let height_percent = controller.settings().sanitized().sidebar_height;

        let placement = {
            let surface = self.surface.borrow();
            let viewport = surface.viewport();
            let max_height = max_height_for(&anchor, viewport, surface.padding(), height_percent);
            place(&anchor, surface.panel_size(), viewport, max_height)
        };
        self.surface.borrow_mut().place(&placement);
        self.state.borrow_mut().placement = Some(placement);
        tracing::debug!(
            target: "anchorpanel.position",
            left = placement.left,
            top = placement.top,
            max_height = placement.max_height,
            visible = placement.visible,
            "placed"
        );
        Some(placement)
    }

    // --- interaction ---

    /// Deliver an interaction to the handlers bound on the installed snapshot.
    ///
    /// Change events are recorded on the snapshot before handlers run.
    /// Follow-up events queued by handlers are delivered afterwards, up to
    /// [`MAX_FOLLOW_UPS`]. Returns the number of handler invocations.
    pub fn dispatch(&self, interaction: Interaction) -> usize {
        let Some(controller) = self.controller.upgrade() else {
            return 0;
        };
        let control_id = interaction.control;
        let mut queue = VecDeque::from([interaction.event]);
        let mut budget = MAX_FOLLOW_UPS;
        let mut invoked = 0;

        while let Some(event) = queue.pop_front() {
            let (handlers, target, active) = {
                let mut state = self.state.borrow_mut();
                if !state.open {
                    break;
                }
                let Some(content) = state.content.as_mut() else {
                    break;
                };
                if let UiEvent::Change { value, checked } = &event {
                    content.apply_change(control_id, value.as_deref(), *checked);
                }
                let Some(control) = content.control(control_id).cloned() else {
                    tracing::debug!(target: "anchorpanel.bind", control = control_id.0, "unknown control");
                    break;
                };
                let row = control.row.and_then(|index| content.row_state(index));
                let handlers = content.handlers.handlers_for(control_id, event.kind());
                (handlers, EventTarget { control, event, row }, content.category())
            };

            let cx = HandlerContext::new(Rc::clone(&controller), active);
            for handler in &handlers {
                handler(&cx, &target);
                invoked += 1;
            }
            for follow_up in cx.take_follow_ups() {
                if budget == 0 {
                    tracing::warn!(target: "anchorpanel.bind", "follow-up limit reached");
                    break;
                }
                budget -= 1;
                queue.push_back(follow_up);
            }
        }
        invoked
    }

    /// Record the host's scroll offset on the installed snapshot.
    pub fn record_scroll(&self, offset: ScrollOffset) -> bool {
        self.state
            .borrow_mut()
            .content
            .as_mut()
            .is_some_and(|content| content.set_scroll(offset))
    }

    /// Record which input has focus; `None` clears it.
    pub fn record_focus(&self, name: Option<&str>) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(content) = state.content.as_mut() else {
            return false;
        };
        match name {
            Some(name) => content.focus(name),
            None => {
                content.blur();
                true
            }
        }
    }

    // --- inspection ---

    pub fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    /// The installed snapshot.
    pub fn content(&self) -> Option<Ref<'_, Content>> {
        Ref::filter_map(self.state.borrow(), |state| state.content.as_ref()).ok()
    }

    pub fn placement(&self) -> Option<Placement> {
        self.state.borrow().placement
    }

    pub fn view(&self) -> Rc<dyn CategoryView> {
        Rc::clone(&*self.view.borrow())
    }

    pub fn surface(&self) -> Ref<'_, S> {
        self.surface.borrow()
    }

    pub fn surface_mut(&self) -> RefMut<'_, S> {
        self.surface.borrow_mut()
    }

    /// Render passes started so far, including failed ones.
    pub fn passes(&self) -> u64 {
        self.state.borrow().passes
    }

    pub fn scheduler_stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }
}

impl<S: Surface> fmt::Debug for Panel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Panel")
            .field("category", &self.view.borrow().key())
            .field("open", &state.open)
            .field("passes", &state.passes)
            .field("placement", &state.placement)
            .finish_non_exhaustive()
    }
}
