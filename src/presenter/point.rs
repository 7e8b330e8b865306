//! Point presenter - one waypoint switching between card and edit form.
//!
//! The mode machine is a pure function ([`transition`]); the presenter only
//! applies the effects it returns:
//!
//! ```text
//! Display --EditClick-------> Editing   [ShowForm, AttachCancelKey]
//! Editing --Submit|CancelKey-> Display  [ShowWaypoint, DetachCancelKey]
//! ```
//!
//! Anything else produces no effects.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, error, warn};

use crate::error::Result;
use crate::model::Waypoint;
use crate::render::{self, RenderPosition};
use crate::types::NodeId;
use crate::view::{Callback, Component, EditFormView, WaypointView};

use super::session::{EditSession, SessionMap};

// =============================================================================
// STATE MACHINE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointMode {
    #[default]
    Display,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointEvent {
    EditClick,
    Submit,
    CancelKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ShowForm,
    ShowWaypoint,
    AttachCancelKey,
    DetachCancelKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub mode: PointMode,
    pub effects: Vec<Effect>,
}

pub fn transition(mode: PointMode, event: PointEvent) -> Transition {
    use PointEvent::*;
    use PointMode::*;

    match (mode, event) {
        (Display, EditClick) => Transition {
            mode: Editing,
            effects: vec![Effect::ShowForm, Effect::AttachCancelKey],
        },
        (Editing, Submit | CancelKey) => Transition {
            mode: Display,
            effects: vec![Effect::ShowWaypoint, Effect::DetachCancelKey],
        },
        _ => Transition {
            mode,
            effects: Vec::new(),
        },
    }
}

// =============================================================================
// PRESENTER
// =============================================================================

/// Called with the point id right before a point enters `Editing`.
pub type BeforeEdit = Rc<dyn Fn(&str)>;

pub struct PointPresenter {
    id: String,
    mode: PointMode,
    waypoint_view: WaypointView,
    edit_view: EditFormView,
    container: NodeId,
    sessions: SessionMap,
    cancel_keys: Vec<String>,
    before_edit: Option<BeforeEdit>,
    weak_self: Weak<RefCell<PointPresenter>>,
}

fn event_callback(weak: Weak<RefCell<PointPresenter>>, event: PointEvent) -> Callback {
    Rc::new(move || {
        if let Some(presenter) = weak.upgrade() {
            PointPresenter::dispatch(&presenter, event);
        }
    })
}

impl PointPresenter {
    /// Build the presenter and both of its views. Nothing is rendered yet.
    pub fn new(
        point: Waypoint,
        container: NodeId,
        sessions: SessionMap,
        cancel_keys: Vec<String>,
        before_edit: Option<BeforeEdit>,
    ) -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|weak: &Weak<RefCell<Self>>| {
            let id = point.id.clone();
            let edit_view = EditFormView::new(point.clone(), event_callback(weak.clone(), PointEvent::Submit));
            let waypoint_view = WaypointView::new(point, event_callback(weak.clone(), PointEvent::EditClick));

            RefCell::new(Self {
                id,
                mode: PointMode::Display,
                waypoint_view,
                edit_view,
                container,
                sessions,
                cancel_keys,
                before_edit,
                weak_self: weak.clone(),
            })
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mode(&self) -> PointMode {
        self.mode
    }

    /// Node currently shown for this point, if materialized.
    pub fn mounted_node(&self) -> Option<NodeId> {
        match self.mode {
            PointMode::Display => self.waypoint_view.cache().get(),
            PointMode::Editing => self.edit_view.cache().get(),
        }
    }

    /// Render the waypoint card at the end of the container.
    pub fn init(&self) -> Result<()> {
        render::render(&self.waypoint_view, self.container, RenderPosition::Append)
    }

    /// Feed an event through the state machine and apply its effects.
    ///
    /// Effects are applied in order; if one fails the mode is left unchanged.
    pub fn handle(this: &Rc<RefCell<Self>>, event: PointEvent) -> Result<()> {
        let (id, mode, before_edit) = {
            let presenter = this.borrow();
            (presenter.id.clone(), presenter.mode, presenter.before_edit.clone())
        };

        let next = transition(mode, event);
        if next.effects.is_empty() {
            warn!(point = %id, ?mode, ?event, "interaction ignored");
            return Ok(());
        }

        if next.mode == PointMode::Editing {
            if let Some(before_edit) = before_edit {
                before_edit(&id);
            }
        }

        this.borrow_mut().apply(&next)?;
        debug!(point = %id, from = ?mode, to = ?next.mode, ?event, "transition");
        Ok(())
    }

    /// [`handle`](Self::handle) for event handlers: errors are logged and
    /// the point keeps its current mode.
    pub fn dispatch(this: &Rc<RefCell<Self>>, event: PointEvent) {
        if let Err(err) = Self::handle(this, event) {
            let id = this.borrow().id.clone();
            error!(point = %id, ?event, %err, "transition abandoned");
        }
    }

    /// Close the edit form if it is open.
    pub fn reset_view(this: &Rc<RefCell<Self>>) -> Result<()> {
        if this.borrow().mode == PointMode::Editing {
            Self::handle(this, PointEvent::CancelKey)?;
        }
        Ok(())
    }

    fn apply(&mut self, next: &Transition) -> Result<()> {
        for effect in &next.effects {
            match effect {
                Effect::ShowForm => render::replace(&self.edit_view, &self.waypoint_view)?,
                Effect::ShowWaypoint => render::replace(&self.waypoint_view, &self.edit_view)?,
                Effect::AttachCancelKey => self.attach_cancel_key(),
                Effect::DetachCancelKey => self.detach_cancel_key(),
            }
        }
        self.mode = next.mode;
        Ok(())
    }

    fn attach_cancel_key(&self) {
        let weak = self.weak_self.clone();
        let session = EditSession::open(self.id.clone(), &self.cancel_keys, move || {
            if let Some(presenter) = weak.upgrade() {
                PointPresenter::dispatch(&presenter, PointEvent::CancelKey);
            }
        });
        // A replaced session is dropped, which releases its listener
        self.sessions.borrow_mut().insert(self.id.clone(), session);
    }

    fn detach_cancel_key(&self) {
        let session = self.sessions.borrow_mut().remove(&self.id);
        if let Some(session) = session {
            session.close();
        }
    }

    /// Remove whichever node is mounted and release a live cancel listener.
    pub fn destroy(&mut self) {
        self.detach_cancel_key();
        render::remove(&self.waypoint_view);
        render::remove(&self.edit_view);
        self.mode = PointMode::Display;
        debug!(point = %self.id, "point destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{self, child_index, create_node, parent, query_class, query_tag, reset_document, root};
    use crate::events::keyboard::{self, listener_count, reset_keyboard_state};
    use crate::events::{click, reset_interaction_state, submit, KeyboardEvent};
    use crate::model::{Destination, EventType};
    use crate::presenter::session::session_map;
    use crate::types::NodeKind;
    use chrono::{TimeZone, Utc};

    fn setup() -> NodeId {
        reset_document();
        reset_interaction_state();
        reset_keyboard_state();
        let list = create_node(NodeKind::element("ul"));
        render::render_node(list, root(), RenderPosition::Append).unwrap();
        list
    }

    fn point(id: &str) -> Waypoint {
        Waypoint::new(
            id,
            EventType::Bus,
            Destination::new("Vienna", ""),
            Utc.with_ymd_and_hms(2026, 3, 18, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 18, 11, 0, 0).unwrap(),
            40,
        )
        .unwrap()
    }

    fn keys() -> Vec<String> {
        vec!["Escape".to_string(), "Esc".to_string()]
    }

    fn rollup(presenter: &Rc<RefCell<PointPresenter>>) -> NodeId {
        let node = presenter.borrow().mounted_node().unwrap();
        query_class(node, "event__rollup-btn").unwrap()
    }

    #[test]
    fn test_transition_table() {
        let open = transition(PointMode::Display, PointEvent::EditClick);
        assert_eq!(open.mode, PointMode::Editing);
        assert_eq!(open.effects, vec![Effect::ShowForm, Effect::AttachCancelKey]);

        for event in [PointEvent::Submit, PointEvent::CancelKey] {
            let close = transition(PointMode::Editing, event);
            assert_eq!(close.mode, PointMode::Display);
            assert_eq!(close.effects, vec![Effect::ShowWaypoint, Effect::DetachCancelKey]);
        }

        for (mode, event) in [
            (PointMode::Display, PointEvent::Submit),
            (PointMode::Display, PointEvent::CancelKey),
            (PointMode::Editing, PointEvent::EditClick),
        ] {
            let ignored = transition(mode, event);
            assert_eq!(ignored.mode, mode);
            assert!(ignored.effects.is_empty());
        }
    }

    #[test]
    fn test_edit_then_submit() {
        let list = setup();
        let sessions = session_map();
        let presenter = PointPresenter::new(point("1"), list, sessions.clone(), keys(), None);
        presenter.borrow().init().unwrap();

        let card = presenter.borrow().mounted_node().unwrap();
        assert_eq!(child_index(card), Some(0));

        click(rollup(&presenter));
        assert_eq!(presenter.borrow().mode(), PointMode::Editing);
        let form_item = presenter.borrow().mounted_node().unwrap();
        assert_eq!(parent(form_item), Some(list));
        assert_eq!(child_index(form_item), Some(0));
        assert_eq!(parent(card), None);
        assert_eq!(listener_count(), 1);
        assert!(sessions.borrow().contains_key("1"));

        submit(query_tag(form_item, "form").unwrap());
        assert_eq!(presenter.borrow().mode(), PointMode::Display);
        assert_eq!(presenter.borrow().mounted_node(), Some(card));
        assert_eq!(parent(card), Some(list));
        assert_eq!(listener_count(), 0);
        assert!(sessions.borrow().is_empty());
    }

    #[test]
    fn test_edit_then_cancel_key() {
        let list = setup();
        let presenter = PointPresenter::new(point("1"), list, session_map(), keys(), None);
        presenter.borrow().init().unwrap();
        let card = presenter.borrow().mounted_node().unwrap();

        click(rollup(&presenter));
        // Other keys leave the form open
        keyboard::dispatch(KeyboardEvent::new("x"));
        assert_eq!(presenter.borrow().mode(), PointMode::Editing);

        keyboard::dispatch(KeyboardEvent::new("Escape"));
        assert_eq!(presenter.borrow().mode(), PointMode::Display);
        assert_eq!(presenter.borrow().mounted_node(), Some(card));
        assert_eq!(listener_count(), 0);
    }

    #[test]
    fn test_reopen_reuses_form() {
        let list = setup();
        let presenter = PointPresenter::new(point("1"), list, session_map(), keys(), None);
        presenter.borrow().init().unwrap();

        click(rollup(&presenter));
        let form = presenter.borrow().mounted_node().unwrap();
        keyboard::dispatch(KeyboardEvent::new("Esc"));
        click(rollup(&presenter));
        assert_eq!(presenter.borrow().mounted_node(), Some(form));
        assert_eq!(listener_count(), 1);
    }

    #[test]
    fn test_before_edit_runs_first() {
        let list = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let before_edit: BeforeEdit = Rc::new(move |id| seen_clone.borrow_mut().push(id.to_string()));
        let presenter = PointPresenter::new(point("9"), list, session_map(), keys(), Some(before_edit));
        presenter.borrow().init().unwrap();

        click(rollup(&presenter));
        assert_eq!(*seen.borrow(), vec!["9"]);

        // Closing does not call it
        keyboard::dispatch(KeyboardEvent::new("Escape"));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_failed_swap_keeps_mode() {
        let list = setup();
        let presenter = PointPresenter::new(point("1"), list, session_map(), keys(), None);
        // Never rendered: the card has no parent to be replaced in
        let result = PointPresenter::handle(&presenter, PointEvent::EditClick);
        assert!(result.is_err());
        assert_eq!(presenter.borrow().mode(), PointMode::Display);
        assert_eq!(listener_count(), 0);
    }

    #[test]
    fn test_destroy_while_editing() {
        let list = setup();
        let sessions = session_map();
        let presenter = PointPresenter::new(point("1"), list, sessions.clone(), keys(), None);
        presenter.borrow().init().unwrap();
        click(rollup(&presenter));

        presenter.borrow_mut().destroy();
        assert!(dom::children(list).is_empty());
        assert_eq!(listener_count(), 0);
        assert!(sessions.borrow().is_empty());
        assert_eq!(presenter.borrow().mode(), PointMode::Display);
    }

    #[test]
    fn test_dropped_presenter_ignores_clicks() {
        let list = setup();
        let presenter = PointPresenter::new(point("1"), list, session_map(), keys(), None);
        presenter.borrow().init().unwrap();
        let button = rollup(&presenter);
        let card = dom::children(list)[0];

        drop(presenter);
        assert_eq!(click(button), 1);
        assert_eq!(dom::children(list), vec![card]);
        assert_eq!(listener_count(), 0);
    }
}
