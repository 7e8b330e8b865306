//! Interaction Module - Node-scoped click and submit listeners
//!
//! Listeners attach to a node and see events dispatched at that node or any of
//! its descendants (bubbling). The propagation path is computed before the
//! first listener runs, so listeners may freely replace or detach nodes.
//!
//! # Example
//!
//! ```ignore
//! use trip_board::events::{self, InteractionKind};
//!
//! let cleanup = events::on(button, InteractionKind::Click, |event| {
//!     println!("clicked {}", event.target);
//! });
//!
//! events::click(button);
//! cleanup();
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use crate::dom::{self, with_document};
use crate::types::NodeId;

// =============================================================================
// TYPES
// =============================================================================

/// Interaction kinds delivered to nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Click,
    Submit,
}

/// Interaction event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InteractionEvent {
    pub kind: InteractionKind,
    /// Node the event was dispatched at.
    pub target: NodeId,
    /// Node whose listener is running.
    pub current_target: NodeId,
}

pub type InteractionHandler = Rc<dyn Fn(&InteractionEvent)>;

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

#[derive(Default)]
struct HandlerRegistry {
    listeners: HashMap<(NodeId, InteractionKind), Vec<(usize, InteractionHandler)>>,
    next_id: usize,
}

impl HandlerRegistry {
    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::default());
}

fn is_registered(node: NodeId, kind: InteractionKind, id: usize) -> bool {
    REGISTRY.with(|reg| {
        reg.borrow()
            .listeners
            .get(&(node, kind))
            .is_some_and(|handlers| handlers.iter().any(|(handler_id, _)| *handler_id == id))
    })
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Listen for `kind` on `node` and its descendants. Returns cleanup function.
///
/// Listeners are dropped automatically when the node is destroyed.
pub fn on<F>(node: NodeId, kind: InteractionKind, handler: F) -> impl FnOnce()
where
    F: Fn(&InteractionEvent) + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.listeners
            .entry((node, kind))
            .or_default()
            .push((id, Rc::new(handler)));
        id
    });

    dom::on_destroy(node, move || remove(node, kind, id));

    move || remove(node, kind, id)
}

fn remove(node: NodeId, kind: InteractionKind, id: usize) {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        if let Some(handlers) = reg.listeners.get_mut(&(node, kind)) {
            handlers.retain(|(handler_id, _)| *handler_id != id);
            if handlers.is_empty() {
                reg.listeners.remove(&(node, kind));
            }
        }
    });
}

/// Deliver an event at `target`, bubbling to the root.
/// Returns the number of listeners that ran.
pub fn dispatch(target: NodeId, kind: InteractionKind) -> usize {
    let path: Vec<NodeId> = with_document(|doc| {
        let mut path = Vec::new();
        let mut current = doc.contains(target).then_some(target);
        while let Some(node) = current {
            path.push(node);
            current = doc.parent(node);
        }
        path
    });

    let mut ran = 0;
    for node in path {
        let handlers = REGISTRY.with(|reg| {
            reg.borrow()
                .listeners
                .get(&(node, kind))
                .cloned()
                .unwrap_or_default()
        });

        let event = InteractionEvent {
            kind,
            target,
            current_target: node,
        };
        for (id, handler) in handlers {
            if is_registered(node, kind, id) {
                handler(&event);
                ran += 1;
            }
        }
    }

    trace!(target = %target, ?kind, ran, "dispatched interaction");
    ran
}

pub fn click(target: NodeId) -> usize {
    dispatch(target, InteractionKind::Click)
}

pub fn submit(target: NodeId) -> usize {
    dispatch(target, InteractionKind::Submit)
}

/// Number of listeners attached to `node` for `kind`.
pub fn listener_count(node: NodeId, kind: InteractionKind) -> usize {
    REGISTRY.with(|reg| reg.borrow().listeners.get(&(node, kind)).map_or(0, Vec::len))
}

/// Clear all listeners (for testing)
pub fn reset_interaction_state() {
    REGISTRY.with(|reg| *reg.borrow_mut() = HandlerRegistry::default());
}

// =============================================================================
// TESTS
// =============================================================================
