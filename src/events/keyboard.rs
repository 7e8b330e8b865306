//! Keyboard Module - Document-level key listeners
//!
//! Key events are not routed to nodes. Listeners are attached to the document
//! as a whole, the way an edit session listens for its cancel key.
//!
//! # API
//!
//! - `last_event` - Get last keyboard event
//! - `last_key` - Get last key pressed
//! - `on(handler)` - Subscribe to all keyboard events
//! - `on_key(key, fn)` / `on_keys(keys, fn)` - Subscribe to specific key(s)
//! - `dispatch(event)` - Deliver an event
//!
//! # Example
//!
//! ```ignore
//! use trip_board::events::keyboard;
//!
//! // Subscribe to all keyboard events
//! let cleanup = keyboard::on(|event| {
//!     println!("Key: {}", event.key);
//!     false // Don't consume
//! });
//!
//! // Subscribe to specific keys
//! let cleanup = keyboard::on_keys(&["Escape", "Esc"], || {
//!     println!("cancel");
//!     true // Consume event
//! });
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{signal, Signal};

// =============================================================================
// TYPES
// =============================================================================

bitflags::bitflags! {
    /// Keyboard modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifier: u8 {
        const NONE  = 0;
        const SHIFT = 1 << 0;
        const ALT   = 1 << 1;
        const CTRL  = 1 << 2;
        const SUPER = 1 << 3;
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "Enter", "Escape")
    pub key: String,
    pub modifiers: Modifier,
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifier::NONE,
            state: KeyState::Press,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifier) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }

    /// Escape, under either of its historical key names.
    pub fn is_escape(&self) -> bool {
        self.key == "Escape" || self.key == "Esc"
    }
}

/// Handler for keyboard events. Return true to consume the event.
pub type KeyHandler = Rc<dyn Fn(&KeyboardEvent) -> bool>;

/// Handler for specific key. Return true to consume the event.
pub type KeySpecificHandler = Rc<dyn Fn() -> bool>;

// =============================================================================
// STATE
// =============================================================================

thread_local! {
    static LAST_EVENT: Signal<Option<KeyboardEvent>> = signal(None);
}

/// Get the last keyboard event
pub fn last_event() -> Option<KeyboardEvent> {
    LAST_EVENT.with(|s| s.get())
}

/// Get the last key pressed
pub fn last_key() -> String {
    last_event().map(|e| e.key).unwrap_or_default()
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

struct HandlerRegistry {
    global_handlers: Vec<(usize, KeyHandler)>,
    key_handlers: HashMap<String, Vec<(usize, KeySpecificHandler)>>,
    next_id: usize,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            global_handlers: Vec::new(),
            key_handlers: HashMap::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn is_registered(&self, id: usize) -> bool {
        self.global_handlers.iter().any(|(handler_id, _)| *handler_id == id)
            || self
                .key_handlers
                .values()
                .any(|handlers| handlers.iter().any(|(handler_id, _)| *handler_id == id))
    }

    fn remove_key_handler(&mut self, key: &str, id: usize) {
        if let Some(handlers) = self.key_handlers.get_mut(key) {
            handlers.retain(|(handler_id, _)| *handler_id != id);
            if handlers.is_empty() {
                self.key_handlers.remove(key);
            }
        }
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::new());
}

fn is_registered(id: usize) -> bool {
    REGISTRY.with(|reg| reg.borrow().is_registered(id))
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Dispatch a keyboard event to all registered handlers.
/// Returns true if any handler consumed the event.
///
/// Handlers are snapshotted before the first one runs, so a handler may add or
/// remove listeners (itself included). A handler removed by an earlier one in
/// the same dispatch is skipped.
pub fn dispatch(event: KeyboardEvent) -> bool {
    // Always update reactive state
    LAST_EVENT.with(|s| s.set(Some(event.clone())));

    // Only dispatch press events to handlers
    if !event.is_press() {
        return false;
    }

    let (key_handlers, global_handlers) = REGISTRY.with(|reg| {
        let reg = reg.borrow();
        let key_handlers = reg.key_handlers.get(&event.key).cloned().unwrap_or_default();
        (key_handlers, reg.global_handlers.clone())
    });

    for (id, handler) in key_handlers {
        if is_registered(id) && handler() {
            return true;
        }
    }

    for (id, handler) in global_handlers {
        if is_registered(id) && handler(&event) {
            return true;
        }
    }

    false
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe to all keyboard events.
/// Return true from handler to consume the event.
/// Returns cleanup function.
pub fn on<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.global_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            reg.global_handlers.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Subscribe to specific key.
/// Return true to consume the event.
/// Returns cleanup function.
pub fn on_key<F>(key: &str, handler: F) -> impl FnOnce() + use<F>
where
    F: Fn() -> bool + 'static,
{
    let key = key.to_string();
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.key_handlers
            .entry(key.clone())
            .or_default()
            .push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| reg.borrow_mut().remove_key_handler(&key, id));
    }
}

/// Subscribe to several keys with one handler.
///
/// The handler is registered once: a single dispatch runs it at most once
/// even if the event matches more than one key name.
/// Returns cleanup function.
pub fn on_keys<F>(keys: &[&str], handler: F) -> impl FnOnce() + use<F>
where
    F: Fn() -> bool + 'static,
{
    let handler: KeySpecificHandler = Rc::new(handler);
    let keys: Vec<String> = keys.iter().map(|key| key.to_string()).collect();

    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        for key in &keys {
            reg.key_handlers
                .entry(key.clone())
                .or_default()
                .push((id, handler.clone()));
        }
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            for key in &keys {
                reg.remove_key_handler(key, id);
            }
        });
    }
}

/// Number of live registrations (global plus key-specific).
pub fn listener_count() -> usize {
    REGISTRY.with(|reg| {
        let reg = reg.borrow();
        let mut ids: Vec<usize> = reg
            .key_handlers
            .values()
            .flat_map(|handlers| handlers.iter().map(|(id, _)| *id))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        reg.global_handlers.len() + ids.len()
    })
}

/// Clear all state and handlers.
pub fn cleanup() {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.global_handlers.clear();
        reg.key_handlers.clear();
    });
    LAST_EVENT.with(|s| s.set(None));
}

/// Reset keyboard state (for testing)
pub fn reset_keyboard_state() {
    cleanup();
    REGISTRY.with(|reg| {
        reg.borrow_mut().next_id = 0;
    });
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn setup() {
        reset_keyboard_state();
    }

    #[test]
    fn test_initial_state() {
        setup();
        assert!(last_event().is_none());
        assert_eq!(last_key(), "");
        assert_eq!(listener_count(), 0);
    }

    #[test]
    fn test_last_event_includes_releases() {
        setup();

        dispatch(KeyboardEvent::new("m"));
        assert_eq!(last_key(), "m");

        let release = KeyboardEvent {
            state: KeyState::Release,
            ..KeyboardEvent::new("Escape")
        };
        assert!(!dispatch(release.clone()));
        assert_eq!(last_event(), Some(release));
    }

    #[test]
    fn test_global_handler_until_cleanup() {
        setup();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let stop = on(move |event| {
            seen_clone.borrow_mut().push(event.key.clone());
            false
        });

        dispatch(KeyboardEvent::new("1"));
        dispatch(KeyboardEvent::new("s"));
        stop();
        dispatch(KeyboardEvent::new("q"));

        assert_eq!(*seen.borrow(), vec!["1", "s"]);
    }

    #[test]
    fn test_on_keys_matches_any_name() {
        setup();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        let cleanup = on_keys(&["Escape", "Esc"], move || {
            count_clone.set(count_clone.get() + 1);
            false
        });
        assert_eq!(listener_count(), 1);

        dispatch(KeyboardEvent::new("Escape"));
        dispatch(KeyboardEvent::new("Esc"));
        dispatch(KeyboardEvent::new("Enter"));
        assert_eq!(count.get(), 2);

        cleanup();
        assert_eq!(listener_count(), 0);

        dispatch(KeyboardEvent::new("Escape"));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_handler_consumption() {
        setup();

        let reached = Rc::new(Cell::new(false));
        let reached_clone = reached.clone();

        let _c1 = on_key("Enter", || true);
        let _c2 = on(move |_| {
            reached_clone.set(true);
            false
        });

        assert!(dispatch(KeyboardEvent::new("Enter")));
        assert!(!reached.get());
    }

    #[test]
    fn test_handler_can_remove_itself() {
        setup();

        let cleanup_slot: Rc<RefCell<Option<Box<dyn FnOnce()>>>> = Rc::new(RefCell::new(None));
        let slot_clone = cleanup_slot.clone();
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        let cleanup = on_key("Escape", move || {
            count_clone.set(count_clone.get() + 1);
            if let Some(cleanup) = slot_clone.borrow_mut().take() {
                cleanup();
            }
            false
        });
        *cleanup_slot.borrow_mut() = Some(Box::new(cleanup));

        dispatch(KeyboardEvent::new("Escape"));
        dispatch(KeyboardEvent::new("Escape"));
        assert_eq!(count.get(), 1);
        assert_eq!(listener_count(), 0);
    }

    #[test]
    fn test_removed_during_dispatch_is_skipped() {
        setup();

        let second_ran = Rc::new(Cell::new(false));
        let second_clone = second_ran.clone();
        let second_cleanup: Rc<RefCell<Option<Box<dyn FnOnce()>>>> = Rc::new(RefCell::new(None));
        let slot_clone = second_cleanup.clone();

        let _first = on_key("Escape", move || {
            if let Some(cleanup) = slot_clone.borrow_mut().take() {
                cleanup();
            }
            false
        });
        let second = on_key("Escape", move || {
            second_clone.set(true);
            false
        });
        *second_cleanup.borrow_mut() = Some(Box::new(second));

        dispatch(KeyboardEvent::new("Escape"));
        assert!(!second_ran.get());
    }

    #[test]
    fn test_held_cancel_key_fires_once() {
        setup();

        let closes = Rc::new(Cell::new(0));
        let closes_clone = closes.clone();
        let _stop = on_key("Escape", move || {
            closes_clone.set(closes_clone.get() + 1);
            false
        });

        for state in [KeyState::Press, KeyState::Repeat, KeyState::Repeat, KeyState::Release] {
            dispatch(KeyboardEvent {
                state,
                ..KeyboardEvent::new("Escape")
            });
        }
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_modifiers_reach_global_handlers() {
        setup();

        let saved = Rc::new(Cell::new(false));
        let saved_clone = saved.clone();
        let _stop = on(move |event| {
            if event.key == "Enter" && event.modifiers.contains(Modifier::CTRL) {
                saved_clone.set(true);
            }
            false
        });

        dispatch(KeyboardEvent::new("Enter"));
        assert!(!saved.get());
        dispatch(KeyboardEvent::with_modifiers("Enter", Modifier::CTRL | Modifier::SHIFT));
        assert!(saved.get());
    }

    #[test]
    fn test_is_escape() {
        assert!(KeyboardEvent::new("Escape").is_escape());
        assert!(KeyboardEvent::new("Esc").is_escape());
        assert!(!KeyboardEvent::new("Enter").is_escape());
    }
}
