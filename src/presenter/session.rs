//! Edit sessions - one cancel-key registration per open edit form.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::events::keyboard;

/// Live sessions keyed by point id.
pub type SessionMap = Rc<RefCell<HashMap<String, EditSession>>>;

pub fn session_map() -> SessionMap {
    Rc::new(RefCell::new(HashMap::new()))
}

/// Cancel-key listener owned by one open edit form.
///
/// The registration is released exactly once: by [`EditSession::close`], or
/// on drop if the session was never closed.
pub struct EditSession {
    point_id: String,
    cleanup: Option<Box<dyn FnOnce()>>,
}

impl EditSession {
    /// Register `on_cancel` for every key in `cancel_keys`.
    ///
    /// The handler never consumes the key, so every open session sees it.
    pub fn open<F>(point_id: impl Into<String>, cancel_keys: &[String], on_cancel: F) -> Self
    where
        F: Fn() + 'static,
    {
        let point_id = point_id.into();
        let keys: Vec<&str> = cancel_keys.iter().map(String::as_str).collect();
        let cleanup = keyboard::on_keys(&keys, move || {
            on_cancel();
            false
        });
        debug!(point = %point_id, "edit session opened");

        Self {
            point_id,
            cleanup: Some(Box::new(cleanup)),
        }
    }

    pub fn point_id(&self) -> &str {
        &self.point_id
    }

    pub fn is_open(&self) -> bool {
        self.cleanup.is_some()
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
            debug!(point = %self.point_id, "edit session closed");
        }
    }
}

impl Drop for EditSession {
    fn drop(&mut self) {
        self.release();
    }
}
