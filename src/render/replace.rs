//! Whole-node replacement and removal.

use tracing::debug;

use crate::dom::{self, with_document_mut};
use crate::error::{BoardError, Result};
use crate::types::NodeId;
use crate::view::Component;

/// Put `new` in the exact sibling slot of `old`, detaching `old`.
///
/// The swap happens inside one document borrow, so no observer sees both
/// nodes attached or both absent. `old` is detached, not destroyed, and can
/// be rendered again later.
///
/// # Errors
///
/// - `DetachedReplaceTarget` if `old` has no parent (or does not exist)
/// - `InvalidMountPoint` if `new` is missing or `new` contains `old`
pub fn replace_node(new: NodeId, old: NodeId) -> Result<()> {
    with_document_mut(|doc| {
        let Some(parent) = doc.parent(old) else {
            return Err(BoardError::DetachedReplaceTarget(old));
        };
        if new != old && (!doc.contains(new) || doc.is_inclusive_ancestor(new, old)) {
            return Err(BoardError::InvalidMountPoint(parent));
        }
        if doc.replace_child(new, old) {
            Ok(())
        } else {
            Err(BoardError::DetachedReplaceTarget(old))
        }
    })?;

    debug!(new = %new, old = %old, "replaced");
    Ok(())
}

/// Swap the node of `new_component` in for the node of `old_component`.
pub fn replace(new_component: &dyn Component, old_component: &dyn Component) -> Result<()> {
    let old = old_component.element()?;
    let new = new_component.element()?;
    replace_node(new, old)
}

/// Detach and destroy a component's node, then release its cache.
///
/// Components that were never materialized are left alone.
pub fn remove(component: &dyn Component) {
    if let Some(node) = component.cache().get() {
        dom::destroy(node);
        debug!(node = %node, "removed");
    }
    component.remove_element();
}
