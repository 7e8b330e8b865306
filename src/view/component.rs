//! Component capability - template in, cached node out.

use std::cell::Cell;

use crate::dom;
use crate::error::Result;
use crate::markup::create_element;
use crate::types::NodeId;

/// Cached root node of one component instance.
///
/// Holds at most one node. Each view owns its own cache.
#[derive(Debug, Default)]
pub struct ElementCache {
    node: Cell<Option<NodeId>>,
}

impl ElementCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached node, if it is still alive in the document.
    pub fn get(&self) -> Option<NodeId> {
        self.node.get().filter(|&node| dom::exists(node))
    }

    pub fn set(&self, node: NodeId) {
        self.node.set(Some(node));
    }

    /// Forget the cached node and hand it back.
    pub fn take(&self) -> Option<NodeId> {
        self.node.take()
    }
}

/// Anything that can be mounted by the renderer.
///
/// Implementors provide a markup template and own an [`ElementCache`].
/// `element` lazily parses the template on first access and returns the same
/// node afterwards; `remove_element` drops the cache so the next access
/// re-materializes from the current template.
pub trait Component {
    /// Markup for the component's single root element.
    fn template(&self) -> String;

    fn cache(&self) -> &ElementCache;

    /// Called once for every freshly materialized node (bind listeners here).
    fn on_materialize(&self, _node: NodeId) -> Result<()> {
        Ok(())
    }

    /// Root node, materialized on first access.
    fn element(&self) -> Result<NodeId> {
        if let Some(node) = self.cache().get() {
            return Ok(node);
        }
        let node = create_element(&self.template())?;
        self.cache().set(node);
        self.on_materialize(node)?;
        Ok(node)
    }

    /// Release the cached node. The node itself is left in the document.
    fn remove_element(&self) {
        self.cache().take();
    }
}
