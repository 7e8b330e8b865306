//! Document tree - Arena of element and text nodes.
//!
//! Manages the lifecycle of document nodes:
//! - Index allocation with a free pool for reuse
//! - Parent/child links (a node has at most one parent)
//! - A permanent root (`<body>`) that defines "attached"
//! - Destroy callbacks so other registries can drop per-node state
//!
//! The document is thread-local. All mutation goes through a single
//! `borrow_mut`, so every primitive here is atomic for any observer.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::types::{NodeId, NodeKind};

// =============================================================================
// Node storage
// =============================================================================

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// The node arena.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only the root element.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.allocate(NodeKind::element("body"));
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocate a detached node.
    pub fn allocate(&mut self, kind: NodeKind) -> NodeId {
        let node = Node {
            kind,
            parent: None,
            children: Vec::new(),
        };
        match self.free.pop() {
            Some(index) => {
                self.nodes[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Check if a handle refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Count of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|node| &node.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Children of a node (empty for unknown handles).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    /// Position of a node among its parent's children.
    pub fn child_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    /// Check if a node is reachable from the root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Check if `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// Remove a node from its parent. Returns the old parent and index.
    pub fn detach(&mut self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let index = self.child_index(id)?;
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.remove(index);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
        Some((parent, index))
    }

    /// Insert `child` into `parent` before `reference`, or last if `reference`
    /// is `None` or not a child of `parent`.
    ///
    /// The child is detached from its current parent first, so inserting an
    /// attached node moves it. Callers must ensure `child` is not an inclusive
    /// ancestor of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if !self.contains(parent) || !self.contains(child) || reference == Some(child) {
            return;
        }
        self.detach(child);

        let Some(parent_node) = self.node_mut(parent) else {
            return;
        };
        let index = reference
            .and_then(|r| parent_node.children.iter().position(|&c| c == r))
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(index, child);

        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Put `new` in the exact slot held by `old`, detaching `old`.
    ///
    /// Returns false (and changes nothing) if `old` has no parent.
    pub fn replace_child(&mut self, new: NodeId, old: NodeId) -> bool {
        if self.parent(old).is_none() || !self.contains(new) {
            return false;
        }
        if new == old {
            return true;
        }

        // Detach first: `new` may be an earlier sibling of `old`.
        self.detach(new);

        let Some(parent) = self.parent(old) else {
            return false;
        };
        let Some(index) = self.child_index(old) else {
            return false;
        };
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children[index] = new;
        }
        if let Some(node) = self.node_mut(new) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(old) {
            node.parent = None;
        }
        true
    }

    /// Detach a node and free it with its whole subtree.
    ///
    /// Returns the freed handles. The root is never destroyed.
    pub fn destroy(&mut self, id: NodeId) -> Vec<NodeId> {
        if id == self.root || !self.contains(id) {
            return Vec::new();
        }
        self.detach(id);

        let mut freed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) {
                stack.extend(node.children);
                self.free.push(current.0);
                freed.push(current);
            }
        }
        freed
    }

    // -------------------------------------------------------------------------
    // Content
    // -------------------------------------------------------------------------

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.kind(id).and_then(NodeKind::tag)
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    /// Set an attribute, keeping its original position if it already exists.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(Node {
            kind: NodeKind::Element { attrs, .. },
            ..
        }) = self.node_mut(id)
        else {
            return;
        };
        match attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(Node {
            kind: NodeKind::Element { attrs, .. },
            ..
        }) = self.node_mut(id)
        {
            attrs.retain(|(key, _)| key != name);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attribute(id, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Concatenated text of a node and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match self.kind(current) {
                Some(NodeKind::Text(text)) => out.push_str(text),
                Some(NodeKind::Element { .. }) => {
                    stack.extend(self.children(current).iter().rev().copied());
                }
                None => {}
            }
        }
    }
}

// =============================================================================
// Thread-local document
// =============================================================================

thread_local! {
    static DOCUMENT: RefCell<Document> = RefCell::new(Document::new());

    /// Destroy callbacks registered per node.
    static DESTROY_CALLBACKS: RefCell<HashMap<NodeId, Vec<Box<dyn FnOnce()>>>> =
        RefCell::new(HashMap::new());
}

/// Run a read-only closure against the document.
pub fn with_document<R>(f: impl FnOnce(&Document) -> R) -> R {
    DOCUMENT.with(|doc| f(&doc.borrow()))
}

/// Run a mutating closure against the document in one borrow.
pub fn with_document_mut<R>(f: impl FnOnce(&mut Document) -> R) -> R {
    DOCUMENT.with(|doc| f(&mut doc.borrow_mut()))
}

pub fn root() -> NodeId {
    with_document(Document::root)
}

pub fn create_node(kind: NodeKind) -> NodeId {
    with_document_mut(|doc| doc.allocate(kind))
}

pub fn exists(id: NodeId) -> bool {
    with_document(|doc| doc.contains(id))
}

pub fn node_count() -> usize {
    with_document(Document::len)
}

pub fn parent(id: NodeId) -> Option<NodeId> {
    with_document(|doc| doc.parent(id))
}

pub fn children(id: NodeId) -> Vec<NodeId> {
    with_document(|doc| doc.children(id).to_vec())
}

pub fn child_index(id: NodeId) -> Option<usize> {
    with_document(|doc| doc.child_index(id))
}

pub fn is_connected(id: NodeId) -> bool {
    with_document(|doc| doc.contains(id) && doc.is_connected(id))
}

pub fn tag(id: NodeId) -> Option<String> {
    with_document(|doc| doc.tag(id).map(str::to_string))
}

pub fn attribute(id: NodeId, name: &str) -> Option<String> {
    with_document(|doc| doc.attribute(id, name).map(str::to_string))
}

pub fn set_attribute(id: NodeId, name: &str, value: &str) {
    with_document_mut(|doc| doc.set_attribute(id, name, value))
}

pub fn remove_attribute(id: NodeId, name: &str) {
    with_document_mut(|doc| doc.remove_attribute(id, name))
}

pub fn has_class(id: NodeId, class: &str) -> bool {
    with_document(|doc| doc.has_class(id, class))
}

pub fn text_content(id: NodeId) -> String {
    with_document(|doc| doc.text_content(id))
}

/// Detach a node from its parent without destroying it.
pub fn detach(id: NodeId) {
    with_document_mut(|doc| {
        doc.detach(id);
    })
}

// =============================================================================
// Destroy callbacks
// =============================================================================

/// Register a callback to run when `id` is destroyed.
pub fn on_destroy(id: NodeId, callback: impl FnOnce() + 'static) {
    DESTROY_CALLBACKS.with(|callbacks| {
        callbacks
            .borrow_mut()
            .entry(id)
            .or_default()
            .push(Box::new(callback));
    });
}

/// Destroy a node and its subtree, then run their destroy callbacks.
pub fn destroy(id: NodeId) {
    let freed = with_document_mut(|doc| doc.destroy(id));
    for node in freed {
        let callbacks = DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().remove(&node));
        for callback in callbacks.into_iter().flatten() {
            callback();
        }
    }
}

/// Reset the document to a bare root (for testing).
pub fn reset_document() {
    DOCUMENT.with(|doc| *doc.borrow_mut() = Document::new());
    DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().clear());
}
