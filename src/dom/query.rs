//! Descendant lookups by class name or tag.
//!
//! Searches are preorder and exclude the scope node itself.

use super::tree::{with_document, Document};
use crate::types::NodeId;

fn find_all(doc: &Document, scope: NodeId, matches: &dyn Fn(&Document, NodeId) -> bool) -> Vec<NodeId> {
    let mut found = Vec::new();
    let mut stack: Vec<NodeId> = doc.children(scope).iter().rev().copied().collect();
    while let Some(node) = stack.pop() {
        if matches(doc, node) {
            found.push(node);
        }
        stack.extend(doc.children(node).iter().rev().copied());
    }
    found
}

/// First descendant of `scope` carrying `class`.
pub fn query_class(scope: NodeId, class: &str) -> Option<NodeId> {
    query_class_all(scope, class).into_iter().next()
}

/// All descendants of `scope` carrying `class`, in document order.
pub fn query_class_all(scope: NodeId, class: &str) -> Vec<NodeId> {
    with_document(|doc| find_all(doc, scope, &|doc, node| doc.has_class(node, class)))
}

/// First descendant of `scope` with the given tag.
pub fn query_tag(scope: NodeId, tag: &str) -> Option<NodeId> {
    query_tag_all(scope, tag).into_iter().next()
}

pub fn query_tag_all(scope: NodeId, tag: &str) -> Vec<NodeId> {
    with_document(|doc| find_all(doc, scope, &|doc, node| doc.tag(node) == Some(tag)))
}

/// Nearest inclusive ancestor of `node` carrying `class`.
pub fn closest_class(node: NodeId, class: &str) -> Option<NodeId> {
    with_document(|doc| {
        let mut current = Some(node);
        while let Some(id) = current {
            if doc.has_class(id, class) {
                return Some(id);
            }
            current = doc.parent(id);
        }
        None
    })
}
