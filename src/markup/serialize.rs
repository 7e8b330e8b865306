//! Subtree serialization.
//!
//! Output reparses into a structurally equivalent tree: void elements have no
//! closing tag, every other element is closed explicitly (including ones that
//! were written self-closing), and text/attribute values are re-escaped.

use super::entities::{escape_attribute, escape_text};
use super::parser::is_void;
use crate::dom::{with_document, Document};
use crate::types::{NodeId, NodeKind};

/// Serialize a node and its subtree. Unknown handles serialize to "".
pub fn serialize(node: NodeId) -> String {
    with_document(|doc| {
        let mut out = String::new();
        write_node(doc, node, &mut out);
        out
    })
}

/// Serialize only the children of a node.
pub fn inner_markup(node: NodeId) -> String {
    with_document(|doc| {
        let mut out = String::new();
        for &child in doc.children(node) {
            write_node(doc, child, &mut out);
        }
        out
    })
}

enum Step<'a> {
    Node(NodeId),
    Close(&'a str),
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    let mut steps = vec![Step::Node(node)];

    while let Some(step) = steps.pop() {
        let node = match step {
            Step::Close(tag) => {
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
                continue;
            }
            Step::Node(node) => node,
        };

        match doc.kind(node) {
            Some(NodeKind::Text(text)) => out.push_str(&escape_text(text)),
            Some(NodeKind::Element { tag, attrs }) => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(value));
                    out.push('"');
                }
                out.push('>');

                if is_void(tag) {
                    continue;
                }
                steps.push(Step::Close(tag));
                steps.extend(doc.children(node).iter().rev().map(|&child| Step::Node(child)));
            }
            None => {}
        }
    }
}
