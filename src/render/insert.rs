//! Insert nodes into mount points.

use tracing::debug;

use crate::dom::with_document_mut;
use crate::error::{BoardError, Result};
use crate::types::{NodeId, RenderPosition};
use crate::view::Component;

/// Insert `node` into `container` at `position`.
///
/// An attached node is moved, never duplicated.
///
/// # Errors
///
/// - `InvalidMountPoint` if the container is missing or detached, or if
///   `node` is the container or one of its ancestors
/// - `MissingAnchor` if a `Before` anchor is not a child of the container
pub fn render_node(node: NodeId, container: NodeId, position: RenderPosition) -> Result<()> {
    with_document_mut(|doc| {
        if !doc.contains(container) || !doc.is_connected(container) {
            return Err(BoardError::InvalidMountPoint(container));
        }
        if !doc.contains(node) || doc.is_inclusive_ancestor(node, container) {
            return Err(BoardError::InvalidMountPoint(container));
        }

        match position {
            RenderPosition::Prepend => {
                let first = doc.children(container).first().copied();
                doc.insert_before(container, node, first);
            }
            RenderPosition::Append => doc.append_child(container, node),
            RenderPosition::Before(anchor) => {
                if doc.parent(anchor) != Some(container) {
                    return Err(BoardError::MissingAnchor { anchor, container });
                }
                doc.insert_before(container, node, Some(anchor));
            }
        }
        Ok(())
    })?;

    debug!(node = %node, container = %container, ?position, "rendered");
    Ok(())
}

/// Materialize a component (if needed) and insert its node.
pub fn render(component: &dyn Component, container: NodeId, position: RenderPosition) -> Result<()> {
    let node = component.element()?;
    render_node(node, container, position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{self, reset_document, root};
    use crate::markup::create_element;

    fn setup() -> NodeId {
        reset_document();
        let container = create_element("<ul class=\"trip-events__list\"></ul>").unwrap();
        render_node(container, root(), RenderPosition::Append).unwrap();
        container
    }

    fn item(text: &str) -> NodeId {
        create_element(&format!("<li>{text}</li>")).unwrap()
    }

    #[test]
    fn test_positions() {
        let list = setup();
        let b = item("b");
        let a = item("a");
        let c = item("c");
        let x = item("x");

        render_node(b, list, RenderPosition::Append).unwrap();
        render_node(a, list, RenderPosition::Prepend).unwrap();
        render_node(c, list, RenderPosition::default()).unwrap();
        render_node(x, list, RenderPosition::Before(c)).unwrap();

        assert_eq!(dom::children(list), vec![a, b, x, c]);
    }

    #[test]
    fn test_rerender_moves() {
        let list = setup();
        let a = item("a");
        let b = item("b");
        render_node(a, list, RenderPosition::Append).unwrap();
        render_node(b, list, RenderPosition::Append).unwrap();

        render_node(a, list, RenderPosition::Append).unwrap();
        assert_eq!(dom::children(list), vec![b, a]);

        render_node(a, list, RenderPosition::Append).unwrap();
        assert_eq!(dom::children(list), vec![b, a]);
    }

    #[test]
    fn test_detached_container_rejected() {
        setup();
        let loose = create_element("<div></div>").unwrap();
        let a = item("a");
        let err = render_node(a, loose, RenderPosition::Append).unwrap_err();
        assert!(matches!(err, BoardError::InvalidMountPoint(id) if id == loose));
        assert_eq!(dom::parent(a), None);
    }

    #[test]
    fn test_destroyed_container_rejected() {
        let list = setup();
        dom::destroy(list);
        let a = item("a");
        assert!(matches!(
            render_node(a, list, RenderPosition::Append),
            Err(BoardError::InvalidMountPoint(_))
        ));
    }

    #[test]
    fn test_missing_anchor() {
        let list = setup();
        let a = item("a");
        let stray = item("stray");
        assert!(matches!(
            render_node(a, list, RenderPosition::Before(stray)),
            Err(BoardError::MissingAnchor { .. })
        ));
    }

    #[test]
    fn test_cannot_insert_into_own_subtree() {
        let list = setup();
        let a = item("a");
        render_node(a, list, RenderPosition::Append).unwrap();
        assert!(matches!(
            render_node(list, a, RenderPosition::Append),
            Err(BoardError::InvalidMountPoint(_))
        ));
    }
}
