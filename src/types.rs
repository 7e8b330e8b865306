//! Core types for trip-board.
//!
//! Node handles and insertion positions shared by the document, the markup
//! parser, the renderer and the presenters.

use std::fmt;

// =============================================================================
// NodeId
// =============================================================================

/// Handle to a node in the thread-local document.
///
/// Handles are indices into the document arena. A handle stays valid until the
/// node is destroyed; after that the index may be reused by a new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Node kind
// =============================================================================

/// What a document node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with a lowercase tag name and ordered attributes.
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    /// A run of decoded text.
    Text(String),
}

impl NodeKind {
    pub fn element(tag: impl Into<String>) -> Self {
        Self::Element {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element { .. })
    }

    /// Tag name for elements, `None` for text.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Element { tag, .. } => Some(tag),
            Self::Text(_) => None,
        }
    }
}

// =============================================================================
// Render position
// =============================================================================

/// Where `render` places a node inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPosition {
    /// First child of the container.
    Prepend,
    /// Last child of the container.
    #[default]
    Append,
    /// Immediately before an anchor that is a child of the container.
    Before(NodeId),
}
