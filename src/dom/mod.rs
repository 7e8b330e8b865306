//! Document - the in-memory node tree components mount into.
//!
//! - Tree: arena of element/text nodes, parent/child links, destroy callbacks
//! - Query: descendant lookup by class or tag
//!
//! # Architecture
//!
//! Nodes are NOT objects. They are indices into one thread-local arena:
//!
//! ```text
//! #0 body        (parent=None)
//! #1 div.trip-main (parent=#0)
//! #2 ul.trip-events__list (parent=#1)
//! ```
//!
//! A node is "attached" when it is reachable from the root. Freshly parsed
//! nodes are detached until the renderer inserts them.

mod query;
mod tree;

pub use query::*;
pub use tree::*;
