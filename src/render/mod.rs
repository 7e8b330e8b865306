//! Renderer - mounting components into the document.
//!
//! - [`render`] / [`render_node`] - insert at a [`RenderPosition`]
//! - [`replace`] / [`replace_node`] - swap one mounted node for another in place
//! - [`remove`] - destroy a component's node and release its cache
//!
//! # Example
//!
//! ```ignore
//! use trip_board::render::{render, replace, RenderPosition};
//!
//! render(&waypoint_view, list, RenderPosition::Append)?;
//! replace(&edit_form_view, &waypoint_view)?; // form takes the waypoint's slot
//! replace(&waypoint_view, &edit_form_view)?; // and back
//! ```

mod insert;
mod replace;

pub use crate::types::RenderPosition;
pub use insert::{render, render_node};
pub use replace::{remove, replace, replace_node};
