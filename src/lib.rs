//! # trip-board
//!
//! Travel itinerary board built from markup-mounted components.
//!
//! Every waypoint is shown as a read-only card that can be swapped in place
//! for an inline edit form, and back again on submit or a cancel key. More
//! waypoints are revealed in batches from a "new event" button.
//!
//! ## Architecture
//!
//! The board renders into an in-memory document owned by the current thread:
//! ```text
//! PointsModel → ContentPresenter → PointPresenter → {WaypointView, EditFormView}
//!             → render / replace → Document
//! ```
//!
//! Components produce markup; [`markup::create_element`] turns it into a
//! detached node, [`render::render`] mounts it and [`render::replace`] swaps
//! one mounted node for another at the same sibling index.
//!
//! ## Modules
//!
//! - [`types`] - Node handles and render positions
//! - [`dom`] - Thread-local document tree
//! - [`markup`] - Markup parsing, entities and serialization
//! - [`render`] - Insert, replace and remove
//! - [`events`] - Click/submit listeners and the keyboard registry
//! - [`view`] - Components
//! - [`presenter`] - Board orchestration and the point mode machine
//! - [`model`] - Waypoints and mock data
//! - [`config`] - Board configuration
//! - [`logging`] - Subscriber setup for the binary

pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod logging;
pub mod markup;
pub mod model;
pub mod presenter;
pub mod render;
pub mod types;
pub mod view;

// Re-export commonly used items
pub use types::*;

pub use error::{BoardError, Result};

pub use config::{BoardConfig, EditorPolicy};

pub use markup::{create_element, serialize};

pub use render::{remove, render, render_node, replace, replace_node};

pub use events::{click, submit, InteractionKind, KeyboardEvent};

pub use view::{mount_page, BoardMounts, Component, EditFormView, ElementCache, WaypointView};

pub use presenter::{
    transition, ContentPresenter, Effect, EditSession, PointEvent, PointMode, PointPresenter,
    Transition,
};

pub use model::{Destination, EventType, Offer, Picture, PointsModel, Waypoint};
