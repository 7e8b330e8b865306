//! Model - waypoint records and the list that owns them.
//!
//! The board only reads from here. [`PointsModel`] is copied once when the
//! content presenter initializes.

pub mod mock;
mod point;
mod points_model;

pub use point::*;
pub use points_model::PointsModel;
