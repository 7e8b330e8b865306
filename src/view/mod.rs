//! View Module - Components rendered by the board
//!
//! Every view implements [`Component`]: a markup template plus an
//! [`ElementCache`] holding its materialized node. Views that react to user
//! input take a [`Callback`] and bind it in `on_materialize`, so listeners
//! live exactly as long as the node.
//!
//! - [`WaypointView`] / [`EditFormView`] - the two faces of one waypoint
//! - [`RouteWrapperView`], [`RouteInfoView`], [`RouteCostView`] - trip header
//! - [`MenuNavView`], [`FiltersView`] - controls
//! - [`SortingView`], [`TripEventsListView`], [`NoPointsView`] - events section
//! - [`mount_page`] - static page skeleton with its [`BoardMounts`]

use std::rc::Rc;

mod board;
mod chrome;
mod component;
mod edit_form;
pub mod format;
mod page;
mod waypoint;

pub use board::{NoPointsView, SortingView, TripEventsListView};
pub use chrome::{FiltersView, MenuNavView, RouteCostView, RouteInfoView, RouteWrapperView};
pub use component::{Component, ElementCache};
pub use edit_form::EditFormView;
pub use page::{mount_page, BoardMounts, PAGE_MARKUP};
pub use waypoint::WaypointView;

/// User interaction callback bound by a view.
pub type Callback = Rc<dyn Fn()>;
