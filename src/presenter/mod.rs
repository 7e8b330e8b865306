//! Presenter Module - Board state and the point mode machine
//!
//! - [`ContentPresenter`] - renders the board and reveals points in batches
//! - [`PointPresenter`] - one point, switching between card and edit form
//! - [`transition`] - pure Display/Editing machine
//! - [`EditSession`] - cancel-key listener owned by an open edit form

mod content;
mod point;
mod session;

pub use content::ContentPresenter;
pub use point::{transition, BeforeEdit, Effect, PointEvent, PointMode, PointPresenter, Transition};
pub use session::{session_map, EditSession, SessionMap};
