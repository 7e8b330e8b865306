//! Events - how interactions reach components.
//!
//! - **Interaction** - click/submit listeners on nodes, bubbling dispatch
//! - **Keyboard** - document-level key listeners and the last key event
//! - **Input** - crossterm key events converted for the keyboard module
//!
//! Everything here runs on the calling thread: a dispatch returns only after
//! every listener it reached has run to completion.

mod interaction;
pub mod input;
pub mod keyboard;

pub use interaction::*;
pub use keyboard::{KeyState, KeyboardEvent, Modifier};
