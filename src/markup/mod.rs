//! Markup - string templates in, document nodes out (and back).
//!
//! - [`create_element`] - parse a fragment into exactly one detached node
//! - [`serialize`] / [`inner_markup`] - write a subtree back out
//! - [`escape`] / [`decode`] - character references
//!
//! # Example
//!
//! ```ignore
//! use trip_board::markup;
//!
//! let node = markup::create_element("<li class=\"trip-events__item\">Taxi</li>")?;
//! assert_eq!(markup::serialize(node), "<li class=\"trip-events__item\">Taxi</li>");
//! ```

mod entities;
mod parser;
mod serialize;

pub use entities::{decode, escape};
pub use parser::{create_element, is_void, VOID_ELEMENTS};
pub use serialize::{inner_markup, serialize};
