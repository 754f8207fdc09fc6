//! In-memory document model for the site interaction layer.
//!
//! The document is an `ego_tree` arena of elements and text nodes, parsed
//! from HTML through `scraper`. On top of the tree it tracks what the
//! interaction layer needs from a browser: inline styles, class lists,
//! form control values, focus, host-provided layout boxes, the viewport and
//! a structural mutation counter.

#![allow(clippy::all)]

pub mod document;
pub mod error;
pub mod html;
pub mod layout;
pub mod node;
pub mod selector;

pub use document::Document;
pub use ego_tree::NodeId;
pub use error::DomError;
pub use layout::{LayoutBox, Rect, Viewport};
pub use node::{DomNode, ElementData};
pub use selector::Selector;
