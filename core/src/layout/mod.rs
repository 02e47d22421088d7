//! Layout engine — positions and connector curves for rendering.
//!
//! The `position` module assigns every node an absolute rectangle and sizes
//! the canvas. The `connector` module derives the parent-child curves from the
//! positioned tree. Both are pure: the same tree always yields the same output.

pub mod connector;
pub mod position;

pub use connector::Connector;
pub use position::{layout, layout_with, Layout, LayoutConstants, PositionedNode};
