//! Tracktree core — a resource tree annotated with inherited tracks.
//!
//! A session ([`sys::Sys`]) holds a [`TrackRegistry`](data::registry::TrackRegistry)
//! and a rooted tree of [`Node`](types::node::Node)s. Nodes activate a subset
//! of their parent's tracks and carry one number per active track.
//!
//! - [`data::tree`] — copy-on-write mutations that keep the inheritance and
//!   quantity invariants.
//! - [`layout`] — positions every node and the connector curves between them.
//! - [`data::exchange`] — JSON export and import of `{tracks, tree}`.
//! - [`command`] / [`sys`] — one command per user action, one dispatch method.

pub mod command;
pub mod data;
pub mod error;
pub mod help;
pub mod layout;
pub mod response;
pub mod sys;
pub mod types;

pub use error::{Result, TreeError};
