//! Plain data types shared by every component: tracks, nodes, settings.

pub mod config;
pub mod node;
pub mod track;
