//! Session data — the track registry, the resource tree engine, invariant
//! checks, and the exchange codec.

pub mod exchange;
pub mod registry;
pub mod tree;
pub mod validate;
