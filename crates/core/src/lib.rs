//! Core types for saved grid views.
//!
//! Holds the snapshot data model, grid-state shapes, the share-token
//! codec and the pure default-resolution rules. Nothing in this crate
//! performs I/O.

pub mod codec;
pub mod error;
pub mod grid;
pub mod resolve;
pub mod snapshot;
pub mod types;
pub mod wire;
