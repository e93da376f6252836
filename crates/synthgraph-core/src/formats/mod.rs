//! # Formats Module
//!
//! Byte-level encodings of a session. Pure transformations only; file I/O
//! lives in the app layer.

mod snapshot;

pub use snapshot::*;
