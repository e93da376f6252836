//! # synthgraph
//!
//! Application layer over `synthgraph-core`: the one-shot CLI, the
//! interactive command loop, Graphviz output and the HTTP API.

pub mod api;
pub mod cli;
pub mod command;
pub mod graphviz;
pub mod report;
