//! # synthgraph-core
//!
//! The deterministic synthesis engine for synthgraph.
//!
//! A recipe graph has items as nodes and recipes as weighted, directed edges.
//! A recipe may carry a condition over named predicates, and is usable only
//! while the held inventory satisfies it. The engine answers one question:
//! what is the cheapest sequence of usable recipes from one item to another?
//!
//! ## Layout
//!
//! - `types`, `primitives`: identifiers, records, errors and limits
//! - `inventory`, `condition`: held predicates and the OR-of-AND evaluator
//! - `graph`: the item and recipe store
//! - `synthesis`: condition-gated cheapest-path search
//! - `session`: graph + inventory + highlighted path
//! - `export`, `formats`, `book`: DOT rendering, binary snapshots, TOML books
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network, no logging dependency
//! - Deterministic: ordered collections only, integer costs only
//! - Every operation validates before mutating

// =============================================================================
// MODULES
// =============================================================================

pub mod book;
pub mod condition;
pub mod export;
pub mod formats;
pub mod graph;
pub mod inventory;
pub mod primitives;
pub mod session;
pub mod synthesis;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Cost, Edge, EdgeId, EdgeWeight, Node, NodeId, SynthError};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use book::{BookSummary, RecipeBook, RecipeEntry};
pub use condition::{Clause, Condition, satisfied};
pub use export::{EdgeStyle, render_dot};
pub use graph::Graph;
pub use inventory::Inventory;
pub use session::Session;
pub use synthesis::{Outcome, PathStep, SearchEvent, Synthesis, SynthesisEngine, SynthesisPath};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{SnapshotHeader, session_from_bytes, session_to_bytes};
