//! # Core Type Definitions
//!
//! This module contains the shared types of the synthesis engine:
//! - Graph identifiers (`NodeId`, `EdgeId`) and edge weights (`EdgeWeight`, `Cost`)
//! - Graph records (`Node`, `Edge`)
//! - Error types (`SynthError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Use saturating arithmetic for accumulated costs

use crate::condition::Condition;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of an item (node) in the recipe graph.
///
/// Assigned monotonically at creation and never reused, so ids also encode
/// creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Identifier of a recipe (edge). Starts at 1, monotonic, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

/// Accumulated cost of a synthesis path.
pub type Cost = u64;

/// Cost of applying a single recipe.
///
/// Unsigned by construction: the synthesis search stops as soon as the goal
/// is selected, which is only sound for non-negative weights.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct EdgeWeight(pub u64);

impl EdgeWeight {
    /// Create a new edge weight with the given value.
    #[must_use]
    pub const fn new(weight: u64) -> Self {
        Self(weight)
    }

    /// Get the raw weight value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Add this weight to an accumulated cost, saturating at `Cost::MAX`.
    #[must_use]
    pub const fn extend(self, cost: Cost) -> Cost {
        cost.saturating_add(self.0)
    }
}

// =============================================================================
// NODE & EDGE
// =============================================================================

/// An item or state in the recipe graph.
///
/// Only live nodes are stored; removing a node drops its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
}

impl Node {
    #[must_use]
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// A recipe: a directed, weighted transformation from one item to another,
/// optionally gated by a condition over the held inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub weight: EdgeWeight,
    pub condition: Condition,
}

impl Edge {
    /// True when the recipe carries no condition at all.
    #[must_use]
    pub fn is_unconditional(&self) -> bool {
        self.condition.is_unconditional()
    }

    /// True when both endpoints match the given pair.
    #[must_use]
    pub fn connects(&self, from: NodeId, to: NodeId) -> bool {
        self.from == from && self.to == to
    }

    /// True when either endpoint is the given node.
    #[must_use]
    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the synthesis engine.
///
/// Every variant is recoverable at the call site. Operations validate before
/// mutating, so a returned error means the graph and inventory are unchanged.
/// An unreachable goal is not an error; see `synthesis::Outcome`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthError {
    /// A live node already carries this label.
    #[error("Node '{0}' already exists")]
    DuplicateNode(String),

    /// No live node carries this label.
    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    /// Labels and predicate names must be non-empty, whitespace-free and bounded.
    #[error("Invalid label: '{0}'")]
    InvalidLabel(String),

    /// A condition expression contains an empty atom (strict parsing only).
    #[error("Malformed condition: '{0}'")]
    MalformedCondition(String),

    /// The predicate is already held in the inventory.
    #[error("Condition '{0}' already in inventory")]
    DuplicatePredicate(String),

    /// The predicate is not held in the inventory.
    #[error("Condition '{0}' not in inventory")]
    PredicateNotFound(String),

    /// A documented capacity limit was reached.
    #[error("Maximum number of {what} reached ({limit})")]
    CapacityExceeded { what: &'static str, limit: usize },

    /// A snapshot or recipe book could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_weight_extend_saturates() {
        assert_eq!(EdgeWeight::new(5).extend(Cost::MAX - 1), Cost::MAX);
        assert_eq!(EdgeWeight::new(5).extend(10), 15);
    }

    #[test]
    fn edge_endpoint_helpers() {
        let edge = Edge {
            id: EdgeId(1),
            from: NodeId(0),
            to: NodeId(1),
            weight: EdgeWeight::new(3),
            condition: Condition::parse(""),
        };
        assert!(edge.connects(NodeId(0), NodeId(1)));
        assert!(!edge.connects(NodeId(1), NodeId(0)));
        assert!(edge.touches(NodeId(1)));
        assert!(!edge.touches(NodeId(2)));
        assert!(edge.is_unconditional());
    }

    #[test]
    fn error_messages_name_the_subject() {
        assert_eq!(
            SynthError::DuplicateNode("Water".into()).to_string(),
            "Node 'Water' already exists"
        );
        assert_eq!(
            SynthError::CapacityExceeded {
                what: "nodes",
                limit: 3
            }
            .to_string(),
            "Maximum number of nodes reached (3)"
        );
    }
}
