//! # Graph Store
//!
//! Owns every item (node) and recipe (edge) of the recipe graph.
//!
//! - Nodes live in a `BTreeMap` keyed by monotonic `NodeId`, so iteration
//!   order is creation order. Removed nodes are dropped, never recycled.
//! - Edges live in a `Vec` in insertion order. That order is the edge-table
//!   order the synthesis search relies on for its tie-breaks.
//! - A label index resolves live labels to ids.

use crate::condition::Condition;
use crate::primitives::{MAX_EDGES, MAX_NODES, is_valid_label};
use crate::{Edge, EdgeId, EdgeWeight, Node, NodeId, SynthError};
use std::collections::BTreeMap;

/// The recipe graph.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Live nodes: NodeId -> Node
    nodes: BTreeMap<NodeId, Node>,

    /// Reverse lookup: label -> NodeId (live nodes only)
    labels: BTreeMap<String, NodeId>,

    /// Edge table in insertion order
    edges: Vec<Edge>,

    next_node_id: u64,
    next_edge_id: u64,
}

impl Default for Graph {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            labels: BTreeMap::new(),
            edges: Vec::new(),
            next_node_id: 0,
            next_edge_id: 1,
        }
    }
}

impl Graph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Add an item.
    pub fn add_node(&mut self, label: &str) -> Result<NodeId, SynthError> {
        if !is_valid_label(label) {
            return Err(SynthError::InvalidLabel(label.to_string()));
        }
        if self.labels.contains_key(label) {
            return Err(SynthError::DuplicateNode(label.to_string()));
        }
        if self.nodes.len() >= MAX_NODES {
            return Err(SynthError::CapacityExceeded {
                what: "nodes",
                limit: MAX_NODES,
            });
        }

        let id = NodeId(self.next_node_id);
        self.next_node_id = self.next_node_id.saturating_add(1);
        self.nodes.insert(id, Node::new(id, label));
        self.labels.insert(label.to_string(), id);
        Ok(id)
    }

    /// Remove an item and every recipe that produces or consumes it.
    ///
    /// Returns the removed recipes in edge-table order.
    pub fn remove_node(&mut self, label: &str) -> Result<Vec<Edge>, SynthError> {
        let id = self.resolve(label)?;
        self.nodes.remove(&id);
        self.labels.remove(label);
        Ok(self.drain_edges(|edge| edge.touches(id)))
    }

    /// Relabel an item. Its id and recipes are unchanged.
    pub fn rename_node(&mut self, old_label: &str, new_label: &str) -> Result<NodeId, SynthError> {
        let id = self.resolve(old_label)?;
        if !is_valid_label(new_label) {
            return Err(SynthError::InvalidLabel(new_label.to_string()));
        }
        if self.labels.contains_key(new_label) {
            return Err(SynthError::DuplicateNode(new_label.to_string()));
        }

        self.labels.remove(old_label);
        self.labels.insert(new_label.to_string(), id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.label = new_label.to_string();
        }
        Ok(id)
    }

    /// Add a recipe. An empty `condition` means the recipe is always usable.
    ///
    /// The condition is parsed leniently; callers wanting to reject
    /// malformed expressions should check with `Condition::parse_strict`.
    pub fn add_edge(
        &mut self,
        from_label: &str,
        to_label: &str,
        weight: EdgeWeight,
        condition: &str,
    ) -> Result<EdgeId, SynthError> {
        self.add_parsed_edge(from_label, to_label, weight, Condition::parse(condition))
    }

    /// Add a recipe whose condition is already parsed.
    pub fn add_parsed_edge(
        &mut self,
        from_label: &str,
        to_label: &str,
        weight: EdgeWeight,
        condition: Condition,
    ) -> Result<EdgeId, SynthError> {
        let from = self.resolve(from_label)?;
        let to = self.resolve(to_label)?;
        if self.edges.len() >= MAX_EDGES {
            return Err(SynthError::CapacityExceeded {
                what: "edges",
                limit: MAX_EDGES,
            });
        }

        let id = EdgeId(self.next_edge_id);
        self.next_edge_id = self.next_edge_id.saturating_add(1);
        self.edges.push(Edge {
            id,
            from,
            to,
            weight,
            condition,
        });
        Ok(id)
    }

    /// Remove every recipe from `from_label` to `to_label`, parallel ones
    /// included. Removing zero recipes is not an error.
    pub fn remove_edge(&mut self, from_label: &str, to_label: &str) -> Result<Vec<Edge>, SynthError> {
        let from = self.resolve(from_label)?;
        let to = self.resolve(to_label)?;
        Ok(self.drain_edges(|edge| edge.connects(from, to)))
    }

    fn drain_edges(&mut self, doomed: impl FnMut(&Edge) -> bool) -> Vec<Edge> {
        let (removed, kept): (Vec<Edge>, Vec<Edge>) =
            std::mem::take(&mut self.edges).into_iter().partition(doomed);
        self.edges = kept;
        removed
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    /// Resolve a label among live nodes.
    #[must_use]
    pub fn lookup_node(&self, label: &str) -> Option<NodeId> {
        self.labels.get(label).copied()
    }

    /// Resolve a label, failing with `NodeNotFound`.
    pub fn resolve(&self, label: &str) -> Result<NodeId, SynthError> {
        self.lookup_node(label)
            .ok_or_else(|| SynthError::NodeNotFound(label.to_string()))
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Label of a live node.
    #[must_use]
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|node| node.label.as_str())
    }

    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Live nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Live node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Recipes in edge-table order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Edge ids ascend along the table, so this is a binary search.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges
            .binary_search_by_key(&id, |edge| edge.id)
            .ok()
            .and_then(|index| self.edges.get(index))
    }

    #[must_use]
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edge(id).is_some()
    }

    /// Recipes leaving `id` whose product is live, ordered by product label.
    ///
    /// The ordering is for display; parallel recipes to the same product keep
    /// their edge-table order.
    #[must_use]
    pub fn outgoing_edges(&self, id: NodeId) -> Vec<&Edge> {
        let mut out: Vec<&Edge> = self
            .edges
            .iter()
            .filter(|edge| edge.from == id && self.contains_node(edge.to))
            .collect();
        out.sort_by(|a, b| self.label(a.to).cmp(&self.label(b.to)));
        out
    }

    /// Recipes producing `id`, in edge-table order.
    #[must_use]
    pub fn incoming_edges(&self, id: NodeId) -> Vec<&Edge> {
        self.edges.iter().filter(|edge| edge.to == id).collect()
    }

    /// Recipes leaving `id`, in edge-table order.
    pub(crate) fn edges_from(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges
            .iter()
            .filter(move |edge| edge.from == id && self.contains_node(edge.to))
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
