//! # Session Module
//!
//! A `Session` is the single mutable unit of the engine: the recipe graph,
//! the held inventory, and the recipes highlighted by the latest synthesis.
//!
//! Highlighting is session state, not graph state:
//! - `synthesize` replaces the highlight set wholesale, also when the goal
//!   turns out to be unreachable (the set is then empty)
//! - a synthesis that fails with `NodeNotFound` leaves it untouched
//! - removing recipes or items prunes ids that no longer exist, and drops
//!   the last synthesis once its path or endpoints are gone

use crate::graph::Graph;
use crate::inventory::Inventory;
use crate::synthesis::{Synthesis, SynthesisEngine};
use crate::{Edge, EdgeId, EdgeWeight, NodeId, SynthError};
use std::collections::BTreeSet;

/// Graph, inventory and highlight state for one user.
#[derive(Debug, Clone, Default)]
pub struct Session {
    graph: Graph,
    inventory: Inventory,
    highlighted: BTreeSet<EdgeId>,
    last: Option<Synthesis>,
}

impl Session {
    /// Create a new empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session around an existing graph and inventory.
    #[must_use]
    pub fn with_parts(graph: Graph, inventory: Inventory) -> Self {
        Self {
            graph,
            inventory,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Recipes on the most recent synthesis path.
    #[must_use]
    pub fn highlighted(&self) -> &BTreeSet<EdgeId> {
        &self.highlighted
    }

    #[must_use]
    pub fn is_highlighted(&self, edge: EdgeId) -> bool {
        self.highlighted.contains(&edge)
    }

    /// The most recent successful synthesis, if any. Cleared when a removal
    /// takes away one of its recipes or endpoints.
    #[must_use]
    pub fn last_synthesis(&self) -> Option<&Synthesis> {
        self.last.as_ref()
    }

    // =========================================================================
    // ITEMS
    // =========================================================================

    pub fn add_node(&mut self, label: &str) -> Result<NodeId, SynthError> {
        self.graph.add_node(label)
    }

    /// Remove an item and its recipes. Returns the recipes removed.
    pub fn remove_node(&mut self, label: &str) -> Result<Vec<Edge>, SynthError> {
        let removed = self.graph.remove_node(label)?;
        self.prune_highlights();
        Ok(removed)
    }

    pub fn rename_node(&mut self, old_label: &str, new_label: &str) -> Result<NodeId, SynthError> {
        self.graph.rename_node(old_label, new_label)
    }

    // =========================================================================
    // RECIPES
    // =========================================================================

    pub fn add_edge(
        &mut self,
        from_label: &str,
        to_label: &str,
        weight: EdgeWeight,
        condition: &str,
    ) -> Result<EdgeId, SynthError> {
        self.graph.add_edge(from_label, to_label, weight, condition)
    }

    /// Remove every recipe between two items. Returns the recipes removed.
    pub fn remove_edge(&mut self, from_label: &str, to_label: &str) -> Result<Vec<Edge>, SynthError> {
        let removed = self.graph.remove_edge(from_label, to_label)?;
        self.prune_highlights();
        Ok(removed)
    }

    fn prune_highlights(&mut self) {
        let graph = &self.graph;
        self.highlighted.retain(|&id| graph.contains_edge(id));

        let stale = self.last.as_ref().is_some_and(|last| {
            !graph.contains_node(last.start())
                || !graph.contains_node(last.goal())
                || last.highlighted().iter().any(|&id| !graph.contains_edge(id))
        });
        if stale {
            self.last = None;
        }
    }

    // =========================================================================
    // INVENTORY
    // =========================================================================

    pub fn add_condition(&mut self, name: &str) -> Result<(), SynthError> {
        self.inventory.insert(name)
    }

    pub fn remove_condition(&mut self, name: &str) -> Result<(), SynthError> {
        self.inventory.remove(name)
    }

    // =========================================================================
    // SYNTHESIS
    // =========================================================================

    /// Run a synthesis against the current inventory and adopt its highlight
    /// set.
    pub fn synthesize(&mut self, start: &str, goal: &str) -> Result<&Synthesis, SynthError> {
        let synthesis = SynthesisEngine::new(&self.graph, &self.inventory).run(start, goal)?;
        self.highlighted = synthesis.highlighted().clone();
        Ok(self.last.insert(synthesis))
    }

    /// Drop all highlights without running a synthesis.
    pub fn clear_highlights(&mut self) {
        self.highlighted.clear();
    }

    /// Mark a live recipe as highlighted. Used when restoring snapshots.
    pub(crate) fn highlight(&mut self, edge: EdgeId) -> bool {
        self.graph.contains_edge(edge) && self.highlighted.insert(edge)
    }

    pub(crate) fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub(crate) fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }
}

// =============================================================================
// TESTS
// =============================================================================
