//! # Synthesis Engine
//!
//! Condition-gated single-source shortest path: Dijkstra's algorithm where a
//! recipe may be used only if its condition holds against the inventory
//! snapshot taken when the search starts.
//!
//! ## Determinism
//!
//! - The next node to visit is the unvisited live node with the smallest
//!   known cost; ties go to the node created first.
//! - Recipes leaving a node are relaxed in edge-table order, and only a
//!   strictly cheaper cost replaces a known one.
//! - For each step of the reconstructed path, the first recipe in edge-table
//!   order that is admissible and accounts exactly for the cost difference is
//!   the one highlighted.
//!
//! Admissibility is binary: an inadmissible recipe is skipped, never
//! penalised. Weights are unsigned, so stopping once the goal is selected
//! cannot miss a cheaper route.

use crate::graph::Graph;
use crate::inventory::Inventory;
use crate::{Cost, Edge, EdgeId, EdgeWeight, NodeId, SynthError};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// RESULT TYPES
// =============================================================================

/// One step of the search, recorded in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEvent {
    /// A node was selected and marked visited.
    Visit { node: NodeId, distance: Cost },
    /// A recipe was skipped because its condition does not hold.
    Skip { edge: EdgeId },
    /// A recipe was admissible and its relaxation attempted.
    Consider { edge: EdgeId },
    /// A cheaper cost to `node` was found through `edge`.
    Relax {
        node: NodeId,
        distance: Cost,
        edge: EdgeId,
    },
}

/// A single recipe application on the chosen path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub edge: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub weight: EdgeWeight,
}

/// The cheapest route from start to goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisPath {
    /// Nodes from start to goal inclusive.
    pub nodes: Vec<NodeId>,
    /// One step per consecutive node pair.
    pub steps: Vec<PathStep>,
    pub cost: Cost,
}

/// Whether the goal can be synthesized under the current inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Path(SynthesisPath),
    /// No admissible route exists. A valid answer, not an error.
    Unreachable,
}

/// The full result of one synthesis query.
#[derive(Debug, Clone)]
pub struct Synthesis {
    start: NodeId,
    goal: NodeId,
    /// Finite costs only; an absent node is unreachable (or was never reached
    /// before the search stopped).
    distances: BTreeMap<NodeId, Cost>,
    predecessors: BTreeMap<NodeId, NodeId>,
    highlighted: BTreeSet<EdgeId>,
    trace: Vec<SearchEvent>,
    outcome: Outcome,
}

impl Synthesis {
    #[must_use]
    pub fn start(&self) -> NodeId {
        self.start
    }

    #[must_use]
    pub fn goal(&self) -> NodeId {
        self.goal
    }

    /// Known cost to `node`, `None` meaning infinite.
    #[must_use]
    pub fn distance(&self, node: NodeId) -> Option<Cost> {
        self.distances.get(&node).copied()
    }

    #[must_use]
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.predecessors.get(&node).copied()
    }

    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    #[must_use]
    pub fn path(&self) -> Option<&SynthesisPath> {
        match &self.outcome {
            Outcome::Path(path) => Some(path),
            Outcome::Unreachable => None,
        }
    }

    #[must_use]
    pub fn cost(&self) -> Option<Cost> {
        self.path().map(|path| path.cost)
    }

    #[must_use]
    pub fn is_reachable(&self) -> bool {
        matches!(self.outcome, Outcome::Path(_))
    }

    /// Recipes on the chosen path. Empty when unreachable.
    #[must_use]
    pub fn highlighted(&self) -> &BTreeSet<EdgeId> {
        &self.highlighted
    }

    #[must_use]
    pub fn is_highlighted(&self, edge: EdgeId) -> bool {
        self.highlighted.contains(&edge)
    }

    #[must_use]
    pub fn trace(&self) -> &[SearchEvent] {
        &self.trace
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Runs synthesis queries against a graph and an inventory snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisEngine<'a> {
    graph: &'a Graph,
    inventory: &'a Inventory,
}

impl<'a> SynthesisEngine<'a> {
    #[must_use]
    pub fn new(graph: &'a Graph, inventory: &'a Inventory) -> Self {
        Self { graph, inventory }
    }

    /// Find the cheapest way to synthesize `goal_label` from `start_label`.
    ///
    /// Fails only with `NodeNotFound`; an unreachable goal is reported through
    /// `Outcome::Unreachable`.
    pub fn run(&self, start_label: &str, goal_label: &str) -> Result<Synthesis, SynthError> {
        let start = self.graph.resolve(start_label)?;
        let goal = self.graph.resolve(goal_label)?;
        Ok(self.run_between(start, goal))
    }

    /// Same as `run` for already-resolved live nodes.
    #[must_use]
    pub fn run_between(&self, start: NodeId, goal: NodeId) -> Synthesis {
        let mut distances = BTreeMap::from([(start, 0)]);
        let mut predecessors = BTreeMap::new();
        let mut visited = BTreeSet::new();
        let mut trace = Vec::new();

        for _ in 0..self.graph.node_count() {
            // min_by_key keeps the first of equal minima: creation order wins.
            let next = self
                .graph
                .node_ids()
                .filter(|id| !visited.contains(id))
                .filter_map(|id| distances.get(&id).map(|&distance| (id, distance)))
                .min_by_key(|&(_, distance)| distance);

            let Some((current, current_distance)) = next else {
                break;
            };
            if current == goal {
                break;
            }

            visited.insert(current);
            trace.push(SearchEvent::Visit {
                node: current,
                distance: current_distance,
            });

            for edge in self.graph.edges_from(current) {
                if !self.admissible(edge) {
                    trace.push(SearchEvent::Skip { edge: edge.id });
                    continue;
                }
                trace.push(SearchEvent::Consider { edge: edge.id });

                let candidate = edge.weight.extend(current_distance);
                if distances
                    .get(&edge.to)
                    .is_none_or(|&known| candidate < known)
                {
                    distances.insert(edge.to, candidate);
                    predecessors.insert(edge.to, current);
                    trace.push(SearchEvent::Relax {
                        node: edge.to,
                        distance: candidate,
                        edge: edge.id,
                    });
                }
            }
        }

        let (outcome, highlighted) = match self.reconstruct(start, goal, &distances, &predecessors)
        {
            Some(path) => {
                let highlighted = path.steps.iter().map(|step| step.edge).collect();
                (Outcome::Path(path), highlighted)
            }
            None => (Outcome::Unreachable, BTreeSet::new()),
        };

        Synthesis {
            start,
            goal,
            distances,
            predecessors,
            highlighted,
            trace,
            outcome,
        }
    }

    fn admissible(&self, edge: &Edge) -> bool {
        edge.condition.satisfied_by(self.inventory)
    }

    /// Walk predecessors back from the goal, then pick one recipe per step.
    fn reconstruct(
        &self,
        start: NodeId,
        goal: NodeId,
        distances: &BTreeMap<NodeId, Cost>,
        predecessors: &BTreeMap<NodeId, NodeId>,
    ) -> Option<SynthesisPath> {
        let cost = *distances.get(&goal)?;

        let mut nodes = vec![goal];
        let mut current = goal;
        while let Some(&previous) = predecessors.get(&current) {
            nodes.push(previous);
            current = previous;
            if nodes.len() > self.graph.node_count() {
                return None;
            }
        }
        if current != start {
            return None;
        }
        nodes.reverse();

        let mut steps = Vec::with_capacity(nodes.len().saturating_sub(1));
        for pair in nodes.windows(2) {
            let &[from, to] = pair else { continue };
            let (Some(&from_cost), Some(&to_cost)) = (distances.get(&from), distances.get(&to))
            else {
                continue;
            };
            let chosen = self.graph.edges().find(|edge| {
                edge.connects(from, to)
                    && self.admissible(edge)
                    && edge.weight.extend(from_cost) == to_cost
            });
            if let Some(edge) = chosen {
                steps.push(PathStep {
                    edge: edge.id,
                    from,
                    to,
                    weight: edge.weight,
                });
            }
        }

        Some(SynthesisPath { nodes, steps, cost })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// A→B (1), B→C (1, needs `key`), A→C (5).
    fn key_graph() -> Graph {
        let mut graph = Graph::new();
        for label in ["A", "B", "C"] {
            graph.add_node(label).expect("add");
        }
        graph.add_edge("A", "B", EdgeWeight::new(1), "").expect("edge");
        graph.add_edge("B", "C", EdgeWeight::new(1), "key").expect("edge");
        graph.add_edge("A", "C", EdgeWeight::new(5), "").expect("edge");
        graph
    }

    fn labels(graph: &Graph, synthesis: &Synthesis) -> Vec<String> {
        synthesis
            .path()
            .map(|path| {
                path.nodes
                    .iter()
                    .filter_map(|&id| graph.label(id).map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn unmet_condition_forces_direct_route() {
        let graph = key_graph();
        let inventory = Inventory::new();

        let synthesis = SynthesisEngine::new(&graph, &inventory)
            .run("A", "C")
            .expect("run");

        assert_eq!(synthesis.cost(), Some(5));
        assert_eq!(labels(&graph, &synthesis), vec!["A", "C"]);
        assert_eq!(synthesis.highlighted().len(), 1);
        assert!(synthesis.is_highlighted(EdgeId(3)));
    }

    #[test]
    fn met_condition_opens_cheaper_route() {
        let graph = key_graph();
        let inventory: Inventory = ["key"].into_iter().collect();

        let synthesis = SynthesisEngine::new(&graph, &inventory)
            .run("A", "C")
            .expect("run");

        assert_eq!(synthesis.cost(), Some(2));
        assert_eq!(labels(&graph, &synthesis), vec!["A", "B", "C"]);
        let highlighted: Vec<_> = synthesis.highlighted().iter().copied().collect();
        assert_eq!(highlighted, vec![EdgeId(1), EdgeId(2)]);
    }

    #[test]
    fn unknown_label_is_an_error() {
        let graph = key_graph();
        let inventory = Inventory::new();
        let engine = SynthesisEngine::new(&graph, &inventory);

        assert_eq!(
            engine.run("A", "Z").map(|s| s.cost()),
            Err(SynthError::NodeNotFound("Z".into()))
        );
        assert_eq!(
            engine.run("Z", "A").map(|s| s.cost()),
            Err(SynthError::NodeNotFound("Z".into()))
        );
    }

    #[test]
    fn unreachable_goal_is_a_result() {
        let mut graph = key_graph();
        graph.add_node("Island").expect("add");
        let inventory = Inventory::new();

        let synthesis = SynthesisEngine::new(&graph, &inventory)
            .run("A", "Island")
            .expect("run");

        assert_eq!(synthesis.outcome(), &Outcome::Unreachable);
        assert!(synthesis.highlighted().is_empty());
        let island = graph.lookup_node("Island").expect("island");
        assert_eq!(synthesis.distance(island), None);
    }

    #[test]
    fn gated_only_route_is_unreachable_without_inventory() {
        let mut graph = Graph::new();
        graph.add_node("Ore").expect("add");
        graph.add_node("Ingot").expect("add");
        graph
            .add_edge("Ore", "Ingot", EdgeWeight::new(3), "furnace&coal|forge")
            .expect("edge");

        let empty = Inventory::new();
        let partial: Inventory = ["furnace"].into_iter().collect();
        let full: Inventory = ["furnace", "coal"].into_iter().collect();

        assert!(!SynthesisEngine::new(&graph, &empty).run("Ore", "Ingot").expect("run").is_reachable());
        assert!(!SynthesisEngine::new(&graph, &partial).run("Ore", "Ingot").expect("run").is_reachable());
        assert_eq!(
            SynthesisEngine::new(&graph, &full).run("Ore", "Ingot").expect("run").cost(),
            Some(3)
        );
    }

    #[test]
    fn start_equals_goal_costs_nothing() {
        let graph = key_graph();
        let inventory = Inventory::new();

        let synthesis = SynthesisEngine::new(&graph, &inventory)
            .run("B", "B")
            .expect("run");

        assert_eq!(synthesis.cost(), Some(0));
        assert_eq!(labels(&graph, &synthesis), vec!["B"]);
        assert!(synthesis.highlighted().is_empty());
        assert!(synthesis.trace().is_empty());
    }

    #[test]
    fn selection_ties_go_to_the_earlier_node() {
        // A fans out to two equal-cost intermediates that both reach D.
        fn build(order: [&str; 4]) -> Graph {
            let mut graph = Graph::new();
            for label in order {
                graph.add_node(label).expect("add");
            }
            graph.add_edge("A", "B", EdgeWeight::new(1), "").expect("edge");
            graph.add_edge("A", "C", EdgeWeight::new(1), "").expect("edge");
            graph.add_edge("B", "D", EdgeWeight::new(1), "").expect("edge");
            graph.add_edge("C", "D", EdgeWeight::new(1), "").expect("edge");
            graph
        }
        let inventory = Inventory::new();

        let b_first = build(["A", "B", "C", "D"]);
        let synthesis = SynthesisEngine::new(&b_first, &inventory)
            .run("A", "D")
            .expect("run");
        assert_eq!(labels(&b_first, &synthesis), vec!["A", "B", "D"]);

        let c_first = build(["A", "C", "B", "D"]);
        let synthesis = SynthesisEngine::new(&c_first, &inventory)
            .run("A", "D")
            .expect("run");
        assert_eq!(labels(&c_first, &synthesis), vec!["A", "C", "D"]);
    }

    #[test]
    fn parallel_edges_highlight_first_exact_match() {
        let mut graph = Graph::new();
        graph.add_node("A").expect("add");
        graph.add_node("B").expect("add");
        let pricey = graph.add_edge("A", "B", EdgeWeight::new(4), "").expect("edge");
        let cheap = graph.add_edge("A", "B", EdgeWeight::new(2), "").expect("edge");
        let cheap_twin = graph.add_edge("A", "B", EdgeWeight::new(2), "").expect("edge");
        let inventory = Inventory::new();

        let synthesis = SynthesisEngine::new(&graph, &inventory)
            .run("A", "B")
            .expect("run");

        assert_eq!(synthesis.cost(), Some(2));
        assert!(!synthesis.is_highlighted(pricey));
        assert!(synthesis.is_highlighted(cheap));
        assert!(!synthesis.is_highlighted(cheap_twin));
    }

    #[test]
    fn inadmissible_parallel_edge_is_not_highlighted() {
        let mut graph = Graph::new();
        graph.add_node("A").expect("add");
        graph.add_node("B").expect("add");
        let gated = graph.add_edge("A", "B", EdgeWeight::new(1), "key").expect("edge");
        let open = graph.add_edge("A", "B", EdgeWeight::new(1), "").expect("edge");
        let inventory = Inventory::new();

        let synthesis = SynthesisEngine::new(&graph, &inventory)
            .run("A", "B")
            .expect("run");

        assert!(!synthesis.is_highlighted(gated));
        assert!(synthesis.is_highlighted(open));
    }

    #[test]
    fn zero_weight_cycle_terminates() {
        let mut graph = Graph::new();
        for label in ["A", "B", "C"] {
            graph.add_node(label).expect("add");
        }
        graph.add_edge("A", "B", EdgeWeight::new(0), "").expect("edge");
        graph.add_edge("B", "A", EdgeWeight::new(0), "").expect("edge");
        graph.add_edge("B", "C", EdgeWeight::new(0), "").expect("edge");
        let inventory = Inventory::new();

        let synthesis = SynthesisEngine::new(&graph, &inventory)
            .run("A", "C")
            .expect("run");

        assert_eq!(synthesis.cost(), Some(0));
        assert_eq!(labels(&graph, &synthesis), vec!["A", "B", "C"]);
    }

    #[test]
    fn trace_records_skips_and_relaxations() {
        let graph = key_graph();
        let inventory = Inventory::new();
        let a = graph.lookup_node("A").expect("A");
        let b = graph.lookup_node("B").expect("B");

        let synthesis = SynthesisEngine::new(&graph, &inventory)
            .run("A", "C")
            .expect("run");

        assert_eq!(
            synthesis.trace(),
            [
                SearchEvent::Visit { node: a, distance: 0 },
                SearchEvent::Consider { edge: EdgeId(1) },
                SearchEvent::Relax {
                    node: b,
                    distance: 1,
                    edge: EdgeId(1)
                },
                SearchEvent::Consider { edge: EdgeId(3) },
                SearchEvent::Relax {
                    node: graph.lookup_node("C").expect("C"),
                    distance: 5,
                    edge: EdgeId(3)
                },
                SearchEvent::Visit { node: b, distance: 1 },
                SearchEvent::Skip { edge: EdgeId(2) },
            ]
        );
    }

    #[test]
    fn goal_is_never_expanded() {
        let mut graph = key_graph();
        graph.add_node("D").expect("add");
        graph.add_edge("C", "D", EdgeWeight::new(1), "").expect("edge");
        let inventory = Inventory::new();
        let c = graph.lookup_node("C").expect("C");
        let d = graph.lookup_node("D").expect("D");

        let synthesis = SynthesisEngine::new(&graph, &inventory)
            .run("A", "C")
            .expect("run");

        assert!(
            !synthesis
                .trace()
                .iter()
                .any(|event| matches!(event, SearchEvent::Visit { node, .. } if *node == c))
        );
        assert_eq!(synthesis.distance(d), None);
        assert_eq!(synthesis.predecessor(c), graph.lookup_node("A"));
    }
}
