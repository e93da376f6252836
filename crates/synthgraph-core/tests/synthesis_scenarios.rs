//! # Synthesis Scenario Tests
//!
//! End-to-end checks of the store, evaluator and search working together.
//!
//! ## Groups
//! - Store: lookup stability, cascade, unchanged-on-error
//! - Conditions: evaluator examples
//! - Synthesis: gated fallback, highlight sets, removal after a query

use synthgraph_core::{
    EdgeId, EdgeWeight, Graph, Inventory, NodeId, Outcome, Session, SynthError, SynthesisEngine,
    satisfied,
};

/// A→B (1), B→C (1, needs `key`), A→C (5).
fn key_session() -> Session {
    let mut session = Session::new();
    for label in ["A", "B", "C"] {
        session.add_node(label).expect("add");
    }
    session.add_edge("A", "B", EdgeWeight::new(1), "").expect("edge");
    session.add_edge("B", "C", EdgeWeight::new(1), "key").expect("edge");
    session.add_edge("A", "C", EdgeWeight::new(5), "").expect("edge");
    session
}

fn path_labels(session: &Session) -> Vec<String> {
    let graph = session.graph();
    session
        .last_synthesis()
        .and_then(|synthesis| synthesis.path())
        .map(|path| {
            path.nodes
                .iter()
                .filter_map(|&id| graph.label(id).map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn highlighted_pairs(session: &Session) -> Vec<(String, String)> {
    let graph = session.graph();
    session
        .highlighted()
        .iter()
        .filter_map(|&id| graph.edge(id))
        .filter_map(|edge| {
            Some((
                graph.label(edge.from)?.to_string(),
                graph.label(edge.to)?.to_string(),
            ))
        })
        .collect()
}

// =============================================================================
// STORE
// =============================================================================

mod store {
    use super::*;

    #[test]
    fn lookup_is_stable_until_removed_or_renamed() {
        let mut graph = Graph::new();
        let water = graph.add_node("Water").expect("add");
        graph.add_node("Steam").expect("add");
        graph.remove_node("Steam").expect("remove");
        graph.add_node("Ice").expect("add");

        assert_eq!(graph.lookup_node("Water"), Some(water));

        graph.rename_node("Water", "H2O").expect("rename");
        assert_eq!(graph.lookup_node("Water"), None);
        assert_eq!(graph.lookup_node("H2O"), Some(water));

        graph.remove_node("H2O").expect("remove");
        assert_eq!(graph.lookup_node("H2O"), None);
    }

    #[test]
    fn remove_node_leaves_no_references() {
        let mut graph = Graph::new();
        for label in ["A", "B", "C"] {
            graph.add_node(label).expect("add");
        }
        graph.add_edge("A", "B", EdgeWeight::new(1), "").expect("edge");
        graph.add_edge("B", "C", EdgeWeight::new(1), "").expect("edge");
        graph.add_edge("C", "B", EdgeWeight::new(1), "").expect("edge");
        graph.add_edge("A", "C", EdgeWeight::new(1), "").expect("edge");
        let b = graph.lookup_node("B").expect("B");

        let removed = graph.remove_node("B").expect("remove");

        assert_eq!(removed.len(), 3);
        assert!(graph.outgoing_edges(b).is_empty());
        assert!(graph.incoming_edges(b).is_empty());
        assert!(graph.edges().all(|edge| !edge.touches(b)));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn failed_mutations_change_nothing() {
        let mut graph = Graph::new();
        graph.add_node("A").expect("add");
        graph.add_node("B").expect("add");
        graph.add_edge("A", "B", EdgeWeight::new(1), "").expect("edge");

        assert_eq!(
            graph.add_edge("A", "Z", EdgeWeight::new(1), ""),
            Err(SynthError::NodeNotFound("Z".into()))
        );
        assert_eq!(
            graph.rename_node("A", "B"),
            Err(SynthError::DuplicateNode("B".into()))
        );
        assert_eq!(
            graph.rename_node("Z", "Y"),
            Err(SynthError::NodeNotFound("Z".into()))
        );
        assert_eq!(
            graph.remove_edge("Z", "B").map(|removed| removed.len()),
            Err(SynthError::NodeNotFound("Z".into()))
        );

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.lookup_node("A"), Some(NodeId(0)));
    }

    #[test]
    fn remove_edge_drops_every_parallel_recipe() {
        let mut graph = Graph::new();
        graph.add_node("A").expect("add");
        graph.add_node("B").expect("add");
        graph.add_edge("A", "B", EdgeWeight::new(1), "").expect("edge");
        graph.add_edge("A", "B", EdgeWeight::new(2), "x").expect("edge");
        graph.add_edge("B", "A", EdgeWeight::new(3), "").expect("edge");

        let removed = graph.remove_edge("A", "B").expect("remove");

        assert_eq!(removed.len(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.remove_edge("A", "B").expect("remove again").is_empty());
    }
}

// =============================================================================
// CONDITIONS
// =============================================================================

mod conditions {
    use super::*;

    #[test]
    fn evaluator_examples() {
        let c_only: Inventory = ["c"].into_iter().collect();
        let a_only: Inventory = ["a"].into_iter().collect();

        assert!(satisfied("a&b|c", &c_only));
        assert!(!satisfied("a&b|c", &a_only));
        assert!(satisfied("", &Inventory::new()));
    }

    #[test]
    fn evaluation_has_no_hidden_state() {
        let inventory: Inventory = ["a", "b"].into_iter().collect();
        for expr in ["a&b", "a|z", "z", "a&&b", " ", "|"] {
            assert_eq!(satisfied(expr, &inventory), satisfied(expr, &inventory));
        }
    }
}

// =============================================================================
// SYNTHESIS
// =============================================================================

mod synthesis {
    use super::*;

    #[test]
    fn unmet_condition_falls_back_to_direct_recipe() {
        let mut session = key_session();

        let cost = session.synthesize("A", "C").expect("run").cost();

        assert_eq!(cost, Some(5));
        assert_eq!(path_labels(&session), vec!["A", "C"]);
        assert_eq!(highlighted_pairs(&session), vec![("A".into(), "C".into())]);
    }

    #[test]
    fn met_condition_takes_cheaper_route() {
        let mut session = key_session();
        session.add_condition("key").expect("condition");

        let cost = session.synthesize("A", "C").expect("run").cost();

        assert_eq!(cost, Some(2));
        assert_eq!(path_labels(&session), vec!["A", "B", "C"]);
        assert_eq!(
            highlighted_pairs(&session),
            vec![("A".into(), "B".into()), ("B".into(), "C".into())]
        );
    }

    #[test]
    fn removing_intermediate_restores_direct_route() {
        let mut session = key_session();
        session.add_condition("key").expect("condition");
        session.synthesize("A", "C").expect("run");

        session.remove_node("B").expect("remove");
        let cost = session.synthesize("A", "C").expect("run").cost();

        assert_eq!(cost, Some(5));
        assert_eq!(path_labels(&session), vec!["A", "C"]);
        assert_eq!(highlighted_pairs(&session), vec![("A".into(), "C".into())]);
    }

    #[test]
    fn unknown_endpoints_are_errors_not_outcomes() {
        let graph = Graph::new();
        let inventory = Inventory::new();

        let result = SynthesisEngine::new(&graph, &inventory).run("A", "B");

        assert_eq!(
            result.map(|synthesis| synthesis.cost()),
            Err(SynthError::NodeNotFound("A".into()))
        );
    }

    #[test]
    fn unreachable_is_a_normal_outcome() {
        let mut session = key_session();
        session.add_node("D").expect("add");

        let synthesis = session.synthesize("C", "A").expect("run");

        assert_eq!(synthesis.outcome(), &Outcome::Unreachable);
        assert!(session.highlighted().is_empty());
    }

    #[test]
    fn disjunctive_condition_opens_either_way() {
        let mut session = Session::new();
        session.add_node("Ore").expect("add");
        session.add_node("Ingot").expect("add");
        session
            .add_edge("Ore", "Ingot", EdgeWeight::new(2), "furnace&coal|forge")
            .expect("edge");

        assert!(!session.synthesize("Ore", "Ingot").expect("run").is_reachable());

        session.add_condition("forge").expect("condition");
        assert_eq!(session.synthesize("Ore", "Ingot").expect("run").cost(), Some(2));

        session.remove_condition("forge").expect("remove");
        session.add_condition("furnace").expect("condition");
        session.add_condition("coal").expect("condition");
        assert_eq!(session.synthesize("Ore", "Ingot").expect("run").cost(), Some(2));
    }

    #[test]
    fn queries_do_not_leak_state() {
        let mut session = key_session();
        session.add_condition("key").expect("condition");
        session.synthesize("A", "C").expect("run");
        session.synthesize("A", "B").expect("run");

        let highlighted: Vec<_> = session.highlighted().iter().copied().collect();
        assert_eq!(highlighted, vec![EdgeId(1)]);
        assert_eq!(session.last_synthesis().and_then(|s| s.cost()), Some(1));
    }
}
