//! # Console and JSON Rendering
//!
//! Text and `serde_json` views of a session, shared by the command loop, the
//! one-shot CLI and the HTTP API.

use serde_json::{Value, json};
use synthgraph_core::{
    EdgeStyle, Graph, Inventory, NodeId, Outcome, SearchEvent, Session, Synthesis,
    export::edge_label,
};

fn name(graph: &Graph, id: NodeId) -> &str {
    graph.label(id).unwrap_or("?")
}

// =============================================================================
// TEXT
// =============================================================================

/// Adjacency list, items in creation order, recipes by product label.
#[must_use]
pub fn adjacency(graph: &Graph) -> String {
    let mut out = String::from("Adjacency List:\n");
    for node in graph.nodes() {
        out.push_str(&node.label);
        out.push_str(" ->");
        for edge in graph.outgoing_edges(node.id) {
            out.push_str(&format!(" {}(", name(graph, edge.to)));
            out.push_str(&edge.weight.value().to_string());
            if !edge.is_unconditional() {
                out.push_str(&format!(":{}", edge.condition));
            }
            out.push(')');
        }
        out.push('\n');
    }
    out
}

/// Held predicates, one per line.
#[must_use]
pub fn inventory(inventory: &Inventory) -> String {
    let mut out = String::from("Inventory:\n");
    if inventory.is_empty() {
        out.push_str("  (empty)\n");
    }
    for predicate in inventory.iter() {
        out.push_str(&format!("  {predicate}\n"));
    }
    out
}

/// One line per search event.
#[must_use]
pub fn trace(graph: &Graph, synthesis: &Synthesis) -> String {
    let mut out = String::new();
    for event in synthesis.trace() {
        let line = match *event {
            SearchEvent::Visit { node, distance } => {
                format!("Visiting {} (dist: {})", name(graph, node), distance)
            }
            SearchEvent::Skip { edge } => match graph.edge(edge) {
                Some(e) => format!(
                    "  Skipping {} -> {} (cost: {}, condition: {}) - not in inventory",
                    name(graph, e.from),
                    name(graph, e.to),
                    e.weight.value(),
                    e.condition
                ),
                None => format!("  Skipping recipe #{}", edge.0),
            },
            SearchEvent::Consider { edge } => match graph.edge(edge) {
                Some(e) if e.is_unconditional() => format!(
                    "  Considering {} -> {} (cost: {})",
                    name(graph, e.from),
                    name(graph, e.to),
                    e.weight.value()
                ),
                Some(e) => format!(
                    "  Considering {} -> {} (cost: {}, condition: {})",
                    name(graph, e.from),
                    name(graph, e.to),
                    e.weight.value(),
                    e.condition
                ),
                None => format!("  Considering recipe #{}", edge.0),
            },
            SearchEvent::Relax { node, distance, .. } => {
                format!("    Updated dist[{}] to {}", name(graph, node), distance)
            }
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Path steps and total cost, or the unreachable notice.
#[must_use]
pub fn synthesis(graph: &Graph, synthesis: &Synthesis) -> String {
    let start = name(graph, synthesis.start());
    let goal = name(graph, synthesis.goal());
    match synthesis.outcome() {
        Outcome::Unreachable => format!("No viable path from {start} to {goal}.\n"),
        Outcome::Path(path) => {
            let mut out = format!("Synthesis Path from {start} to {goal}:\n");
            for step in &path.steps {
                let condition = graph
                    .edge(step.edge)
                    .filter(|edge| !edge.is_unconditional())
                    .map(|edge| format!(", condition: {}", edge.condition))
                    .unwrap_or_default();
                out.push_str(&format!(
                    "  {} -> {}  (cost: {}{})\n",
                    name(graph, step.from),
                    name(graph, step.to),
                    step.weight.value(),
                    condition
                ));
            }
            out.push_str(&format!("Total Cost: {}\n", path.cost));
            out
        }
    }
}

// =============================================================================
// JSON
// =============================================================================

#[must_use]
pub fn status_json(session: &Session) -> Value {
    json!({
        "node_count": session.graph().node_count(),
        "edge_count": session.graph().edge_count(),
        "inventory_count": session.inventory().len(),
        "highlighted_count": session.highlighted().len(),
    })
}

#[must_use]
pub fn inventory_json(inventory: &Inventory) -> Value {
    json!({ "inventory": inventory.iter().collect::<Vec<_>>() })
}

/// Every item and recipe with its current visual style.
#[must_use]
pub fn graph_json(session: &Session) -> Value {
    let graph = session.graph();
    let nodes: Vec<Value> = graph
        .nodes()
        .map(|node| json!({ "id": node.id.0, "label": node.label }))
        .collect();
    let edges: Vec<Value> = graph
        .edges()
        .map(|edge| {
            json!({
                "id": edge.id.0,
                "from": name(graph, edge.from),
                "to": name(graph, edge.to),
                "weight": edge.weight.value(),
                "condition": edge.condition.as_str(),
                "label": edge_label(edge),
                "style": style_name(EdgeStyle::of(edge, session)),
                "highlighted": session.is_highlighted(edge.id),
            })
        })
        .collect();
    json!({ "nodes": nodes, "edges": edges })
}

#[must_use]
pub fn style_name(style: EdgeStyle) -> &'static str {
    match style {
        EdgeStyle::Unconditioned => "unconditioned",
        EdgeStyle::Satisfied => "satisfied",
        EdgeStyle::Unsatisfied => "unsatisfied",
        EdgeStyle::Highlighted => "highlighted",
    }
}

#[must_use]
pub fn synthesis_json(graph: &Graph, synthesis: &Synthesis) -> Value {
    let start = name(graph, synthesis.start());
    let goal = name(graph, synthesis.goal());
    match synthesis.outcome() {
        Outcome::Unreachable => json!({
            "start": start,
            "goal": goal,
            "reachable": false,
        }),
        Outcome::Path(path) => {
            let steps: Vec<Value> = path
                .steps
                .iter()
                .map(|step| {
                    json!({
                        "edge": step.edge.0,
                        "from": name(graph, step.from),
                        "to": name(graph, step.to),
                        "weight": step.weight.value(),
                    })
                })
                .collect();
            json!({
                "start": start,
                "goal": goal,
                "reachable": true,
                "cost": path.cost,
                "path": path.nodes.iter().map(|&id| name(graph, id)).collect::<Vec<_>>(),
                "steps": steps,
            })
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
