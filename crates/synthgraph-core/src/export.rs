//! # DOT Export Module
//!
//! Renders a session as a Graphviz `digraph`. This is the pure half of the
//! visualizer: producing text only. Writing files and running `dot` is left to
//! the app layer.
//!
//! Every recipe gets one `EdgeStyle`, decided from its condition and the
//! current inventory. Recipes on the latest synthesis path are highlighted,
//! and highlighting takes precedence over the condition state.

use crate::session::Session;
use crate::Edge;
use std::fmt::Write;

// =============================================================================
// EDGE STYLE
// =============================================================================

/// Visual state of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeStyle {
    /// No condition.
    Unconditioned,
    /// Condition holds against the current inventory.
    Satisfied,
    /// Condition does not hold.
    Unsatisfied,
    /// On the latest synthesis path.
    Highlighted,
}

impl EdgeStyle {
    /// Pick the style of `edge` within `session`.
    #[must_use]
    pub fn of(edge: &Edge, session: &Session) -> Self {
        if session.is_highlighted(edge.id) {
            Self::Highlighted
        } else if edge.is_unconditional() {
            Self::Unconditioned
        } else if edge.condition.satisfied_by(session.inventory()) {
            Self::Satisfied
        } else {
            Self::Unsatisfied
        }
    }

    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Unconditioned => "black",
            Self::Satisfied => "green",
            Self::Unsatisfied => "gray",
            Self::Highlighted => "blue",
        }
    }

    #[must_use]
    pub const fn line(self) -> &'static str {
        match self {
            Self::Unsatisfied => "dashed",
            _ => "solid",
        }
    }

    #[must_use]
    pub const fn pen_width(self) -> u8 {
        match self {
            Self::Highlighted => 3,
            _ => 1,
        }
    }
}

// =============================================================================
// RENDERING
// =============================================================================

/// Quote a string for use as a DOT identifier or attribute value.
#[must_use]
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len().saturating_add(2));
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

/// Edge label: the weight, followed by the condition source when present.
#[must_use]
pub fn edge_label(edge: &Edge) -> String {
    if edge.is_unconditional() {
        edge.weight.value().to_string()
    } else {
        format!("{},{}", edge.weight.value(), edge.condition)
    }
}

/// Render the whole session as a Graphviz document.
///
/// Items appear in creation order, recipes in edge-table order.
#[must_use]
pub fn render_dot(session: &Session) -> String {
    let graph = session.graph();
    let mut out = String::from("digraph G {\n");

    // Writing into a String cannot fail.
    for node in graph.nodes() {
        let _ = writeln!(out, "    {};", quote(&node.label));
    }

    for edge in graph.edges() {
        let (Some(from), Some(to)) = (graph.label(edge.from), graph.label(edge.to)) else {
            continue;
        };
        let style = EdgeStyle::of(edge, session);
        let _ = writeln!(
            out,
            "    {} -> {} [label={}, color={}, style={}, penwidth={}];",
            quote(from),
            quote(to),
            quote(&edge_label(edge)),
            style.color(),
            style.line(),
            style.pen_width(),
        );
    }

    out.push_str("}\n");
    out
}

// =============================================================================
// TESTS
// =============================================================================
