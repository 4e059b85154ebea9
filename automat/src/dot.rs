//! Graphviz DOT output
//!
//! Start nodes are drawn blue and final nodes as red double circles.
//! Turning the text into an image is left to `dot` itself.

use crate::graph::{Automaton, Node, Snapshot};
use std::fmt::Write;

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render a set of nodes as a `digraph`
pub fn render(nodes: &[Node], title: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph automaton {{");
    let _ = writeln!(out, "    rankdir=LR;");
    if !title.is_empty() {
        let _ = writeln!(out, "    label=\"{}\";", escape(title));
        let _ = writeln!(out, "    labelloc=t;");
    }

    for node in nodes {
        let shape = if node.is_final { "doublecircle" } else { "circle" };
        let color = match (node.is_start, node.is_final) {
            (true, _) => "blue",
            (false, true) => "red",
            (false, false) => "black",
        };
        let _ = writeln!(
            out,
            "    n{} [label=\"{}\", shape={}, color={}];",
            node.id,
            escape(&node.name),
            shape,
            color
        );
    }

    for node in nodes {
        for edge in &node.edges {
            let _ = writeln!(
                out,
                "    n{} -> n{} [label=\"{}\"];",
                node.id,
                edge.target,
                escape(&edge.transition.to_string())
            );
        }
    }

    out.push_str("}\n");
    out
}

impl Snapshot {
    /// Render this step, titled with its comment
    pub fn to_dot(&self) -> String {
        render(&self.nodes, &format!("{}: {}", self.step, self.comment))
    }
}

impl Automaton {
    /// Render the current graph
    pub fn to_dot(&self, title: &str) -> String {
        render(self.nodes(), title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;

    #[test]
    fn test_render_literal() {
        let dot = build("a").unwrap().to_dot("");
        assert_eq!(
            dot,
            "digraph automaton {\n    rankdir=LR;\n    \
             n0 [label=\"q0\", shape=circle, color=blue];\n    \
             n1 [label=\"q1\", shape=doublecircle, color=red];\n    \
             n0 -> n1 [label=\"a\"];\n}\n"
        );
    }

    #[test]
    fn test_snapshot_title_and_pending_label() {
        let automaton = build("(ab)^").unwrap();
        let dot = automaton.history()[0].to_dot();
        assert!(dot.contains("label=\"0: initial expression '(ab)^': q0 -> q1\""));
        assert!(dot.contains("n0 -> n1 [label=\"(ab)^\"]"));
    }

    #[test]
    fn test_escapes_quotes() {
        assert_eq!(escape("a\"b"), "a\\\"b");
    }
}
