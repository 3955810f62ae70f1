//! Graphviz rendering of the hierarchy
//!
//! Read-only inspection support for external visualization tooling:
//! vertices are labeled with tag and scope, edges with their relation
//! kind. Hidden vertices are rendered dotted instead of being dropped,
//! so an export always shows the full structure.

use std::fmt::Write;

use crate::graph::{EdgeKind, HierarchyGraph, VertexState};
use crate::model::DomainStore;

/// Render the hierarchy as a dot digraph.
pub fn to_dot(graph: &HierarchyGraph, store: &DomainStore) -> String {
    let mut out = String::from("digraph locality {\n");
    out.push_str("    rankdir=TB;\n");
    out.push_str("    node [shape=box];\n");

    for vertex in graph.vertices() {
        let props = graph.props(vertex);
        let scope = store
            .get(props.tag.as_str())
            .map(|d| d.scope.as_str())
            .unwrap_or("?");
        let style = match props.state {
            VertexState::Hidden => ", style=dotted",
            VertexState::Selected => ", style=bold",
            VertexState::Normal => "",
        };
        let _ = writeln!(
            out,
            "    n{} [label=\"{}\\n{}\"{}];",
            vertex.index(),
            props.tag,
            scope,
            style
        );
    }

    for (source, target, props) in graph.edges() {
        let attrs = match props.kind {
            EdgeKind::Contains => format!("label=\"{}\"", props.kind.as_str()),
            EdgeKind::Sibling | EdgeKind::Alias => format!(
                "label=\"{} ({})\", style=dashed, constraint=false",
                props.kind.as_str(),
                props.distance
            ),
        };
        let _ = writeln!(
            out,
            "    n{} -> n{} [{}];",
            source.index(),
            target.index(),
            attrs
        );
    }

    out.push_str("}\n");
    out
}
