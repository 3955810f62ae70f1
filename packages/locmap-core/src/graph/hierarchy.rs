//! Hierarchy graph over domain tags
//!
//! Directed graph where:
//! - Vertices carry a domain tag and a visibility state
//! - Edges carry a relation kind (`contains`, `sibling`, `alias`) and a
//!   distance annotation
//!
//! The `contains` edges form a spanning tree rooted at the empty tag;
//! `sibling` and `alias` edges are auxiliary annotations and never
//! participate in ancestry. Vertices hold only the tag — the lookup key
//! into the [`DomainStore`](crate::model::DomainStore) — so copying or
//! filtering a graph view can never dangle a domain reference.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::DomainTag;

/// Relation expressed by an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Parent physically/logically contains the child (spanning tree)
    Contains,
    /// Same-parent annotation, e.g. NUMA distance
    Sibling,
    /// Alternative addressing of the same resources
    Alias,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Contains => "contains",
            EdgeKind::Sibling => "sibling",
            EdgeKind::Alias => "alias",
        }
    }
}

/// Visibility state of a vertex
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexState {
    #[default]
    Normal,
    /// Suppressed from enumeration and traversal without deletion
    Hidden,
    /// Explicitly marked by a select operation
    Selected,
}

/// Vertex payload: the domain's tag plus its visibility state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexProps {
    pub tag: DomainTag,
    pub state: VertexState,
}

/// Edge payload: relation kind plus a distance annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeProps {
    pub kind: EdgeKind,
    pub distance: u32,
}

/// Directed graph over domain tags.
///
/// Always holds a root vertex for the empty tag. Child enumeration is
/// ordered by sibling index, independent of edge insertion order.
#[derive(Debug, Clone)]
pub struct HierarchyGraph {
    graph: DiGraph<VertexProps, EdgeProps>,
    vertex_of_tag: FxHashMap<DomainTag, NodeIndex>,
    root: NodeIndex,
}

impl HierarchyGraph {
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let root_tag = DomainTag::root();
        let root = graph.add_node(VertexProps {
            tag: root_tag.clone(),
            state: VertexState::Normal,
        });
        let mut vertex_of_tag = FxHashMap::default();
        vertex_of_tag.insert(root_tag, root);
        Self {
            graph,
            vertex_of_tag,
            root,
        }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Add a vertex for a tag, returning its index
    pub fn add_vertex(&mut self, tag: DomainTag) -> NodeIndex {
        let idx = self.graph.add_node(VertexProps {
            tag: tag.clone(),
            state: VertexState::Normal,
        });
        self.vertex_of_tag.insert(tag, idx);
        idx
    }

    /// Attach a containment edge parent → child
    pub fn add_containment(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.graph.add_edge(
            parent,
            child,
            EdgeProps {
                kind: EdgeKind::Contains,
                distance: 0,
            },
        );
    }

    /// Attach an auxiliary annotation edge
    pub fn add_annotation(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        kind: EdgeKind,
        distance: u32,
    ) {
        self.graph.add_edge(from, to, EdgeProps { kind, distance });
    }

    /// Detach the containment edge parent → child, if present
    pub fn remove_containment(&mut self, parent: NodeIndex, child: NodeIndex) -> bool {
        let edge = self
            .graph
            .edges_connecting(parent, child)
            .find(|e| e.weight().kind == EdgeKind::Contains)
            .map(|e| e.id());
        match edge {
            Some(edge) => {
                self.graph.remove_edge(edge);
                true
            }
            None => false,
        }
    }

    pub fn vertex(&self, tag: &str) -> Option<NodeIndex> {
        self.vertex_of_tag.get(tag).copied()
    }

    pub fn props(&self, vertex: NodeIndex) -> &VertexProps {
        &self.graph[vertex]
    }

    pub fn tag(&self, vertex: NodeIndex) -> &DomainTag {
        &self.graph[vertex].tag
    }

    pub fn state(&self, vertex: NodeIndex) -> VertexState {
        self.graph[vertex].state
    }

    pub fn set_state(&mut self, vertex: NodeIndex, state: VertexState) {
        self.graph[vertex].state = state;
    }

    /// Containment parent of a vertex (`None` for the root)
    pub fn parent(&self, vertex: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(vertex, Direction::Incoming)
            .find(|e| e.weight().kind == EdgeKind::Contains)
            .map(|e| e.source())
    }

    /// Containment children of a vertex, ordered by sibling index.
    ///
    /// petgraph iterates neighbors in reverse insertion order; sorting by
    /// the tag's sibling index keeps enumeration deterministic regardless
    /// of how the graph was assembled or mutated.
    pub fn children(&self, vertex: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .edges_directed(vertex, Direction::Outgoing)
            .filter(|e| e.weight().kind == EdgeKind::Contains)
            .map(|e| e.target())
            .collect();
        children.sort_by_key(|&c| self.graph[c].tag.sibling_index());
        children
    }

    /// A vertex and all its containment descendants, preorder
    pub fn subtree(&self, vertex: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack = vec![vertex];
        while let Some(v) = stack.pop() {
            out.push(v);
            let mut children = self.children(v);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    pub fn num_vertices(&self) -> usize {
        self.graph.node_count()
    }

    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// All edges as `(source, target, props)` for read-only inspection
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &EdgeProps)> {
        self.graph
            .edge_references()
            .map(|e| (e.source(), e.target(), e.weight()))
    }

    /// All vertices in index order
    pub fn vertices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }
}

impl Default for HierarchyGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attach(graph: &mut HierarchyGraph, parent: NodeIndex, tag: &str) -> NodeIndex {
        let child = graph.add_vertex(DomainTag::new(tag));
        graph.add_containment(parent, child);
        child
    }

    #[test]
    fn test_children_sorted_by_sibling_index() {
        let mut graph = HierarchyGraph::new();
        let root = graph.root();
        // inserted out of order on purpose
        let n2 = attach(&mut graph, root, "2");
        let n0 = attach(&mut graph, root, "0");
        let n1 = attach(&mut graph, root, "1");

        assert_eq!(graph.children(root), vec![n0, n1, n2]);
    }

    #[test]
    fn test_parent_ignores_annotation_edges() {
        let mut graph = HierarchyGraph::new();
        let root = graph.root();
        let a = attach(&mut graph, root, "0");
        let b = attach(&mut graph, root, "1");
        graph.add_annotation(a, b, EdgeKind::Sibling, 1);
        graph.add_annotation(b, a, EdgeKind::Sibling, 1);

        assert_eq!(graph.parent(a), Some(root));
        assert_eq!(graph.parent(b), Some(root));
        assert_eq!(graph.children(root), vec![a, b]);
    }

    #[test]
    fn test_subtree_preorder() {
        let mut graph = HierarchyGraph::new();
        let root = graph.root();
        let n0 = attach(&mut graph, root, "0");
        let n1 = attach(&mut graph, root, "1");
        let n00 = attach(&mut graph, n0, "0.0");
        let n01 = attach(&mut graph, n0, "0.1");

        assert_eq!(graph.subtree(root), vec![root, n0, n00, n01, n1]);
        assert_eq!(graph.subtree(n0), vec![n0, n00, n01]);
        assert_eq!(graph.subtree(n1), vec![n1]);
    }

    #[test]
    fn test_remove_containment_keeps_annotations() {
        let mut graph = HierarchyGraph::new();
        let root = graph.root();
        let a = attach(&mut graph, root, "0");
        let b = attach(&mut graph, root, "1");
        graph.add_annotation(a, b, EdgeKind::Sibling, 2);

        assert!(graph.remove_containment(root, a));
        assert!(!graph.remove_containment(root, a));
        assert_eq!(graph.parent(a), None);
        // annotation edge between the siblings is untouched
        assert_eq!(
            graph
                .edges()
                .filter(|(_, _, p)| p.kind == EdgeKind::Sibling)
                .count(),
            1
        );
    }
}
