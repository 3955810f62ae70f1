//! Depth-first traversal over the containment tree
//!
//! The walk visits children in sibling-index order and drives a
//! [`DomainVisitor`] with discover/finish callbacks. Visibility filtering
//! is composition, not specialization: [`HiddenFilter`] wraps any visitor
//! and forwards callbacks conditionally on vertex state, so the walk
//! itself never needs to know about hiding.

use crate::graph::{HierarchyGraph, VertexProps, VertexState};
use crate::model::{DomainStore, LocalityDomain};

/// Traversal callback capability set.
///
/// Both callbacks default to no-ops, so a visitor implements only what it
/// observes.
pub trait DomainVisitor {
    /// Called when a domain is first reached, before its children
    fn discover_domain(&mut self, _domain: &LocalityDomain, _vertex: &VertexProps) {}

    /// Called after all of a domain's children have been finished
    fn finish_domain(&mut self, _domain: &LocalityDomain, _vertex: &VertexProps) {}
}

impl<V: DomainVisitor + ?Sized> DomainVisitor for &mut V {
    fn discover_domain(&mut self, domain: &LocalityDomain, vertex: &VertexProps) {
        (**self).discover_domain(domain, vertex);
    }

    fn finish_domain(&mut self, domain: &LocalityDomain, vertex: &VertexProps) {
        (**self).finish_domain(domain, vertex);
    }
}

/// Filtering decorator: forwards callbacks only for vertices that are not
/// hidden. The check is made per vertex — the decorator does not assume
/// that a hidden vertex implies hidden descendants.
pub struct HiddenFilter<V> {
    inner: V,
}

impl<V: DomainVisitor> HiddenFilter<V> {
    pub fn new(inner: V) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> V {
        self.inner
    }
}

impl<V: DomainVisitor> DomainVisitor for HiddenFilter<V> {
    fn discover_domain(&mut self, domain: &LocalityDomain, vertex: &VertexProps) {
        if vertex.state != VertexState::Hidden {
            self.inner.discover_domain(domain, vertex);
        }
    }

    fn finish_domain(&mut self, domain: &LocalityDomain, vertex: &VertexProps) {
        if vertex.state != VertexState::Hidden {
            self.inner.finish_domain(domain, vertex);
        }
    }
}

/// Depth-first walk of the containment tree from the root, children in
/// sibling-index order. Every vertex is reported to the visitor; wrap the
/// visitor in [`HiddenFilter`] for visibility-aware walks.
pub fn depth_first_search<V: DomainVisitor>(
    graph: &HierarchyGraph,
    store: &DomainStore,
    visitor: &mut V,
) {
    walk(graph, store, graph.root(), visitor);
}

fn walk<V: DomainVisitor>(
    graph: &HierarchyGraph,
    store: &DomainStore,
    vertex: petgraph::graph::NodeIndex,
    visitor: &mut V,
) {
    let props = graph.props(vertex);
    let domain = match store.get(props.tag.as_str()) {
        Ok(domain) => domain,
        // store and graph are built together; a missing tag would be a
        // construction bug, not a caller error
        Err(_) => {
            debug_assert!(false, "vertex tag {} missing from store", props.tag);
            return;
        }
    };
    visitor.discover_domain(domain, props);
    for child in graph.children(vertex) {
        walk(graph, store, child, visitor);
    }
    visitor.finish_domain(domain, props);
}

/// Visitor that renders one aligned row per discovered domain:
/// scope, tag, and the resident unit ids.
#[derive(Debug, Default)]
pub struct DomainTableVisitor {
    rows: Vec<String>,
}

impl DomainTableVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn into_table(self) -> String {
        self.rows.join("\n")
    }
}

impl DomainVisitor for DomainTableVisitor {
    fn discover_domain(&mut self, domain: &LocalityDomain, _vertex: &VertexProps) {
        let units: Vec<String> = domain.unit_ids.iter().map(|u| u.to_string()).collect();
        self.rows.push(format!(
            "{:<8}{:<15} | units:[{}]",
            domain.scope.as_str(),
            domain.tag.to_string(),
            units.join(",")
        ));
    }
}
