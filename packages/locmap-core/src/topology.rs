//! Locality topology context
//!
//! [`Topology`] pairs the domain store with the hierarchy graph for the
//! lifetime of a locality session and carries every query and mutation
//! operation. It is an explicit context object: construction returns it,
//! teardown drops it, and there is no process-wide topology state.
//!
//! Mutations take `&mut self` and validate completely before writing, so
//! a reader can never observe a half-applied mutation and a failed call
//! leaves the structure unchanged.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::build::TopologyBuilder;
use crate::errors::{Result, TopologyError};
use crate::graph::{
    depth_first_search, export, DomainVisitor, HiddenFilter, HierarchyGraph, VertexState,
};
use crate::input::{HostTopology, UnitMapping};
use crate::model::{DomainStore, DomainTag, LocalityDomain, LocalityScope, UnitId};

/// Queryable locality hierarchy of one session.
#[derive(Debug, Clone)]
pub struct Topology {
    store: DomainStore,
    graph: HierarchyGraph,
    /// Unit id → tag of its unit-scope leaf domain
    unit_leaf: FxHashMap<UnitId, DomainTag>,
}

impl Topology {
    /// Build a topology from input snapshots with default options.
    ///
    /// Convenience for [`TopologyBuilder::build`].
    pub fn build(host_topology: &HostTopology, unit_mapping: &UnitMapping) -> Result<Self> {
        TopologyBuilder::new().build(host_topology, unit_mapping)
    }

    pub(crate) fn from_parts(
        store: DomainStore,
        graph: HierarchyGraph,
        unit_leaf: FxHashMap<UnitId, DomainTag>,
    ) -> Self {
        Self {
            store,
            graph,
            unit_leaf,
        }
    }

    /// Look up a domain by tag
    pub fn domain(&self, tag: &str) -> Result<&LocalityDomain> {
        self.store.get(tag)
    }

    /// The root (global) domain
    pub fn root_domain(&self) -> &LocalityDomain {
        // the builder always creates the root domain
        self.store
            .get("")
            .expect("topology without a root domain")
    }

    /// All domains of the session (unordered; use [`Topology::traverse`]
    /// for deterministic ordering)
    pub fn domains(&self) -> impl Iterator<Item = (&DomainTag, &LocalityDomain)> {
        self.store.iter()
    }

    pub fn num_domains(&self) -> usize {
        self.store.len()
    }

    /// Read-only view of the hierarchy graph
    pub fn graph(&self) -> &HierarchyGraph {
        &self.graph
    }

    /// Visibility state of the vertex for a tag
    pub fn state(&self, tag: &str) -> Result<VertexState> {
        let vertex = self
            .graph
            .vertex(tag)
            .ok_or_else(|| TopologyError::unknown_domain(tag))?;
        Ok(self.graph.state(vertex))
    }

    /// Unit-scope leaf domain of a unit
    pub fn unit_domain(&self, unit: UnitId) -> Result<&LocalityDomain> {
        let tag = self
            .unit_leaf
            .get(&unit)
            .ok_or_else(|| TopologyError::unknown_domain(format!("unit {}", unit)))?;
        self.store.get(tag.as_str())
    }

    /// Lowest common ancestor of the given tags.
    ///
    /// Computed as the longest common dot-separated tag prefix — O(total
    /// tag length), no graph traversal. An empty input yields the root
    /// domain; a prefix that is not in the store (stale tags from another
    /// session) fails with [`TopologyError::UnknownDomain`].
    pub fn ancestor<'a, I>(&self, tags: I) -> Result<&LocalityDomain>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let prefix = DomainTag::common_prefix(tags);
        self.store.get(prefix.as_str())
    }

    /// Hide the domain with the given tag and all its descendants.
    ///
    /// Hidden vertices stay in the graph and the store; enumeration and
    /// filtered traversal skip them. Excluding an already-hidden subtree
    /// is a no-op.
    pub fn exclude(&mut self, tag: &str) -> Result<()> {
        let vertex = self
            .graph
            .vertex(tag)
            .ok_or_else(|| TopologyError::unknown_domain(tag))?;
        if self.graph.state(vertex) == VertexState::Hidden {
            return Ok(());
        }
        let subtree = self.graph.subtree(vertex);
        for v in &subtree {
            self.graph.set_state(*v, VertexState::Hidden);
        }
        debug!("excluded subtree at {}: {} vertices hidden", tag, subtree.len());
        Ok(())
    }

    /// Mark each named domain as selected.
    ///
    /// Additive: descendants are untouched, and a hidden vertex keeps its
    /// hidden state. All tags are validated before the first mark is
    /// applied, so a failed call changes nothing.
    pub fn select<'a, I>(&mut self, tags: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut vertices = Vec::new();
        for tag in tags {
            let vertex = self
                .graph
                .vertex(tag)
                .ok_or_else(|| TopologyError::unknown_domain(tag))?;
            vertices.push(vertex);
        }
        for vertex in vertices {
            if self.graph.state(vertex) != VertexState::Hidden {
                self.graph.set_state(vertex, VertexState::Selected);
            }
        }
        Ok(())
    }

    /// Tags of all non-hidden domains at the given scope, in depth-first
    /// discovery order (depth, then sibling index).
    pub fn scope_domain_tags(&self, scope: LocalityScope) -> Vec<DomainTag> {
        self.graph
            .subtree(self.graph.root())
            .into_iter()
            .filter(|&v| self.graph.state(v) != VertexState::Hidden)
            .filter_map(|v| {
                let tag = self.graph.tag(v);
                match self.store.get(tag.as_str()) {
                    Ok(domain) if domain.scope == scope => Some(tag.clone()),
                    _ => None,
                }
            })
            .collect()
    }

    /// Replace sibling domains by a single synthetic group domain.
    ///
    /// The new domain's unit set is the union of the grouped domains'
    /// units; the grouped domains are re-parented under it with their
    /// original tags preserved; its tag is a freshly allocated
    /// sibling-index extension of the common parent. Validation completes
    /// before the first write: targets must exist, be distinct, be
    /// visible, share one scope, and still be direct children of their
    /// tag parent. Returns the new group's tag.
    pub fn group<'a, I>(&mut self, tags: I) -> Result<DomainTag>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tags: Vec<&str> = tags.into_iter().collect();
        if tags.is_empty() {
            return Err(TopologyError::invalid_grouping("empty group request"));
        }

        let mut seen = std::collections::BTreeSet::new();
        let mut targets = Vec::with_capacity(tags.len());
        for tag in &tags {
            if !seen.insert(*tag) {
                return Err(TopologyError::invalid_grouping(format!(
                    "duplicate tag {} in group request",
                    tag
                )));
            }
            let vertex = self
                .graph
                .vertex(tag)
                .ok_or_else(|| TopologyError::unknown_domain(*tag))?;
            if self.graph.state(vertex) == VertexState::Hidden {
                return Err(TopologyError::invalid_grouping(format!(
                    "domain {} is hidden",
                    tag
                )));
            }
            targets.push((DomainTag::new(*tag), vertex));
        }

        // all targets must still sit under their tag parent; a domain
        // that was already re-parented into a group fails here
        let parent_tag = targets[0].0.parent().ok_or_else(|| {
            TopologyError::invalid_grouping("the root domain cannot be grouped")
        })?;
        let parent_vertex = self
            .graph
            .vertex(parent_tag.as_str())
            .ok_or_else(|| TopologyError::unknown_domain(parent_tag.as_str()))?;
        for (tag, vertex) in &targets {
            if tag.parent().as_ref() != Some(&parent_tag) {
                return Err(TopologyError::invalid_grouping(format!(
                    "domains {} and {} are not siblings",
                    targets[0].0, tag
                )));
            }
            if self.graph.parent(*vertex) != Some(parent_vertex) {
                return Err(TopologyError::invalid_grouping(format!(
                    "domain {} is already part of a group",
                    tag
                )));
            }
        }

        let scope = self.store.get(targets[0].0.as_str())?.scope;
        for (tag, _) in &targets[1..] {
            if self.store.get(tag.as_str())?.scope != scope {
                return Err(TopologyError::invalid_grouping(format!(
                    "domains {} and {} differ in scope",
                    targets[0].0, tag
                )));
            }
        }

        // fresh sibling index: one past the largest index currently in
        // use under the parent, so a group tag can never collide
        let next_index = self
            .graph
            .children(parent_vertex)
            .into_iter()
            .filter_map(|c| self.graph.tag(c).sibling_index())
            .max()
            .map_or(0, |max| max + 1);
        let group_tag = parent_tag.child(next_index);

        // validation is complete; store and graph are updated together
        // behind &mut self, so no reader observes an intermediate state
        let mut group_domain = LocalityDomain::new(group_tag.clone(), LocalityScope::Group);
        let mut hosts = Vec::new();
        for (tag, _) in &targets {
            let domain = self.store.get(tag.as_str())?;
            group_domain.unit_ids.extend(domain.unit_ids.iter().copied());
            hosts.push(domain.host.clone());
        }
        if let Some(host) = hosts.first().cloned().flatten() {
            if hosts.iter().all(|h| h.as_deref() == Some(host.as_str())) {
                group_domain.host = Some(host);
            }
        }

        let group_vertex = self.graph.add_vertex(group_tag.clone());
        self.graph.add_containment(parent_vertex, group_vertex);
        for (_, vertex) in &targets {
            self.graph.remove_containment(parent_vertex, *vertex);
            self.graph.add_containment(group_vertex, *vertex);
        }
        self.store.insert(group_domain);

        debug!(
            "grouped {} domains under {} (parent {})",
            targets.len(),
            group_tag,
            parent_tag
        );
        Ok(group_tag)
    }

    /// Depth-first traversal of the visible hierarchy: callbacks are
    /// suppressed for hidden vertices via the [`HiddenFilter`] decorator,
    /// while the walk itself still descends through every vertex.
    pub fn traverse<V: DomainVisitor>(&self, visitor: &mut V) {
        let mut filtered = HiddenFilter::new(visitor);
        depth_first_search(&self.graph, &self.store, &mut filtered);
    }

    /// Unfiltered depth-first traversal, hidden vertices included
    pub fn depth_first_search<V: DomainVisitor>(&self, visitor: &mut V) {
        depth_first_search(&self.graph, &self.store, visitor);
    }

    /// Render the hierarchy as a dot digraph for visualization tooling
    pub fn to_dot(&self) -> String {
        export::to_dot(&self.graph, &self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{HostInfo, UnitLocation};

    /// 2 hosts × 2 NUMA × 1 unit each
    fn fixture() -> Topology {
        let host_topology = HostTopology::new()
            .with_host(HostInfo::new("a").with_level(LocalityScope::Numa, 2))
            .with_host(HostInfo::new("b").with_level(LocalityScope::Numa, 2));
        let unit_mapping = UnitMapping::new()
            .with_unit(UnitId(0), UnitLocation::on_host("a").with_numa(0))
            .with_unit(UnitId(1), UnitLocation::on_host("a").with_numa(1))
            .with_unit(UnitId(2), UnitLocation::on_host("b").with_numa(0))
            .with_unit(UnitId(3), UnitLocation::on_host("b").with_numa(1));
        Topology::build(&host_topology, &unit_mapping).unwrap()
    }

    #[test]
    fn test_ancestor_of_nothing_is_root() {
        let topo = fixture();
        let root = topo.ancestor([]).unwrap();
        assert!(root.tag.is_root());
        assert_eq!(root.scope, LocalityScope::Global);
    }

    #[test]
    fn test_ancestor_unknown_prefix() {
        let topo = fixture();
        let err = topo.ancestor(["7.7", "7.8"]).unwrap_err();
        assert_eq!(err, TopologyError::unknown_domain("7"));
    }

    #[test]
    fn test_exclude_unknown_tag() {
        let mut topo = fixture();
        assert_eq!(
            topo.exclude("9"),
            Err(TopologyError::unknown_domain("9"))
        );
    }

    #[test]
    fn test_select_validates_before_mutating() {
        let mut topo = fixture();
        let err = topo.select(["0", "bogus"]).unwrap_err();
        assert_eq!(err, TopologyError::unknown_domain("bogus"));
        // nothing was marked
        assert_eq!(topo.state("0").unwrap(), VertexState::Normal);
    }

    #[test]
    fn test_select_leaves_hidden_hidden() {
        let mut topo = fixture();
        topo.exclude("0.1").unwrap();
        topo.select(["0.0", "0.1"]).unwrap();
        assert_eq!(topo.state("0.0").unwrap(), VertexState::Selected);
        assert_eq!(topo.state("0.1").unwrap(), VertexState::Hidden);
    }

    #[test]
    fn test_group_rejects_non_siblings() {
        let mut topo = fixture();
        let err = topo.group(["0.0", "1.0"]).unwrap_err();
        assert!(matches!(err, TopologyError::InvalidGrouping(_)));
    }

    #[test]
    fn test_group_rejects_duplicates_and_empty() {
        let mut topo = fixture();
        assert!(matches!(
            topo.group(["0.0", "0.0"]).unwrap_err(),
            TopologyError::InvalidGrouping(_)
        ));
        assert!(matches!(
            topo.group([]).unwrap_err(),
            TopologyError::InvalidGrouping(_)
        ));
    }

    #[test]
    fn test_group_rejects_root() {
        let mut topo = fixture();
        assert!(matches!(
            topo.group([""]).unwrap_err(),
            TopologyError::InvalidGrouping(_)
        ));
    }

    #[test]
    fn test_group_rejects_regrouping() {
        let mut topo = fixture();
        topo.group(["0.0", "0.1"]).unwrap();
        let err = topo.group(["0.0", "0.1"]).unwrap_err();
        assert!(err.to_string().contains("already part of a group"));
    }

    #[test]
    fn test_group_failure_leaves_structure_unchanged() {
        let mut topo = fixture();
        let before = topo.graph().num_edges();
        let _ = topo.group(["0.0", "1.0"]).unwrap_err();
        assert_eq!(topo.graph().num_edges(), before);
        assert!(topo.domain("0.2").is_err());
    }

    #[test]
    fn test_unit_domain_lookup() {
        let topo = fixture();
        let leaf = topo.unit_domain(UnitId(2)).unwrap();
        assert_eq!(leaf.scope, LocalityScope::Unit);
        assert_eq!(leaf.tag, "1.0.0");

        let err = topo.unit_domain(UnitId(9)).unwrap_err();
        assert_eq!(err, TopologyError::unknown_domain("unit 9"));
    }

    #[test]
    fn test_state_of_unknown_tag() {
        let topo = fixture();
        assert!(topo.state("5.5").is_err());
    }
}
