//! Hierarchy builder
//!
//! Constructs the domain store and hierarchy graph from a host-topology
//! and unit-mapping snapshot. Construction is a pure function of the two
//! snapshots: hosts are processed in sorted hostname order, units in
//! unit-id order, and all intermediate containers are ordered, so two
//! processes building from identical snapshots reach identical tags,
//! scopes, and containment structure without communicating.
//!
//! # Algorithm
//! 1. Validate every unit placement against the host topology
//! 2. Plan each host's domain subtree in parallel (rayon)
//! 3. Attach the plans sequentially in host order, allocating tags
//! 4. Optionally annotate NUMA siblings with distance edges

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::errors::{Result, TopologyError};
use crate::graph::{EdgeKind, HierarchyGraph};
use crate::input::{HostInfo, HostTopology, UnitLocation, UnitMapping};
use crate::model::{DomainStore, DomainTag, LocalityDomain, LocalityScope, UnitId};
use crate::topology::Topology;

/// Construction options.
///
/// Options only add auxiliary annotations; they never affect tags,
/// scopes, or the containment structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Annotate NUMA domains under a common parent with pairwise
    /// `sibling` edges carrying an index-distance metric
    pub numa_sibling_edges: bool,
}

/// Builds a [`Topology`] from input snapshots.
#[derive(Debug, Clone, Default)]
pub struct TopologyBuilder {
    options: BuildOptions,
}

/// One domain of a host subtree, relative to the host's node domain
struct PlannedDomain {
    /// Sibling-index path below the node domain
    rel: Vec<usize>,
    scope: LocalityScope,
    units: Vec<UnitId>,
}

/// Planned subtree of a single host, in preorder
struct HostPlan {
    hostname: String,
    units: Vec<UnitId>,
    domains: Vec<PlannedDomain>,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Build the domain store and hierarchy graph for the given snapshots.
    ///
    /// Fails with [`TopologyError::EmptyTopology`] when the host topology
    /// declares no hosts, and [`TopologyError::InvalidMapping`] when a
    /// unit's location is not a consistent descent through the topology.
    /// On failure no partial topology is returned.
    pub fn build(
        &self,
        host_topology: &HostTopology,
        unit_mapping: &UnitMapping,
    ) -> Result<Topology> {
        if host_topology.is_empty() {
            return Err(TopologyError::EmptyTopology);
        }
        validate_mapping(host_topology, unit_mapping)?;

        info!(
            "building locality hierarchy: {} hosts, {} units",
            host_topology.num_hosts(),
            unit_mapping.num_units()
        );

        // Units per host, in unit-id order within each host
        let mut units_by_host: BTreeMap<&str, Vec<(UnitId, &UnitLocation)>> = BTreeMap::new();
        for (unit, location) in unit_mapping.units() {
            units_by_host
                .entry(location.host.as_str())
                .or_default()
                .push((unit, location));
        }

        // Per-host plans are independent; the parallel map preserves the
        // sorted host order, so parallelism cannot affect the result
        let hosts: Vec<&HostInfo> = host_topology.hosts().collect();
        let plans: Vec<HostPlan> = hosts
            .par_iter()
            .map(|host| {
                let units = units_by_host
                    .get(host.hostname.as_str())
                    .map(|v| v.as_slice())
                    .unwrap_or(&[]);
                plan_host(host, units)
            })
            .collect();

        let mut store = DomainStore::new();
        let mut graph = HierarchyGraph::new();
        let mut unit_leaf: FxHashMap<UnitId, DomainTag> = FxHashMap::default();

        store.insert(
            LocalityDomain::new(DomainTag::root(), LocalityScope::Global)
                .with_units(unit_mapping.unit_ids()),
        );

        for (node_index, plan) in plans.iter().enumerate() {
            let node_tag = DomainTag::root().child(node_index);
            let node_vertex = graph.add_vertex(node_tag.clone());
            graph.add_containment(graph.root(), node_vertex);
            store.insert(
                LocalityDomain::new(node_tag.clone(), LocalityScope::Node)
                    .with_units(plan.units.iter().copied())
                    .with_host(&plan.hostname),
            );
            debug!(
                "attached node domain {} for host {} ({} units, {} subdomains)",
                node_tag,
                plan.hostname,
                plan.units.len(),
                plan.domains.len()
            );

            for planned in &plan.domains {
                let mut tag = node_tag.clone();
                for &index in &planned.rel {
                    tag = tag.child(index);
                }
                // plans are preorder: the parent vertex always exists
                let parent_tag = tag.parent().unwrap_or_else(DomainTag::root);
                let parent_vertex = graph
                    .vertex(parent_tag.as_str())
                    .expect("parent vertex precedes child in preorder plan");

                let vertex = graph.add_vertex(tag.clone());
                graph.add_containment(parent_vertex, vertex);
                if planned.scope == LocalityScope::Unit {
                    if let Some(&unit) = planned.units.first() {
                        unit_leaf.insert(unit, tag.clone());
                    }
                }
                store.insert(
                    LocalityDomain::new(tag, planned.scope)
                        .with_units(planned.units.iter().copied())
                        .with_host(&plan.hostname),
                );
            }
        }

        if self.options.numa_sibling_edges {
            annotate_numa_siblings(&mut graph, &store);
        }

        info!(
            "locality hierarchy built: {} domains, {} edges",
            store.len(),
            graph.num_edges()
        );
        Ok(Topology::from_parts(store, graph, unit_leaf))
    }
}

/// Check that every unit's location resolves as a consistent descent
/// through the host topology. Units are checked in unit-id order, so the
/// reported failure is deterministic.
fn validate_mapping(host_topology: &HostTopology, unit_mapping: &UnitMapping) -> Result<()> {
    for (unit, location) in unit_mapping.units() {
        let host = host_topology.get(&location.host).ok_or_else(|| {
            TopologyError::invalid_mapping(format!(
                "unit {} mapped to unknown host {}",
                unit, location.host
            ))
        })?;
        for level in &host.levels {
            let coordinate = location.coordinate(level.scope).ok_or_else(|| {
                TopologyError::invalid_mapping(format!(
                    "unit {} has no {} coordinate, required by host {}",
                    unit, level.scope, host.hostname
                ))
            })?;
            if coordinate >= level.per_parent {
                return Err(TopologyError::invalid_mapping(format!(
                    "unit {}: {} index {} out of range on host {} (0..{})",
                    unit, level.scope, coordinate, host.hostname, level.per_parent
                )));
            }
        }
    }
    Ok(())
}

fn plan_host(host: &HostInfo, units: &[(UnitId, &UnitLocation)]) -> HostPlan {
    let mut domains = Vec::new();
    let mut prefix = Vec::new();
    expand_level(host, 0, &mut prefix, units, &mut domains);
    HostPlan {
        hostname: host.hostname.clone(),
        units: units.iter().map(|(unit, _)| *unit).collect(),
        domains,
    }
}

/// Expand one hardware level of a host: one child domain per level
/// instance, partitioning the enclosing units by their coordinate at this
/// level. Below the deepest declared level, one unit-scope leaf is
/// attached per resident unit.
fn expand_level(
    host: &HostInfo,
    level_index: usize,
    prefix: &mut Vec<usize>,
    units: &[(UnitId, &UnitLocation)],
    out: &mut Vec<PlannedDomain>,
) {
    if level_index == host.levels.len() {
        for (leaf_index, (unit, _)) in units.iter().enumerate() {
            prefix.push(leaf_index);
            out.push(PlannedDomain {
                rel: prefix.clone(),
                scope: LocalityScope::Unit,
                units: vec![*unit],
            });
            prefix.pop();
        }
        return;
    }

    let level = &host.levels[level_index];
    for instance in 0..level.per_parent as usize {
        let resident: Vec<(UnitId, &UnitLocation)> = units
            .iter()
            .filter(|(_, location)| location.coordinate(level.scope) == Some(instance as u32))
            .copied()
            .collect();
        prefix.push(instance);
        out.push(PlannedDomain {
            rel: prefix.clone(),
            scope: level.scope,
            units: resident.iter().map(|(unit, _)| *unit).collect(),
        });
        expand_level(host, level_index + 1, prefix, &resident, out);
        prefix.pop();
    }
}

/// Pairwise `sibling` edges between NUMA domains under a common parent,
/// distance = sibling-index distance.
fn annotate_numa_siblings(graph: &mut HierarchyGraph, store: &DomainStore) {
    let vertices: Vec<_> = graph.vertices().collect();
    for vertex in vertices {
        let numa_children: Vec<_> = graph
            .children(vertex)
            .into_iter()
            .filter(|&child| {
                store
                    .get(graph.tag(child).as_str())
                    .map(|d| d.scope == LocalityScope::Numa)
                    .unwrap_or(false)
            })
            .collect();
        for i in 0..numa_children.len() {
            for j in (i + 1)..numa_children.len() {
                graph.add_annotation(
                    numa_children[i],
                    numa_children[j],
                    EdgeKind::Sibling,
                    (j - i) as u32,
                );
            }
        }
    }
}
