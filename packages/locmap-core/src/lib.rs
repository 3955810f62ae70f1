/*
 * locmap-core - Locality Domain Hierarchy Engine
 *
 * Models the hardware and process locality hierarchy of a distributed
 * job — which units run on which hosts, modules, NUMA domains, and
 * cores — as a queryable tag-addressed tree.
 *
 * Architecture:
 * - model/    : Locality domains, tags, scopes, and the domain store
 * - input/    : Host-topology and unit-mapping snapshots (serde)
 * - graph/    : Hierarchy graph (petgraph), traversal, dot export
 * - build     : Deterministic construction from the input snapshots
 * - topology  : Session context: queries and mutations
 * - session   : Per-team runtime owning one topology per team
 *
 * Every process of a job builds its own topology from replicated input
 * snapshots; construction is a pure function of the snapshots, so query
 * results (ancestor tags, scope enumerations) agree across processes
 * without communication.
 */

/// Deterministic hierarchy construction
pub mod build;

/// Error types
pub mod errors;

/// Hierarchy graph, traversal, and export
pub mod graph;

/// Input snapshots consumed by the builder
pub mod input;

/// Domain model
pub mod model;

/// Per-team locality sessions
pub mod session;

/// Session context: queries and mutations
pub mod topology;

// Re-exports for the public API
pub use build::{BuildOptions, TopologyBuilder};
pub use errors::{Result, TopologyError};
pub use graph::{
    depth_first_search, DomainTableVisitor, DomainVisitor, EdgeKind, EdgeProps, HiddenFilter,
    HierarchyGraph, VertexProps, VertexState,
};
pub use input::{HardwareLevel, HostInfo, HostTopology, UnitLocation, UnitMapping};
pub use model::{DomainStore, DomainTag, LocalityDomain, LocalityScope, UnitId};
pub use session::{LocalityRuntime, TeamId};
pub use topology::Topology;
