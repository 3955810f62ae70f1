//! Shared fixtures for integration tests
#![allow(dead_code)] // each test binary uses a subset of the fixtures

use locmap_core::{
    HostInfo, HostTopology, LocalityScope, Topology, UnitId, UnitLocation, UnitMapping,
};

/// 2 hosts, each with 2 NUMA domains, each NUMA with 2 resident units;
/// unit ids 0-7 assigned in host/NUMA order.
pub fn two_host_snapshots() -> (HostTopology, UnitMapping) {
    let mut host_topology = HostTopology::new();
    let mut unit_mapping = UnitMapping::new();
    let mut unit = 0;
    for host in ["host0", "host1"] {
        host_topology.add_host(HostInfo::new(host).with_level(LocalityScope::Numa, 2));
        for numa in 0..2 {
            for _ in 0..2 {
                unit_mapping.map_unit(UnitId(unit), UnitLocation::on_host(host).with_numa(numa));
                unit += 1;
            }
        }
    }
    (host_topology, unit_mapping)
}

pub fn two_host_topology() -> Topology {
    let (host_topology, unit_mapping) = two_host_snapshots();
    Topology::build(&host_topology, &unit_mapping).unwrap()
}

/// Deterministic fingerprint of a topology: sorted (tag, scope, units)
pub fn fingerprint(topology: &Topology) -> Vec<(String, String, Vec<u32>)> {
    let mut rows: Vec<(String, String, Vec<u32>)> = topology
        .domains()
        .map(|(tag, domain)| {
            (
                tag.as_str().to_string(),
                domain.scope.as_str().to_string(),
                domain.unit_ids.iter().map(|u| u.0).collect(),
            )
        })
        .collect();
    rows.sort();
    rows
}
