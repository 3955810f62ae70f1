//! Host topology input snapshot
//!
//! Already-parsed hardware facts consumed by the builder: for each host,
//! an ordered hierarchy of hardware-locality levels. Discovery itself is
//! an external collaborator; this module only defines the snapshot shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::LocalityScope;

/// One hardware level of a host (module, NUMA, or core), with the number
/// of instances per parent-level instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareLevel {
    pub scope: LocalityScope,
    /// Instances of this level per instance of the enclosing level
    pub per_parent: u32,
}

impl HardwareLevel {
    pub fn new(scope: LocalityScope, per_parent: u32) -> Self {
        Self { scope, per_parent }
    }
}

/// Hardware locality hierarchy of a single host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    pub hostname: String,
    /// Hardware levels, outermost first (canonicalized on insertion)
    pub levels: Vec<HardwareLevel>,
}

impl HostInfo {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            levels: Vec::new(),
        }
    }

    /// Declare a hardware level for this host
    pub fn with_level(mut self, scope: LocalityScope, per_parent: u32) -> Self {
        self.levels.push(HardwareLevel::new(scope, per_parent));
        self
    }
}

/// Snapshot of the hardware topology of all hosts in the session.
///
/// Host-keyed and ordered: iteration order is the sorted hostname order,
/// independent of insertion order, so construction stays a pure function
/// of the snapshot contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostTopology {
    hosts: BTreeMap<String, HostInfo>,
}

impl HostTopology {
    pub fn new() -> Self {
        Self {
            hosts: BTreeMap::new(),
        }
    }

    /// Insert a host, canonicalizing its level list: non-hardware scopes
    /// are dropped, levels are ordered by containment depth, and duplicate
    /// scopes keep their first declaration.
    pub fn add_host(&mut self, host: HostInfo) {
        let mut host = host;
        host.levels.retain(|l| l.scope.is_hardware_level());
        host.levels.sort_by_key(|l| l.scope);
        host.levels.dedup_by_key(|l| l.scope);
        self.hosts.insert(host.hostname.clone(), host);
    }

    pub fn with_host(mut self, host: HostInfo) -> Self {
        self.add_host(host);
        self
    }

    pub fn get(&self, hostname: &str) -> Option<&HostInfo> {
        self.hosts.get(hostname)
    }

    /// Hosts in sorted hostname order
    pub fn hosts(&self) -> impl Iterator<Item = &HostInfo> {
        self.hosts.values()
    }

    pub fn num_hosts(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
