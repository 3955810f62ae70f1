//! Per-team locality sessions
//!
//! A runtime owns one [`Topology`] per team of the distributed job. It is
//! an explicit object handed around by the embedding layer — there is no
//! process-wide topology singleton. Each process initializes its teams
//! from replicated input snapshots; deterministic construction makes the
//! resulting topologies agree across processes without communication.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::Result;
use crate::input::{HostTopology, UnitMapping};
use crate::topology::Topology;

/// Identifier of a team (process group) within the job
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TeamId(pub u32);

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owner of the locality topologies of all initialized teams.
#[derive(Debug, Default)]
pub struct LocalityRuntime {
    topologies: FxHashMap<TeamId, Topology>,
}

impl LocalityRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the locality topology of a team from its replicated
    /// snapshots. Re-initializing a team replaces its previous topology;
    /// a failed build leaves the previous topology in place.
    pub fn initialize_team(
        &mut self,
        team: TeamId,
        host_topology: &HostTopology,
        unit_mapping: &UnitMapping,
    ) -> Result<&Topology> {
        let topology = Topology::build(host_topology, unit_mapping)?;
        info!(
            "initialized locality for team {}: {} domains",
            team,
            topology.num_domains()
        );
        let slot = match self.topologies.entry(team) {
            std::collections::hash_map::Entry::Occupied(mut entry) => {
                entry.insert(topology);
                entry.into_mut()
            }
            std::collections::hash_map::Entry::Vacant(entry) => entry.insert(topology),
        };
        Ok(slot)
    }

    pub fn team_topology(&self, team: TeamId) -> Option<&Topology> {
        self.topologies.get(&team)
    }

    pub fn team_topology_mut(&mut self, team: TeamId) -> Option<&mut Topology> {
        self.topologies.get_mut(&team)
    }

    /// Tear down a team's topology; store and graph are released as a
    /// unit. Returns whether the team was initialized.
    pub fn finalize_team(&mut self, team: TeamId) -> bool {
        let removed = self.topologies.remove(&team).is_some();
        if removed {
            info!("finalized locality for team {}", team);
        }
        removed
    }

    pub fn num_teams(&self) -> usize {
        self.topologies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{HostInfo, UnitLocation};
    use crate::model::{LocalityScope, UnitId};

    fn snapshots() -> (HostTopology, UnitMapping) {
        let host_topology =
            HostTopology::new().with_host(HostInfo::new("a").with_level(LocalityScope::Numa, 2));
        let unit_mapping =
            UnitMapping::new().with_unit(UnitId(0), UnitLocation::on_host("a").with_numa(1));
        (host_topology, unit_mapping)
    }

    #[test]
    fn test_initialize_and_finalize() {
        let (host_topology, unit_mapping) = snapshots();
        let mut runtime = LocalityRuntime::new();

        runtime
            .initialize_team(TeamId(0), &host_topology, &unit_mapping)
            .unwrap();
        assert_eq!(runtime.num_teams(), 1);
        assert!(runtime.team_topology(TeamId(0)).is_some());

        assert!(runtime.finalize_team(TeamId(0)));
        assert!(!runtime.finalize_team(TeamId(0)));
        assert!(runtime.team_topology(TeamId(0)).is_none());
    }

    #[test]
    fn test_failed_build_keeps_previous_topology() {
        let (host_topology, unit_mapping) = snapshots();
        let mut runtime = LocalityRuntime::new();
        runtime
            .initialize_team(TeamId(3), &host_topology, &unit_mapping)
            .unwrap();

        let err = runtime
            .initialize_team(TeamId(3), &HostTopology::new(), &unit_mapping)
            .unwrap_err();
        assert_eq!(err, crate::errors::TopologyError::EmptyTopology);
        assert!(runtime.team_topology(TeamId(3)).is_some());
    }
}
