//! Unit mapping input snapshot
//!
//! For each distributed unit id: its resident host and most-specific
//! hardware location within that host. Placement discovery is an external
//! collaborator; this module only defines the snapshot shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{LocalityScope, UnitId};

/// Hardware location of one unit within its resident host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitLocation {
    pub host: String,
    pub module: Option<u32>,
    pub numa: Option<u32>,
    pub core: Option<u32>,
}

impl UnitLocation {
    pub fn on_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn with_module(mut self, module: u32) -> Self {
        self.module = Some(module);
        self
    }

    pub fn with_numa(mut self, numa: u32) -> Self {
        self.numa = Some(numa);
        self
    }

    pub fn with_core(mut self, core: u32) -> Self {
        self.core = Some(core);
        self
    }

    /// Coordinate of this unit at a hardware level, if located there
    pub fn coordinate(&self, scope: LocalityScope) -> Option<u32> {
        match scope {
            LocalityScope::Module => self.module,
            LocalityScope::Numa => self.numa,
            LocalityScope::Core => self.core,
            _ => None,
        }
    }
}

/// Snapshot of unit placements for the session.
///
/// Unit-keyed and ordered: a unit id maps to exactly one location, and
/// iteration order is unit-id order regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitMapping {
    units: BTreeMap<UnitId, UnitLocation>,
}

impl UnitMapping {
    pub fn new() -> Self {
        Self {
            units: BTreeMap::new(),
        }
    }

    /// Record the location of a unit, replacing any previous placement
    pub fn map_unit(&mut self, unit: UnitId, location: UnitLocation) {
        self.units.insert(unit, location);
    }

    pub fn with_unit(mut self, unit: UnitId, location: UnitLocation) -> Self {
        self.map_unit(unit, location);
        self
    }

    pub fn get(&self, unit: UnitId) -> Option<&UnitLocation> {
        self.units.get(&unit)
    }

    /// Placements in unit-id order
    pub fn units(&self) -> impl Iterator<Item = (UnitId, &UnitLocation)> {
        self.units.iter().map(|(unit, loc)| (*unit, loc))
    }

    /// All mapped unit ids, in unit-id order
    pub fn unit_ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.keys().copied()
    }

    pub fn num_units(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
