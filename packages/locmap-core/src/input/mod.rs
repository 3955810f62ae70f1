//! Input snapshots consumed by the hierarchy builder
//!
//! Both structures are serde-serializable so a session layer can replicate
//! them to every process; identical snapshots rebuild identical topologies.

pub mod host_topology;
pub mod unit_mapping;

pub use host_topology::{HardwareLevel, HostInfo, HostTopology};
pub use unit_mapping::{UnitLocation, UnitMapping};
