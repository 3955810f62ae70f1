//! Locality scope levels

use serde::{Deserialize, Serialize};

use crate::errors::{Result, TopologyError};

/// Hierarchy level classification of a locality domain.
///
/// Variants are declared outermost-first, so the derived `Ord` is the
/// total order by containment depth: `Global < Group < ... < Unit`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum LocalityScope {
    /// The whole job (root domain)
    Global,
    /// Synthetic domain created by grouping sibling domains
    Group,
    /// A single host
    Node,
    /// Hardware module (package/socket)
    Module,
    /// NUMA domain
    Numa,
    /// Physical core
    Core,
    /// A single distributed unit (worker process)
    Unit,
}

impl LocalityScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocalityScope::Global => "global",
            LocalityScope::Group => "group",
            LocalityScope::Node => "node",
            LocalityScope::Module => "module",
            LocalityScope::Numa => "numa",
            LocalityScope::Core => "core",
            LocalityScope::Unit => "unit",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "global" => Ok(LocalityScope::Global),
            "group" => Ok(LocalityScope::Group),
            "node" => Ok(LocalityScope::Node),
            "module" => Ok(LocalityScope::Module),
            "numa" => Ok(LocalityScope::Numa),
            "core" => Ok(LocalityScope::Core),
            "unit" => Ok(LocalityScope::Unit),
            _ => Err(TopologyError::invalid_mapping(format!(
                "invalid locality scope: {}",
                s
            ))),
        }
    }

    /// True for the hardware levels a host topology may declare
    /// between node and unit scope.
    pub fn is_hardware_level(&self) -> bool {
        matches!(
            self,
            LocalityScope::Module | LocalityScope::Numa | LocalityScope::Core
        )
    }
}

impl std::fmt::Display for LocalityScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_containment_order() {
        assert!(LocalityScope::Global < LocalityScope::Node);
        assert!(LocalityScope::Node < LocalityScope::Module);
        assert!(LocalityScope::Module < LocalityScope::Numa);
        assert!(LocalityScope::Numa < LocalityScope::Core);
        assert!(LocalityScope::Core < LocalityScope::Unit);
        assert!(LocalityScope::Global < LocalityScope::Group);
        assert!(LocalityScope::Group < LocalityScope::Node);
    }

    #[test]
    fn test_scope_roundtrip() {
        for scope in &[
            LocalityScope::Global,
            LocalityScope::Group,
            LocalityScope::Node,
            LocalityScope::Module,
            LocalityScope::Numa,
            LocalityScope::Core,
            LocalityScope::Unit,
        ] {
            let parsed = LocalityScope::from_str(scope.as_str()).unwrap();
            assert_eq!(*scope, parsed);
        }
    }

    #[test]
    fn test_scope_invalid() {
        assert!(LocalityScope::from_str("socket").is_err());
    }

    #[test]
    fn test_hardware_levels() {
        assert!(LocalityScope::Numa.is_hardware_level());
        assert!(!LocalityScope::Node.is_hardware_level());
        assert!(!LocalityScope::Unit.is_hardware_level());
    }
}
