//! Locality domains and the domain store

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::errors::{Result, TopologyError};
use crate::model::{DomainTag, LocalityScope};

/// Identifier of a distributed unit (worker process)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct UnitId(pub u32);

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in the locality hierarchy.
///
/// Owns its own identity: position tag, scope level, and the set of unit
/// ids physically located under it (the union of its descendants' units).
///
/// # Invariants
///
/// 1. `tag` is a strict one-component extension of the parent's tag
///    (synthetic group children keep their original tags, see grouping)
/// 2. The root domain has the empty tag and scope `Global`
/// 3. `unit_ids` is sorted by construction (`BTreeSet`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalityDomain {
    /// Dot-separated sibling-index path from the root
    pub tag: DomainTag,

    /// Hierarchy level of this domain
    pub scope: LocalityScope,

    /// Units resident under this domain
    pub unit_ids: BTreeSet<UnitId>,

    /// Hostname this domain belongs to (`None` above node scope)
    pub host: Option<String>,
}

impl LocalityDomain {
    pub fn new(tag: DomainTag, scope: LocalityScope) -> Self {
        Self {
            tag,
            scope,
            unit_ids: BTreeSet::new(),
            host: None,
        }
    }

    pub fn with_units(mut self, unit_ids: impl IntoIterator<Item = UnitId>) -> Self {
        self.unit_ids = unit_ids.into_iter().collect();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn num_units(&self) -> usize {
        self.unit_ids.len()
    }

    pub fn is_leaf_scope(&self) -> bool {
        self.scope == LocalityScope::Unit
    }
}

/// Associative owner of all locality domains of a session, addressed by tag.
///
/// The store is the sole owner of domain values; the hierarchy graph holds
/// only tags as lookup keys, so graph-level operations (filtering, copying
/// a view) can never produce dangling domain references.
#[derive(Debug, Clone, Default)]
pub struct DomainStore {
    domains: FxHashMap<DomainTag, LocalityDomain>,
}

impl DomainStore {
    pub fn new() -> Self {
        Self {
            domains: FxHashMap::default(),
        }
    }

    /// Insert a domain under its own tag, replacing any previous value
    pub fn insert(&mut self, domain: LocalityDomain) {
        self.domains.insert(domain.tag.clone(), domain);
    }

    /// Look up a domain by tag
    pub fn get(&self, tag: &str) -> Result<&LocalityDomain> {
        self.domains
            .get(tag)
            .ok_or_else(|| TopologyError::unknown_domain(tag))
    }

    pub fn get_mut(&mut self, tag: &str) -> Result<&mut LocalityDomain> {
        self.domains
            .get_mut(tag)
            .ok_or_else(|| TopologyError::unknown_domain(tag))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.domains.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Iterate all domains (unordered); use the graph traversal for
    /// deterministic ordering.
    pub fn iter(&self) -> impl Iterator<Item = (&DomainTag, &LocalityDomain)> {
        self.domains.iter()
    }

    /// All tags in sorted order (lexicographic, for stable diagnostics)
    pub fn sorted_tags(&self) -> Vec<DomainTag> {
        let mut tags: Vec<DomainTag> = self.domains.keys().cloned().collect();
        tags.sort();
        tags
    }
}
