//! Domain model: tags, scopes, locality domains, and the domain store

pub mod domain;
pub mod scope;
pub mod tag;

pub use domain::{DomainStore, LocalityDomain, UnitId};
pub use scope::LocalityScope;
pub use tag::DomainTag;
