//! Hierarchy graph, traversal, and export

pub mod export;
pub mod hierarchy;
pub mod traversal;

pub use hierarchy::{EdgeKind, EdgeProps, HierarchyGraph, VertexProps, VertexState};
pub use traversal::{depth_first_search, DomainTableVisitor, DomainVisitor, HiddenFilter};
