//! Error types for locmap-core
//!
//! Provides unified error handling across the crate.

use thiserror::Error;

/// Main error type for locality topology operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// Construction was given a host topology without any hosts
    #[error("empty host topology: nothing to build a hierarchy from")]
    EmptyTopology,

    /// A unit's location does not resolve within the given host topology
    #[error("invalid unit mapping: {0}")]
    InvalidMapping(String),

    /// A query or mutation referenced a tag absent from the domain store
    #[error("unknown domain: {0}")]
    UnknownDomain(String),

    /// A group request whose targets are not ungrouped siblings
    #[error("invalid grouping: {0}")]
    InvalidGrouping(String),
}

impl TopologyError {
    /// Create an invalid-mapping error
    pub fn invalid_mapping(msg: impl Into<String>) -> Self {
        TopologyError::InvalidMapping(msg.into())
    }

    /// Create an unknown-domain error
    pub fn unknown_domain(tag: impl Into<String>) -> Self {
        TopologyError::UnknownDomain(tag.into())
    }

    /// Create an invalid-grouping error
    pub fn invalid_grouping(msg: impl Into<String>) -> Self {
        TopologyError::InvalidGrouping(msg.into())
    }
}

/// Result type alias for locality topology operations
pub type Result<T> = std::result::Result<T, TopologyError>;
