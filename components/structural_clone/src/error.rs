//! Errors produced by the individual clone tiers.
//!
//! These never escape [`DeepClone::clone_value`](crate::DeepClone::clone_value);
//! the driver absorbs them and, when every tier has failed, reports the last
//! one through the diagnostic channel.

use thiserror::Error;

/// Errors that can occur while a single tier attempts a clone
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CloneError {
    /// The value contains a member the tier cannot reproduce
    #[error("DataCloneError: {0}")]
    DataClone(String),
    /// A container refers back to itself on the current path
    #[error("Converting circular structure to JSON")]
    CircularReference,
    /// Nesting deeper than the configured limit
    #[error("Maximum recursion depth exceeded")]
    MaxDepthExceeded,
    /// Writing the textual representation failed
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Reading the textual representation back failed
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Result type for tier operations
pub type CloneResult<T> = Result<T, CloneError>;
