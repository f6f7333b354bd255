//! Error Types
//!
//! This module defines the error types used throughout the converter.
//!
//! # Overview
//!
//! Conversion degrades gracefully: missing properties, empty curves and
//! unknown enum codes fall back to defaults and are logged. [`ConvertError`]
//! is reserved for structural contract violations in the input, such as a
//! transform chain of the wrong length or a cyclic node hierarchy.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pivot_anim::errors::{ConvertError, Result};
//!
//! fn convert() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::document::NodeId;
use crate::transform::component::TransformComponent;

/// The main error type for the converter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    // ========================================================================
    // Transform Chain Errors
    // ========================================================================
    /// A transform chain was built from a slice that does not hold exactly
    /// one entry per [`TransformComponent`].
    #[error("Malformed transform chain: expected {} entries, got {len}", TransformComponent::COUNT)]
    MalformedChain {
        /// Number of entries that were supplied
        len: usize,
    },

    // ========================================================================
    // Document Errors
    // ========================================================================
    /// The requested node id is not part of the document.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// Two models were registered under the same id.
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// A model refers to a parent id the document does not hold.
    #[error("Node {node} refers to unknown parent {parent}")]
    UnknownParent {
        /// The child node
        node: NodeId,
        /// The missing parent id
        parent: NodeId,
    },

    /// Following parent links from this node leads back to itself.
    #[error("Node hierarchy contains a cycle through {0}")]
    HierarchyCycle(NodeId),
}

/// Alias for `Result<T, ConvertError>`.
pub type Result<T> = std::result::Result<T, ConvertError>;
