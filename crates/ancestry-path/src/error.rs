//! Error types for ancestry path decoding.

use thiserror::Error;

/// Errors reported by the strict path decoder.
///
/// The lenient [`decode`](crate::decode) never returns these; it treats any
/// undecodable path as "zero ancestors".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A segment could not be parsed as the identifier type.
    #[error("invalid ancestry segment '{segment}' at position {position}")]
    InvalidSegment {
        /// The offending segment, trimmed.
        segment: String,
        /// 1-based position of the segment among the non-empty segments.
        position: usize,
    },

    /// The same identifier appears twice in one path.
    #[error("duplicate ancestor {0} in ancestry path")]
    DuplicateAncestor(String),

    /// The path lists the row's own identifier as one of its ancestors.
    #[error("ancestry path of {0} references the node itself")]
    SelfReference(String),
}

/// Result type for path operations.
pub type PathResult<T> = std::result::Result<T, PathError>;
