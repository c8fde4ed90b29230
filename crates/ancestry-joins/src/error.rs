//! Error types for ancestor expansion.

use ancestry_path::PathError;
use thiserror::Error;

/// Errors that can occur while expanding ancestors.
///
/// Dangling ancestor references and undecodable paths are not errors: the
/// former are omitted from the result, the latter count as zero ancestors.
/// Only strict path mode (see [`ExecutorConfig`](crate::ExecutorConfig))
/// turns malformed paths into [`JoinError::Path`].
#[derive(Error, Debug)]
pub enum JoinError {
    /// Malformed ancestry path rejected in strict mode.
    #[error("Ancestry path error: {0}")]
    Path(#[from] PathError),

    /// Result set exceeds configured limit.
    #[error("Result set too large: {count} exceeds limit {limit}")]
    ResultTooLarge {
        /// Number of rows produced.
        count: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Error from the underlying node store.
    #[error("Store error: {0}")]
    Store(String),
}

/// Result type for ancestor expansion.
pub type JoinResult<T> = std::result::Result<T, JoinError>;
