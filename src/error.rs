//! Error types for sorted-bucket-tree.

use thiserror::Error;

/// Result type alias using our [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by tree operations.
///
/// Everything except positional access is total: removing an absent element
/// or querying an empty tree is not an error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// `get` was called with an index outside `0..len`.
    #[error("index {index} out of range for tree of length {len}")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of elements at the time of the call.
        len: usize,
    },
}
