//! Error types for source lookups.

use crate::SourceHash;
use thiserror::Error;

/// Result type alias for rulemark-source-map operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when resolving source locations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A span or query referenced a source hash absent from the registry.
    ///
    /// This indicates a programming error (a `Span` outliving the registry
    /// its source was added to, or a registry that was never populated),
    /// never a problem with user input.
    #[error("source hash {hash} is not registered")]
    UnknownSource {
        /// The hash that failed to resolve
        hash: SourceHash,
    },
}
