//! Error types for span-tracked YAML parsing.

use thiserror::Error;

/// Result type alias for rulemark-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or querying annotated trees.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// YAML syntax error from the underlying grammar parser.
    ///
    /// The message carries the scanner's own position text; these are the
    /// only user-input errors this layer surfaces.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A typed accessor was invoked on data of a different shape.
    #[error("expected a mapping but the document unrolled to a {actual}")]
    TypeMismatch {
        /// The shape actually observed
        actual: &'static str,
    },

    /// The tree held a node shape outside the closed scalar/sequence/mapping
    /// set. Indicates a broken invariant in how the tree was built, not a
    /// problem with the document.
    #[error("malformed tree: {message}")]
    MalformedTree { message: String },

    /// The event stream from the grammar parser violated the builder's
    /// structural expectations.
    ///
    /// Never caused by user input; it signals an incompatibility between
    /// this layer and the grammar parser.
    #[error("parser contract violation: {message}; this is a bug, please file an issue")]
    ParserContract { message: String },

    /// `key_tree` was asked for a key the mapping does not contain.
    #[error("key {key:?} is not present in this mapping")]
    MissingKey { key: String },

    /// A span referenced a source hash absent from the registry.
    #[error(transparent)]
    Source(#[from] rulemark_source_map::Error),
}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        Error::Parse {
            message: err.to_string(),
        }
    }
}
