//! Content-addressed registry of parsed source text.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

/// Content address of a registered source text.
///
/// The SHA-256 hex digest of the UTF-8 bytes of the text. Two texts with
/// identical bytes yield the same hash and share one registry entry, which
/// is what lets spans stay valid across repeated parses of the same input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceHash(String);

impl SourceHash {
    /// Compute the hash of a source text.
    pub fn of(text: &str) -> Self {
        let digest = Sha256::digest(text.as_bytes());
        Self(format!("{digest:x}"))
    }

    /// The hex digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store mapping source hashes to the lines of text they contain.
///
/// Supports building error excerpts from spans long after the original
/// text buffer is gone. The registry is an explicit value with no global
/// instance: create one per parse session (or one per process, as suits the
/// caller) and pass it by reference into the operations that need it.
///
/// Re-registering identical content overwrites an entry with an equal
/// value, so the observable result is idempotent. Callers that share a
/// registry across threads can wrap it in a `Mutex`; a race between equal
/// writes is benign.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceRegistry {
    sources: HashMap<SourceHash, Vec<String>>,
}

impl SourceRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source text and return its content hash.
    ///
    /// The text is stored split into lines with terminators stripped.
    pub fn add_source(&mut self, text: &str) -> SourceHash {
        let hash = SourceHash::of(text);
        let lines = text.lines().map(str::to_string).collect();
        self.sources.insert(hash.clone(), lines);
        hash
    }

    /// The stored lines for a registered source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSource`] when the hash was never registered.
    pub fn source(&self, hash: &SourceHash) -> Result<&[String]> {
        self.sources
            .get(hash)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::UnknownSource { hash: hash.clone() })
    }

    /// Number of lines in a registered source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSource`] when the hash was never registered.
    pub fn line_count(&self, hash: &SourceHash) -> Result<usize> {
        self.source(hash).map(<[String]>::len)
    }

    /// Drop every registered source. Intended for test isolation.
    pub fn clear(&mut self) {
        self.sources.clear();
    }
}
