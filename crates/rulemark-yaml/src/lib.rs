//! # rulemark-yaml
//!
//! YAML parsing with span tracking for every node.
//!
//! This crate builds [`YamlTree`] values: an immutable tree of scalars,
//! sequences, and mappings where every node, including each mapping key,
//! carries a [`Span`] pointing back into the parsed source. Downstream
//! stages (schema checks, rule evaluation, error reporting) use those spans
//! to point a user at the exact line and column that produced a value.
//!
//! Parsing is driven through `yaml-rust2`'s event parser; the grammar
//! itself lives there, this layer only annotates. Parsed source text is
//! recorded in a caller-supplied [`SourceRegistry`] so spans stay
//! resolvable to their original lines.
//!
//! # Example
//!
//! ```rust
//! use rulemark_yaml::{parse_tracked, SourceRegistry};
//!
//! let mut registry = SourceRegistry::new();
//! let tree = parse_tracked(&mut registry, "title: My Rules").unwrap();
//!
//! let map = tree.as_mapping().unwrap();
//! let title = map.get("title").unwrap();
//! assert_eq!(title.span.start.line, 1);
//! ```

mod error;
mod map;
mod parser;
mod tree;

pub use error::{Error, Result};
pub use map::{YamlMap, YamlMapEntry};
pub use parser::{empty_span, parse_plain, parse_tracked, parse_tracked_file};
pub use tree::{Wrappable, YamlTree, YamlValue};

// Re-export the span types so consumers don't need a direct
// rulemark-source-map dependency for the common case.
pub use rulemark_source_map::{Position, SourceHash, SourceRegistry, Span};
