//! Source location tracking for rulemark.
//!
//! This crate provides the span algebra shared by everything that reports
//! diagnostics against parsed documents:
//!
//! - [`Position`]: an immutable 1-indexed line/column coordinate
//! - [`Span`]: an immutable range between two positions, tied to a registered
//!   source and an optional filename, with an optional wider context range
//! - [`SourceRegistry`]: a content-addressed store mapping a source hash to
//!   the lines of text it contains
//!
//! The registry is an explicit value passed by reference into the operations
//! that need it, so independent parse sessions never share state and tests
//! stay isolated.
//!
//! # Example
//!
//! ```rust
//! use rulemark_source_map::{Position, SourceRegistry, Span};
//!
//! let mut registry = SourceRegistry::new();
//! let hash = registry.add_source("a: 1\nb: 2");
//!
//! let span = Span::new(Position::new(1, 1), Position::new(1, 5), hash);
//! let wide = span.with_context(&registry, Some(1), Some(1)).unwrap();
//! assert_eq!(wide.context_start.unwrap().line, 0);
//! assert_eq!(wide.context_end.unwrap().line, 2);
//! ```

mod error;
mod position;
mod registry;
mod span;

pub use error::{Error, Result};
pub use position::Position;
pub use registry::{SourceHash, SourceRegistry};
pub use span::Span;
