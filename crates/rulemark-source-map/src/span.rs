//! Source spans: a core range plus optional surrounding context.

use crate::{Position, Result, SourceHash, SourceRegistry};
use serde::{Deserialize, Serialize};

/// An immutable segment of a registered source text.
///
/// A span has a central focus area (`start..end`, what an error message
/// highlights) and optionally a wider context area (`context_start` /
/// `context_end`, shown for readability but not highlighted). All
/// operations are functional: they return a new span and never mutate in
/// place.
///
/// Invariants under normal construction: `start <= end`, `context_start <=
/// start` and `context_end >= end` when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start of the focus area (inclusive)
    pub start: Position,
    /// End of the focus area (exclusive)
    pub end: Position,
    /// Content hash of the source this span points into
    pub source: SourceHash,
    /// Optional filename for diagnostics
    pub file: Option<String>,
    /// Start of the surrounding context, when attached
    pub context_start: Option<Position>,
    /// End of the surrounding context, when attached
    pub context_end: Option<Position>,
}

impl Span {
    /// Create a span over `start..end` with no context attached.
    pub fn new(start: Position, end: Position, source: SourceHash) -> Self {
        Self {
            start,
            end,
            source,
            file: None,
            context_start: None,
            context_end: None,
        }
    }

    /// Set the filename for this span.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Bound the focus area to at most `max_lines` lines past the start.
    ///
    /// When the span is longer, the end moves to column 0 of
    /// `start.line + max_lines` and any trailing context is dropped with
    /// it. Leading context is untouched. Shorter spans come back unchanged.
    pub fn truncate(&self, max_lines: usize) -> Self {
        if self.end.line - self.start.line > max_lines {
            Self {
                end: Position::new(self.start.line + max_lines, 0),
                context_end: None,
                ..self.clone()
            }
        } else {
            self.clone()
        }
    }

    /// Extend this span to reach as far as `other`.
    ///
    /// With `context_only`, only the displayed context widens: the new
    /// context end is `other`'s context end when it has one, `other`'s end
    /// otherwise. Without it, the focus area itself absorbs `other`'s end
    /// and inherits its context end.
    pub fn extend_to(&self, other: &Span, context_only: bool) -> Self {
        if context_only {
            Self {
                context_end: other.context_end.or(Some(other.end)),
                ..self.clone()
            }
        } else {
            Self {
                end: other.end,
                context_end: other.context_end,
                ..self.clone()
            }
        }
    }

    /// Attach up to `before` lines of leading and `after` lines of trailing
    /// context.
    ///
    /// The leading bound saturates at line 0; the trailing bound is clamped
    /// to the registered source's line count, which is why the registry is
    /// needed.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::UnknownSource`](crate::Error::UnknownSource)
    /// when `after` is given but this span's source is not in `registry`.
    pub fn with_context(
        &self,
        registry: &SourceRegistry,
        before: Option<usize>,
        after: Option<usize>,
    ) -> Result<Self> {
        let mut new = self.clone();
        if let Some(before) = before {
            new.context_start = Some(Position::new(self.start.line.saturating_sub(before), 0));
        }
        if let Some(after) = after {
            let total_lines = registry.line_count(&self.source)?;
            new.context_end = Some(Position::new(
                (self.end.line + after).min(total_lines),
                0,
            ));
        }
        Ok(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: (usize, usize), end: (usize, usize)) -> Span {
        Span::new(
            Position::new(start.0, start.1),
            Position::new(end.0, end.1),
            SourceHash::of("x: 1\ny: 2\nz: 3\nw: 4\nv: 5"),
        )
    }

    fn registry() -> SourceRegistry {
        let mut registry = SourceRegistry::new();
        registry.add_source("x: 1\ny: 2\nz: 3\nw: 4\nv: 5");
        registry
    }

    #[test]
    fn test_truncate_noop_when_short_enough() {
        let s = span((1, 1), (3, 1));
        assert_eq!(s.truncate(2), s);
        assert_eq!(s.truncate(10), s);
    }

    #[test]
    fn test_truncate_bounds_long_spans() {
        let s = span((1, 1), (5, 1));
        let truncated = s.truncate(2);
        assert_eq!(truncated.end, Position::new(3, 0));
        assert_eq!(truncated.context_end, None);
        assert_eq!(truncated.start, s.start);
    }

    #[test]
    fn test_truncate_drops_trailing_context_only_when_truncating() {
        let registry = registry();
        let s = span((1, 1), (4, 1))
            .with_context(&registry, None, Some(1))
            .unwrap();
        assert!(s.truncate(2).context_end.is_none());
        // no-op path keeps the attached context
        assert!(s.truncate(4).context_end.is_some());
    }

    #[test]
    fn test_extend_to_context_only() {
        let a = span((1, 1), (2, 1));
        let b = span((4, 1), (5, 1));

        let extended = a.extend_to(&b, true);
        assert_eq!(extended.end, a.end);
        assert_eq!(extended.context_end, Some(b.end));
    }

    #[test]
    fn test_extend_to_prefers_other_context_end() {
        let registry = registry();
        let a = span((1, 1), (2, 1));
        let b = span((3, 1), (4, 1))
            .with_context(&registry, None, Some(1))
            .unwrap();

        let extended = a.extend_to(&b, true);
        assert_eq!(extended.context_end, b.context_end);
    }

    #[test]
    fn test_extend_to_core() {
        let a = span((1, 1), (2, 1));
        let b = span((4, 1), (5, 1));

        let extended = a.extend_to(&b, false);
        assert_eq!(extended.start, a.start);
        assert_eq!(extended.end, b.end);
        assert_eq!(extended.context_end, None);
    }

    #[test]
    fn test_with_context_bounds() {
        let registry = registry();
        let s = span((2, 1), (4, 1));

        let wide = s.with_context(&registry, Some(1), Some(1)).unwrap();
        assert_eq!(wide.context_start, Some(Position::new(1, 0)));
        assert_eq!(wide.context_end, Some(Position::new(5, 0)));
    }

    #[test]
    fn test_with_context_saturates_at_file_bounds() {
        let registry = registry();
        let s = span((2, 1), (4, 1));

        let wide = s.with_context(&registry, Some(10), Some(10)).unwrap();
        assert_eq!(wide.context_start, Some(Position::new(0, 0)));
        // the source has 5 lines
        assert_eq!(wide.context_end, Some(Position::new(5, 0)));
    }

    #[test]
    fn test_with_context_unregistered_source_fails() {
        let registry = SourceRegistry::new();
        let s = span((1, 1), (2, 1));

        assert!(s.with_context(&registry, None, Some(1)).is_err());
        // the before bound alone never consults the registry
        assert!(s.with_context(&registry, Some(1), None).is_ok());
    }

    #[test]
    fn test_with_file() {
        let s = span((1, 1), (1, 5)).with_file("rules.yaml");
        assert_eq!(s.file.as_deref(), Some("rules.yaml"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let registry = registry();
        let s = span((2, 1), (4, 1))
            .with_file("rules.yaml")
            .with_context(&registry, Some(1), Some(1))
            .unwrap();

        let json = serde_json::to_string(&s).unwrap();
        let deserialized: Span = serde_json::from_str(&json).unwrap();
        assert_eq!(s, deserialized);
    }
}
