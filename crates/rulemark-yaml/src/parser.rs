//! Drives the external grammar parser and annotates every node it builds.

use crate::{Error, Result, YamlMap, YamlTree};
use once_cell::sync::Lazy;
use rulemark_source_map::{Position, SourceHash, SourceRegistry, Span};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};
use yaml_rust2::{Yaml, YamlLoader};

/// Parse a document into a span-annotated tree.
///
/// The source text is recorded in `registry` first, so the resulting spans
/// stay resolvable to their original lines for as long as the registry
/// lives. Only the first document of a multi-document stream is built.
///
/// # Example
///
/// ```rust
/// use rulemark_yaml::{parse_tracked, SourceRegistry};
///
/// let mut registry = SourceRegistry::new();
/// let tree = parse_tracked(&mut registry, "severity: high").unwrap();
/// assert!(tree.is_mapping());
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] for invalid YAML or an empty stream, and
/// [`Error::ParserContract`] if the grammar parser's event sequence
/// violates the builder's structural expectations (a bug, not bad input).
pub fn parse_tracked(registry: &mut SourceRegistry, content: &str) -> Result<YamlTree> {
    parse_impl(registry, content, None)
}

/// Parse a document with an associated filename.
///
/// The filename lands in every node's span, so diagnostics can render
/// `file:line:col` without extra bookkeeping.
///
/// # Errors
///
/// Same failure classes as [`parse_tracked`].
pub fn parse_tracked_file(
    registry: &mut SourceRegistry,
    content: &str,
    filename: &str,
) -> Result<YamlTree> {
    parse_impl(registry, content, Some(filename))
}

fn parse_impl(
    registry: &mut SourceRegistry,
    content: &str,
    filename: Option<&str>,
) -> Result<YamlTree> {
    let source = registry.add_source(content);
    tracing::debug!(source = %source, bytes = content.len(), "parsing with span tracking");

    let mut parser = Parser::new_from_str(content);
    let mut builder = TreeBuilder::new(source, filename);

    parser.load(&mut builder, false)?; // false = single document only

    builder.finish()
}

/// Parse without annotation, for callers uninterested in provenance.
///
/// Returns the first document of the stream, or `Yaml::Null` when the
/// stream holds none.
///
/// # Errors
///
/// Returns [`Error::Parse`] for invalid YAML.
pub fn parse_plain(content: &str) -> Result<Yaml> {
    let mut docs = YamlLoader::load_from_str(content)?;
    if docs.is_empty() {
        return Ok(Yaml::Null);
    }
    Ok(docs.remove(0))
}

/// Placeholder span for synthetically constructed values that have no real
/// source location.
///
/// Computed once per process by parsing a trivial one-line document into a
/// throwaway registry and taking its root span. Its source hash only
/// resolves in a registry that has itself registered that document, so
/// line-count-bounded operations on it will ordinarily fail. It is a
/// placeholder, not a real location.
pub fn empty_span() -> &'static Span {
    static EMPTY_SPAN: Lazy<Span> = Lazy::new(|| {
        let mut registry = SourceRegistry::new();
        let tree = parse_tracked(&mut registry, "a: b")
            .expect("a one-line mapping always parses");
        tree.span
    });
    &EMPTY_SPAN
}

/// Event receiver that assembles annotated trees bottom-up.
///
/// This is the explicit hook into the grammar parser's extension seam:
/// the parser calls [`on_event`](MarkedEventReceiver::on_event) for every
/// raw node it constructs, children before parents, and the builder stamps
/// a span on each one as it lands.
struct TreeBuilder {
    /// Content hash of the text being parsed
    source: SourceHash,
    /// Optional filename copied into every span
    filename: Option<String>,
    /// Open sequence/mapping frames, innermost last
    stack: Vec<Frame>,
    /// The completed root node
    root: Option<YamlTree>,
    /// First structural violation observed, if any
    contract_error: Option<String>,
}

/// A collection being assembled.
enum Frame {
    Sequence {
        start: Marker,
        items: Vec<YamlTree>,
    },
    Mapping {
        start: Marker,
        entries: Vec<(YamlTree, Option<YamlTree>)>,
    },
}

impl TreeBuilder {
    fn new(source: SourceHash, filename: Option<&str>) -> Self {
        Self {
            source,
            filename: filename.map(|s| s.to_string()),
            stack: Vec::new(),
            root: None,
            contract_error: None,
        }
    }

    fn finish(self) -> Result<YamlTree> {
        if let Some(message) = self.contract_error {
            return Err(Error::ParserContract { message });
        }
        if !self.stack.is_empty() {
            return Err(Error::ParserContract {
                message: format!(
                    "{} collection frame(s) left open after the document ended",
                    self.stack.len()
                ),
            });
        }
        self.root.ok_or_else(|| Error::Parse {
            message: "no YAML document found".into(),
        })
    }

    fn contract_violation(&mut self, message: &str) {
        if self.contract_error.is_none() {
            self.contract_error = Some(message.to_string());
        }
    }

    /// Attach a finished node to the innermost open frame, or take it as
    /// the root when no frame is open.
    fn push_complete(&mut self, node: YamlTree) {
        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
            Some(Frame::Sequence { items, .. }) => {
                items.push(node);
            }
            Some(Frame::Mapping { entries, .. }) => {
                if let Some((_, value)) = entries.last_mut() {
                    if value.is_none() {
                        *value = Some(node);
                    } else {
                        // previous entry is complete; this starts a new key
                        entries.push((node, None));
                    }
                } else {
                    // first key of the mapping
                    entries.push((node, None));
                }
            }
        }
    }

    fn span_between(&self, start: &Marker, end: &Marker) -> Span {
        self.with_filename(Span::new(
            position_of(start),
            position_of(end),
            self.source.clone(),
        ))
    }

    fn scalar_span(&self, marker: &Marker, value: &str) -> Span {
        let start = position_of(marker);
        let end = scalar_end(start, value);
        self.with_filename(Span::new(start, end, self.source.clone()))
    }

    fn with_filename(&self, span: Span) -> Span {
        match &self.filename {
            Some(filename) => span.with_file(filename.clone()),
            None => span,
        }
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        if self.contract_error.is_some() {
            return;
        }

        match ev {
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}

            Event::Scalar(value, style, _anchor_id, _tag) => {
                let span = self.scalar_span(&marker, &value);
                let yaml = scalar_value(&value, style);
                self.push_complete(YamlTree::new_scalar(yaml, span));
            }

            Event::SequenceStart(_anchor_id, _tag) => {
                self.stack.push(Frame::Sequence {
                    start: marker,
                    items: Vec::new(),
                });
            }

            Event::SequenceEnd => match self.stack.pop() {
                Some(Frame::Sequence { start, items }) => {
                    let span = self.span_between(&start, &marker);
                    self.push_complete(YamlTree::new_sequence(items, span));
                }
                _ => self.contract_violation("sequence end without a matching sequence start"),
            },

            Event::MappingStart(_anchor_id, _tag) => {
                self.stack.push(Frame::Mapping {
                    start: marker,
                    entries: Vec::new(),
                });
            }

            Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Mapping { start, entries }) => {
                    let span = self.span_between(&start, &marker);
                    let mut map = YamlMap::new();
                    for (key, value) in entries {
                        match value {
                            Some(value) => map.insert(key, value),
                            None => {
                                self.contract_violation(
                                    "mapping entry completed without a value",
                                );
                                return;
                            }
                        }
                    }
                    self.push_complete(YamlTree::new_mapping(map, span));
                }
                _ => self.contract_violation("mapping end without a matching mapping start"),
            },

            Event::Alias(_anchor_id) => {
                // aliases are not materialized, keeping the tree acyclic
                let span = self.scalar_span(&marker, "");
                self.push_complete(YamlTree::new_scalar(Yaml::Null, span));
            }
        }
    }
}

/// Normalize a marker to a 1-indexed `Position`.
///
/// yaml-rust2 markers carry 1-based lines and 0-based columns; only the
/// column needs the shift. This is the single place where raw parser
/// coordinates become positions.
fn position_of(marker: &Marker) -> Position {
    Position::new(marker.line(), marker.col() + 1)
}

/// Exclusive end position of a scalar whose text is `value`.
///
/// Derived from the scalar text itself: quoted and escaped scalars can
/// under-report by the syntax characters the scanner consumed, which is
/// accepted since diagnostics anchor on start positions.
fn scalar_end(start: Position, value: &str) -> Position {
    match value.rsplit_once('\n') {
        None => Position::new(start.line, start.col + value.chars().count()),
        Some((head, last)) => Position::new(
            start.line + head.matches('\n').count() + 1,
            last.chars().count() + 1,
        ),
    }
}

/// Infer the value of a scalar from its text, as the grammar's resolution
/// rules would. Quoted and block scalars are always strings.
fn scalar_value(value: &str, style: TScalarStyle) -> Yaml {
    if style != TScalarStyle::Plain {
        return Yaml::String(value.to_string());
    }

    if let Ok(i) = value.parse::<i64>() {
        return Yaml::Integer(i);
    }

    if value.parse::<f64>().is_ok() {
        return Yaml::Real(value.to_string());
    }

    match value {
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" => {
            Yaml::Boolean(true)
        }
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "off" | "Off" | "OFF" => {
            Yaml::Boolean(false)
        }
        "null" | "Null" | "NULL" | "~" | "" => Yaml::Null,
        _ => Yaml::String(value.to_string()),
    }
}
