//! The span-annotated value tree.

use crate::{Error, Result, YamlMap};
use rulemark_source_map::Span;
use yaml_rust2::Yaml;
use yaml_rust2::yaml::Hash;

/// A parsed YAML value annotated with its source span.
///
/// Every node owns its children exclusively; there is no sharing between
/// nodes and no cycles (aliases are never materialized into back-edges).
/// Trees are immutable once built; transformations produce new values.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlTree {
    /// The node's value
    pub value: YamlValue,
    /// Where in the source this value came from
    pub span: Span,
}

/// The closed set of shapes a tree node can take.
#[derive(Debug, Clone, PartialEq)]
pub enum YamlValue {
    /// A leaf value. The payload is restricted to the scalar `Yaml`
    /// variants (string, integer, real, boolean, null); anything else in
    /// here is a broken invariant and surfaces as
    /// [`Error::MalformedTree`] when unrolled.
    Scalar(Yaml),
    /// An ordered sequence of child trees.
    Sequence(Vec<YamlTree>),
    /// An insertion-ordered mapping with span-carrying keys.
    Mapping(YamlMap),
}

/// Input to [`YamlTree::wrap`]: either a plain value to annotate or a tree
/// that already carries spans.
#[derive(Debug, Clone)]
pub enum Wrappable {
    /// A plain value without spans
    Plain(Yaml),
    /// An already-annotated tree, passed through unchanged
    Tree(YamlTree),
}

impl From<Yaml> for Wrappable {
    fn from(value: Yaml) -> Self {
        Wrappable::Plain(value)
    }
}

impl From<YamlTree> for Wrappable {
    fn from(tree: YamlTree) -> Self {
        Wrappable::Tree(tree)
    }
}

impl YamlTree {
    /// Create a scalar node.
    pub fn new_scalar(value: Yaml, span: Span) -> Self {
        Self {
            value: YamlValue::Scalar(value),
            span,
        }
    }

    /// Create a sequence node.
    pub fn new_sequence(items: Vec<YamlTree>, span: Span) -> Self {
        Self {
            value: YamlValue::Sequence(items),
            span,
        }
    }

    /// Create a mapping node.
    pub fn new_mapping(map: YamlMap, span: Span) -> Self {
        Self {
            value: YamlValue::Mapping(map),
            span,
        }
    }

    /// Check if this is a scalar node.
    pub fn is_scalar(&self) -> bool {
        matches!(self.value, YamlValue::Scalar(_))
    }

    /// Check if this is a sequence node.
    pub fn is_sequence(&self) -> bool {
        matches!(self.value, YamlValue::Sequence(_))
    }

    /// Check if this is a mapping node.
    pub fn is_mapping(&self) -> bool {
        matches!(self.value, YamlValue::Mapping(_))
    }

    /// The scalar payload, if this is a scalar node.
    pub fn as_scalar(&self) -> Option<&Yaml> {
        match &self.value {
            YamlValue::Scalar(yaml) => Some(yaml),
            _ => None,
        }
    }

    /// The child nodes, if this is a sequence.
    pub fn as_sequence(&self) -> Option<&[YamlTree]> {
        match &self.value {
            YamlValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The ordered map, if this is a mapping.
    pub fn as_mapping(&self) -> Option<&YamlMap> {
        match &self.value {
            YamlValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Recursively strip spans, recovering a plain nested value.
    ///
    /// Mappings come back keyed by each key's string form, in insertion
    /// order; a duplicated key string collapses last-wins in the plain
    /// hash even though the tree retains both entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedTree`] if a scalar node holds a
    /// non-scalar payload or a mapping key is not a scalar.
    pub fn unroll(&self) -> Result<Yaml> {
        match &self.value {
            YamlValue::Scalar(yaml) => match yaml {
                Yaml::Array(_) | Yaml::Hash(_) | Yaml::Alias(_) | Yaml::BadValue => {
                    Err(Error::MalformedTree {
                        message: format!("scalar node holds a {}", shape_of(yaml)),
                    })
                }
                scalar => Ok(scalar.clone()),
            },
            YamlValue::Sequence(items) => items
                .iter()
                .map(YamlTree::unroll)
                .collect::<Result<Vec<_>>>()
                .map(Yaml::Array),
            YamlValue::Mapping(map) => {
                let mut hash = Hash::new();
                for entry in map.items() {
                    let key = Yaml::String(entry.key.key_string()?);
                    hash.insert(key, entry.value.unroll()?);
                }
                Ok(Yaml::Hash(hash))
            }
        }
    }

    /// Unroll, insisting on a mapping at the root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] naming the shape actually observed
    /// when the document did not unroll to a mapping.
    pub fn unroll_hash(&self) -> Result<Hash> {
        match self.unroll()? {
            Yaml::Hash(hash) => Ok(hash),
            other => Err(Error::TypeMismatch {
                actual: shape_of(&other),
            }),
        }
    }

    /// Annotate a plain nested value, stamping `span` on every node
    /// produced, mapping keys included.
    ///
    /// Exists so a datastructure synthesized from user input can still be
    /// traced back to the input that produced it. Accepts either a plain
    /// [`Yaml`] or an existing [`YamlTree`]; an existing tree is returned
    /// unchanged, so raw and already-annotated data flow through the same
    /// constructor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedTree`] when the plain value contains an
    /// alias or bad-value marker, which have no tree representation.
    pub fn wrap(value: impl Into<Wrappable>, span: &Span) -> Result<YamlTree> {
        match value.into() {
            Wrappable::Tree(tree) => Ok(tree),
            Wrappable::Plain(yaml) => wrap_plain(yaml, span),
        }
    }

    /// The key's string form, for mappings keyed by this node.
    pub(crate) fn key_string(&self) -> Result<String> {
        match &self.value {
            YamlValue::Scalar(yaml) => scalar_to_string(yaml).ok_or_else(|| Error::MalformedTree {
                message: format!("mapping key is a {}", shape_of(yaml)),
            }),
            YamlValue::Sequence(_) => Err(Error::MalformedTree {
                message: "mapping key is a sequence".into(),
            }),
            YamlValue::Mapping(_) => Err(Error::MalformedTree {
                message: "mapping key is a mapping".into(),
            }),
        }
    }
}

fn wrap_plain(yaml: Yaml, span: &Span) -> Result<YamlTree> {
    match yaml {
        Yaml::Array(items) => {
            let children = items
                .into_iter()
                .map(|item| wrap_plain(item, span))
                .collect::<Result<Vec<_>>>()?;
            Ok(YamlTree::new_sequence(children, span.clone()))
        }
        Yaml::Hash(hash) => {
            let mut map = YamlMap::new();
            for (key, value) in hash {
                map.insert(wrap_plain(key, span)?, wrap_plain(value, span)?);
            }
            Ok(YamlTree::new_mapping(map, span.clone()))
        }
        Yaml::Alias(_) | Yaml::BadValue => Err(Error::MalformedTree {
            message: format!("cannot wrap a {}", shape_of(&yaml)),
        }),
        scalar => Ok(YamlTree::new_scalar(scalar, span.clone())),
    }
}

/// The string form of a scalar, as used for mapping keys.
pub(crate) fn scalar_to_string(yaml: &Yaml) -> Option<String> {
    match yaml {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Integer(i) => Some(i.to_string()),
        Yaml::Real(r) => Some(r.clone()),
        Yaml::Boolean(b) => Some(b.to_string()),
        Yaml::Null => Some("null".to_string()),
        _ => None,
    }
}

/// Human-readable shape name for error messages.
pub(crate) fn shape_of(yaml: &Yaml) -> &'static str {
    match yaml {
        Yaml::String(_) => "string",
        Yaml::Integer(_) => "integer",
        Yaml::Real(_) => "real",
        Yaml::Boolean(_) => "boolean",
        Yaml::Null => "null",
        Yaml::Array(_) => "sequence",
        Yaml::Hash(_) => "mapping",
        Yaml::Alias(_) => "alias",
        Yaml::BadValue => "bad value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::empty_span;

    fn wrap(value: Yaml) -> YamlTree {
        YamlTree::wrap(value, empty_span()).unwrap()
    }

    #[test]
    fn test_wrap_scalar() {
        let tree = wrap(Yaml::String("hello".into()));
        assert!(tree.is_scalar());
        assert_eq!(tree.span, *empty_span());
        assert_eq!(tree.unroll().unwrap(), Yaml::String("hello".into()));
    }

    #[test]
    fn test_wrap_stamps_every_node() {
        let mut hash = Hash::new();
        hash.insert(
            Yaml::String("key".into()),
            Yaml::Array(vec![Yaml::Integer(1), Yaml::Integer(2)]),
        );
        let tree = wrap(Yaml::Hash(hash));

        let map = tree.as_mapping().unwrap();
        let entry = &map.items()[0];
        assert_eq!(entry.key.span, *empty_span());
        assert_eq!(entry.value.span, *empty_span());
        for item in entry.value.as_sequence().unwrap() {
            assert_eq!(item.span, *empty_span());
        }
    }

    #[test]
    fn test_round_trip() {
        let mut hash = Hash::new();
        hash.insert(Yaml::String("a".into()), Yaml::Integer(1));
        hash.insert(
            Yaml::String("b".into()),
            Yaml::Array(vec![Yaml::String("x".into()), Yaml::Boolean(true)]),
        );
        let plain = Yaml::Hash(hash);

        let tree = wrap(plain.clone());
        assert_eq!(tree.unroll().unwrap(), plain);
    }

    #[test]
    fn test_wrap_is_idempotent() {
        let tree = wrap(Yaml::Array(vec![Yaml::Integer(1), Yaml::Integer(2)]));
        let rewrapped = YamlTree::wrap(tree.clone(), empty_span()).unwrap();
        assert_eq!(rewrapped, tree);
    }

    #[test]
    fn test_wrap_rejects_aliases() {
        assert!(matches!(
            YamlTree::wrap(Yaml::Alias(0), empty_span()),
            Err(Error::MalformedTree { .. })
        ));
    }

    #[test]
    fn test_unroll_hash_type_mismatch() {
        let tree = wrap(Yaml::Array(vec![Yaml::Integer(1)]));
        assert_eq!(
            tree.unroll_hash(),
            Err(Error::TypeMismatch { actual: "sequence" })
        );
    }

    #[test]
    fn test_unroll_rejects_non_scalar_payload() {
        // constructed by hand; the parser never builds this shape
        let tree = YamlTree::new_scalar(Yaml::Array(vec![]), empty_span().clone());
        assert!(matches!(
            tree.unroll(),
            Err(Error::MalformedTree { .. })
        ));
    }

    #[test]
    fn test_unroll_stringifies_keys() {
        let mut hash = Hash::new();
        hash.insert(Yaml::Integer(42), Yaml::String("answer".into()));
        let tree = wrap(Yaml::Hash(hash));

        let unrolled = tree.unroll_hash().unwrap();
        assert!(unrolled.contains_key(&Yaml::String("42".into())));
    }
}
