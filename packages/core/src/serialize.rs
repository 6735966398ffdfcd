//! JSON rendering of nodes.
//!
//! A node serializes as a structural mirror of how it was inserted: leaves as
//! scalar literals, sequence branches as arrays, mapping branches as objects
//! keyed by child segment. JSON has no bytes type, so `Scalar::Bytes` renders
//! as a standard base64 string.

use std::fmt;

use base64::Engine;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::node::NodeRef;
use crate::value::Scalar;

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Integer(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Scalar::Float(_) => serializer.serialize_unit(),
            Scalar::Text(s) => serializer.serialize_str(s),
            Scalar::Bytes(b) => {
                let encoded = base64::engine::general_purpose::STANDARD.encode(b);
                serializer.serialize_str(&encoded)
            }
        }
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(value) = self.value() {
            return value.serialize(serializer);
        }

        if self.is_sequence() && !self.is_empty() {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for child in self.children() {
                seq.serialize_element(&child)?;
            }
            seq.end()
        } else {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for child in self.children() {
                map.serialize_entry(child.segment().unwrap_or_default(), &child)?;
            }
            map.end()
        }
    }
}

/// Compact JSON; the alternate flag (`{:#}`) pretty-prints.
impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if f.alternate() {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
        .map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl NodeRef<'_> {
    /// Compact JSON text of this subtree.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Indented JSON text of this subtree.
    pub fn to_text_pretty(&self) -> String {
        format!("{:#}", self)
    }

    /// Outline of the subtree, one node per line, leaves with their literal.
    ///
    /// ```text
    /// "/"
    ///   "a"
    ///     "b": 42
    /// ```
    pub fn dump(&self) -> String {
        let mut out = String::new();
        dump_node(self, 0, &mut out);
        out
    }
}

fn dump_node(node: &NodeRef<'_>, depth: usize, out: &mut String) {
    use std::fmt::Write;

    let name = match node.segment() {
        Some(segment) => segment.to_string(),
        None => node.path().to_string(),
    };
    let indent = "  ".repeat(depth);
    // Writing into a String cannot fail.
    let _ = match node.value() {
        Some(value) => writeln!(
            out,
            "{}{:?}: {}",
            indent,
            name,
            serde_json::to_string(value).unwrap_or_default()
        ),
        None => writeln!(out, "{}{:?}", indent, name),
    };
    for child in node.children() {
        dump_node(&child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use crate::{PathTree, Value};
    use bytes::Bytes;

    #[test]
    fn sequence_renders_as_array() {
        let mut tree = PathTree::new();
        tree.create("/s", vec!["a", "b"]).unwrap();
        assert_eq!(tree.get("/s").unwrap().to_text(), r#"["a","b"]"#);
    }

    #[test]
    fn mapping_renders_as_object() {
        let mut tree = PathTree::new();
        tree.create("/m", Value::mapping([("foo", "bar")])).unwrap();
        assert_eq!(tree.get("/m").unwrap().to_text(), r#"{"foo":"bar"}"#);
        assert_eq!(tree.get("/m/foo").unwrap().to_text(), r#""bar""#);
    }

    #[test]
    fn empty_branches() {
        let mut tree = PathTree::new();
        assert_eq!(tree.to_text(), "{}");

        tree.create("/m", Value::Mapping(Vec::new())).unwrap();
        tree.create("/s", Value::Sequence(Vec::new())).unwrap();
        assert_eq!(tree.to_text(), r#"{"m":{},"s":{}}"#);
        assert!(tree.get("/s").unwrap().is_sequence());
    }

    #[test]
    fn scalar_literals() {
        let mut tree = PathTree::new();
        tree.create("/null", Value::null()).unwrap();
        tree.create("/bool", false).unwrap();
        tree.create("/float", 1.5).unwrap();
        tree.create("/nan", f64::NAN).unwrap();
        tree.create("/text", "quote \" here").unwrap();
        tree.create("/bytes", Bytes::from_static(b"hello")).unwrap();
        assert_eq!(
            tree.to_text(),
            r#"{"null":null,"bool":false,"float":1.5,"nan":null,"text":"quote \" here","bytes":"aGVsbG8="}"#
        );
    }

    #[test]
    fn nested_mixture() {
        let mut tree = PathTree::new();
        tree.create(
            "/doc",
            Value::Mapping(vec![
                ("list".to_string(), Value::from(vec![1, 2])),
                (
                    "inner".to_string(),
                    Value::mapping([("x", Value::from(vec![Value::mapping([("y", 1)])]))]),
                ),
            ]),
        )
        .unwrap();
        assert_eq!(
            tree.get("/doc").unwrap().to_text(),
            r#"{"list":[1,2],"inner":{"x":[{"y":1}]}}"#
        );
    }

    #[test]
    fn pretty_and_display() {
        let mut tree = PathTree::new();
        tree.create("/a", 1).unwrap();
        assert_eq!(format!("{}", tree.root()), r#"{"a":1}"#);
        assert_eq!(tree.root().to_text_pretty(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn dump_outline() {
        let mut tree = PathTree::new();
        tree.create("/a/b", 42).unwrap();
        tree.create("/a/c", "x").unwrap();
        assert_eq!(
            tree.root().dump(),
            "\"/\"\n  \"a\"\n    \"b\": 42\n    \"c\": \"x\"\n"
        );
    }
}
