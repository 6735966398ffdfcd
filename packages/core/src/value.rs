//! Insertable values.
//!
//! A [`Value`] is decided once at the API boundary: scalars land on a single
//! leaf, sequences and mappings decompose into subtrees, and anything a
//! conversion layer could not represent is carried as [`Value::Unsupported`]
//! so insertion can reject it.

use bytes::Bytes;

/// A single leaf payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Scalar {
    /// Explicit null. Still a leaf.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Integer(i64),
    /// 64-bit floating point.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Opaque bytes. Never decomposed into a sequence.
    Bytes(Bytes),
}

impl Scalar {
    /// Short name of the scalar kind, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Text(_) => "text",
            Scalar::Bytes(_) => "bytes",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A structured value that can be inserted into a tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A leaf payload.
    Scalar(Scalar),
    /// Ordered sequence; element `i` lands at `<path>/i`.
    Sequence(Vec<Value>),
    /// Keyed mapping; each entry lands at `<path>/<key>`, in entry order.
    Mapping(Vec<(String, Value)>),
    /// A live handle (channel, socket, ...) with no data representation.
    /// Inserting it fails with `UnsupportedType`.
    Unsupported(String),
}

impl Value {
    /// Null scalar.
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    /// Build a mapping, converting each key to its canonical textual form
    /// (its `Display` rendering).
    ///
    /// ```rust
    /// use pathtree_core::Value;
    ///
    /// let v = Value::mapping([(42, "answer"), (7, "lucky")]);
    /// assert_eq!(
    ///     v,
    ///     Value::Mapping(vec![
    ///         ("42".to_string(), Value::from("answer")),
    ///         ("7".to_string(), Value::from("lucky")),
    ///     ])
    /// );
    /// ```
    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        K: ToString,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.into()))
                .collect(),
        )
    }

    /// Name of an unrepresentable handle type.
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Value::Unsupported(type_name.into())
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }
}

impl From<Scalar> for Value {
    fn from(v: Scalar) -> Self {
        Value::Scalar(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Scalar(Scalar::Bool(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Scalar(Scalar::Integer(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Scalar(Scalar::Integer(v as i64))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Scalar(Scalar::Integer(v as i64))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(Scalar::Float(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Scalar(Scalar::Text(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Scalar(Scalar::Text(v.to_string()))
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Value::Scalar(Scalar::Bytes(v))
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Scalar(Scalar::Bytes(Bytes::copy_from_slice(v)))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or_else(Value::null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_becomes_sequence() {
        let v = Value::from(vec![1, 2]);
        assert_eq!(
            v,
            Value::Sequence(vec![Value::from(1), Value::from(2)])
        );
    }

    #[test]
    fn bytes_stay_scalar() {
        let v = Value::from(&b"hello"[..]);
        assert!(v.is_scalar());
        assert_eq!(
            v,
            Value::Scalar(Scalar::Bytes(Bytes::from_static(b"hello")))
        );
    }

    #[test]
    fn option_none_is_null() {
        let v: Value = Option::<i64>::None.into();
        assert_eq!(v, Value::null());
    }

    #[test]
    fn mapping_stringifies_keys_in_order() {
        let v = Value::mapping([(true, 1), (false, 2)]);
        let Value::Mapping(entries) = v else {
            panic!("expected mapping");
        };
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["true", "false"]);
    }

    #[test]
    fn scalar_accessors() {
        assert_eq!(Scalar::Integer(42).as_i64(), Some(42));
        assert_eq!(Scalar::Text("x".into()).as_str(), Some("x"));
        assert_eq!(Scalar::Null.as_i64(), None);
        assert_eq!(Scalar::Float(1.5).kind(), "float");
    }
}
