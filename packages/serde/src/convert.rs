//! Conversions between tree values and serde types.

use serde::de::DeserializeOwned;
use serde::Serialize;

use pathtree_core::{Error, NodeRef, Scalar, Value};

/// Convert a Rust type to a Value via serde.
///
/// Types serde_json cannot represent (maps with composite keys, for
/// example) are reported as `UnsupportedType`.
pub fn to_value<T: Serialize + ?Sized>(data: &T) -> Result<Value, Error> {
    // Serialize to serde_json::Value first, then convert to Value
    let json = serde_json::to_value(data).map_err(|_| Error::UnsupportedType {
        type_name: std::any::type_name::<T>().to_string(),
    })?;
    Ok(from_json(json))
}

/// Deserialize the subtree under `node` into a Rust type.
pub fn from_node<T: DeserializeOwned>(node: NodeRef<'_>) -> Result<T, Error> {
    let json = node_to_json(node)?;
    serde_json::from_value(json).map_err(|e| Error::decode(e.to_string()))
}

/// The subtree under `node` as a serde_json::Value.
pub fn node_to_json(node: NodeRef<'_>) -> Result<serde_json::Value, Error> {
    serde_json::to_value(node).map_err(|e| Error::decode(e.to_string()))
}

/// Convert serde_json::Value to our Value.
///
/// Objects become mappings in the object's iteration order. Integers
/// outside the `i64` range become floats.
pub fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::null(),
        serde_json::Value::Bool(b) => Value::from(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::from(i),
            // every number has an f64 form without arbitrary_precision
            None => Value::from(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::from(s),
        serde_json::Value::Array(arr) => Value::Sequence(arr.into_iter().map(from_json).collect()),
        serde_json::Value::Object(map) => {
            Value::Mapping(map.into_iter().map(|(k, v)| (k, from_json(v))).collect())
        }
    }
}

/// Convert our Value to serde_json::Value.
///
/// Fails on `Value::Unsupported`; bytes become base64 strings.
pub fn value_to_json(value: Value) -> Result<serde_json::Value, Error> {
    match value {
        Value::Scalar(scalar) => scalar_to_json(&scalar),
        Value::Sequence(items) => items
            .into_iter()
            .map(value_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(serde_json::Value::Array),
        Value::Mapping(entries) => entries
            .into_iter()
            .map(|(k, v)| Ok((k, value_to_json(v)?)))
            .collect::<Result<serde_json::Map<_, _>, Error>>()
            .map(serde_json::Value::Object),
        Value::Unsupported(type_name) => Err(Error::UnsupportedType { type_name }),
    }
}

fn scalar_to_json(scalar: &Scalar) -> Result<serde_json::Value, Error> {
    serde_json::to_value(scalar).map_err(|e| Error::decode(e.to_string()))
}
