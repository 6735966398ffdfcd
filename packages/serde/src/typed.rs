//! Typed extension trait for providers.

use serde::de::DeserializeOwned;
use serde::Serialize;

use pathtree_core::{Error, Provider};

use crate::convert::{from_node, node_to_json, to_value};

/// Extension trait for typed inserts and reads.
///
/// This trait is automatically implemented for all `Provider`
/// implementations, in-memory or store-backed.
pub trait TypedProvider: Provider {
    /// Serialize `data` and insert it at `path`.
    ///
    /// Structs and maps decompose into mapping branches, vectors into
    /// sequence branches, everything else lands on a single leaf.
    fn create_from<T: Serialize + ?Sized>(&mut self, path: &str, data: &T) -> Result<(), Error> {
        let value = to_value(data)?;
        self.create(path, value)
    }

    /// Read the subtree at `path` into a Rust type.
    fn get_as<T: DeserializeOwned>(&mut self, path: &str) -> Result<T, Error> {
        let node = self.get(path)?;
        from_node(node)
    }

    /// Read the subtree at `path` as a serde_json::Value.
    ///
    /// Convenience method when you don't know the exact type.
    fn get_json(&mut self, path: &str) -> Result<serde_json::Value, Error> {
        let node = self.get(path)?;
        node_to_json(node)
    }
}

// Blanket implementation for all Providers
impl<P: Provider + ?Sized> TypedProvider for P {}
