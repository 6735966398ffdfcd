//! A path tree mirrored into an external [`Store`].

use bytes::Bytes;
use log::debug;

use crate::node::{NodeId, NodeRef};
use crate::path::Path;
use crate::provider::Provider;
use crate::store::Store;
use crate::tree::{Change, PathTree};
use crate::value::{Scalar, Value};
use crate::Error;

/// A [`PathTree`] whose writes are forwarded to a [`Store`].
///
/// Every node the tree creates is first created remotely (after an
/// existence check), and every leaf value is written remotely as its JSON
/// literal before it is stored locally. The in-memory tree is a cache of
/// what this handle wrote; reads refresh leaf values from the store.
///
/// No retries, versioning or watch handling happen here; store failures are
/// returned as [`Error::Store`] and abort the insert like any other error.
///
/// # Example
///
/// ```rust
/// use pathtree_core::{MemoryStore, Store, StoreBackedTree};
///
/// let mut tree = StoreBackedTree::new(MemoryStore::new());
/// tree.create("/svc/ports", vec![80, 443]).unwrap();
///
/// let store = tree.store_mut();
/// assert_eq!(store.list("/svc/ports").unwrap(), vec!["0", "1"]);
/// assert_eq!(&store.get("/svc/ports/1").unwrap()[..], b"443");
/// ```
pub struct StoreBackedTree<S> {
    tree: PathTree,
    store: S,
}

impl<S: Store> StoreBackedTree<S> {
    /// Wrap a store handle with an empty local tree.
    pub fn new(store: S) -> Self {
        Self {
            tree: PathTree::new(),
            store,
        }
    }

    /// The local mirror.
    pub fn tree(&self) -> &PathTree {
        &self.tree
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Insert `value` at `path` locally and in the store.
    pub fn create(&mut self, path: &str, value: impl Into<Value>) -> Result<(), Error> {
        let path = Path::parse(path)?;
        let store = &mut self.store;
        self.tree
            .insert_observed(&path, value.into(), &mut |change| mirror(store, change))
    }

    /// Look up the node at `path`, refreshing its value from the store.
    ///
    /// Resolution is local: paths this handle never wrote are `NotFound`
    /// even when they exist remotely.
    pub fn get(&mut self, path: &str) -> Result<NodeRef<'_>, Error> {
        let path = Path::parse(path)?;
        let id = self.tree.resolve(&path)?;
        self.refresh(id)?;
        Ok(self.tree.node(id))
    }

    fn refresh(&mut self, id: NodeId) -> Result<(), Error> {
        let node = self.tree.node(id);
        if node.is_branch() {
            return Ok(());
        }
        let data = self.store.get(&node.path().to_string())?;
        if data.is_empty() {
            return Ok(());
        }
        // Unchanged data keeps the local scalar, which may be richer than
        // its JSON form (bytes come back as base64 text).
        if let Some(local) = node.value() {
            if encode_scalar(local)? == data {
                return Ok(());
            }
        }

        let scalar = decode_scalar(&data)?;
        debug!("refreshing {} from store", node.path());
        self.tree.write_leaf(id, scalar, &mut |_| Ok(()))
    }
}

impl<S: Store> Provider for StoreBackedTree<S> {
    fn create(&mut self, path: &str, value: Value) -> Result<(), Error> {
        StoreBackedTree::create(self, path, value)
    }

    fn get(&mut self, path: &str) -> Result<NodeRef<'_>, Error> {
        StoreBackedTree::get(self, path)
    }
}

fn mirror<S: Store>(store: &mut S, change: Change<'_>) -> Result<(), Error> {
    match change {
        Change::NodeCreated(path) => {
            let key = path.to_string();
            if !store.exists(&key)? {
                debug!("mirroring node {} to store", key);
                store.create(&key, Bytes::new())?;
            }
        }
        Change::ValueSet(path, scalar) => {
            store.set(&path.to_string(), encode_scalar(scalar)?)?;
        }
    }
    Ok(())
}

fn encode_scalar(scalar: &Scalar) -> Result<Bytes, Error> {
    serde_json::to_vec(scalar)
        .map(Bytes::from)
        .map_err(|e| Error::decode(format!("cannot encode {}: {}", scalar.kind(), e)))
}

fn decode_scalar(data: &[u8]) -> Result<Scalar, Error> {
    let json: serde_json::Value =
        serde_json::from_slice(data).map_err(|e| Error::decode(e.to_string()))?;
    match json {
        serde_json::Value::Null => Ok(Scalar::Null),
        serde_json::Value::Bool(b) => Ok(Scalar::Bool(b)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Scalar::Integer)
            .or_else(|| n.as_f64().map(Scalar::Float))
            .ok_or_else(|| Error::decode(format!("number out of range: {}", n))),
        serde_json::Value::String(s) => Ok(Scalar::Text(s)),
        other => Err(Error::decode(format!(
            "expected a scalar in store data, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, StoreError};

    #[test]
    fn writes_are_mirrored() {
        let mut tree = StoreBackedTree::new(MemoryStore::new());
        tree.create("/a/b", 42).unwrap();
        tree.create("/a/c", Value::mapping([("k", "v")])).unwrap();

        let store = tree.store_mut();
        assert_eq!(store.list("/a").unwrap(), vec!["b", "c"]);
        assert_eq!(&store.get("/a/b").unwrap()[..], b"42");
        assert_eq!(&store.get("/a/c/k").unwrap()[..], br#""v""#);
        assert!(store.get("/a").unwrap().is_empty());
    }

    #[test]
    fn existing_remote_nodes_are_reused() {
        let mut store = MemoryStore::new();
        store.create("/shared", Bytes::new()).unwrap();

        let mut tree = StoreBackedTree::new(store);
        tree.create("/shared/x", true).unwrap();
        assert_eq!(&tree.store_mut().get("/shared/x").unwrap()[..], b"true");
    }

    #[test]
    fn get_refreshes_from_store() {
        let mut tree = StoreBackedTree::new(MemoryStore::new());
        tree.create("/n", 1).unwrap();
        tree.store_mut()
            .set("/n", Bytes::from_static(b"2"))
            .unwrap();

        let node = tree.get("/n").unwrap();
        assert_eq!(node.value(), Some(&Scalar::Integer(2)));
        assert_eq!(tree.tree().get("/n").unwrap().value(), Some(&Scalar::Integer(2)));
    }

    #[test]
    fn remote_data_on_branch_is_ignored() {
        let mut tree = StoreBackedTree::new(MemoryStore::new());
        tree.create("/a/b", 1).unwrap();
        tree.store_mut()
            .set("/a", Bytes::from_static(b"5"))
            .unwrap();

        let node = tree.get("/a").unwrap();
        assert!(node.is_branch());
        assert_eq!(node.value(), None);
        assert_eq!(node.to_text(), r#"{"b":1}"#);
    }

    #[test]
    fn unchanged_bytes_stay_bytes() {
        let mut tree = StoreBackedTree::new(MemoryStore::new());
        tree.create("/d", Bytes::from_static(b"hello")).unwrap();
        assert_eq!(&tree.store_mut().get("/d").unwrap()[..], br#""aGVsbG8=""#);

        let node = tree.get("/d").unwrap();
        assert_eq!(
            node.value(),
            Some(&Scalar::Bytes(Bytes::from_static(b"hello")))
        );
    }

    #[test]
    fn get_unknown_path_is_not_found() {
        let mut store = MemoryStore::new();
        store.create("/remote_only", Bytes::new()).unwrap();
        let mut tree = StoreBackedTree::new(store);
        assert!(matches!(
            tree.get("/remote_only"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn store_failure_aborts_insert() {
        let mut tree = StoreBackedTree::new(MemoryStore::new());
        tree.create("/a", 1).unwrap();
        tree.store_mut().delete("/a").unwrap();

        // the local node exists, the remote one is gone: set fails
        let err = tree.create("/a", 2).unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::NoNode { .. })));
        assert_eq!(tree.tree().get("/a").unwrap().value(), Some(&Scalar::Integer(1)));
    }

    #[test]
    fn partial_failure_is_mirrored_too() {
        let mut tree = StoreBackedTree::new(MemoryStore::new());
        let value = Value::Sequence(vec![Value::from(1), Value::unsupported("channel")]);
        assert!(matches!(
            tree.create("/s", value),
            Err(Error::UnsupportedType { .. })
        ));
        let store = tree.store_mut();
        assert_eq!(&store.get("/s/0").unwrap()[..], b"1");
        // the failing element's node was created before its type was checked
        assert!(store.exists("/s/1").unwrap());
    }

    #[test]
    fn usable_through_provider() {
        let mut provider: Box<dyn Provider> = Box::new(StoreBackedTree::new(MemoryStore::new()));
        provider.create("/x", Value::from("y")).unwrap();
        assert!(provider.contains_leaf("/x"));
    }
}
