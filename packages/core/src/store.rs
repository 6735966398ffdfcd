//! External coordination store contract.
//!
//! A [`Store`] is a remote hierarchy of byte payloads keyed by absolute path
//! strings, in the style of ZooKeeper, etcd or Consul. The tree itself never
//! depends on one; [`crate::StoreBackedTree`] mirrors tree writes into any
//! implementation.
//!
//! [`MemoryStore`] implements the contract in process. It follows
//! coordination-store rules: the root always exists, nodes are created one
//! level at a time under an existing parent, and non-empty nodes cannot be
//! deleted without `delete_recursive`.

use std::collections::BTreeMap;
use std::sync::mpsc;

use bytes::Bytes;
use log::debug;

use crate::path::{Path, PathError};

/// Errors reported by a store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("no node at {path}")]
    NoNode { path: String },

    #[error("node already exists at {path}")]
    NodeExists { path: String },

    #[error("node at {path} has children")]
    NotEmpty { path: String },

    #[error("the root node cannot be deleted")]
    RootNode,

    #[error("{0}")]
    InvalidPath(#[from] PathError),

    /// Network, session or I/O failure of a remote store.
    #[error("transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

/// A change observed through [`Store::watch`] or [`Store::watch_children`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Created { path: String },
    DataChanged { path: String },
    Deleted { path: String },
    ChildrenChanged { path: String },
}

/// A hierarchical key/value store addressed by absolute paths.
pub trait Store {
    /// Data stored at `path`.
    fn get(&mut self, path: &str) -> Result<Bytes, StoreError>;

    /// Replace the data of an existing node.
    fn set(&mut self, path: &str, data: Bytes) -> Result<(), StoreError>;

    /// Create a node whose parent already exists.
    fn create(&mut self, path: &str, data: Bytes) -> Result<(), StoreError>;

    /// Delete a node without children.
    fn delete(&mut self, path: &str) -> Result<(), StoreError>;

    /// Delete a node and everything below it.
    fn delete_recursive(&mut self, path: &str) -> Result<(), StoreError>;

    /// Segments of the direct children of `path`.
    fn list(&mut self, path: &str) -> Result<Vec<String>, StoreError>;

    fn exists(&mut self, path: &str) -> Result<bool, StoreError>;

    /// Events about the node at `path` itself.
    fn watch(&mut self, path: &str) -> Result<mpsc::Receiver<StoreEvent>, StoreError>;

    /// Events about the set of children of `path`.
    fn watch_children(&mut self, path: &str) -> Result<mpsc::Receiver<StoreEvent>, StoreError>;
}

impl<T: Store + ?Sized> Store for &mut T {
    fn get(&mut self, path: &str) -> Result<Bytes, StoreError> {
        (**self).get(path)
    }

    fn set(&mut self, path: &str, data: Bytes) -> Result<(), StoreError> {
        (**self).set(path, data)
    }

    fn create(&mut self, path: &str, data: Bytes) -> Result<(), StoreError> {
        (**self).create(path, data)
    }

    fn delete(&mut self, path: &str) -> Result<(), StoreError> {
        (**self).delete(path)
    }

    fn delete_recursive(&mut self, path: &str) -> Result<(), StoreError> {
        (**self).delete_recursive(path)
    }

    fn list(&mut self, path: &str) -> Result<Vec<String>, StoreError> {
        (**self).list(path)
    }

    fn exists(&mut self, path: &str) -> Result<bool, StoreError> {
        (**self).exists(path)
    }

    fn watch(&mut self, path: &str) -> Result<mpsc::Receiver<StoreEvent>, StoreError> {
        (**self).watch(path)
    }

    fn watch_children(&mut self, path: &str) -> Result<mpsc::Receiver<StoreEvent>, StoreError> {
        (**self).watch_children(path)
    }
}

impl<T: Store + ?Sized> Store for Box<T> {
    fn get(&mut self, path: &str) -> Result<Bytes, StoreError> {
        self.as_mut().get(path)
    }

    fn set(&mut self, path: &str, data: Bytes) -> Result<(), StoreError> {
        self.as_mut().set(path, data)
    }

    fn create(&mut self, path: &str, data: Bytes) -> Result<(), StoreError> {
        self.as_mut().create(path, data)
    }

    fn delete(&mut self, path: &str) -> Result<(), StoreError> {
        self.as_mut().delete(path)
    }

    fn delete_recursive(&mut self, path: &str) -> Result<(), StoreError> {
        self.as_mut().delete_recursive(path)
    }

    fn list(&mut self, path: &str) -> Result<Vec<String>, StoreError> {
        self.as_mut().list(path)
    }

    fn exists(&mut self, path: &str) -> Result<bool, StoreError> {
        self.as_mut().exists(path)
    }

    fn watch(&mut self, path: &str) -> Result<mpsc::Receiver<StoreEvent>, StoreError> {
        self.as_mut().watch(path)
    }

    fn watch_children(&mut self, path: &str) -> Result<mpsc::Receiver<StoreEvent>, StoreError> {
        self.as_mut().watch_children(path)
    }
}

struct Watcher {
    path: String,
    children: bool,
    sender: mpsc::Sender<StoreEvent>,
}

/// An in-process [`Store`].
///
/// # Example
///
/// ```rust
/// use pathtree_core::{MemoryStore, Store};
/// use bytes::Bytes;
///
/// let mut store = MemoryStore::new();
/// store.create("/app", Bytes::new()).unwrap();
/// store.create("/app/port", Bytes::from_static(b"8080")).unwrap();
/// assert_eq!(store.list("/app").unwrap(), vec!["port".to_string()]);
/// assert_eq!(store.get("/app/port").unwrap(), Bytes::from_static(b"8080"));
/// ```
pub struct MemoryStore {
    nodes: BTreeMap<String, Bytes>,
    watchers: Vec<Watcher>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a store holding only the root node.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(Path::root().to_string(), Bytes::new());
        Self {
            nodes,
            watchers: Vec::new(),
        }
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    fn key(path: &str) -> Result<Path, StoreError> {
        Ok(Path::parse(path)?)
    }

    fn require(&self, path: &Path) -> Result<String, StoreError> {
        let key = path.to_string();
        if self.nodes.contains_key(&key) {
            Ok(key)
        } else {
            Err(StoreError::NoNode { path: key })
        }
    }

    fn child_keys(&self, key: &str) -> Vec<String> {
        let prefix = if key == "/" {
            key.to_string()
        } else {
            format!("{}/", key)
        };
        self.nodes
            .range(prefix.clone()..)
            .map(|(k, _)| k)
            .take_while(|k| k.starts_with(&prefix))
            .filter(|k| {
                let rest = &k[prefix.len()..];
                !rest.is_empty() && !rest.contains('/')
            })
            .cloned()
            .collect()
    }

    fn notify(&mut self, event: StoreEvent) {
        let (path, children) = match &event {
            StoreEvent::ChildrenChanged { path } => (path, true),
            StoreEvent::Created { path }
            | StoreEvent::DataChanged { path }
            | StoreEvent::Deleted { path } => (path, false),
        };
        // Receivers that hung up are dropped.
        self.watchers.retain(|watcher| {
            if watcher.children == children && &watcher.path == path {
                watcher.sender.send(event.clone()).is_ok()
            } else {
                true
            }
        });
    }

    fn register(
        &mut self,
        path: &str,
        children: bool,
    ) -> Result<mpsc::Receiver<StoreEvent>, StoreError> {
        let path = Self::key(path)?.to_string();
        let (sender, receiver) = mpsc::channel();
        self.watchers.push(Watcher {
            path,
            children,
            sender,
        });
        Ok(receiver)
    }

    fn remove_node(&mut self, path: &Path) {
        let key = path.to_string();
        if self.nodes.remove(&key).is_some() {
            debug!("store: deleted {}", key);
            self.notify(StoreEvent::Deleted { path: key });
            if let Some(parent) = path.parent() {
                self.notify(StoreEvent::ChildrenChanged {
                    path: parent.to_string(),
                });
            }
        }
    }
}

impl Store for MemoryStore {
    fn get(&mut self, path: &str) -> Result<Bytes, StoreError> {
        let key = self.require(&Self::key(path)?)?;
        Ok(self.nodes.get(&key).cloned().unwrap_or_default())
    }

    fn set(&mut self, path: &str, data: Bytes) -> Result<(), StoreError> {
        let key = self.require(&Self::key(path)?)?;
        self.nodes.insert(key.clone(), data);
        self.notify(StoreEvent::DataChanged { path: key });
        Ok(())
    }

    fn create(&mut self, path: &str, data: Bytes) -> Result<(), StoreError> {
        let path = Self::key(path)?;
        let key = path.to_string();
        if self.nodes.contains_key(&key) {
            return Err(StoreError::NodeExists { path: key });
        }
        let parent = path.parent().ok_or(StoreError::NodeExists { path: key.clone() })?;
        let parent_key = self.require(&parent)?;

        debug!("store: created {}", key);
        self.nodes.insert(key.clone(), data);
        self.notify(StoreEvent::Created { path: key });
        self.notify(StoreEvent::ChildrenChanged { path: parent_key });
        Ok(())
    }

    fn delete(&mut self, path: &str) -> Result<(), StoreError> {
        let path = Self::key(path)?;
        if path.is_root() {
            return Err(StoreError::RootNode);
        }
        let key = self.require(&path)?;
        if !self.child_keys(&key).is_empty() {
            return Err(StoreError::NotEmpty { path: key });
        }
        self.remove_node(&path);
        Ok(())
    }

    fn delete_recursive(&mut self, path: &str) -> Result<(), StoreError> {
        let path = Self::key(path)?;
        let key = self.require(&path)?;

        let mut doomed = Vec::new();
        let mut pending = vec![key];
        while let Some(next) = pending.pop() {
            pending.extend(self.child_keys(&next));
            doomed.push(next);
        }
        // Deepest first so every node is a leaf when it goes; the root stays.
        doomed.sort_by_key(|k| std::cmp::Reverse(k.matches('/').count()));
        for key in doomed {
            let path = Self::key(&key)?;
            if !path.is_root() {
                self.remove_node(&path);
            }
        }
        Ok(())
    }

    fn list(&mut self, path: &str) -> Result<Vec<String>, StoreError> {
        let key = self.require(&Self::key(path)?)?;
        Ok(self
            .child_keys(&key)
            .into_iter()
            .filter_map(|k| k.rsplit('/').next().map(str::to_string))
            .collect())
    }

    fn exists(&mut self, path: &str) -> Result<bool, StoreError> {
        Ok(self.nodes.contains_key(&Self::key(path)?.to_string()))
    }

    fn watch(&mut self, path: &str) -> Result<mpsc::Receiver<StoreEvent>, StoreError> {
        self.register(path, false)
    }

    fn watch_children(&mut self, path: &str) -> Result<mpsc::Receiver<StoreEvent>, StoreError> {
        self.register(path, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_exists() {
        let mut store = MemoryStore::new();
        assert!(store.exists("/").unwrap());
        assert!(store.is_empty());
        assert_eq!(store.get("/").unwrap(), Bytes::new());
    }

    #[test]
    fn create_requires_parent() {
        let mut store = MemoryStore::new();
        let err = store.create("/a/b", Bytes::new()).unwrap_err();
        assert!(matches!(err, StoreError::NoNode { ref path } if path == "/a"));

        store.create("/a", Bytes::new()).unwrap();
        store.create("/a/b", Bytes::from_static(b"1")).unwrap();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn create_twice_fails() {
        let mut store = MemoryStore::new();
        store.create("/a", Bytes::new()).unwrap();
        assert!(matches!(
            store.create("/a/", Bytes::new()),
            Err(StoreError::NodeExists { .. })
        ));
        assert!(matches!(
            store.create("/", Bytes::new()),
            Err(StoreError::NodeExists { .. })
        ));
    }

    #[test]
    fn set_requires_node() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.set("/missing", Bytes::new()),
            Err(StoreError::NoNode { .. })
        ));
        store.create("/a", Bytes::new()).unwrap();
        store.set("/a", Bytes::from_static(b"x")).unwrap();
        assert_eq!(store.get("/a").unwrap(), Bytes::from_static(b"x"));
    }

    #[test]
    fn list_direct_children_only() {
        let mut store = MemoryStore::new();
        store.create("/a", Bytes::new()).unwrap();
        store.create("/a/b", Bytes::new()).unwrap();
        store.create("/a/b/c", Bytes::new()).unwrap();
        store.create("/a/d", Bytes::new()).unwrap();
        store.create("/ab", Bytes::new()).unwrap();

        assert_eq!(store.list("/").unwrap(), vec!["a", "ab"]);
        assert_eq!(store.list("/a").unwrap(), vec!["b", "d"]);
        assert!(store.list("/a/b/c").unwrap().is_empty());
    }

    #[test]
    fn delete_refuses_non_empty() {
        let mut store = MemoryStore::new();
        store.create("/a", Bytes::new()).unwrap();
        store.create("/a/b", Bytes::new()).unwrap();
        assert!(matches!(
            store.delete("/a"),
            Err(StoreError::NotEmpty { .. })
        ));
        assert!(matches!(store.delete("/"), Err(StoreError::RootNode)));

        store.delete("/a/b").unwrap();
        store.delete("/a").unwrap();
        assert!(!store.exists("/a").unwrap());
    }

    #[test]
    fn delete_recursive_removes_subtree() {
        let mut store = MemoryStore::new();
        store.create("/a", Bytes::new()).unwrap();
        store.create("/a/b", Bytes::new()).unwrap();
        store.create("/a/b/c", Bytes::new()).unwrap();
        store.create("/keep", Bytes::new()).unwrap();

        store.delete_recursive("/a").unwrap();
        assert!(!store.exists("/a/b/c").unwrap());
        assert!(!store.exists("/a").unwrap());
        assert!(store.exists("/keep").unwrap());

        store.delete_recursive("/").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn watch_delivers_node_events() {
        let mut store = MemoryStore::new();
        let events = store.watch("/a").unwrap();

        store.create("/a", Bytes::new()).unwrap();
        store.set("/a", Bytes::from_static(b"v")).unwrap();
        store.delete("/a").unwrap();

        let received: Vec<StoreEvent> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                StoreEvent::Created {
                    path: "/a".to_string()
                },
                StoreEvent::DataChanged {
                    path: "/a".to_string()
                },
                StoreEvent::Deleted {
                    path: "/a".to_string()
                },
            ]
        );
    }

    #[test]
    fn watch_children_delivers_membership_events() {
        let mut store = MemoryStore::new();
        store.create("/dir", Bytes::new()).unwrap();
        let events = store.watch_children("/dir").unwrap();

        store.create("/dir/x", Bytes::new()).unwrap();
        store.set("/dir/x", Bytes::from_static(b"ignored")).unwrap();
        store.delete("/dir/x").unwrap();

        let received: Vec<StoreEvent> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                StoreEvent::ChildrenChanged {
                    path: "/dir".to_string()
                };
                2
            ]
        );
    }

    #[test]
    fn dropped_watchers_are_pruned() {
        let mut store = MemoryStore::new();
        drop(store.watch("/a").unwrap());
        store.create("/a", Bytes::new()).unwrap();
        assert!(store.watchers.is_empty());
    }

    #[test]
    fn invalid_path_rejected() {
        let mut store = MemoryStore::new();
        assert!(matches!(
            store.exists("/a//b"),
            Err(StoreError::InvalidPath(_))
        ));
    }
}
