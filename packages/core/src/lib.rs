//! pathtree: nested data as a tree of slash-delimited paths.
//!
//! Any structured value (scalars, ordered sequences, keyed mappings) is
//! stored as a set of paths, one scalar per leaf:
//! - `Path`: a normalized absolute path (`/a/b/0`)
//! - `Value`: what callers insert; sequences and mappings decompose into subtrees
//! - `PathTree`: the arena-backed tree with `create`, `get`, `contains_leaf`
//! - `NodeRef`: a borrowed node, serializable back to JSON
//! - `Store` / `StoreBackedTree`: mirroring writes into an external store
//!
//! # Example
//!
//! ```rust
//! use pathtree_core::{PathTree, Value};
//!
//! let mut tree = PathTree::new();
//! tree.create("/a/b/c/ff/gg", 42).unwrap();
//! tree.create(
//!     "/map",
//!     Value::mapping([
//!         ("foo", Value::from("bar")),
//!         ("foo3", Value::from(vec![1, 2])),
//!     ]),
//! )
//! .unwrap();
//!
//! assert_eq!(tree.get("/map/foo3").unwrap().to_text(), "[1,2]");
//! assert!(tree.contains_leaf("/a/b/c/ff/gg"));
//! ```

pub use bytes::Bytes;

mod error;
mod node;
mod path;
mod provider;
mod serialize;
pub mod store;
mod store_tree;
mod tree;
mod value;

pub use error::Error;
pub use node::{NodeId, NodeRef};
pub use path::{Path, PathError, SEPARATOR};
pub use provider::Provider;
pub use store::{MemoryStore, Store, StoreError, StoreEvent};
pub use store_tree::StoreBackedTree;
pub use tree::PathTree;
pub use value::{Scalar, Value};
