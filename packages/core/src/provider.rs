//! The create/get pair every tree flavor offers.

use crate::node::NodeRef;
use crate::tree::PathTree;
use crate::value::Value;
use crate::Error;

/// A source of tree nodes that accepts structured writes.
///
/// Implemented by the plain in-memory [`PathTree`] and by
/// [`crate::StoreBackedTree`], so callers can swap one for the other.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn Provider>`.
pub trait Provider {
    /// Insert `value` at `path`, creating intermediate nodes.
    fn create(&mut self, path: &str, value: Value) -> Result<(), Error>;

    /// Look up the node at `path`.
    fn get(&mut self, path: &str) -> Result<NodeRef<'_>, Error>;

    /// True when `path` names an existing leaf.
    fn contains_leaf(&mut self, path: &str) -> bool {
        self.get(path).is_ok_and(|node| node.is_leaf())
    }
}

impl Provider for PathTree {
    fn create(&mut self, path: &str, value: Value) -> Result<(), Error> {
        PathTree::create(self, path, value)
    }

    fn get(&mut self, path: &str) -> Result<NodeRef<'_>, Error> {
        PathTree::get(self, path)
    }
}

impl<T: Provider + ?Sized> Provider for Box<T> {
    fn create(&mut self, path: &str, value: Value) -> Result<(), Error> {
        self.as_mut().create(path, value)
    }

    fn get(&mut self, path: &str) -> Result<NodeRef<'_>, Error> {
        self.as_mut().get(path)
    }
}
